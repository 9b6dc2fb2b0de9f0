//! Shade intermediate representation (shade_ir) is a library to compile a compact,
//! function-call-oriented shading expression language into a flat, register based
//! intermediate representation ([Ir]).
//!
//! # Overview
//! Material pipelines often describe a shader stage as a single expression combining
//! texture fetches, lighting terms and vector arithmetic. Generating target shader code
//! (HLSL, GLSL, Metal) directly from such text couples every code generator to the
//! source syntax. Instead, this library provides the frontend half of the pipeline:
//! the input expression is scanned into tokens, organized into an operation tree, and
//! lowered into a compact instruction list where every instruction writes a fresh
//! register. A code generator only has to walk the returned [Ir].
//!
//! # Design
//!
//! Compilation is a strictly linear pipeline:
//!
//! ```text
//! source -> Scanner -> tokens -> Lexer -> operation tree -> Ir
//! ```
//!
//! The [Scanner] produces location tagged [Token]s from the input string.
//! The [Lexer] organizes the tokens into chains of operation nodes, where nested
//! function calls and parenthesized groups hang below their owning node.
//! Arithmetic precedence is resolved by rewiring each finished chain, so `*` and `/`
//! bind tighter than `+` and `-`, left-associative within a class.
//! Finally the tree is flattened into the [Ir] by a post-order walk which emits
//! children before their parent; an instruction refers to its operands by the index
//! of the instruction that produced them.
//!
//! Any failure along the way is fatal and surfaces as a [CompileError] carrying the
//! error category, the compiled unit name, the precise line and column, and a quoted
//! source line with a caret under the offending column.
//!
//! # Example
//!
//! ```
//! use shade_ir::{Frontend, InstKind};
//!
//! let frontend = Frontend::new();
//! let ir = frontend
//!     .compile("Texture(0, UV(0)) * Vec3(0.5, 0.5, 1.0).rgb", "diffuse_pass")
//!     .unwrap();
//!
//! assert_eq!(ir.instruction_count(), 10);
//!
//! // The last instruction is the root of the expression.
//! let root = ir.root().unwrap();
//! match &root.kind {
//!     InstKind::Arithmetic { operands, .. } => {
//!         let lhs = ir.instruction(operands[0]).unwrap();
//!         assert_eq!(lhs.call_name(), Some("Texture"));
//!     }
//!     _ => panic!("expected arithmetic root"),
//! }
//!
//! // The IR re-serializes to a canonical form of the expression.
//! assert_eq!(
//!     format!("{}", ir),
//!     "(Texture(0, UV(0)) * Vec3(0.5, 0.5, 1).xyz)"
//! );
//! ```
//!
//! # License
//! [shade_ir](crate) is provided under the MIT license.

mod builder;
mod code;
mod diagnostics;
mod error;
mod frontend;
mod ir;
mod lexer;
mod logger;
mod position;
mod scanner;
mod token;
mod wrapper_index;

#[cfg(test)]
mod __tests__;

use once_cell::unsync::OnceCell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// The line and column information at a code point. Lines and columns are 1-indexed;
/// [Position::UNKNOWN] marks locations synthesized by the compiler.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A wrapper for the compiled source text with lazily computed line information.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// A enum structure to assign multiple level debugging to the pipeline components.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lexical category of a scanned [Token].
pub enum TokenKind {
    None,
    SourceBegin,
    SourceEnd,
    NumLiteral,
    VectorSwizzle,
    EvalGroupStart,
    EvalGroupEnd,
    FunctionStart,
    FunctionEnd,
    FunctionArgDelim,
    ArithmeticOp,
}

#[derive(Debug, Clone, PartialEq)]
/// Element of the scanned token stream.
///
/// `text` holds the raw lexeme for identifiers, swizzle masks and operator glyphs.
/// `int_value` and `float_value` are populated for [TokenKind::NumLiteral] only.
pub struct Token {
    pub kind: TokenKind,
    pub location: Position,
    pub text: String,
    pub int_value: i32,
    pub float_value: f32,
}

/// Tokenizer for the shading expression language.
///
/// A [Scanner] yields exactly one [TokenKind::SourceBegin] first and then a finite
/// token sequence terminated by [TokenKind::SourceEnd]; repeated calls after the end
/// keep yielding [TokenKind::SourceEnd]. Parentheses and commas are disambiguated by
/// a stack of the currently open constructs.
pub struct Scanner<'c> {
    code: &'c Code<'c>,
    pointer: usize,
    paren_stack: Vec<(TokenKind, Position)>,
    last_kind: TokenKind,
    log: OnceCell<Log<&'static str>>,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// A wrapper to indicate the index of an operation node in the [Lexer] node pool.
struct OpPtr(usize);

#[derive(Debug)]
/// Intermediate tree node for organizing tokens into operations.
///
/// `prev`/`next` link the horizontal chain at one nesting depth; `sub` points at the
/// nested content of a function call, an evaluation group, or the operands of a
/// rewired operator.
struct OpNode {
    token: Token,
    prev: Option<OpPtr>,
    next: Option<OpPtr>,
    sub: Option<OpPtr>,
}

/// Operation tree builder.
///
/// The [Lexer] consumes the entire token stream of a [Scanner] and arranges the
/// tokens into a tree of operation nodes below a synthetic root. Nodes are allocated
/// from a pool owned by the lexer so node handles stay valid for the whole compile.
pub struct Lexer {
    pool: Vec<OpNode>,
    root: Option<OpPtr>,
    log: OnceCell<Log<&'static str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Binary arithmetic operation of an [InstKind::Arithmetic] instruction.
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A register name. Registers are single-assignment: the register written by an
/// instruction equals the index of that instruction in the [Ir].
pub type RegId = usize;

/// Immediate vector value materialized by [InstKind::LoadImm].
pub type ImmVec = [f32; 4];

#[derive(Debug, Clone, PartialEq)]
/// Operation and payload of an [Instruction].
pub enum InstKind {
    /// Materialize a constant into the target register. Scalar literals broadcast
    /// the same value into all four lanes.
    LoadImm(ImmVec),
    /// Deferred call; the backend binds the function by name.
    Call { name: String, arg_regs: Vec<RegId> },
    /// Binary arithmetic between two previously written registers.
    Arithmetic {
        op: ArithmeticOp,
        operands: [RegId; 2],
    },
    /// Select or rearrange vector components; `-1` marks unused trailing lanes.
    Swizzle { components: [i8; 4], src: RegId },
}

#[derive(Debug, Clone, PartialEq)]
/// A single operation of the [Ir].
pub struct Instruction {
    pub kind: InstKind,
    pub target: RegId,
    pub location: Position,
}

#[derive(Debug, Clone, PartialEq)]
/// The flat intermediate representation returned from a compile.
///
/// Instructions are topologically ordered: every operand index is strictly less
/// than the index of the instruction referring to it, and the last instruction is
/// the root of the expression. The structure is immutable once returned.
pub struct Ir {
    instructions: Vec<Instruction>,
    reg_count: usize,
}

#[derive(Clone, Copy)]
/// A printable view over one instruction of an [Ir] and its operand subtree.
pub struct IrTree<'ir> {
    ir: &'ir Ir,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pipeline stage a [CompileError] was raised from. The category renders as the
/// report prefix: `[Scanner]`, `[Parser]`, or the backend name.
pub enum ErrorCategory {
    Scanner,
    Parser,
    Backend(String),
}

#[derive(Debug, Clone)]
/// A fatal, located compilation error.
///
/// Compilation never continues past the first report; no partial [Ir] is returned.
/// The [Display](std::fmt::Display) rendering contains the category tag, the unit
/// name, the `line:column` location, the message, and a two line snippet quoting
/// the offending source line with a caret under the column.
pub struct CompileError {
    pub category: ErrorCategory,
    pub name: String,
    pub location: Position,
    pub message: String,
    pub snippet: String,
}

/// Named error reporting for one compiled unit.
///
/// A [Diagnostics] formats scanner, parser and backend reports against the source
/// it was created with. Backend consumers of the [Ir] route their own errors
/// through [backend_error](Diagnostics::backend_error) after tagging themselves
/// with [set_backend](Diagnostics::set_backend).
pub struct Diagnostics<'c> {
    name: String,
    backend: String,
    code: &'c Code<'c>,
    log: OnceCell<Log<&'static str>>,
}

/// The compile facade.
///
/// A [Frontend] owns the scanning, tree building and lowering steps behind a single
/// [compile](Frontend::compile) call. Every call starts from a fresh pipeline state,
/// so one instance can compile any number of sources in sequence; distinct
/// instances are independent and may be used in parallel on disjoint sources.
pub struct Frontend {
    log: OnceCell<Log<&'static str>>,
}
