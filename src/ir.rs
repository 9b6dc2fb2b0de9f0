use crate::{ArithmeticOp, ImmVec, InstKind, Instruction, Ir, IrTree, Position, RegId};
use ptree::TreeItem;
use std::fmt::{Display, Formatter};

impl ArithmeticOp {
    pub fn glyph(&self) -> char {
        match self {
            ArithmeticOp::Add => '+',
            ArithmeticOp::Sub => '-',
            ArithmeticOp::Mul => '*',
            ArithmeticOp::Div => '/',
        }
    }

    pub(crate) fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "+" => Some(ArithmeticOp::Add),
            "-" => Some(ArithmeticOp::Sub),
            "*" => Some(ArithmeticOp::Mul),
            "/" => Some(ArithmeticOp::Div),
            _ => None,
        }
    }
}

impl Display for ArithmeticOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

fn mask_string(components: &[i8; 4]) -> String {
    components
        .iter()
        .take_while(|c| **c >= 0)
        .map(|c| match c {
            0 => 'x',
            1 => 'y',
            2 => 'z',
            3 => 'w',
            _ => '?',
        })
        .collect()
}

impl Ir {
    pub(crate) fn new() -> Self {
        Self {
            instructions: Vec::new(),
            reg_count: 0,
        }
    }

    pub(crate) fn push(&mut self, kind: InstKind, location: Position) -> RegId {
        let target = self.instructions.len();
        self.instructions.push(Instruction {
            kind,
            target,
            location,
        });
        self.reg_count += 1;
        target
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// The number of registers written; equals the instruction count since
    /// every instruction writes a fresh register.
    pub fn reg_count(&self) -> usize {
        self.reg_count
    }

    pub fn instruction(&self, index: RegId) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The last instruction, which computes the whole expression.
    pub fn root(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Compare two IRs instruction by instruction, ignoring source locations.
    pub fn structural_eq(&self, other: &Ir) -> bool {
        self.instructions.len() == other.instructions.len()
            && self
                .instructions
                .iter()
                .zip(&other.instructions)
                .all(|(a, b)| a.kind == b.kind && a.target == b.target)
    }

    /// A printable view rooted at the last instruction.
    pub fn tree(&self) -> Option<IrTree> {
        if self.instructions.is_empty() {
            None
        } else {
            Some(IrTree {
                ir: self,
                index: self.instructions.len() - 1,
            })
        }
    }

    pub fn print(&self) -> Result<(), std::io::Error> {
        match self.tree() {
            Some(tree) => ptree::print_tree(&tree),
            None => Ok(()),
        }
    }

    fn fmt_operation(&self, f: &mut Formatter<'_>, index: RegId) -> std::fmt::Result {
        let inst = match self.instruction(index) {
            Some(inst) => inst,
            None => return Err(std::fmt::Error),
        };
        match &inst.kind {
            InstKind::LoadImm(vec) => write!(f, "{}", vec[0]),
            InstKind::Call { name, arg_regs } => {
                write!(f, "{}(", name)?;
                for (i, reg) in arg_regs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.fmt_operation(f, *reg)?;
                }
                write!(f, ")")
            }
            InstKind::Arithmetic { op, operands } => {
                write!(f, "(")?;
                self.fmt_operation(f, operands[0])?;
                write!(f, " {} ", op)?;
                self.fmt_operation(f, operands[1])?;
                write!(f, ")")
            }
            InstKind::Swizzle { components, src } => {
                self.fmt_operation(f, *src)?;
                write!(f, ".{}", mask_string(components))
            }
        }
    }
}

/// Renders the canonical source form of the expression. Compiling the rendered
/// text again produces a structurally identical IR.
impl Display for Ir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.instructions.last() {
            Some(root) => self.fmt_operation(f, root.target),
            None => Ok(()),
        }
    }
}

impl Instruction {
    pub fn child_count(&self) -> usize {
        match &self.kind {
            InstKind::LoadImm(_) => 0,
            InstKind::Call { arg_regs, .. } => arg_regs.len(),
            InstKind::Arithmetic { .. } => 2,
            InstKind::Swizzle { .. } => 1,
        }
    }

    /// The register of the given operand.
    pub fn child_reg(&self, index: usize) -> Option<RegId> {
        match &self.kind {
            InstKind::LoadImm(_) => None,
            InstKind::Call { arg_regs, .. } => arg_regs.get(index).copied(),
            InstKind::Arithmetic { operands, .. } => operands.get(index).copied(),
            InstKind::Swizzle { src, .. } => (index == 0).then(|| *src),
        }
    }

    /// The instruction which produced the given operand.
    pub fn child<'ir>(&self, ir: &'ir Ir, index: usize) -> Option<&'ir Instruction> {
        ir.instruction(self.child_reg(index)?)
    }

    pub fn imm_vec(&self) -> Option<&ImmVec> {
        match &self.kind {
            InstKind::LoadImm(vec) => Some(vec),
            _ => None,
        }
    }

    pub fn call_name(&self) -> Option<&str> {
        match &self.kind {
            InstKind::Call { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn arithmetic_op(&self) -> Option<ArithmeticOp> {
        match &self.kind {
            InstKind::Arithmetic { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// The swizzle mask in its canonical `xyzw` spelling.
    pub fn swizzle_mask(&self) -> Option<String> {
        match &self.kind {
            InstKind::Swizzle { components, .. } => Some(mask_string(components)),
            _ => None,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            InstKind::LoadImm(vec) => {
                write!(f, "LoadImm({}, {}, {}, {})", vec[0], vec[1], vec[2], vec[3])
            }
            InstKind::Call { name, arg_regs } => {
                write!(f, "Call '{}' ({} args)", name, arg_regs.len())
            }
            InstKind::Arithmetic { op, .. } => write!(f, "Arithmetic '{}'", op),
            InstKind::Swizzle { components, .. } => {
                write!(f, "Swizzle '.{}'", mask_string(components))
            }
        }
    }
}

impl<'ir> TreeItem for IrTree<'ir> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self.ir.instruction(self.index) {
            Some(inst) => write!(f, "%{} = {} # {}", inst.target, inst, inst.location),
            None => Ok(()),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        let children: Vec<IrTree> = match self.ir.instruction(self.index) {
            Some(inst) => (0..inst.child_count())
                .filter_map(|i| inst.child_reg(i))
                .map(|reg| IrTree {
                    ir: self.ir,
                    index: reg,
                })
                .collect(),
            None => Vec::new(),
        };
        std::borrow::Cow::from(children)
    }
}
