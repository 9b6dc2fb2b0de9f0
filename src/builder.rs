use crate::{
    ArithmeticOp, CompileError, Diagnostics, InstKind, Ir, Lexer, OpPtr, Position, RegId, TokenKind,
};

impl Lexer {
    /// Flatten the operation tree into the register based instruction list.
    ///
    /// A single post-order walk emits the operands of every node before the
    /// node itself, so an instruction only ever refers to registers written by
    /// earlier instructions. The register of a node is the index of its own
    /// instruction.
    pub fn compile_ir(&self, diag: &Diagnostics) -> Result<Ir, CompileError> {
        let root = match self.root() {
            Some(root) => root,
            None => {
                return Err(
                    diag.parser_error(Position::UNKNOWN, "no tokens were consumed".to_string())
                )
            }
        };
        let expr = match self.node(root).sub {
            Some(expr) => expr,
            None => {
                return Err(diag.parser_error(Position::UNKNOWN, "empty expression".to_string()))
            }
        };
        let mut ir = Ir::new();
        self.emit_operation(expr, &mut ir, diag)?;
        Ok(ir)
    }

    fn emit_operation(
        &self,
        ptr: OpPtr,
        ir: &mut Ir,
        diag: &Diagnostics,
    ) -> Result<RegId, CompileError> {
        let node = self.node(ptr);
        let location = node.token.location;
        match node.token.kind {
            TokenKind::NumLiteral => {
                let value = node.token.float_value;
                Ok(ir.push(InstKind::LoadImm([value, value, value, value]), location))
            }
            TokenKind::FunctionStart => self.emit_call(ptr, ir, diag),
            TokenKind::EvalGroupStart => match node.sub {
                // the group is transparent; its register is the inner register
                Some(inner) => self.emit_operation(inner, ir, diag),
                None => {
                    Err(diag.parser_error(location, "empty evaluation group".to_string()))
                }
            },
            TokenKind::VectorSwizzle => {
                let src_node = match node.sub {
                    Some(src) => src,
                    None => {
                        return Err(diag.parser_error(
                            location,
                            "swizzle is not attached to a value".to_string(),
                        ))
                    }
                };
                let components = match node.token.swizzle_components() {
                    Some(components) => components,
                    None => {
                        return Err(diag.parser_error(
                            location,
                            format!("malformed swizzle mask '{}'", node.token.text),
                        ))
                    }
                };
                let src = self.emit_operation(src_node, ir, diag)?;
                Ok(ir.push(InstKind::Swizzle { components, src }, location))
            }
            TokenKind::ArithmeticOp => {
                let lhs_node = match node.sub {
                    Some(lhs) => lhs,
                    None => {
                        return Err(diag.parser_error(
                            location,
                            format!("operator '{}' is missing its operands", node.token.text),
                        ))
                    }
                };
                let rhs_node = match self.node(lhs_node).next {
                    Some(rhs) => rhs,
                    None => {
                        return Err(diag.parser_error(
                            location,
                            format!("operator '{}' is missing its right operand", node.token.text),
                        ))
                    }
                };
                let op = match ArithmeticOp::from_glyph(&node.token.text) {
                    Some(op) => op,
                    None => {
                        return Err(diag.parser_error(
                            location,
                            format!("unknown arithmetic operator '{}'", node.token.text),
                        ))
                    }
                };
                let lhs = self.emit_operation(lhs_node, ir, diag)?;
                let rhs = self.emit_operation(rhs_node, ir, diag)?;
                Ok(ir.push(
                    InstKind::Arithmetic {
                        op,
                        operands: [lhs, rhs],
                    },
                    location,
                ))
            }
            _ => Err(diag.parser_error(
                location,
                "unexpected token in the operation tree".to_string(),
            )),
        }
    }

    fn emit_call(
        &self,
        ptr: OpPtr,
        ir: &mut Ir,
        diag: &Diagnostics,
    ) -> Result<RegId, CompileError> {
        let node = self.node(ptr);
        let location = node.token.location;
        let name = node.token.text.clone();

        let mut arg_count = 0;
        let mut arg = node.sub;
        while let Some(ptr) = arg {
            arg_count += 1;
            arg = self.node(ptr).next;
        }
        // structural constructors have a fixed arity; any other call is bound
        // late by the backend
        let required = match name.as_str() {
            "Vec3" => Some(3),
            "Vec4" => Some(4),
            _ => None,
        };
        if let Some(required) = required {
            if arg_count != required {
                return Err(diag.parser_error(
                    location,
                    format!("{} requires {} arguments, found {}", name, required, arg_count),
                ));
            }
        }

        let mut arg_regs = Vec::with_capacity(arg_count);
        let mut arg = node.sub;
        while let Some(ptr) = arg {
            arg_regs.push(self.emit_operation(ptr, ir, diag)?);
            arg = self.node(ptr).next;
        }
        Ok(ir.push(InstKind::Call { name, arg_regs }, location))
    }
}
