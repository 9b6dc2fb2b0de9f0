use crate::{CompileError, Diagnostics, Lexer, Log, OpNode, OpPtr, Position, Scanner, Token, TokenKind};
use once_cell::unsync::OnceCell;

/// Build state for the chain currently receiving nodes at one nesting depth.
struct ChainFrame {
    parent: OpPtr,
    seg_head: Option<OpPtr>,
    tail: Option<OpPtr>,
    delims: usize,
}

impl ChainFrame {
    fn new(parent: OpPtr) -> Self {
        Self {
            parent,
            seg_head: None,
            tail: None,
            delims: 0,
        }
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            pool: Vec::new(),
            root: None,
            log: OnceCell::new(),
        }
    }

    /// Drop the node pool and root of a previous compile.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.root = None;
    }

    /// Set a log label to debug tree construction.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub(crate) fn root(&self) -> Option<OpPtr> {
        self.root
    }

    pub(crate) fn node(&self, ptr: OpPtr) -> &OpNode {
        &self.pool[ptr.index()]
    }

    fn node_mut(&mut self, ptr: OpPtr) -> &mut OpNode {
        &mut self.pool[ptr.index()]
    }

    fn alloc(&mut self, token: Token) -> OpPtr {
        let ptr = OpPtr::new(self.pool.len());
        self.pool.push(OpNode {
            token,
            prev: None,
            next: None,
            sub: None,
        });
        ptr
    }

    /// Drive the scanner to exhaustion and organize its tokens into the
    /// operation tree below a synthetic root function node.
    ///
    /// Every chain is finalized when its delimiter or closer arrives: swizzles
    /// absorb the value before them, then `*` and `/` are rewired ahead of `+`
    /// and `-`, so a finished chain is a single operation node and a function
    /// node's `sub` chain is exactly its argument list.
    pub fn consume_all_tokens(
        &mut self,
        scanner: &mut Scanner,
        diag: &Diagnostics,
    ) -> Result<(), CompileError> {
        self.reset();
        let root = self.alloc(Token::with_text(TokenKind::FunctionStart, Position::UNKNOWN, ""));
        self.root = Some(root);
        let mut frames = vec![ChainFrame::new(root)];

        loop {
            let token = scanner.next_token(diag)?;
            match token.kind {
                TokenKind::SourceBegin => continue,
                TokenKind::NumLiteral | TokenKind::ArithmeticOp | TokenKind::VectorSwizzle => {
                    let node = self.alloc(token);
                    match frames.last_mut() {
                        Some(frame) => self.append(frame, node),
                        None => return Err(self.no_frame_err(diag)),
                    }
                }
                TokenKind::FunctionStart | TokenKind::EvalGroupStart => {
                    let node = self.alloc(token);
                    match frames.last_mut() {
                        Some(frame) => self.append(frame, node),
                        None => return Err(self.no_frame_err(diag)),
                    }
                    frames.push(ChainFrame::new(node));
                }
                TokenKind::FunctionEnd | TokenKind::EvalGroupEnd => {
                    let frame = match frames.pop() {
                        Some(frame) if !frames.is_empty() => frame,
                        _ => return Err(self.no_frame_err(diag)),
                    };
                    self.close_frame(frame, token.location, diag)?;
                }
                TokenKind::FunctionArgDelim => {
                    let frame = match frames.last_mut() {
                        Some(frame) => frame,
                        None => return Err(self.no_frame_err(diag)),
                    };
                    if frame.seg_head.is_none() {
                        return Err(
                            diag.parser_error(token.location, "empty function argument".to_string())
                        );
                    }
                    self.finalize_segment(frame, token.location, diag)?;
                    frame.delims += 1;
                }
                TokenKind::SourceEnd => {
                    let mut frame = match frames.pop() {
                        Some(frame) => frame,
                        None => return Err(self.no_frame_err(diag)),
                    };
                    if frame.seg_head.is_none() {
                        return Err(diag.parser_error(token.location, "empty expression".to_string()));
                    }
                    self.finalize_segment(&mut frame, token.location, diag)?;
                    break;
                }
                TokenKind::None => {
                    return Err(diag.parser_error(token.location, "unexpected token".to_string()));
                }
            }
        }

        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Success(()).order() {
                println!(
                    "[{}; Lexer]: operation tree built with {} nodes",
                    log,
                    self.pool.len()
                );
            }
        }
        Ok(())
    }

    fn no_frame_err(&self, diag: &Diagnostics) -> CompileError {
        diag.parser_error(Position::UNKNOWN, "operation tree lost its root chain".to_string())
    }

    fn append(&mut self, frame: &mut ChainFrame, node: OpPtr) {
        match frame.tail {
            Some(tail) => {
                self.node_mut(tail).next = Some(node);
                self.node_mut(node).prev = Some(tail);
            }
            None => {
                self.node_mut(frame.parent).sub = Some(node);
            }
        }
        frame.tail = Some(node);
        if frame.seg_head.is_none() {
            frame.seg_head = Some(node);
        }
    }

    fn close_frame(
        &mut self,
        mut frame: ChainFrame,
        closer: Position,
        diag: &Diagnostics,
    ) -> Result<(), CompileError> {
        if frame.seg_head.is_none() {
            let parent_kind = self.node(frame.parent).token.kind;
            if parent_kind == TokenKind::FunctionStart && frame.delims == 0 {
                // call with no arguments
                return Ok(());
            }
            let message = if parent_kind == TokenKind::FunctionStart {
                "empty function argument"
            } else {
                "empty evaluation group"
            };
            return Err(diag.parser_error(closer, message.to_string()));
        }
        self.finalize_segment(&mut frame, closer, diag)
    }

    /// Reduce the current segment of a chain to a single operation node.
    fn finalize_segment(
        &mut self,
        frame: &mut ChainFrame,
        terminator: Position,
        diag: &Diagnostics,
    ) -> Result<(), CompileError> {
        let head = match frame.seg_head {
            Some(head) => head,
            None => return Ok(()),
        };
        let pred = self.node(head).prev;
        if let Some(p) = pred {
            self.node_mut(p).next = None;
            self.node_mut(head).prev = None;
        }

        let head = self.fold_swizzles(head, diag)?;
        let head = self.rewire_pass(head, &["*", "/"], terminator, diag)?;
        let head = self.rewire_pass(head, &["+", "-"], terminator, diag)?;

        if let Some(extra) = self.node(head).next {
            let location = self.node(extra).token.location;
            return Err(diag.parser_error(
                location,
                "expected an arithmetic operator between operations".to_string(),
            ));
        }

        self.node_mut(head).prev = pred;
        match pred {
            Some(p) => self.node_mut(p).next = Some(head),
            None => self.node_mut(frame.parent).sub = Some(head),
        }
        frame.tail = Some(head);
        frame.seg_head = None;
        Ok(())
    }

    /// Whether the node can serve as an operand.
    fn is_value(&self, ptr: OpPtr) -> bool {
        let node = self.node(ptr);
        match node.token.kind {
            TokenKind::NumLiteral | TokenKind::FunctionStart | TokenKind::EvalGroupStart => true,
            TokenKind::VectorSwizzle | TokenKind::ArithmeticOp => node.sub.is_some(),
            _ => false,
        }
    }

    /// Each swizzle node absorbs the value node before it under `sub`.
    fn fold_swizzles(
        &mut self,
        head: OpPtr,
        diag: &Diagnostics,
    ) -> Result<OpPtr, CompileError> {
        let mut head = head;
        let mut cursor = Some(head);
        while let Some(ptr) = cursor {
            let node = self.node(ptr);
            cursor = node.next;
            if node.token.kind != TokenKind::VectorSwizzle || node.sub.is_some() {
                continue;
            }
            let location = node.token.location;
            let operand = match node.prev {
                Some(operand) => operand,
                None => {
                    return Err(diag.parser_error(
                        location,
                        "swizzle is not attached to a value".to_string(),
                    ))
                }
            };
            if self.node(operand).token.kind == TokenKind::NumLiteral {
                return Err(diag.parser_error(
                    location,
                    "cannot swizzle a numeric literal".to_string(),
                ));
            }
            if !self.is_value(operand) {
                return Err(diag.parser_error(
                    location,
                    "swizzle is not attached to a value".to_string(),
                ));
            }

            let before = self.node(operand).prev;
            self.node_mut(ptr).sub = Some(operand);
            self.node_mut(ptr).prev = before;
            match before {
                Some(b) => self.node_mut(b).next = Some(ptr),
                None => head = ptr,
            }
            let operand = self.node_mut(operand);
            operand.prev = None;
            operand.next = None;
        }
        Ok(head)
    }

    /// One left-to-right precedence pass. Every unprocessed operator of the
    /// class replaces itself and its neighbors with a subtree holding the two
    /// operands as its `sub` chain.
    fn rewire_pass(
        &mut self,
        head: OpPtr,
        ops: &[&str],
        terminator: Position,
        diag: &Diagnostics,
    ) -> Result<OpPtr, CompileError> {
        let mut head = head;
        let mut cursor = Some(head);
        while let Some(ptr) = cursor {
            let node = self.node(ptr);
            if node.token.kind != TokenKind::ArithmeticOp
                || node.sub.is_some()
                || !ops.contains(&node.token.text.as_str())
            {
                cursor = node.next;
                continue;
            }
            let location = node.token.location;
            let glyph = node.token.text.clone();
            let lhs = match node.prev {
                Some(lhs) => lhs,
                None => {
                    return Err(diag.parser_error(
                        location,
                        format!("operator '{}' is missing its left operand", glyph),
                    ))
                }
            };
            let rhs = match node.next {
                Some(rhs) => rhs,
                None => {
                    return Err(diag.parser_error(
                        terminator,
                        format!("operator '{}' is missing its right operand", glyph),
                    ))
                }
            };
            if !self.is_value(lhs) {
                return Err(diag.parser_error(
                    location,
                    format!("operator '{}' is missing its left operand", glyph),
                ));
            }
            if !self.is_value(rhs) {
                let rhs_location = self.node(rhs).token.location;
                return Err(diag.parser_error(
                    rhs_location,
                    "consecutive arithmetic operators".to_string(),
                ));
            }

            let before = self.node(lhs).prev;
            let after = self.node(rhs).next;
            {
                let lhs = self.node_mut(lhs);
                lhs.prev = None;
                lhs.next = Some(rhs);
            }
            {
                let rhs = self.node_mut(rhs);
                rhs.prev = Some(lhs);
                rhs.next = None;
            }
            {
                let node = self.node_mut(ptr);
                node.sub = Some(lhs);
                node.prev = before;
                node.next = after;
            }
            match before {
                Some(b) => self.node_mut(b).next = Some(ptr),
                None => head = ptr,
            }
            if let Some(a) = after {
                self.node_mut(a).prev = Some(ptr);
            }
            cursor = after;
        }
        Ok(head)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
