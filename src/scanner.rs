use crate::{Code, CompileError, Diagnostics, Log, Position, Scanner, Token, TokenKind};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;

static NUM_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static SWIZZLE_MASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.[xyzwrgba]{1,4}").unwrap());

impl<'c> Scanner<'c> {
    /// Create a scanner positioned at the beginning of the source.
    pub fn new(code: &'c Code<'c>) -> Self {
        Self {
            code,
            pointer: 0,
            paren_stack: Vec::new(),
            last_kind: TokenKind::None,
            log: OnceCell::new(),
        }
    }

    /// Rewind to line 1, column 1 and forget any open constructs.
    pub fn reset(&mut self) {
        self.pointer = 0;
        self.paren_stack.clear();
        self.last_kind = TokenKind::None;
    }

    /// Set a log label to debug the scanned token stream.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// The line and column at the current scan point.
    pub fn current_location(&self) -> Position {
        self.code.obtain_position(self.pointer)
    }

    /// Yield the next token of the source.
    ///
    /// The first call yields [TokenKind::SourceBegin]; once the source is
    /// exhausted every further call yields [TokenKind::SourceEnd].
    pub fn next_token(&mut self, diag: &Diagnostics) -> Result<Token, CompileError> {
        if self.last_kind == TokenKind::None {
            return Ok(self.emit(Token::new(TokenKind::SourceBegin, Position::new(1, 1))));
        }
        self.skip_trivia();
        let location = self.current_location();
        let source = self.code.value;
        let rest = &source[self.pointer..];
        let byte = match rest.first() {
            Some(byte) => *byte,
            None => {
                if let Some((_, open_location)) = self.paren_stack.last() {
                    return Err(diag.scanner_error(
                        *open_location,
                        "unbalanced '(' is never closed".to_string(),
                    ));
                }
                return Ok(self.emit(Token::new(TokenKind::SourceEnd, location)));
            }
        };

        match byte {
            b'(' => {
                self.paren_stack.push((TokenKind::EvalGroupStart, location));
                self.pointer += 1;
                Ok(self.emit(Token::with_text(TokenKind::EvalGroupStart, location, "(")))
            }
            b')' => match self.paren_stack.pop() {
                Some((TokenKind::FunctionStart, _)) => {
                    self.pointer += 1;
                    Ok(self.emit(Token::with_text(TokenKind::FunctionEnd, location, ")")))
                }
                Some(_) => {
                    self.pointer += 1;
                    Ok(self.emit(Token::with_text(TokenKind::EvalGroupEnd, location, ")")))
                }
                None => Err(diag.scanner_error(location, "unmatched ')'".to_string())),
            },
            b',' => match self.paren_stack.last() {
                Some((TokenKind::FunctionStart, _)) => {
                    self.pointer += 1;
                    Ok(self.emit(Token::with_text(
                        TokenKind::FunctionArgDelim,
                        location,
                        ",",
                    )))
                }
                Some(_) => Err(diag.scanner_error(
                    location,
                    "',' is not valid inside an evaluation group".to_string(),
                )),
                None => {
                    Err(diag.scanner_error(location, "',' outside of a function call".to_string()))
                }
            },
            b'+' | b'-'
                if self.prefix_context() && rest.len() > 1 && rest[1].is_ascii_digit() =>
            {
                self.lex_number(location, diag)
            }
            b'+' | b'-' | b'*' | b'/' => {
                self.pointer += 1;
                let glyph = [byte];
                let glyph = std::str::from_utf8(&glyph).unwrap_or("");
                Ok(self.emit(Token::with_text(TokenKind::ArithmeticOp, location, glyph)))
            }
            b'.' => self.lex_swizzle(location, diag),
            b'0'..=b'9' => self.lex_number(location, diag),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.lex_function(location, diag),
            _ => Err(diag.scanner_error(
                location,
                format!("unknown character '{}'", byte.escape_ascii()),
            )),
        }
    }

    /// Whether a leading sign would start a literal rather than an operator.
    fn prefix_context(&self) -> bool {
        matches!(
            self.last_kind,
            TokenKind::SourceBegin
                | TokenKind::ArithmeticOp
                | TokenKind::FunctionStart
                | TokenKind::EvalGroupStart
                | TokenKind::FunctionArgDelim
        )
    }

    fn skip_trivia(&mut self) {
        while let Some(&byte) = self.code.value.get(self.pointer) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.pointer += 1,
                b'#' => {
                    while let Some(&b) = self.code.value.get(self.pointer) {
                        if b == b'\n' {
                            break;
                        }
                        self.pointer += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(
        &mut self,
        location: Position,
        diag: &Diagnostics,
    ) -> Result<Token, CompileError> {
        let source = self.code.value;
        let rest = &source[self.pointer..];
        let matched = match NUM_LITERAL.find(rest) {
            Some(m) => m,
            None => {
                return Err(diag.scanner_error(location, "malformed numeric literal".to_string()))
            }
        };
        debug_assert_eq!(matched.start(), 0);
        let text = std::str::from_utf8(&rest[..matched.end()]).unwrap_or("");
        let value: f32 = match text.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(diag.scanner_error(
                    location,
                    format!("malformed numeric literal '{}'", text),
                ))
            }
        };
        self.pointer += matched.end();
        Ok(self.emit(Token::number(location, text, value)))
    }

    fn lex_swizzle(
        &mut self,
        location: Position,
        diag: &Diagnostics,
    ) -> Result<Token, CompileError> {
        let source = self.code.value;
        let rest = &source[self.pointer..];
        let matched = match SWIZZLE_MASK.find(rest) {
            Some(m) => m,
            None => {
                return Err(diag.scanner_error(
                    location,
                    "expected a swizzle mask of 'xyzw' or 'rgba' components after '.'".to_string(),
                ))
            }
        };
        let end = matched.end();
        if matches!(rest.get(end), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
            return Err(diag.scanner_error(location, "malformed vector swizzle mask".to_string()));
        }
        let text = std::str::from_utf8(&rest[1..end]).unwrap_or("");
        self.pointer += end;
        Ok(self.emit(Token::with_text(TokenKind::VectorSwizzle, location, text)))
    }

    fn lex_function(
        &mut self,
        location: Position,
        diag: &Diagnostics,
    ) -> Result<Token, CompileError> {
        let source = self.code.value;
        let rest = &source[self.pointer..];
        let matched = match IDENTIFIER.find(rest) {
            Some(m) => m,
            None => {
                return Err(diag.scanner_error(location, "malformed identifier".to_string()))
            }
        };
        let end = matched.end();
        let text = std::str::from_utf8(&rest[..end]).unwrap_or("");
        if rest.get(end) != Some(&b'(') {
            return Err(diag.scanner_error(
                location,
                format!("expected '(' after identifier '{}'", text),
            ));
        }
        self.paren_stack.push((TokenKind::FunctionStart, location));
        self.pointer += end + 1;
        Ok(self.emit(Token::with_text(TokenKind::FunctionStart, location, text)))
    }

    fn emit(&mut self, token: Token) -> Token {
        self.last_kind = token.kind;
        self.log_token(&token);
        token
    }

    fn log_token(&self, _token: &Token) {
        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Scanner]: {:?} '{}' at {}",
                    log, _token.kind, _token.text, _token.location
                );
            }
        }
    }
}
