use crate::{CompileError, ErrorCategory, Position};
use std::fmt::{Display, Formatter};

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Scanner => write!(f, "[Scanner]"),
            ErrorCategory::Parser => write!(f, "[Parser]"),
            ErrorCategory::Backend(name) => write!(f, "[{}]", name),
        }
    }
}

impl CompileError {
    pub fn new(
        category: ErrorCategory,
        name: String,
        location: Position,
        message: String,
        snippet: String,
    ) -> Self {
        Self {
            category,
            name,
            location,
            message,
            snippet,
        }
    }

    pub fn is_scanner_err(&self) -> bool {
        self.category == ErrorCategory::Scanner
    }
    pub fn is_parser_err(&self) -> bool {
        self.category == ErrorCategory::Parser
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} {} @{}",
            self.category, self.name, self.location
        )?;
        writeln!(f, "{}", self.message)?;
        write!(f, "{}", self.snippet)
    }
}
