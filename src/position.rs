use std::fmt::{Display, Formatter};

use crate::Position;

impl Position {
    /// Create a new Position object based on the line and column number.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Sentinel for locations the compiler synthesized rather than scanned.
    pub const UNKNOWN: Position = Position { line: 0, column: 0 };

    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
