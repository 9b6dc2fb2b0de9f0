use crate::{Code, Position};
use once_cell::unsync::OnceCell;

impl<'c> From<&'c [u8]> for Code<'c> {
    fn from(value: &'c [u8]) -> Self {
        Code::new(value)
    }
}
impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value.as_bytes())
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c [u8]) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    pub fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .iter()
                .enumerate()
                .filter_map(|(index, n)| if *n == b'\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Map a byte offset into the 1-indexed line and column at that point.
    pub fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        let line_start = if index == 0 {
            0
        } else {
            line_breaks[index - 1] + 1
        };
        Position::new(index + 1, pointer - line_start + 1)
    }

    /// The text of the given 1-indexed line, without its terminating line break.
    /// Out of range lines (including [Position::UNKNOWN]) yield an empty string.
    pub fn obtain_line(&self, line: usize) -> &str {
        if line == 0 {
            return "";
        }
        let line_breaks = self.obtain_line_breaks();
        let start = if line == 1 {
            0
        } else {
            match line_breaks.get(line - 2) {
                Some(b) => b + 1,
                None => return "",
            }
        };
        let end = line_breaks
            .get(line - 1)
            .copied()
            .unwrap_or(self.value.len());
        let end = if end > start && self.value[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };
        std::str::from_utf8(&self.value[start..end]).unwrap_or("")
    }
}
