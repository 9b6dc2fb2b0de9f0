use crate::{Position, Token, TokenKind};

impl Token {
    pub fn new(kind: TokenKind, location: Position) -> Self {
        Self {
            kind,
            location,
            text: String::new(),
            int_value: 0,
            float_value: 0.0,
        }
    }

    pub fn with_text(kind: TokenKind, location: Position, text: &str) -> Self {
        Self {
            kind,
            location,
            text: text.to_string(),
            int_value: 0,
            float_value: 0.0,
        }
    }

    /// Create a numeric literal token. The integer value is the truncated form of
    /// the parsed float.
    pub fn number(location: Position, text: &str, value: f32) -> Self {
        Self {
            kind: TokenKind::NumLiteral,
            location,
            text: text.to_string(),
            int_value: value as i32,
            float_value: value,
        }
    }

    /// Decode a swizzle mask into component indices, `-1` padded to four lanes.
    /// `x|r` select lane 0, `y|g` lane 1, `z|b` lane 2, `w|a` lane 3.
    pub fn swizzle_components(&self) -> Option<[i8; 4]> {
        if self.text.is_empty() || self.text.len() > 4 {
            return None;
        }
        let mut components = [-1i8; 4];
        for (index, c) in self.text.chars().enumerate() {
            components[index] = match c {
                'x' | 'r' => 0,
                'y' | 'g' => 1,
                'z' | 'b' => 2,
                'w' | 'a' => 3,
                _ => return None,
            };
        }
        Some(components)
    }
}

impl Default for Token {
    fn default() -> Self {
        Token::new(TokenKind::None, Position::UNKNOWN)
    }
}
