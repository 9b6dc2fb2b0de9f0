use crate::{Code, CompileError, Diagnostics, Position, Scanner, Token, TokenKind};

fn scan_all(source: &str) -> Result<Vec<Token>, CompileError> {
    let code = Code::from(source);
    let diag = Diagnostics::new("scanner_test", &code);
    let mut scanner = Scanner::new(&code);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token(&diag)?;
        let kind = token.kind;
        tokens.push(token);
        if kind == TokenKind::SourceEnd {
            break Ok(tokens);
        }
    }
}

#[test]
pub fn token_stream_test() {
    let tokens = scan_all("Vec3(1, 2.5e1, -3).xy * (4 + 5)").unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::SourceBegin,
            TokenKind::FunctionStart,
            TokenKind::NumLiteral,
            TokenKind::FunctionArgDelim,
            TokenKind::NumLiteral,
            TokenKind::FunctionArgDelim,
            TokenKind::NumLiteral,
            TokenKind::FunctionEnd,
            TokenKind::VectorSwizzle,
            TokenKind::ArithmeticOp,
            TokenKind::EvalGroupStart,
            TokenKind::NumLiteral,
            TokenKind::ArithmeticOp,
            TokenKind::NumLiteral,
            TokenKind::EvalGroupEnd,
            TokenKind::SourceEnd,
        ]
    );

    assert_eq!(tokens[1].text, "Vec3");
    assert_eq!(tokens[1].location, Position::new(1, 1));
    assert_eq!(tokens[2].location, Position::new(1, 6));
    assert_eq!(tokens[4].float_value, 25.0);
    assert_eq!(tokens[4].int_value, 25);
    assert_eq!(tokens[6].float_value, -3.0);
    assert_eq!(tokens[6].int_value, -3);
    assert_eq!(tokens[8].text, "xy");
    assert_eq!(tokens[9].text, "*");
    assert_eq!(tokens[15].location, Position::new(1, 32));
}

#[test]
pub fn trivia_skipping_test() {
    let tokens = scan_all("\t 1 +\n# lighting term\n  2").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::SourceBegin,
            TokenKind::NumLiteral,
            TokenKind::ArithmeticOp,
            TokenKind::NumLiteral,
            TokenKind::SourceEnd,
        ]
    );
    assert_eq!(tokens[1].location, Position::new(1, 3));
    assert_eq!(tokens[3].location, Position::new(3, 3));
}

#[test]
pub fn signed_literal_test() {
    // a sign after a value is an operator, a sign in prefix position is
    // part of the literal
    let tokens = scan_all("1-2").unwrap();
    assert_eq!(tokens[2].kind, TokenKind::ArithmeticOp);
    assert_eq!(tokens[3].float_value, 2.0);

    let tokens = scan_all("Fog(-1, +2)").unwrap();
    assert_eq!(tokens[2].kind, TokenKind::NumLiteral);
    assert_eq!(tokens[2].float_value, -1.0);
    assert_eq!(tokens[4].float_value, 2.0);

    let tokens = scan_all("2*-3").unwrap();
    assert_eq!(tokens[3].kind, TokenKind::NumLiteral);
    assert_eq!(tokens[3].float_value, -3.0);
}

#[test]
pub fn truncated_int_value_test() {
    let tokens = scan_all("2.75").unwrap();
    assert_eq!(tokens[1].float_value, 2.75);
    assert_eq!(tokens[1].int_value, 2);
}

#[test]
pub fn repeated_source_end_test() {
    let code = Code::from("1");
    let diag = Diagnostics::new("scanner_test", &code);
    let mut scanner = Scanner::new(&code);
    scanner.next_token(&diag).unwrap();
    scanner.next_token(&diag).unwrap();
    for _ in 0..3 {
        let token = scanner.next_token(&diag).unwrap();
        assert_eq!(token.kind, TokenKind::SourceEnd);
    }
}

#[test]
pub fn reset_test() {
    let code = Code::from("UV(0)");
    let diag = Diagnostics::new("scanner_test", &code);
    let mut scanner = Scanner::new(&code);
    scanner.next_token(&diag).unwrap();
    scanner.next_token(&diag).unwrap();
    assert_eq!(scanner.current_location(), Position::new(1, 4));

    scanner.reset();
    let token = scanner.next_token(&diag).unwrap();
    assert_eq!(token.kind, TokenKind::SourceBegin);
    let token = scanner.next_token(&diag).unwrap();
    assert_eq!(token.kind, TokenKind::FunctionStart);
    assert_eq!(token.location, Position::new(1, 1));
}

#[test]
pub fn unknown_character_test() {
    let err = scan_all("1 $").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 3));
}

#[test]
pub fn bare_identifier_test() {
    let err = scan_all("foo + 1").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 1));
    assert!(err.message.contains("expected '(' after identifier 'foo'"));
}

#[test]
pub fn unbalanced_paren_test() {
    // reported at the opener that is never closed
    let err = scan_all("(1+2").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 1));

    let err = scan_all("Mix(1, (2 + 3)").unwrap_err();
    assert_eq!(err.location, Position::new(1, 1));
}

#[test]
pub fn unmatched_closer_test() {
    let err = scan_all("1)").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 2));
}

#[test]
pub fn stray_delimiter_test() {
    let err = scan_all("1, 2").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 2));

    let err = scan_all("(1, 2)").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 3));
}

#[test]
pub fn malformed_swizzle_test() {
    let err = scan_all("UV(0).q").unwrap_err();
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 6));

    let err = scan_all("UV(0).xyzzy").unwrap_err();
    assert!(err.is_scanner_err());
    assert!(err.message.contains("swizzle"));
}
