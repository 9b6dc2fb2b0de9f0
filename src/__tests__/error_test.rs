use crate::{Code, CompileError, Diagnostics, Frontend, Lexer, Position};

fn compile_err(source: &str) -> CompileError {
    let frontend = Frontend::new();
    match frontend.compile(source, "error_test") {
        Ok(ir) => panic!("'{}' must not compile, got IR '{}'", source, ir),
        Err(err) => err,
    }
}

#[test]
pub fn missing_operand_test() {
    // reported at the end of file column
    let err = compile_err("1 +");
    assert!(err.is_parser_err());
    assert_eq!(err.location, Position::new(1, 4));
    assert!(err.message.contains("missing its right operand"));
}

#[test]
pub fn empty_argument_test() {
    let err = compile_err("foo(,)");
    assert!(err.is_parser_err());
    assert_eq!(err.location, Position::new(1, 5));
    assert!(err.message.contains("empty function argument"));

    let err = compile_err("foo(1,)");
    assert_eq!(err.location, Position::new(1, 7));
}

#[test]
pub fn swizzled_literal_test() {
    let err = compile_err("1.x");
    assert!(err.is_parser_err());
    assert_eq!(err.location, Position::new(1, 2));
    assert!(err.message.contains("numeric literal"));
}

#[test]
pub fn unbalanced_group_test() {
    let err = compile_err("(1+2");
    assert!(err.is_scanner_err());
    assert_eq!(err.location, Position::new(1, 1));
}

#[test]
pub fn consecutive_operator_test() {
    let err = compile_err("1 + + 2");
    assert!(err.is_parser_err());
    assert_eq!(err.location, Position::new(1, 5));
}

#[test]
pub fn adjacent_value_test() {
    let err = compile_err("1 2");
    assert!(err.is_parser_err());
    assert_eq!(err.location, Position::new(1, 3));
}

#[test]
pub fn empty_source_test() {
    let err = compile_err("");
    assert!(err.is_parser_err());
    assert!(err.message.contains("empty expression"));

    let err = compile_err("()");
    assert_eq!(err.location, Position::new(1, 2));
    assert!(err.message.contains("empty evaluation group"));
}

#[test]
pub fn constructor_arity_test() {
    let err = compile_err("Vec3(1, 2)");
    assert!(err.is_parser_err());
    assert!(err.message.contains("Vec3 requires 3 arguments, found 2"));

    let err = compile_err("Vec4(1, 2, 3, 4, 5)");
    assert!(err.message.contains("Vec4 requires 4 arguments, found 5"));
}

#[test]
pub fn report_rendering_test() {
    let err = compile_err("1 +");
    let report = format!("{}", err);
    assert!(report.starts_with("[Parser] error_test @1:4"));
    assert!(report.contains("\n1 +\n"));
    assert!(report.ends_with("   ^"), "caret must sit under the column");
}

#[test]
pub fn multiline_snippet_test() {
    let err = compile_err("UV(0) *\n2 2");
    assert_eq!(err.location, Position::new(2, 3));
    let report = format!("{}", err);
    assert!(report.contains("\n2 2\n  ^"));
}

#[test]
pub fn synthesized_location_test() {
    // a lexer that never consumed tokens has no source point to blame
    let code = Code::from("");
    let diag = Diagnostics::new("synth", &code);
    let lexer = Lexer::new();
    let err = lexer.compile_ir(&diag).unwrap_err();
    assert!(err.location.is_unknown());
    assert!(
        err.snippet.is_empty(),
        "a synthesized location must not render a snippet"
    );
}

#[test]
pub fn renamed_unit_test() {
    let code = Code::from("1 +");
    let mut diag = Diagnostics::new("first_pass", &code);
    let err = diag.parser_error(
        Position::new(1, 4),
        "operator '+' is missing its right operand".to_string(),
    );
    assert!(format!("{}", err).starts_with("[Parser] first_pass @1:4"));

    diag.set_name("second_pass");
    let err = diag.parser_error(
        Position::new(1, 4),
        "operator '+' is missing its right operand".to_string(),
    );
    assert!(format!("{}", err).starts_with("[Parser] second_pass @1:4"));
}

#[test]
pub fn backend_report_test() {
    let code = Code::from("Texture(0)");
    let mut diag = Diagnostics::new("skin_shader", &code);
    diag.set_backend("HLSL");
    let err = diag.backend_error(Position::new(1, 1), "sampler slot 0 is unbound".to_string());
    let report = format!("{}", err);
    assert!(report.starts_with("[HLSL] skin_shader @1:1"));
    assert!(report.contains("sampler slot 0 is unbound"));
    assert!(report.contains("Texture(0)"));
}
