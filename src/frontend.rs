use crate::{Code, CompileError, Diagnostics, Frontend, Ir, Lexer, Log, Scanner};
use once_cell::unsync::OnceCell;

impl Frontend {
    pub fn new() -> Self {
        Self {
            log: OnceCell::new(),
        }
    }

    /// Set a log label to debug every stage of subsequent compiles.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Compile one shading expression into its intermediate representation.
    ///
    /// `name` identifies the compiled unit in error reports. Every call builds
    /// a fresh scanner and lexer over the source, so the facade can be reused
    /// for any number of compiles.
    pub fn compile(&self, source: &str, name: &str) -> Result<Ir, CompileError> {
        let code = Code::from(source);
        let diag = Diagnostics::new(name, &code);
        let mut scanner = Scanner::new(&code);
        let mut lexer = Lexer::new();
        if let Some(log) = self.log.get() {
            diag.set_log(*log).ok();
            scanner.set_log(*log).ok();
            lexer.set_log(*log).ok();
        }
        lexer.consume_all_tokens(&mut scanner, &diag)?;
        lexer.compile_ir(&diag)
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self::new()
    }
}
