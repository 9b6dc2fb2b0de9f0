use crate::{Code, CompileError, Diagnostics, ErrorCategory, Log, Position};
use once_cell::unsync::OnceCell;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

impl<'c> Diagnostics<'c> {
    /// Create a reporting context for one compiled unit over its source.
    pub fn new(name: &str, code: &'c Code<'c>) -> Self {
        Self {
            name: name.to_string(),
            backend: String::new(),
            code,
            log: OnceCell::new(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Tag reports raised by a downstream consumer with its name.
    pub fn set_backend(&mut self, backend: &str) {
        self.backend = backend.to_string();
    }

    /// Set a log label to echo reports to stderr as they are raised.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn scanner_error(&self, location: Position, message: String) -> CompileError {
        self.report(ErrorCategory::Scanner, location, message)
    }

    pub fn parser_error(&self, location: Position, message: String) -> CompileError {
        self.report(ErrorCategory::Parser, location, message)
    }

    pub fn backend_error(&self, location: Position, message: String) -> CompileError {
        self.report(
            ErrorCategory::Backend(self.backend.clone()),
            location,
            message,
        )
    }

    fn report(&self, category: ErrorCategory, location: Position, message: String) -> CompileError {
        let err = CompileError::new(
            category,
            self.name.clone(),
            location,
            message,
            self.source_snippet(location),
        );
        if self
            .log
            .get()
            .map_or(false, |l| l.order() >= Log::Default(()).order())
        {
            err.eprint().ok();
        }
        err
    }

    /// The offending source line followed by a caret under the column.
    /// Synthesized locations have no line to quote and yield an empty snippet.
    fn source_snippet(&self, location: Position) -> String {
        if location.is_unknown() {
            return String::new();
        }
        let line = self.code.obtain_line(location.line);
        let mut snippet = String::with_capacity(line.len() + location.column + 1);
        snippet.push_str(line);
        snippet.push('\n');
        for _ in 1..location.column {
            snippet.push(' ');
        }
        snippet.push('^');
        snippet
    }
}

impl CompileError {
    /// Write the report to stderr, colorized when the terminal supports it.
    pub fn eprint(&self) -> std::io::Result<()> {
        let mut stream = StandardStream::stderr(ColorChoice::Auto);
        stream.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stream, "{}", self.category)?;
        stream.reset()?;
        write!(stream, " {} ", self.name)?;
        stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(stream, "@{}", self.location)?;
        stream.reset()?;
        writeln!(stream, "{}", self.message)?;
        if self.snippet.is_empty() {
            return Ok(());
        }
        match self.snippet.rsplit_once('\n') {
            Some((line, caret)) => {
                writeln!(stream, "{}", line)?;
                write!(stream, "{}", &caret[..caret.len().saturating_sub(1)])?;
                stream.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
                writeln!(stream, "^")?;
                stream.reset()
            }
            None => writeln!(stream, "{}", self.snippet),
        }
    }
}
