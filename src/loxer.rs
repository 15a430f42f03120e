use std::{fs::read_to_string, io::{BufRead, Write}, path::Path};

use anyhow::Context;

use crate::{LoxError, desugar::Desugarer, diagnostics::Diagnostics, error::interpreter::InterpreterError, interpreter::Interpreter, parser::Parser, scanner::Scanner};

/// Loxer drives source text through every phase. One interpreter lives as
/// long as the `Loxer`, so globals defined by one run are seen by the next.
pub struct Loxer {
	interpreter: Interpreter,
	/// Where diagnostics are rendered.
	errors:      Box<dyn Write>,
}

impl Default for Loxer {
	fn default() -> Self { Self::new() }
}

impl Loxer {
	/// A Loxer printing to standard output and reporting to standard error.
	pub fn new() -> Self { Self { interpreter: Interpreter::new(), errors: Box::new(std::io::stderr()) } }

	/// A Loxer with program output and diagnostics sent elsewhere.
	pub fn with_output(output: impl Write + 'static, errors: impl Write + 'static) -> Self {
		Self { interpreter: Interpreter::with_output(output), errors: Box::new(errors) }
	}

	/// Run a whole script.
	pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoxError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		tracing::debug!(path = %path.display(), bytes = source.len(), "running file");
		self.run(&source)
	}

	/// Run the REPL prompt until end of input. Errors are reported and the
	/// session goes on.
	pub fn run_prompt(&mut self) -> Result<(), LoxError> {
		let stdin = std::io::stdin();
		self.prompt(stdin.lock(), std::io::stdout())
	}

	fn prompt(&mut self, mut input: impl BufRead, mut prompt: impl Write) -> Result<(), LoxError> {
		let mut line = String::new();
		loop {
			line.clear();
			write!(prompt, "> ").and_then(|()| prompt.flush()).context("Failed write prompt")?;
			if input.read_line(&mut line).context("Failed read line")? == 0 {
				writeln!(prompt).context("Failed write prompt")?;
				return Ok(());
			}
			match self.run(&line) {
				Ok(()) => {}
				Err(error @ LoxError::InternalError(_)) => return Err(error),
				Err(error) => tracing::debug!(%error, "repl line failed"),
			}
		}
	}

	/// Run the given source code. Every diagnostic found on the way is
	/// written out before returning.
	pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
		let mut diagnostics = Diagnostics::new();
		let result = self.run_phases(source, &mut diagnostics);
		for diagnostic in diagnostics.drain() {
			writeln!(self.errors, "{diagnostic}").context("Failed write diagnostics")?;
		}
		result
	}

	fn run_phases(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Result<(), LoxError> {
		let tokens = Scanner::new(source).scan_tokens(diagnostics)?;
		let statements = Parser::new(tokens, diagnostics).parse()?;
		let statements = Desugarer::new(diagnostics).desugar(&statements);
		if diagnostics.had_error() {
			return Err(LoxError::ParserErrors(diagnostics.error_count()));
		}

		match self.interpreter.interpret(&statements) {
			Err(InterpreterError::RuntimeError(error)) => {
				diagnostics.runtime_error(error.clone());
				Err(LoxError::RuntimeError(error.into()))
			}
			other => Ok(other?),
		}
	}
}
