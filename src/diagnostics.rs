//! Error sink shared by the scanner, the parser, the desugarer and the driver.
//!
//! A fresh [`Diagnostics`] is created for every run. Phases record what they
//! find and keep going; the driver inspects the sticky error flag afterwards
//! to decide whether to interpret. A runtime error ends the run, so the
//! driver learns of it from the interpreter's result and only records it
//! here to have it rendered with the rest.

use crate::error::{interpreter::RuntimeError, parser::ParseError, scanner::ScanError};

/// A single reported problem.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
	#[error(transparent)]
	Scan(#[from] ScanError),
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}

#[derive(Debug, Default)]
pub struct Diagnostics {
	reported:  Vec<Diagnostic>,
	had_error: bool,
}

impl Diagnostics {
	pub fn new() -> Self { Self::default() }

	/// Record a compile-time error.
	pub fn error(&mut self, diagnostic: impl Into<Diagnostic>) {
		let diagnostic = diagnostic.into();
		tracing::debug!(%diagnostic, "reported error");
		self.reported.push(diagnostic);
		self.had_error = true;
	}

	/// Record an error raised while the program was running. It does not
	/// count as a compile-time error.
	pub fn runtime_error(&mut self, error: RuntimeError) {
		tracing::debug!(%error, "reported runtime error");
		self.reported.push(error.into());
	}

	pub fn had_error(&self) -> bool { self.had_error }

	/// Number of compile-time errors recorded so far.
	pub fn error_count(&self) -> usize {
		self.reported.iter().filter(|d| !matches!(d, Diagnostic::Runtime(_))).count()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.reported.iter() }

	/// Take the recorded diagnostics, leaving the flags untouched.
	pub fn drain(&mut self) -> Vec<Diagnostic> { std::mem::take(&mut self.reported) }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::{interpreter::RuntimeErrorType, parser::ParseErrorType, scanner::ScanErrorType}, scanner::{Token, TokenType}};

	#[test]
	fn error_flag_is_sticky() {
		let mut diagnostics = Diagnostics::new();
		assert!(!diagnostics.had_error());

		diagnostics.runtime_error(RuntimeError::new(2, RuntimeErrorType::NotCallable));
		assert!(!diagnostics.had_error());
		assert_eq!(diagnostics.error_count(), 0);

		diagnostics.error(ScanError::new(1, ScanErrorType::UnexpectedCharacter('@')));
		assert!(diagnostics.had_error());
		assert_eq!(diagnostics.error_count(), 1);
		assert_eq!(diagnostics.iter().count(), 2);

		assert_eq!(diagnostics.drain().len(), 2);
		assert!(diagnostics.had_error());
		assert_eq!(diagnostics.iter().count(), 0);
	}

	#[test]
	fn renders_with_location() {
		let semicolon = Token::new(TokenType::Semicolon, ";", 3);
		let eof = Token::new(TokenType::Eof, "", 4);
		let at_token: Diagnostic = ParseError::new(&semicolon, ParseErrorType::ExpectedExpression).into();
		let at_end: Diagnostic = ParseError::new(&eof, ParseErrorType::Expected("Expect ';' after value.".into())).into();
		let scan: Diagnostic = ScanError::new(5, ScanErrorType::UnterminatedString).into();

		assert_eq!(at_token.to_string(), "[line 3] Error at ';': Expect expression.");
		assert_eq!(at_end.to_string(), "[line 4] Error at end: Expect ';' after value.");
		assert_eq!(scan.to_string(), "[line 5] Error: Unterminated string.");
	}
}
