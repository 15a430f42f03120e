pub mod interpreter;
pub mod parser;
pub mod scanner;

/// LoxError is the top-level error type for the Lox compiler/interpreter.
#[derive(thiserror::Error, Debug)]
pub enum LoxError {
	/// Internal compiler error, such as an unreadable source file
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Scanner errors encountered during scanning
	#[error("Generated {0} scanner errors")]
	ScannerErrors(usize),
	/// Parser and desugarer errors
	#[error("Generated {0} parser errors")]
	ParserErrors(usize),
	/// Runtime errors encountered during interpretation
	#[error("Runtime error:\n{0}")]
	RuntimeError(#[from] interpreter::InterpreterError),
}

impl LoxError {
	/// Process exit status for this error, following `sysexits.h`.
	pub fn exit_code(&self) -> i32 {
		match self {
			LoxError::ScannerErrors(_) | LoxError::ParserErrors(_) => 65,
			LoxError::RuntimeError(interpreter::InterpreterError::RuntimeError(_)) => 70,
			LoxError::RuntimeError(interpreter::InterpreterError::InternalError(_)) | LoxError::InternalError(_) => 74,
		}
	}
}

impl From<parser::ParserError> for LoxError {
	fn from(error: parser::ParserError) -> Self {
		match error {
			parser::ParserError::InternalError(error) => LoxError::InternalError(error),
			// Syntax errors are reported as they are found; one escaping the
			// parser still counts.
			parser::ParserError::ParseError(_) => LoxError::ParserErrors(1),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{interpreter::*, *};

	#[test]
	fn exit_codes_distinguish_error_kinds() {
		assert_eq!(LoxError::ScannerErrors(1).exit_code(), 65);
		assert_eq!(LoxError::ParserErrors(2).exit_code(), 65);
		let runtime = InterpreterError::from(RuntimeError::new(3, RuntimeErrorType::NotCallable));
		assert_eq!(LoxError::from(runtime).exit_code(), 70);
		assert_eq!(LoxError::from(anyhow::anyhow!("disk on fire")).exit_code(), 74);
	}

	#[test]
	fn runtime_error_renders_message_then_line() {
		let error = RuntimeError::new(7, RuntimeErrorType::ArityMismatch { expected: 2, got: 1 });
		assert_eq!(error.to_string(), "Expected 2 arguments but got 1.\n[line 7]");
	}
}
