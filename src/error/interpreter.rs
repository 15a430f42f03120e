use crate::scanner::Token;

/// Errors that can occur during interpretation
#[derive(thiserror::Error, Debug)]
pub enum InterpreterError {
	/// Failures of the host, such as a broken output stream
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors raised by the running program
	#[error(transparent)]
	RuntimeError(#[from] RuntimeError),
}

impl InterpreterError {
	pub fn runtime(token: &Token, r#type: RuntimeErrorType) -> Self { RuntimeError::new(token.line, r#type).into() }

	/// An error raised by a native function. The interpreter locates it at
	/// the call site, so no line is needed here.
	pub fn native(message: impl Into<String>) -> Self { RuntimeError::new(0, RuntimeErrorType::Native(message.into())).into() }
}

/// An error raised by the running program, located at the line of the token
/// that caused it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{type}\n[line {line}]")]
pub struct RuntimeError {
	pub line:   usize,
	pub r#type: RuntimeErrorType,
}

impl RuntimeError {
	pub fn new(line: usize, r#type: RuntimeErrorType) -> Self { Self { line, r#type } }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
	#[error("Operand must be a number.")]
	OperandMustBeNumber,
	#[error("Operands must be numbers.")]
	OperandsMustBeNumbers,
	#[error("Operands must be two numbers or two strings.")]
	InvalidAddition,
	#[error("Undefined variable '{0}'.")]
	UndefinedVariable(String),
	#[error("Can only call functions and classes.")]
	NotCallable,
	#[error("Expected {expected} arguments but got {got}.")]
	ArityMismatch { expected: usize, got: usize },
	/// Raised by a native function.
	#[error("{0}")]
	Native(String),
}
