/// Scanner related errors
#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered during scanning
	#[error(transparent)]
	ScanError(#[from] ScanError),
}

/// A specific scanning error with line number and type.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {type}")]
pub struct ScanError {
	/// The line number where the error occurred.
	pub line:   usize,
	/// The type of scanning error.
	pub r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(line: usize, r#type: ScanErrorType) -> Self { Self { line, r#type } }
}

/// Types of scanning errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
	/// Error for unterminated block comments.
	#[error("Unterminated block comment.")]
	UnterminatedBlockComment,
	/// Error for unexpected characters.
	#[error("Unexpected character '{0}'.")]
	UnexpectedCharacter(char),
	/// Error for unterminated strings.
	#[error("Unterminated string.")]
	UnterminatedString,
}
