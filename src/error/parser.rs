use crate::scanner::{Token, TokenType};

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	ParseError(#[from] ParseError),
}

/// A syntax error, located at the offending token. Also used for errors the
/// desugarer finds in otherwise well-formed code.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error{location}: {type}")]
pub struct ParseError {
	pub line:     usize,
	/// ` at end` or ` at 'lexeme'`.
	pub location: String,
	pub r#type:   ParseErrorType,
}

impl ParseError {
	pub fn new(token: &Token, r#type: ParseErrorType) -> Self {
		let location = match token.r#type {
			TokenType::Eof => " at end".to_string(),
			_ => format!(" at '{}'", token.lexeme),
		};
		Self { line: token.line, location, r#type }
	}
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	#[error("Expect expression.")]
	ExpectedExpression,
	/// A required token was missing; carries the full message.
	#[error("{0}")]
	Expected(String),
	#[error("Invalid assignment target.")]
	InvalidAssignmentTarget,
	#[error("Can't have more than {0} parameters.")]
	TooManyParameters(usize),
	#[error("Can't have more than {0} arguments.")]
	TooManyArguments(usize),
	/// `break` or `continue` outside of a loop body.
	#[error("Can't use '{0}' outside of a loop.")]
	OutsideLoop(String),
	#[error("Can't return from top-level code.")]
	TopLevelReturn,
	#[error("Right-hand side of '|>' must contain at least one '$' placeholder.")]
	MissingPlaceholder,
}
