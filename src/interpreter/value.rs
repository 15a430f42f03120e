use std::fmt::Display;

use Value::*;
use anyhow::anyhow;

use crate::{error::interpreter::{InterpreterError, RuntimeErrorType}, interpreter::callable::Callable, scanner::{Token, TokenType}};

/// Value represents a runtime value in Lox.
#[derive(Debug, Clone)]
pub enum Value {
	Nil,
	Bool(bool),
	Num(f64),
	Str(String),
	Callable(Callable),
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Nil => write!(f, "nil"),
			Bool(b) => write!(f, "{b}"),
			// Float display has no trailing `.0`: 3.0 prints as `3`, 3.5 as `3.5`.
			Num(n) => write!(f, "{n}"),
			Str(s) => write!(f, "{s}"),
			Value::Callable(callable) => write!(f, "{callable}"),
		}
	}
}

impl PartialEq for Value {
	/// `nil` is only equal to itself, values of different types are never
	/// equal, and callables are equal when they are the same object. Unlike
	/// IEEE comparison, `NaN` equals `NaN`.
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Nil, Nil) => true,
			(Bool(l), Bool(r)) => l == r,
			(Num(l), Num(r)) => l == r || (l.is_nan() && r.is_nan()),
			(Str(l), Str(r)) => l == r,
			(Value::Callable(l), Value::Callable(r)) => l == r,
			_ => false,
		}
	}
}

impl Value {
	/// `nil` and `false` are falsy, everything else is truthy.
	pub fn is_truthy(&self) -> bool {
		match self {
			Nil => false,
			Bool(b) => *b,
			_ => true,
		}
	}

	/// Apply a binary operator. Arithmetic and comparison need two numbers,
	/// `+` also concatenates two strings, and equality accepts anything.
	pub fn binary_op(&self, operator: &Token, right: &Self) -> Result<Value, InterpreterError> {
		use TokenType::*;

		Ok(match (&operator.r#type, self, right) {
			(Plus, Num(l), Num(r)) => Num(l + r),
			(Plus, Str(l), Str(r)) => Str(format!("{l}{r}")),
			(Plus, ..) => return Err(InterpreterError::runtime(operator, RuntimeErrorType::InvalidAddition)),
			(Minus, Num(l), Num(r)) => Num(l - r),
			(Star, Num(l), Num(r)) => Num(l * r),
			(Slash, Num(l), Num(r)) => Num(l / r),
			(Greater, Num(l), Num(r)) => Bool(l > r),
			(GreaterEqual, Num(l), Num(r)) => Bool(l >= r),
			(Less, Num(l), Num(r)) => Bool(l < r),
			(LessEqual, Num(l), Num(r)) => Bool(l <= r),
			(Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual, ..) => {
				return Err(InterpreterError::runtime(operator, RuntimeErrorType::OperandsMustBeNumbers));
			}
			(EqualEqual, ..) => Bool(self == right),
			(BangEqual, ..) => Bool(self != right),
			_ => return Err(anyhow!("line {}: '{}' is not a binary operator", operator.line, operator.lexeme).into()),
		})
	}

	/// Apply a prefix operator.
	pub fn unary_op(&self, operator: &Token) -> Result<Value, InterpreterError> {
		match (&operator.r#type, self) {
			(TokenType::Bang, value) => Ok(Bool(!value.is_truthy())),
			(TokenType::Minus, Num(n)) => Ok(Num(-n)),
			(TokenType::Minus, _) => Err(InterpreterError::runtime(operator, RuntimeErrorType::OperandMustBeNumber)),
			_ => Err(anyhow!("line {}: '{}' is not a unary operator", operator.line, operator.lexeme).into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::error::interpreter::RuntimeError;

	fn op(lexeme: &str) -> Token {
		let r#type = match lexeme {
			"+" => TokenType::Plus,
			"-" => TokenType::Minus,
			"*" => TokenType::Star,
			"/" => TokenType::Slash,
			">" => TokenType::Greater,
			"<=" => TokenType::LessEqual,
			"==" => TokenType::EqualEqual,
			"!=" => TokenType::BangEqual,
			"!" => TokenType::Bang,
			other => panic!("no operator {other}"),
		};
		Token::new(r#type, lexeme, 1)
	}

	fn runtime_error(result: Result<Value, InterpreterError>) -> RuntimeErrorType {
		match result {
			Err(InterpreterError::RuntimeError(RuntimeError { r#type, .. })) => r#type,
			other => panic!("expected a runtime error, got {other:?}"),
		}
	}

	#[test]
	fn display_strips_zero_fraction() {
		assert_eq!(Num(3.0).to_string(), "3");
		assert_eq!(Num(3.5).to_string(), "3.5");
		assert_eq!(Num(-0.25).to_string(), "-0.25");
		assert_eq!(Nil.to_string(), "nil");
		assert_eq!(Bool(false).to_string(), "false");
		assert_eq!(Str("raw text".into()).to_string(), "raw text");
	}

	#[test]
	fn truthiness() {
		assert!(!Nil.is_truthy());
		assert!(!Bool(false).is_truthy());
		assert!(Bool(true).is_truthy());
		assert!(Num(0.0).is_truthy());
		assert!(Str(String::new()).is_truthy());
	}

	#[test]
	fn arithmetic() {
		assert_eq!(Num(1.0).binary_op(&op("+"), &Num(2.0)).unwrap(), Num(3.0));
		assert_eq!(Num(7.0).binary_op(&op("/"), &Num(2.0)).unwrap(), Num(3.5));
		assert_eq!(Num(1.0).binary_op(&op("/"), &Num(0.0)).unwrap(), Num(f64::INFINITY));
		assert_eq!(Str("a".into()).binary_op(&op("+"), &Str("b".into())).unwrap(), Str("ab".into()));
	}

	#[test]
	fn operand_type_errors() {
		assert_eq!(runtime_error(Num(1.0).binary_op(&op("+"), &Str("b".into()))), RuntimeErrorType::InvalidAddition);
		assert_eq!(runtime_error(Nil.binary_op(&op("+"), &Nil)), RuntimeErrorType::InvalidAddition);
		assert_eq!(runtime_error(Str("a".into()).binary_op(&op("*"), &Num(2.0))), RuntimeErrorType::OperandsMustBeNumbers);
		assert_eq!(runtime_error(Bool(true).binary_op(&op(">"), &Num(2.0))), RuntimeErrorType::OperandsMustBeNumbers);
		assert_eq!(runtime_error(Str("a".into()).unary_op(&op("-"))), RuntimeErrorType::OperandMustBeNumber);
	}

	#[test]
	fn equality_never_fails() {
		assert_eq!(Nil.binary_op(&op("=="), &Nil).unwrap(), Bool(true));
		assert_eq!(Nil.binary_op(&op("=="), &Bool(false)).unwrap(), Bool(false));
		assert_eq!(Num(1.0).binary_op(&op("=="), &Str("1".into())).unwrap(), Bool(false));
		assert_eq!(Str("x".into()).binary_op(&op("!="), &Str("x".into())).unwrap(), Bool(false));
		assert_eq!(Num(2.0).binary_op(&op("<="), &Num(2.0)).unwrap(), Bool(true));
	}

	#[test]
	fn nan_equals_itself() {
		assert_eq!(Num(f64::NAN).binary_op(&op("=="), &Num(f64::NAN)).unwrap(), Bool(true));
		assert_eq!(Num(f64::NAN).binary_op(&op("!="), &Num(f64::NAN)).unwrap(), Bool(false));
		assert_eq!(Num(f64::NAN).binary_op(&op("=="), &Num(1.0)).unwrap(), Bool(false));
		// Ordering stays IEEE.
		assert_eq!(Num(f64::NAN).binary_op(&op("<="), &Num(f64::NAN)).unwrap(), Bool(false));
	}

	#[test]
	fn bang_negates_truthiness() {
		assert_eq!(Nil.unary_op(&op("!")).unwrap(), Bool(true));
		assert_eq!(Num(0.0).unary_op(&op("!")).unwrap(), Bool(false));
		assert_eq!(Num(2.0).unary_op(&op("-")).unwrap(), Num(-2.0));
	}
}
