//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `-123 *
//! (45.67)` as nested nodes. Nodes are never modified after construction;
//! passes that rewrite the tree build new nodes.

use std::rc::Rc;

use Expression::*;

use crate::{scanner::{Token, TokenType}, statement::Statement};

#[allow(clippy::enum_variant_names)]
/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Literal(LiteralValue),
	Variable(Token),
	Unary { operator: Token, right: Box<Expression> },
	Binary { left: Box<Expression>, operator: Token, right: Box<Expression> },
	/// Short-circuiting `and` / `or`.
	Logical { left: Box<Expression>, operator: Token, right: Box<Expression> },
	Call { callee: Box<Expression>, paren: Token, arguments: Vec<Expression> },
	Assign { target: Token, value: Box<Expression> },
	Grouping(Box<Expression>),
	/// `left |> right`; removed by the desugarer before evaluation.
	Pipe { left: Box<Expression>, operator: Token, right: Box<Expression> },
	/// `fun (params) { body }` used as a value.
	AnonymousFunction { name: Option<Token>, parameters: Rc<Vec<Token>>, body: Rc<Vec<Statement>> },
}

impl Expression {
	pub fn unary(operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Expression::Unary { operator, right })
	}

	pub fn binary(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Expression::Binary { left, operator, right })
	}

	pub fn grouping(expr: Box<Self>) -> Box<Self> { Box::new(Expression::Grouping(expr)) }

	pub fn assign(name: Token, value: Box<Self>) -> Box<Self> {
		Box::new(Expression::Assign { target: name, value })
	}

	pub fn logical(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Expression::Logical { left, operator, right })
	}

	pub fn call(callee: Box<Self>, paren: Token, arguments: Vec<Self>) -> Box<Self> {
		Box::new(Expression::Call { callee, paren, arguments })
	}

	pub fn pipe(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Expression::Pipe { left, operator, right })
	}

	/// Whether this is the `$` placeholder.
	pub fn is_placeholder(&self) -> bool { matches!(self, Variable(token) if token.r#type == TokenType::Dollar) }

	/// The tree in postfix notation, see [`Rpn`].
	pub fn to_rpn(&self) -> String { Rpn(self).to_string() }
}

#[allow(clippy::enum_variant_names)]
/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Number(f64),
	StringLiteral(String),
	Boolean(bool),
	Nil,
}

impl TryFrom<Token> for Expression {
	type Error = anyhow::Error;

	fn try_from(token: Token) -> Result<Self, Self::Error> {
		use crate::scanner::TokenType::*;

		Ok(match token.r#type {
			NumberLiteral(n) => Literal(LiteralValue::Number(n)),
			StringLiteral(s) => Literal(LiteralValue::StringLiteral(s)),
			True => Literal(LiteralValue::Boolean(true)),
			False => Literal(LiteralValue::Boolean(false)),
			Nil => Literal(LiteralValue::Nil),
			Identifier | Dollar => Expression::Variable(token),
			_ => anyhow::bail!("Cannot convert token {:?} to Expression::Literal", token),
		})
	}
}

/// Prints the tree in prefix notation, e.g. `(+ 1 (* 2 3))`.
impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal(lit) => write!(f, "{lit}"),
			Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
			Binary { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Grouping(expression) => write!(f, "(group {expression})"),
			Variable(token) => write!(f, "{}", token.lexeme),
			Assign { target: name, value } => write!(f, "(= {} {value})", name.lexeme),
			Logical { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Call { callee, paren: _, arguments } => {
				write!(f, "(call {callee}")?;
				for argument in arguments {
					write!(f, " {argument}")?;
				}
				write!(f, ")")
			}
			Pipe { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			AnonymousFunction { name, parameters, .. } => write!(
				f,
				"(fun{} ({}))",
				name.as_ref().map(|n| format!(" {}", n.lexeme)).unwrap_or_default(),
				parameters.iter().map(|p| p.lexeme.as_str()).collect::<Vec<&str>>().join(" ")
			),
		}
	}
}

impl std::fmt::Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Number(n) => write!(f, "{n}"),
			LiteralValue::StringLiteral(s) => write!(f, "\"{s}\""),
			LiteralValue::Boolean(b) => write!(f, "{b}"),
			LiteralValue::Nil => write!(f, "nil"),
		}
	}
}

/// Prints the tree in reverse Polish notation: operands first, then the
/// operator. Groupings leave no trace, so `(1 + 2) * (3 - 4)` prints as
/// `1 2 + 3 4 - *`.
pub struct Rpn<'e>(pub &'e Expression);

impl std::fmt::Display for Rpn<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.0 {
			Literal(lit) => write!(f, "{lit}"),
			Variable(token) => write!(f, "{}", token.lexeme),
			Grouping(expression) => write!(f, "{}", Rpn(expression)),
			Unary { operator, right } => write!(f, "{} {}", Rpn(right), operator.lexeme),
			Binary { left, operator, right } | Logical { left, operator, right } | Pipe { left, operator, right } => {
				write!(f, "{} {} {}", Rpn(left), Rpn(right), operator.lexeme)
			}
			Assign { target, value } => write!(f, "{} {} =", Rpn(value), target.lexeme),
			Call { callee, arguments, .. } => {
				for argument in arguments {
					write!(f, "{} ", Rpn(argument))?;
				}
				write!(f, "{} call", Rpn(callee))
			}
			AnonymousFunction { name: Some(name), .. } => write!(f, "<fn {}>", name.lexeme),
			AnonymousFunction { name: None, .. } => write!(f, "<fn>"),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn token(r#type: TokenType, lexeme: &str) -> Token { Token::new(r#type, lexeme, 1) }

	fn number(n: f64) -> Box<Expression> { Box::new(Literal(LiteralValue::Number(n))) }

	fn binary(left: Box<Expression>, operator: &str, right: Box<Expression>) -> Box<Expression> {
		let r#type = match operator {
			"+" => TokenType::Plus,
			"-" => TokenType::Minus,
			"*" => TokenType::Star,
			_ => TokenType::Slash,
		};
		Expression::binary(left, token(r#type, operator), right)
	}

	#[test]
	fn rpn_puts_operators_last() {
		let expression = binary(
			Expression::grouping(binary(number(1.0), "+", number(2.0))),
			"*",
			Expression::grouping(binary(number(3.0), "-", number(4.0))),
		);
		assert_eq!(expression.to_rpn(), "1 2 + 3 4 - *");
		assert_eq!(expression.to_string(), "(* (group (+ 1 2)) (group (- 3 4)))");
	}

	#[test]
	fn rpn_of_every_kind() {
		let x = || Box::new(Variable(token(TokenType::Identifier, "x")));
		let f = || Box::new(Variable(token(TokenType::Identifier, "f")));
		let paren = token(TokenType::RightParen, ")");

		assert_eq!(Expression::unary(token(TokenType::Minus, "-"), x()).to_rpn(), "x -");
		assert_eq!(Expression::assign(token(TokenType::Identifier, "y"), number(1.5)).to_rpn(), "1.5 y =");
		assert_eq!(Expression::logical(x(), token(TokenType::Or, "or"), number(2.0)).to_rpn(), "x 2 or");
		assert_eq!(Expression::call(f(), paren.clone(), vec![*x(), *number(2.0)]).to_rpn(), "x 2 f call");
		assert_eq!(Expression::call(f(), paren, vec![]).to_rpn(), "f call");
		let placeholder = Box::new(Variable(token(TokenType::Dollar, "$")));
		assert_eq!(Expression::pipe(x(), token(TokenType::PipeGreater, "|>"), placeholder).to_rpn(), "x $ |>");
	}
}
