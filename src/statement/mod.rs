//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `while` loop is always a statement.

use std::rc::Rc;

use crate::{parser::expression::Expression, scanner::Token};

/// A statement in the programming language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// An expression used as a statement.
	Expression(Expression),
	/// A print statement.
	Print(Expression),
	/// A variable declaration statement.
	VarDeclaration {
		/// The token of the variable being declared.
		name_token:  Token,
		/// An optional initializer expression.
		initializer: Option<Expression>,
	},
	/// A block of statements.
	Block(Vec<Statement>),
	If {
		condition:   Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
	},
	While {
		condition: Expression,
		body:      Box<Statement>,
		/// Set for loops built from `for`: the body is a block whose last
		/// statement is the increment, which `continue` must not skip.
		increment: bool,
	},
	FunDecl(Function),
	/// A return statememnt.
	Return { keyword: Token, value: Option<Expression> },
	/// A break statement to exit loops.
	Break(Token),
	/// Skips to the next iteration of the innermost loop.
	Continue(Token),
}

/// A named function declaration. Parameters and body are shared with every
/// function object created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
	pub name_token: Token,
	pub parameters: Rc<Vec<Token>>,
	pub body:       Rc<Vec<Statement>>,
}
