use std::collections::HashMap;

use crate::{error::interpreter::{InterpreterError, RuntimeErrorType}, interpreter::value::Value, scanner::Token, utils::RcCell};

/// One frame of the scope chain. Frames are shared through [`RcCell`]: a
/// closure keeps its defining frame alive and sees later writes to it.
#[derive(Default, Debug)]
pub struct Environment {
	variables: HashMap<String, Value>,
	enclosing: Option<RcCell<Environment>>,
}

impl Environment {
	pub fn new() -> Self { Self::default() }

	/// A fresh frame nested inside `enclosing`.
	pub fn with_enclosing(enclosing: RcCell<Environment>) -> Self {
		Self { variables: HashMap::new(), enclosing: Some(enclosing) }
	}

	/// A variable statement doesn’t just define a new variable, it can also be
	/// used to redefine an existing variable.
	pub fn define(&mut self, name: &str, value: Value) { self.variables.insert(name.to_string(), value); }

	/// Look a variable up, innermost frame first.
	pub fn get(&self, token: &Token) -> Result<Value, InterpreterError> {
		if let Some(value) = self.variables.get(&token.lexeme) {
			return Ok(value.clone());
		}
		match &self.enclosing {
			Some(enclosing) => enclosing.borrow().get(token),
			None => Err(InterpreterError::runtime(token, RuntimeErrorType::UndefinedVariable(token.lexeme.clone()))),
		}
	}

	/// Assign a value to an existing variable. Assignment never creates one.
	pub fn assign(&mut self, token: &Token, value: Value) -> Result<(), InterpreterError> {
		if let Some(slot) = self.variables.get_mut(&token.lexeme) {
			*slot = value;
			return Ok(());
		}
		match &self.enclosing {
			Some(enclosing) => enclosing.borrow_mut().assign(token, value),
			None => Err(InterpreterError::runtime(token, RuntimeErrorType::UndefinedVariable(token.lexeme.clone()))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::interpreter::RuntimeError, scanner::TokenType};

	fn name(lexeme: &str) -> Token { Token::new(TokenType::Identifier, lexeme, 1) }

	fn number(value: Result<Value, InterpreterError>) -> f64 {
		match value {
			Ok(Value::Num(n)) => n,
			other => panic!("expected a number, got {other:?}"),
		}
	}

	#[test]
	fn define_shadows_outer_binding() {
		let globals = RcCell::new(Environment::new());
		globals.borrow_mut().define("a", Value::Num(1.0));
		let mut inner = Environment::with_enclosing(globals.clone());
		inner.define("a", Value::Num(2.0));

		assert_eq!(number(inner.get(&name("a"))), 2.0);
		assert_eq!(number(globals.borrow().get(&name("a"))), 1.0);
	}

	#[test]
	fn redefinition_overwrites() {
		let mut environment = Environment::new();
		environment.define("a", Value::Num(1.0));
		environment.define("a", Value::Num(3.0));
		assert_eq!(number(environment.get(&name("a"))), 3.0);
	}

	#[test]
	fn assign_walks_the_chain() {
		let globals = RcCell::new(Environment::new());
		globals.borrow_mut().define("a", Value::Num(1.0));
		let middle = RcCell::new(Environment::with_enclosing(globals.clone()));
		let mut inner = Environment::with_enclosing(middle);

		inner.assign(&name("a"), Value::Num(5.0)).unwrap();
		assert_eq!(number(globals.borrow().get(&name("a"))), 5.0);
		assert!(inner.variables.is_empty());
	}

	#[test]
	fn unresolved_names_fail() {
		let mut environment = Environment::with_enclosing(RcCell::new(Environment::new()));
		let expected = RuntimeError::new(1, RuntimeErrorType::UndefinedVariable("missing".into()));

		match environment.get(&name("missing")) {
			Err(InterpreterError::RuntimeError(error)) => assert_eq!(error, expected),
			other => panic!("unexpected {other:?}"),
		}
		match environment.assign(&name("missing"), Value::Nil) {
			Err(InterpreterError::RuntimeError(error)) => assert_eq!(error, expected),
			other => panic!("unexpected {other:?}"),
		}
	}
}
