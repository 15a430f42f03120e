use std::{fmt::{Debug, Display}, rc::Rc};

use crate::{environment::Environment, error::interpreter::InterpreterError, interpreter::{ControlFlow, Interpreter, value::Value}, scanner::Token, statement::Statement, utils::RcCell};

/// Host implementation of a native function.
pub type NativeBody = Box<dyn Fn(&mut Interpreter, &[Value]) -> Result<Value, InterpreterError>>;

/// Anything that can appear in callee position. Clones share the underlying
/// object, and two callables are equal only when they are the same object.
#[derive(Clone)]
pub enum Callable {
	Function(Rc<FunctionObject>),
	Native(Rc<NativeFunction>),
}

impl Callable {
	pub fn arity(&self) -> usize {
		match self {
			Callable::Function(function) => function.parameters.len(),
			Callable::Native(native) => native.arity,
		}
	}

	/// Invoke with arguments already checked against [`Callable::arity`].
	pub fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, InterpreterError> {
		match self {
			Callable::Function(function) => function.call(interpreter, arguments),
			Callable::Native(native) => (native.body)(interpreter, &arguments),
		}
	}

	pub fn name(&self) -> Option<&str> {
		match self {
			Callable::Function(function) => function.name.as_deref(),
			Callable::Native(native) => Some(native.name),
		}
	}
}

impl PartialEq for Callable {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Callable::Function(l), Callable::Function(r)) => Rc::ptr_eq(l, r),
			(Callable::Native(l), Callable::Native(r)) => Rc::ptr_eq(l, r),
			_ => false,
		}
	}
}

impl Display for Callable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Callable::Function(function) => match &function.name {
				Some(name) => write!(f, "<fn {name}>"),
				None => write!(f, "<fn>"),
			},
			Callable::Native(_) => write!(f, "<native fn>"),
		}
	}
}

impl Debug for Callable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Callable::Function(function) => f.debug_tuple("Function").field(function).finish(),
			Callable::Native(native) => f.debug_tuple("Native").field(&native.name).finish(),
		}
	}
}

/// A user function together with the frame it was created in.
pub struct FunctionObject {
	pub name:       Option<String>,
	pub parameters: Rc<Vec<Token>>,
	pub body:       Rc<Vec<Statement>>,
	pub closure:    RcCell<Environment>,
}

impl FunctionObject {
	fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, InterpreterError> {
		let mut frame = Environment::with_enclosing(self.closure.clone());
		for (parameter, argument) in self.parameters.iter().zip(arguments) {
			frame.define(&parameter.lexeme, argument);
		}
		match interpreter.execute_block(&self.body, RcCell::new(frame))? {
			ControlFlow::Return(value) => Ok(value),
			// `break` and `continue` cannot cross a function body; the parser
			// rejects them there.
			ControlFlow::Next | ControlFlow::Break | ControlFlow::Continue => Ok(Value::Nil),
		}
	}
}

impl Debug for FunctionObject {
	// The closure may reach this very function again.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FunctionObject")
			.field("name", &self.name)
			.field("arity", &self.parameters.len())
			.finish_non_exhaustive()
	}
}

pub struct NativeFunction {
	pub name:  &'static str,
	pub arity: usize,
	body:      NativeBody,
}

impl NativeFunction {
	pub fn new(
		name: &'static str,
		arity: usize,
		body: impl Fn(&mut Interpreter, &[Value]) -> Result<Value, InterpreterError> + 'static,
	) -> Self {
		Self { name, arity, body: Box::new(body) }
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn native(name: &'static str, arity: usize) -> Callable {
		Callable::Native(Rc::new(NativeFunction::new(name, arity, |_, arguments| Ok(Value::Num(arguments.len() as f64)))))
	}

	fn function(name: Option<&str>) -> Callable {
		Callable::Function(Rc::new(FunctionObject {
			name:       name.map(str::to_string),
			parameters: Rc::new(vec![]),
			body:       Rc::new(vec![]),
			closure:    RcCell::new(Environment::new()),
		}))
	}

	#[test]
	fn display() {
		assert_eq!(function(Some("add")).to_string(), "<fn add>");
		assert_eq!(function(None).to_string(), "<fn>");
		assert_eq!(native("clock", 0).to_string(), "<native fn>");
	}

	#[test]
	fn identity_equality() {
		let f = function(Some("f"));
		assert_eq!(f, f.clone());
		assert_ne!(f, function(Some("f")));
		let n = native("n", 0);
		assert_eq!(n, n.clone());
		assert_ne!(n, native("n", 0));
		assert_ne!(f, n);
	}

	#[test]
	fn native_calls_receive_arguments() {
		let mut interpreter = Interpreter::with_output(Vec::new());
		let n = native("count", 2);
		assert_eq!(n.arity(), 2);
		assert_eq!(n.name(), Some("count"));
		assert_eq!(n.call(&mut interpreter, vec![Value::Nil, Value::Nil]).unwrap(), Value::Num(2.0));
	}

	#[test]
	fn empty_body_returns_nil() {
		let mut interpreter = Interpreter::with_output(Vec::new());
		assert_eq!(function(None).call(&mut interpreter, vec![]).unwrap(), Value::Nil);
	}
}
