//! Tree-walking evaluator.
//!
//! The interpreter walks the desugared syntax tree, evaluating each
//! expression to a [`Value`] and executing statements for their effects.
//!
//! # Control flow
//!
//! `return`, `break` and `continue` do not unwind. Executing a statement
//! yields a [`ControlFlow`] signal which blocks hand upwards until a loop or a
//! function call consumes it. Runtime errors travel through `Result` and
//! abort the whole run.
//!
//! # Scopes
//!
//! Each block and each call gets a fresh [`Environment`] frame. The frame
//! that was current before is put back however the block is left.

pub mod callable;
mod native;
pub mod value;

use std::{io::Write, rc::Rc};

use anyhow::{Context, anyhow};
use callable::{Callable, FunctionObject, NativeFunction};
use value::Value;

use crate::{environment::Environment, error::interpreter::{InterpreterError, RuntimeErrorType}, parser::expression::{Expression, LiteralValue}, scanner::{Token, TokenType}, statement::{Function, Statement}, utils::{RcCell, ensure_sufficient_stack}};

/// What a statement asks of the code that executed it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
	/// Carry on with the next statement.
	Next,
	Return(Value),
	Break,
	Continue,
}

pub struct Interpreter {
	globals:     RcCell<Environment>,
	/// The innermost frame of the code being executed.
	environment: RcCell<Environment>,
	/// Where `print` writes.
	output:      Box<dyn Write>,
}

impl Default for Interpreter {
	fn default() -> Self { Self::new() }
}

impl Interpreter {
	/// An interpreter printing to standard output.
	pub fn new() -> Self { Self::with_output(std::io::stdout()) }

	/// An interpreter printing to `output`, with the native functions
	/// already defined.
	pub fn with_output(output: impl Write + 'static) -> Self {
		let globals = RcCell::new(Environment::new());
		let mut interpreter = Self { environment: globals.clone(), globals, output: Box::new(output) };
		for native in native::globals() {
			interpreter.define_native(native);
		}
		interpreter
	}

	/// Make a host function visible to programs as a global.
	pub fn define_native(&mut self, native: NativeFunction) {
		let name = native.name;
		self.globals.borrow_mut().define(name, Value::Callable(Callable::Native(Rc::new(native))));
	}

	/// Execute a program. Globals persist between calls.
	pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), InterpreterError> {
		tracing::debug!(count = statements.len(), "interpreting");
		for statement in statements {
			self.execute(statement)?;
		}
		self.output.flush().context("Failed flush program output")?;
		Ok(())
	}

	/// Execute `statements` with `environment` as the current frame, then
	/// restore the previous frame on every path out.
	pub(crate) fn execute_block(
		&mut self,
		statements: &[Statement],
		environment: RcCell<Environment>,
	) -> Result<ControlFlow, InterpreterError> {
		let previous = std::mem::replace(&mut self.environment, environment);
		let result = self.execute_all(statements);
		self.environment = previous;
		result
	}

	fn execute_all(&mut self, statements: &[Statement]) -> Result<ControlFlow, InterpreterError> {
		for statement in statements {
			match self.execute(statement)? {
				ControlFlow::Next => {}
				signal => return Ok(signal),
			}
		}
		Ok(ControlFlow::Next)
	}

	fn execute(&mut self, statement: &Statement) -> Result<ControlFlow, InterpreterError> {
		ensure_sufficient_stack(|| {
			match statement {
				Statement::Expression(expression) => {
					self.evaluate(expression)?;
				}
				Statement::Print(expression) => {
					let value = self.evaluate(expression)?;
					writeln!(self.output, "{value}").context("Failed write program output")?;
				}
				Statement::VarDeclaration { name_token, initializer } => {
					let value = match initializer {
						Some(initializer) => self.evaluate(initializer)?,
						None => Value::Nil,
					};
					self.environment.borrow_mut().define(&name_token.lexeme, value);
				}
				Statement::Block(statements) => {
					let frame = Environment::with_enclosing(self.environment.clone());
					return self.execute_block(statements, RcCell::new(frame));
				}
				Statement::If { condition, then_branch, else_branch } => {
					if self.evaluate(condition)?.is_truthy() {
						return self.execute(then_branch);
					} else if let Some(else_branch) = else_branch {
						return self.execute(else_branch);
					}
				}
				Statement::While { condition, body, increment } => {
					while self.evaluate(condition)?.is_truthy() {
						match self.execute(body)? {
							ControlFlow::Next => {}
							ControlFlow::Break => break,
							ControlFlow::Continue => {
								if *increment {
									self.run_increment(body)?;
								}
							}
							signal @ ControlFlow::Return(_) => return Ok(signal),
						}
					}
				}
				Statement::FunDecl(Function { name_token, parameters, body }) => {
					let function = Self::function(Some(name_token.lexeme.clone()), parameters, body, self.environment.clone());
					self.environment.borrow_mut().define(&name_token.lexeme, function);
				}
				Statement::Return { value, .. } => {
					let value = match value {
						Some(value) => self.evaluate(value)?,
						None => Value::Nil,
					};
					return Ok(ControlFlow::Return(value));
				}
				Statement::Break(_) => return Ok(ControlFlow::Break),
				Statement::Continue(_) => return Ok(ControlFlow::Continue),
			}
			Ok(ControlFlow::Next)
		})
	}

	/// A `continue` leaves the body of a desugared `for` before its trailing
	/// increment, which still has to run.
	fn run_increment(&mut self, body: &Statement) -> Result<(), InterpreterError> {
		match body {
			Statement::Block(statements) => match statements.last() {
				Some(Statement::Expression(increment)) => {
					self.evaluate(increment)?;
					Ok(())
				}
				_ => Err(anyhow!("loop body does not end with an increment").into()),
			},
			_ => Err(anyhow!("loop with increment has no block body").into()),
		}
	}

	fn function(
		name: Option<String>,
		parameters: &Rc<Vec<Token>>,
		body: &Rc<Vec<Statement>>,
		closure: RcCell<Environment>,
	) -> Value {
		Value::Callable(Callable::Function(Rc::new(FunctionObject {
			name,
			parameters: parameters.clone(),
			body: body.clone(),
			closure,
		})))
	}

	/// A function expression. A named one sees itself under its name through
	/// a frame of its own between the current frame and its calls.
	fn function_expression(
		&self,
		name: &Option<Token>,
		parameters: &Rc<Vec<Token>>,
		body: &Rc<Vec<Statement>>,
	) -> Value {
		let Some(name) = name else {
			return Self::function(None, parameters, body, self.environment.clone());
		};
		let frame = RcCell::new(Environment::with_enclosing(self.environment.clone()));
		let function = Self::function(Some(name.lexeme.clone()), parameters, body, frame.clone());
		frame.borrow_mut().define(&name.lexeme, function.clone());
		function
	}

	/// Evaluate the given expression and return its value.
	fn evaluate(&mut self, expression: &Expression) -> Result<Value, InterpreterError> {
		ensure_sufficient_stack(|| {
			Ok(match expression {
				Expression::Literal(literal) => match literal {
					LiteralValue::Nil => Value::Nil,
					LiteralValue::Boolean(b) => Value::Bool(*b),
					LiteralValue::Number(n) => Value::Num(*n),
					LiteralValue::StringLiteral(s) => Value::Str(s.clone()),
				},
				Expression::Grouping(inner) => self.evaluate(inner)?,
				Expression::Variable(token) => self.environment.borrow().get(token)?,
				Expression::Assign { target, value } => {
					let value = self.evaluate(value)?;
					self.environment.borrow_mut().assign(target, value.clone())?;
					value
				}
				Expression::Unary { operator, right } => self.evaluate(right)?.unary_op(operator)?,
				Expression::Binary { left, operator, right } => {
					let left = self.evaluate(left)?;
					let right = self.evaluate(right)?;
					left.binary_op(operator, &right)?
				}
				Expression::Logical { left, operator, right } => {
					let left = self.evaluate(left)?;
					let decided = match operator.r#type {
						TokenType::Or => left.is_truthy(),
						TokenType::And => !left.is_truthy(),
						_ => return Err(anyhow!("line {}: invalid logical operator '{}'", operator.line, operator.lexeme).into()),
					};
					if decided { left } else { self.evaluate(right)? }
				}
				Expression::Call { callee, paren, arguments } => {
					let callee = self.evaluate(callee)?;
					let arguments = arguments.iter().map(|argument| self.evaluate(argument)).collect::<Result<Vec<_>, _>>()?;
					self.call(callee, paren, arguments)?
				}
				Expression::AnonymousFunction { name, parameters, body } => self.function_expression(name, parameters, body),
				Expression::Pipe { operator, .. } => {
					return Err(anyhow!("line {}: pipe reached the evaluator without being desugared", operator.line).into());
				}
			})
		})
	}

	fn call(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value, InterpreterError> {
		let Value::Callable(callable) = callee else {
			return Err(InterpreterError::runtime(paren, RuntimeErrorType::NotCallable));
		};
		if arguments.len() != callable.arity() {
			let mismatch = RuntimeErrorType::ArityMismatch { expected: callable.arity(), got: arguments.len() };
			return Err(InterpreterError::runtime(paren, mismatch));
		}
		tracing::trace!(line = paren.line, callee = callable.name().unwrap_or("<anonymous>"), "call");
		match callable {
			// Natives have no source location of their own; their errors
			// belong to the call site.
			Callable::Native(_) => callable.call(self, arguments).map_err(|error| match error {
				InterpreterError::RuntimeError(error) => InterpreterError::runtime(paren, error.r#type),
				internal => internal,
			}),
			Callable::Function(_) => callable.call(self, arguments),
		}
	}
}
