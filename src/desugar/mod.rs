//! Pipe elimination.
//!
//! `left |> right` threads `left` into every `$` placeholder of `right`:
//!
//! ``` text
//! 5 |> double($) |> inc($)   ==>   inc(double(5))
//! ```
//!
//! The pass rebuilds the whole tree; every node other than a pipe maps to
//! the same node with desugared children, so a tree without pipes comes out
//! equal to the tree that went in.

use std::rc::Rc;

use crate::{diagnostics::Diagnostics, error::parser::{ParseError, ParseErrorType}, parser::expression::Expression, statement::{Function, Statement}, utils::ensure_sufficient_stack};

pub struct Desugarer<'d> {
	diagnostics: &'d mut Diagnostics,
}

impl<'d> Desugarer<'d> {
	pub fn new(diagnostics: &'d mut Diagnostics) -> Self { Self { diagnostics } }

	/// Desugar a program. Pipes without a placeholder are reported and left
	/// in place so that the rest of the program is still checked.
	pub fn desugar(&mut self, statements: &[Statement]) -> Vec<Statement> {
		statements.iter().map(|statement| self.statement(statement)).collect()
	}

	fn statement(&mut self, statement: &Statement) -> Statement {
		match statement {
			Statement::Expression(expression) => Statement::Expression(self.expression(expression)),
			Statement::Print(expression) => Statement::Print(self.expression(expression)),
			Statement::VarDeclaration { name_token, initializer } => Statement::VarDeclaration {
				name_token:  name_token.clone(),
				initializer: initializer.as_ref().map(|initializer| self.expression(initializer)),
			},
			Statement::Block(statements) => Statement::Block(self.desugar(statements)),
			Statement::If { condition, then_branch, else_branch } => Statement::If {
				condition:   self.expression(condition),
				then_branch: Box::new(self.statement(then_branch)),
				else_branch: else_branch.as_ref().map(|else_branch| Box::new(self.statement(else_branch))),
			},
			Statement::While { condition, body, increment } => Statement::While {
				condition: self.expression(condition),
				body:      Box::new(self.statement(body)),
				increment: *increment,
			},
			Statement::FunDecl(Function { name_token, parameters, body }) => Statement::FunDecl(Function {
				name_token: name_token.clone(),
				parameters: parameters.clone(),
				body:       Rc::new(self.desugar(body)),
			}),
			Statement::Return { keyword, value } => Statement::Return {
				keyword: keyword.clone(),
				value:   value.as_ref().map(|value| self.expression(value)),
			},
			Statement::Break(keyword) => Statement::Break(keyword.clone()),
			Statement::Continue(keyword) => Statement::Continue(keyword.clone()),
		}
	}

	fn expression(&mut self, expression: &Expression) -> Expression {
		ensure_sufficient_stack(|| match expression {
			Expression::Pipe { left, operator, right } => {
				let left = self.expression(left);
				let mut substituter = PlaceholderSubstituter::new(&left);
				let substituted = substituter.substitute(right);
				if !substituter.found {
					self.diagnostics.error(ParseError::new(operator, ParseErrorType::MissingPlaceholder));
					return substituted;
				}
				tracing::trace!(line = operator.line, "desugared pipe");
				// `$` may have been replaced inside a nested pipe's left side.
				self.expression(&substituted)
			}
			Expression::Literal(_) | Expression::Variable(_) => expression.clone(),
			Expression::Unary { operator, right } => {
				Expression::Unary { operator: operator.clone(), right: Box::new(self.expression(right)) }
			}
			Expression::Binary { left, operator, right } => Expression::Binary {
				left:     Box::new(self.expression(left)),
				operator: operator.clone(),
				right:    Box::new(self.expression(right)),
			},
			Expression::Logical { left, operator, right } => Expression::Logical {
				left:     Box::new(self.expression(left)),
				operator: operator.clone(),
				right:    Box::new(self.expression(right)),
			},
			Expression::Call { callee, paren, arguments } => Expression::Call {
				callee:    Box::new(self.expression(callee)),
				paren:     paren.clone(),
				arguments: arguments.iter().map(|argument| self.expression(argument)).collect(),
			},
			Expression::Assign { target, value } => {
				Expression::Assign { target: target.clone(), value: Box::new(self.expression(value)) }
			}
			Expression::Grouping(inner) => Expression::Grouping(Box::new(self.expression(inner))),
			Expression::AnonymousFunction { name, parameters, body } => Expression::AnonymousFunction {
				name:       name.clone(),
				parameters: parameters.clone(),
				body:       Rc::new(self.desugar(body)),
			},
		})
	}
}

/// Replaces every `$` of one pipe stage with that stage's left operand.
struct PlaceholderSubstituter<'r> {
	replacement: &'r Expression,
	found:       bool,
}

impl<'r> PlaceholderSubstituter<'r> {
	fn new(replacement: &'r Expression) -> Self { Self { replacement, found: false } }

	fn substitute(&mut self, expression: &Expression) -> Expression {
		ensure_sufficient_stack(|| match expression {
			_ if expression.is_placeholder() => {
				self.found = true;
				self.replacement.clone()
			}
			// The right side of a nested pipe holds that pipe's own `$`.
			Expression::Pipe { left, operator, right } => Expression::Pipe {
				left:     Box::new(self.substitute(left)),
				operator: operator.clone(),
				right:    right.clone(),
			},
			// A function body is a new scope of statements, desugared on its own.
			Expression::Literal(_) | Expression::Variable(_) | Expression::AnonymousFunction { .. } => expression.clone(),
			Expression::Unary { operator, right } => {
				Expression::Unary { operator: operator.clone(), right: Box::new(self.substitute(right)) }
			}
			Expression::Binary { left, operator, right } => Expression::Binary {
				left:     Box::new(self.substitute(left)),
				operator: operator.clone(),
				right:    Box::new(self.substitute(right)),
			},
			Expression::Logical { left, operator, right } => Expression::Logical {
				left:     Box::new(self.substitute(left)),
				operator: operator.clone(),
				right:    Box::new(self.substitute(right)),
			},
			Expression::Call { callee, paren, arguments } => Expression::Call {
				callee:    Box::new(self.substitute(callee)),
				paren:     paren.clone(),
				arguments: arguments.iter().map(|argument| self.substitute(argument)).collect(),
			},
			Expression::Assign { target, value } => {
				Expression::Assign { target: target.clone(), value: Box::new(self.substitute(value)) }
			}
			Expression::Grouping(inner) => Expression::Grouping(Box::new(self.substitute(inner))),
		})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{parser::Parser, scanner::Scanner};

	fn parse(input: &str) -> Vec<Statement> {
		let mut diagnostics = Diagnostics::new();
		let tokens = Scanner::new(input).scan_tokens(&mut diagnostics).unwrap();
		let statements = Parser::new(tokens, &mut diagnostics).parse().unwrap();
		assert!(!diagnostics.had_error());
		statements
	}

	/// Desugar a single expression statement, returning it in prefix form
	/// with the reported errors.
	fn desugar(input: &str) -> (String, Vec<String>) {
		let mut diagnostics = Diagnostics::new();
		let statements = Desugarer::new(&mut diagnostics).desugar(&parse(&format!("{input};")));
		let errors = diagnostics.iter().map(|d| d.to_string()).collect();
		match &statements[..] {
			[Statement::Expression(expression)] => (expression.to_string(), errors),
			other => panic!("expected one expression statement, got {other:?}"),
		}
	}

	fn desugars_to(input: &str, expected: &str) {
		let (output, errors) = desugar(input);
		assert!(errors.is_empty(), "{errors:?}");
		assert_eq!(output, expected);
	}

	#[test]
	fn pipe_becomes_call() {
		desugars_to("5 |> double($)", "(call double 5)");
		desugars_to("5 |> double($) |> inc($)", "(call inc (call double 5))");
		desugars_to("a |> f($) |> g($) |> h($)", "(call h (call g (call f a)))");
	}

	#[test]
	fn every_placeholder_is_replaced() {
		desugars_to("x |> add($, $)", "(call add x x)");
		desugars_to("1 + 2 |> $ * $", "(* (+ 1 2) (+ 1 2))");
	}

	#[test]
	fn placeholder_inside_nested_expressions() {
		desugars_to("n |> -($ + 1) / 2", "(/ (- (group (+ n 1))) 2)");
		desugars_to("n |> f(g($), !$)", "(call f (call g n) (! n))");
		desugars_to("v |> (x = $)", "(group (= x v))");
		desugars_to("v |> $ or fallback", "(or v fallback)");
		desugars_to("v |> pick($)(1)", "(call (call pick v) 1)");
	}

	#[test]
	fn pipe_left_side_is_desugared_first() {
		desugars_to("(a |> f($)) |> g($)", "(call g (group (call f a)))");
	}

	#[test]
	fn missing_placeholder_is_an_error() {
		let (output, errors) = desugar("a |> f(1)");
		assert_eq!(errors, ["[line 1] Error at '|>': Right-hand side of '|>' must contain at least one '$' placeholder."]);
		// The right side is kept as written; `a` is not silently dropped into it.
		assert_eq!(output, "(call f 1)");

		let (_, errors) = desugar("a |> f");
		assert_eq!(errors.len(), 1);
	}

	#[test]
	fn each_faulty_stage_is_reported() {
		let (_, errors) = desugar("a |> f(1) |> g(2)");
		assert_eq!(errors.len(), 2);
	}

	#[test]
	fn outer_value_does_not_leak_into_nested_pipe() {
		// Only `b` may reach `f`; the outer pipe has no placeholder of its own.
		let (output, errors) = desugar("a |> (b |> f($))");
		assert_eq!(errors.len(), 1);
		assert!(!output.contains("(call f a)"), "{output}");

		// A `$` on the nested pipe's left side belongs to the outer pipe.
		desugars_to("a |> ($ |> f($))", "(group (call f a))");
		desugars_to("a |> g($ |> f($))", "(call g (call f a))");
	}

	#[test]
	fn placeholder_in_anonymous_function_body_is_not_substituted() {
		let (_, errors) = desugar("a |> fun () { return $; }");
		assert_eq!(errors.len(), 1);
	}

	#[test]
	fn pipes_in_nested_statements_are_desugared() {
		let mut diagnostics = Diagnostics::new();
		let statements = Desugarer::new(&mut diagnostics).desugar(&parse(
			"fun f(x) { if (x) { return x |> g($); } while (x) print x |> h($); }\nvar k = fun () { return 1 |> g($); };",
		));
		assert!(!diagnostics.had_error());
		let text = format!("{statements:?}");
		assert!(!text.contains("Pipe {"), "{text}");
	}

	#[test]
	fn idempotent_without_pipes() {
		let source = "var a = 1; fun f(x) { return x + a; } for (var i = 0; i < 2; i = i + 1) { print f(i); }";
		let statements = parse(source);
		let mut diagnostics = Diagnostics::new();
		let mut desugarer = Desugarer::new(&mut diagnostics);
		let once = desugarer.desugar(&statements);
		let twice = desugarer.desugar(&once);
		assert_eq!(once, statements);
		assert_eq!(twice, once);
	}

	#[test]
	fn original_tree_is_left_intact() {
		let statements = parse("1 |> f($);");
		let mut diagnostics = Diagnostics::new();
		let desugared = Desugarer::new(&mut diagnostics).desugar(&statements);
		assert_ne!(desugared, statements);
		assert!(matches!(&statements[0], Statement::Expression(Expression::Pipe { .. })));
	}
}
