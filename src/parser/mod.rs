//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Expression`
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assignment|=|Right
//! Or|or|Left
//! And|and|Left
//! Pipe|\|>|Left
//! Equality|== !=|Left
//! Comparison|< > <= >=|Left
//! Term|+ -|Left
//! Factor|* /|Left
//! Unary|! -|Right
//!
//! Grammar:
//!
//! ``` BNF
//! program        → declaration* EOF ;
//! declaration    → "fun" IDENTIFIER function | varDecl | statement ;
//! statement      → "break" ";" | "continue" ";" | forStmt | ifStmt | whileStmt
//!                | "print" expression ";" | "return" expression? ";" | block | exprStmt ;
//! expression     → assignment ;
//! assignment     → IDENTIFIER "=" assignment | logic_or ;
//! logic_or       → logic_and ( "or" logic_and )* ;
//! logic_and      → pipe ( "and" pipe )* ;
//! pipe           → equality ( "|>" equality )* ;
//! equality       → comparison ( ( "!=" | "==" ) comparison )* ;
//! comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
//! term           → factor ( ( "-" | "+" ) factor )* ;
//! factor         → unary ( ( "/" | "*" ) unary )* ;
//! unary          → ( "!" | "-" ) unary | call ;
//! call           → primary ( "(" arguments? ")" )* ;
//! primary        → NUMBER | STRING | "true" | "false" | "nil" | IDENTIFIER | "$"
//!                | "(" expression ")" | "fun" IDENTIFIER? function ;
//! function       → "(" parameters? ")" block ;
//! ```
//!
//! `for` loops never reach later passes: they are rewritten here into a
//! `while` wrapped in blocks.

pub mod expression;

use std::rc::Rc;

use TokenType::*;

use crate::{diagnostics::Diagnostics, error::parser::{ParseError, ParseErrorType, ParserError}, parser::expression::{Expression, LiteralValue}, scanner::{Token, TokenType}, statement::{Function, Statement}, utils::ensure_sufficient_stack};

/// Upper bound on parameters of a function and arguments of a call.
pub const MAX_ARITY: usize = 255;

/// Recursive-descent parser. Syntax errors go to the diagnostics sink, after
/// which the parser skips to the next statement and carries on.
pub struct Parser<'d> {
	/// The tokens to parse, always terminated by `Eof`.
	tokens:         Vec<Token>,
	current:        usize,
	diagnostics:    &'d mut Diagnostics,
	/// How many function bodies enclose the current token.
	function_depth: usize,
}

impl<'d> Parser<'d> {
	pub fn new(mut tokens: Vec<Token>, diagnostics: &'d mut Diagnostics) -> Self {
		if tokens.last().is_none_or(|token| token.r#type != Eof) {
			let line = tokens.last().map_or(1, |token| token.line);
			tokens.push(Token::new(Eof, "", line));
		}
		Self { tokens, current: 0, diagnostics, function_depth: 0 }
	}

	/// Parse the whole program. Only internal failures are returned as
	/// errors; syntax errors are reported and the offending declaration is
	/// dropped from the result.
	pub fn parse(mut self) -> Result<Vec<Statement>, ParserError> {
		let mut statements = Vec::new();
		while !self.is_at_end() {
			if let Some(statement) = self.declaration(false)? {
				statements.push(statement);
			}
		}
		tracing::debug!(count = statements.len(), errors = self.diagnostics.error_count(), "parsed program");
		Ok(statements)
	}

	/// Parse a declaration, recovering from syntax errors inside it.
	fn declaration(&mut self, in_loop: bool) -> Result<Option<Statement>, ParserError> {
		let result = ensure_sufficient_stack(|| {
			if self.check(&Fun) && self.check_next(&Identifier) {
				self.advance();
				self.function_declaration()
			} else if self.match_token(&Var) {
				self.var_declaration()
			} else {
				self.statement(in_loop)
			}
		});
		match result {
			Ok(statement) => Ok(Some(statement)),
			Err(ParserError::ParseError(error)) => {
				self.diagnostics.error(error);
				self.synchronize();
				Ok(None)
			}
			Err(error) => Err(error),
		}
	}

	fn function_declaration(&mut self) -> Result<Statement, ParserError> {
		let name_token = self.consume(&Identifier, "Expect function name.")?;
		let (parameters, body) = self.function("function name")?;
		Ok(Statement::FunDecl(Function { name_token, parameters, body }))
	}

	/// Parse parameters and body of a function; `after` names what precedes
	/// the parameter list, for error messages.
	fn function(&mut self, after: &str) -> Result<(Rc<Vec<Token>>, Rc<Vec<Statement>>), ParserError> {
		self.consume(&LeftParen, &format!("Expect '(' after {after}."))?;
		let mut parameters = Vec::new();
		if !self.check(&RightParen) {
			loop {
				if parameters.len() >= MAX_ARITY {
					let error = ParseError::new(self.peek(), ParseErrorType::TooManyParameters(MAX_ARITY));
					self.diagnostics.error(error);
				}
				parameters.push(self.consume(&Identifier, "Expect parameter name.")?);
				if !self.match_token(&Comma) {
					break;
				}
			}
		}
		self.consume(&RightParen, "Expect ')' after parameters.")?;
		self.consume(&LeftBrace, "Expect '{' before function body.")?;

		// Loops outside the function do not extend into its body.
		self.function_depth += 1;
		let body = self.block(false);
		self.function_depth -= 1;
		Ok((Rc::new(parameters), Rc::new(body?)))
	}

	fn var_declaration(&mut self) -> Result<Statement, ParserError> {
		let name_token = self.consume(&Identifier, "Expect variable name.")?;
		let initializer = if self.match_token(&Equal) { Some(*self.expression()?) } else { None };
		self.consume(&Semicolon, "Expect ';' after variable declaration.")?;
		Ok(Statement::VarDeclaration { name_token, initializer })
	}

	fn statement(&mut self, in_loop: bool) -> Result<Statement, ParserError> {
		match self.peek().r#type {
			Break | Continue => self.loop_control(in_loop),
			For => {
				self.advance();
				self.for_statement()
			}
			If => {
				self.advance();
				self.if_statement(in_loop)
			}
			While => {
				self.advance();
				self.while_statement()
			}
			Print => {
				self.advance();
				let value = self.expression()?;
				self.consume(&Semicolon, "Expect ';' after value.")?;
				Ok(Statement::Print(*value))
			}
			Return => self.return_statement(),
			LeftBrace => {
				self.advance();
				Ok(Statement::Block(self.block(in_loop)?))
			}
			_ => self.expression_statement(),
		}
	}

	/// `break` or `continue`, only valid inside a loop body.
	fn loop_control(&mut self, in_loop: bool) -> Result<Statement, ParserError> {
		let keyword = self.advance();
		if !in_loop {
			return Err(ParseError::new(&keyword, ParseErrorType::OutsideLoop(keyword.lexeme.clone())).into());
		}
		self.consume(&Semicolon, &format!("Expect ';' after '{}'.", keyword.lexeme))?;
		Ok(match keyword.r#type {
			Break => Statement::Break(keyword),
			_ => Statement::Continue(keyword),
		})
	}

	/// Rewrite `for (init; cond; incr) body` into
	/// `{ init; while (cond) { body; incr; } }`.
	fn for_statement(&mut self) -> Result<Statement, ParserError> {
		self.consume(&LeftParen, "Expect '(' after 'for'.")?;
		let initializer = if self.match_token(&Semicolon) {
			None
		} else if self.match_token(&Var) {
			Some(self.var_declaration()?)
		} else {
			Some(self.expression_statement()?)
		};

		let condition = if self.check(&Semicolon) { None } else { Some(*self.expression()?) };
		self.consume(&Semicolon, "Expect ';' after loop condition.")?;

		let increment = if self.check(&RightParen) { None } else { Some(*self.expression()?) };
		self.consume(&RightParen, "Expect ')' after for clauses.")?;

		let mut body = self.statement(true)?;
		let has_increment = increment.is_some();
		if let Some(increment) = increment {
			body = Statement::Block(vec![body, Statement::Expression(increment)]);
		}

		let condition = condition.unwrap_or(Expression::Literal(LiteralValue::Boolean(true)));
		body = Statement::While { condition, body: Box::new(body), increment: has_increment };

		if let Some(initializer) = initializer {
			body = Statement::Block(vec![initializer, body]);
		}
		Ok(body)
	}

	fn if_statement(&mut self, in_loop: bool) -> Result<Statement, ParserError> {
		self.consume(&LeftParen, "Expect '(' after 'if'.")?;
		let condition = self.expression()?;
		self.consume(&RightParen, "Expect ')' after if condition.")?;

		let then_branch = Box::new(self.statement(in_loop)?);
		let else_branch = if self.match_token(&Else) { Some(Box::new(self.statement(in_loop)?)) } else { None };
		Ok(Statement::If { condition: *condition, then_branch, else_branch })
	}

	fn while_statement(&mut self) -> Result<Statement, ParserError> {
		self.consume(&LeftParen, "Expect '(' after 'while'.")?;
		let condition = self.expression()?;
		self.consume(&RightParen, "Expect ')' after condition.")?;
		let body = self.statement(true)?;
		Ok(Statement::While { condition: *condition, body: Box::new(body), increment: false })
	}

	fn return_statement(&mut self) -> Result<Statement, ParserError> {
		let keyword = self.advance();
		if self.function_depth == 0 {
			return Err(ParseError::new(&keyword, ParseErrorType::TopLevelReturn).into());
		}
		let value = if self.check(&Semicolon) { None } else { Some(*self.expression()?) };
		self.consume(&Semicolon, "Expect ';' after return value.")?;
		Ok(Statement::Return { keyword, value })
	}

	fn expression_statement(&mut self) -> Result<Statement, ParserError> {
		let expression = self.expression()?;
		self.consume(&Semicolon, "Expect ';' after expression.")?;
		Ok(Statement::Expression(*expression))
	}

	/// Parse the declarations of a block, the `{` already consumed.
	fn block(&mut self, in_loop: bool) -> Result<Vec<Statement>, ParserError> {
		let mut statements = Vec::new();
		while !self.check(&RightBrace) && !self.is_at_end() {
			if let Some(statement) = self.declaration(in_loop)? {
				statements.push(statement);
			}
		}
		self.consume(&RightBrace, "Expect '}' after block.")?;
		Ok(statements)
	}

	fn expression(&mut self) -> Result<Box<Expression>, ParserError> { ensure_sufficient_stack(|| self.assignment()) }

	fn assignment(&mut self) -> Result<Box<Expression>, ParserError> {
		let expression = self.or()?;
		if !matches!(self.peek().r#type, Equal) {
			return Ok(expression);
		}

		let equals = self.advance();
		let value = self.assignment()?;
		match *expression {
			Expression::Variable(target) if target.r#type == Identifier => Ok(Expression::assign(target, value)),
			other => {
				// Reported without unwinding: the parser is not confused.
				self.diagnostics.error(ParseError::new(&equals, ParseErrorType::InvalidAssignmentTarget));
				Ok(Box::new(other))
			}
		}
	}

	fn or(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.and()?;
		while matches!(self.peek().r#type, Or) {
			expression = Expression::logical(expression, self.advance(), self.and()?)
		}
		Ok(expression)
	}

	fn and(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.pipe()?;
		while matches!(self.peek().r#type, And) {
			expression = Expression::logical(expression, self.advance(), self.pipe()?)
		}
		Ok(expression)
	}

	/// Parse pipe expressions, binding tighter than `and` and looser than
	/// equality.
	fn pipe(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.equality()?;
		while matches!(self.peek().r#type, PipeGreater) {
			expression = Expression::pipe(expression, self.advance(), self.equality()?)
		}
		Ok(expression)
	}

	/// Parse equality expressions.
	fn equality(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.comparison()?;
		while matches!(self.peek().r#type, BangEqual | EqualEqual) {
			expression = Expression::binary(expression, self.advance(), self.comparison()?)
		}
		Ok(expression)
	}

	/// Parse comparison expressions.
	fn comparison(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.term()?;
		while matches!(self.peek().r#type, Greater | GreaterEqual | Less | LessEqual) {
			expression = Expression::binary(expression, self.advance(), self.term()?)
		}
		Ok(expression)
	}

	/// Parse term expressions.
	fn term(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.factor()?;
		while matches!(self.peek().r#type, Minus | Plus) {
			expression = Expression::binary(expression, self.advance(), self.factor()?)
		}
		Ok(expression)
	}

	/// Parse factor expressions.
	fn factor(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.unary()?;
		while matches!(self.peek().r#type, Slash | Star) {
			expression = Expression::binary(expression, self.advance(), self.unary()?)
		}
		Ok(expression)
	}

	/// Parse unary expressions.
	fn unary(&mut self) -> Result<Box<Expression>, ParserError> {
		if matches!(self.peek().r#type, Bang | Minus) {
			return Ok(Expression::unary(self.advance(), ensure_sufficient_stack(|| self.unary())?));
		}
		self.call()
	}

	fn call(&mut self) -> Result<Box<Expression>, ParserError> {
		let mut expression = self.primary()?;
		while self.match_token(&LeftParen) {
			expression = self.finish_call(expression)?;
		}
		Ok(expression)
	}

	fn finish_call(&mut self, callee: Box<Expression>) -> Result<Box<Expression>, ParserError> {
		let mut arguments = Vec::new();
		if !self.check(&RightParen) {
			loop {
				if arguments.len() >= MAX_ARITY {
					let error = ParseError::new(self.peek(), ParseErrorType::TooManyArguments(MAX_ARITY));
					self.diagnostics.error(error);
				}
				arguments.push(*self.expression()?);
				if !self.match_token(&Comma) {
					break;
				}
			}
		}
		let paren = self.consume(&RightParen, "Expect ')' after arguments.")?;
		Ok(Expression::call(callee, paren, arguments))
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> Result<Box<Expression>, ParserError> {
		match self.peek().r#type {
			False | True | Nil | NumberLiteral(_) | StringLiteral(_) | Identifier | Dollar => {
				let token = self.advance();
				Ok(Box::new(token.try_into()?))
			}
			LeftParen => {
				self.advance(); // consume '('
				let expr = self.expression()?;
				self.consume(&RightParen, "Expect ')' after expression.")?;
				Ok(Expression::grouping(expr))
			}
			Fun => {
				self.advance();
				let name = if self.check(&Identifier) { Some(self.advance()) } else { None };
				let (parameters, body) = self.function(if name.is_some() { "function name" } else { "'fun'" })?;
				Ok(Box::new(Expression::AnonymousFunction { name, parameters, body }))
			}
			_ => Err(ParseError::new(self.peek(), ParseErrorType::ExpectedExpression).into()),
		}
	}

	fn consume(&mut self, r#type: &TokenType, message: &str) -> Result<Token, ParserError> {
		if self.check(r#type) {
			return Ok(self.advance());
		}
		Err(ParseError::new(self.peek(), ParseErrorType::Expected(message.to_string())).into())
	}

	fn match_token(&mut self, r#type: &TokenType) -> bool {
		if self.check(r#type) {
			self.advance();
			return true;
		}
		false
	}

	fn check(&self, r#type: &TokenType) -> bool { !self.is_at_end() && &self.peek().r#type == r#type }

	fn check_next(&self, r#type: &TokenType) -> bool {
		self.tokens.get(self.current + 1).is_some_and(|token| &token.r#type == r#type)
	}

	/// Consume the current token and return it. At the end, keeps returning
	/// `Eof`.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if !self.is_at_end() {
			self.current += 1;
		}
		token
	}

	fn is_at_end(&self) -> bool { self.peek().r#type == Eof }

	fn peek(&self) -> &Token { &self.tokens[self.current] }

	fn previous(&self) -> Option<&Token> { self.current.checked_sub(1).and_then(|index| self.tokens.get(index)) }

	/// Discard tokens until the start of the next statement.
	fn synchronize(&mut self) {
		self.advance();
		while !self.is_at_end() {
			if self.previous().is_some_and(|token| token.r#type == Semicolon) || self.peek().r#type.starts_statement() {
				return;
			}
			self.advance();
		}
	}
}
