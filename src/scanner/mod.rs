//! Represents a lexical token in the Lox language.
//!
//! Keywords are part of the shape of the language’s grammar, so the parser
//! often has code like, “If the next token is `while` then do . . . ” That
//! means the parser wants to know not just that it has a lexeme for some
//! identifier, but that it has a reserved word, and which keyword it is.
//!
//! The parser could categorize tokens from the raw lexeme by comparing the
//! strings, but that’s slow and kind of ugly. Instead, at the point that we
//! recognize a lexeme, we also remember which kind of lexeme it represents. We
//! have a different type for each keyword, operator, bit of punctuation, and
//! literal type.
//!
//! There are lexemes for literal values—numbers and strings and the like. Since
//! the scanner has to walk each character in the literal to correctly identify
//! it, it can also convert that textual representation of a value to the living
//! runtime object that will be used by the interpreter later.
//!
//! The rules that determine how a particular language groups characters into
//! lexemes are called its `Lexical grammar`.
//!
//! We can’t easily detect a `reserved word` until we’ve reached the end of what
//! might instead be an identifier, this is `maximal munch`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
use anyhow::Context;
pub use token::*;

use crate::{LoxError, ScanError, ScanErrorType, ScannerError, diagnostics::Diagnostics};

/// A scanner for Lox source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points at the character currently being considered
	cursor:      usize,
	/// Tracks what source line `current` is on so we can produce tokens that know
	/// their location.
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code. Every scan error is reported and
	/// scanning goes on, so one pass finds all of them.
	pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Result<Vec<Token>, LoxError> {
		let mut tokens = Vec::new();
		let mut error_count = 0;
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			match self.scan_token(&mut tokens) {
				Err(ScannerError::ScanError(e)) => {
					diagnostics.error(e);
					error_count += 1;
				}
				Err(ScannerError::InternalError(e)) => {
					return Err(e.into());
				}
				Ok(_) => {}
			}
		}
		if error_count != 0 {
			return Err(LoxError::ScannerErrors(error_count));
		}
		tokens.push(Token::new(Eof, "", self.line));
		tracing::trace!(count = tokens.len(), "scanned tokens");
		Ok(tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected EOF")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			',' => Comma,
			'.' => Dot,
			'-' => Minus,
			'+' => Plus,
			';' => Semicolon,
			'*' => Star,
			'$' => Dollar,
			'!' => if self.match_next('=') { BangEqual } else { Bang },
			'=' => if self.match_next('=') { EqualEqual } else { Equal },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'|' => if self.match_next('>') { PipeGreater } else {
				return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter('|')).into())
			},
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				Comment
			} else if self.match_next('*') {
				self.block_comment()?
			} else { Slash },
			' ' | '\r' | '\t' => EmptyChar,
			'\n' => { self.line += 1; NewLine }
			'"' => self.string()?,
			c if c.is_ascii_digit() => self.number()?,
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			_ => return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter(next_char)).into()),
		};

		if !r#type.is_ignored() {
			let lexeme = &self.source[self.start..self.cursor];
			tokens.push(Token::new(r#type, lexeme, self.line));
		}

		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Skip a `/* ... */` comment, the opening `/*` already consumed.
	fn block_comment(&mut self) -> Result<TokenType, ScannerError> {
		while let Some(c) = self.peek() {
			if c == '*' && self.peek_second().is_some_and(|c| c == '/') {
				self.advance(); // consume '*'
				self.advance(); // consume '/'
				return Ok(Comment);
			}
			if c == '\n' {
				self.line += 1;
			}
			self.advance();
		}
		Err(ScanError::new(self.line, ScanErrorType::UnterminatedBlockComment).into())
	}

	/// Scan a string literal
	fn string(&mut self) -> Result<TokenType, ScannerError> {
		while let Some(c) = self.peek() {
			if c == '"' {
				break;
			}
			if c == '\n' {
				self.line += 1
			}
			self.advance();
		}

		self.peek().ok_or_else(|| ScanError::new(self.line, ScanErrorType::UnterminatedString))?;
		self.advance(); // The closing "
		let value = &self.source[self.start + 1..self.cursor - 1];
		Ok(StringLiteral(value.to_string()))
	}

	/// Scan a number literal
	fn number(&mut self) -> Result<TokenType, ScannerError> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// Look for a fractional part.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
		}

		let s = &self.source[self.start..self.cursor];
		Ok(NumberLiteral(s.parse().context("Failed to parse number literal")?))
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::PI;

	use pretty_assertions::assert_eq;

	use super::*;

	fn scan(input: &str, ok: bool) {
		let mut diagnostics = Diagnostics::new();
		let result = Scanner::new(input).scan_tokens(&mut diagnostics);
		assert!(result.is_ok() == ok, "{input:?}");
		assert_eq!(diagnostics.had_error(), !ok);
	}

	fn types(input: &str) -> Vec<TokenType> {
		let mut diagnostics = Diagnostics::new();
		Scanner::new(input).scan_tokens(&mut diagnostics).unwrap().into_iter().map(|t| t.r#type).collect()
	}

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("(){}", true);
		scan(" ( ) ", true);
		scan("@", false);
		scan("你好", false);
		scan(r#""世界""#, true);
		scan("12345", true);
		scan(
			r#""/* Block
        注释📻
        */""#,
			true,
		);
		scan(r#"// Comment"#, true);
		scan("/* Unterminated comment ", false);
		scan("user", true);
		scan("return", true);
	}

	#[test]
	fn scan_operators() {
		for op in ["!", "!=", "=", "==", "<", "<=", ">", ">=", "-", "+", "*", "/", ";", ",", ".", "|>", "$"] {
			scan(op, true);
		}
		scan("|", false);
		scan("a | b", false);
	}

	#[test]
	fn scan_pipe_expression() {
		assert_eq!(types("x |> f($)"), vec![
			Identifier,
			PipeGreater,
			Identifier,
			LeftParen,
			Dollar,
			RightParen,
			Eof
		]);
		// `|>` binds as one token even without surrounding spaces.
		assert_eq!(types("1|>$"), vec![NumberLiteral(1.0), PipeGreater, Dollar, Eof]);
	}

	#[test]
	fn scan_numbers() {
		for number in ["0", "42", "3.14", "0.5", "123.456", "1.", ".5"] {
			scan(number, true);
		}
		assert_eq!(types("1."), vec![NumberLiteral(1.0), Dot, Eof]);
	}

	#[test]
	fn scan_strings() {
		scan(r#""""#, true);
		scan(r#""hello world""#, true);
		scan(r#""escaped\n\"quote\"""#, false);
		scan(r#""unterminated string"#, false);
	}

	#[test]
	fn scan_keywords() {
		assert_eq!(types("and break class continue else false for fun if nil or print return super this true var while"), vec![
			And, Break, Class, Continue, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True, Var, While, Eof
		]);
		assert_eq!(types("and123 breaker"), vec![Identifier, Identifier, Eof]);
	}

	#[test]
	fn scan_comments() {
		scan("// comment with ()[]{}", true);
		scan("/* multi\nline\ncomment */", true);
		scan("/** nested ** comment **/", true);
		scan("/* unterminated", false);
		assert_eq!(types("1 /* two */ 3 // four"), vec![NumberLiteral(1.0), NumberLiteral(3.0), Eof]);
	}

	#[test]
	fn scan_reports_every_error() {
		let mut diagnostics = Diagnostics::new();
		let result = Scanner::new("@ # ok").scan_tokens(&mut diagnostics);
		assert!(matches!(result, Err(LoxError::ScannerErrors(2))));
		assert_eq!(diagnostics.error_count(), 2);
	}

	#[test]
	fn scan_tracks_lines() {
		let mut diagnostics = Diagnostics::new();
		let tokens = Scanner::new("a\n/* x\ny */ b\n\"s\nt\" c").scan_tokens(&mut diagnostics).unwrap();
		let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
		assert_eq!(lines, vec![1, 3, 5, 5, 5]);
	}

	#[test]
	fn scan_string_with_newlines() {
		assert_eq!(types("\"hello\nworld\"")[0], StringLiteral("hello\nworld".to_string()));
	}

	#[test]
	fn scan_number_precision() {
		assert_eq!(types("3.14159265358979323846264338327950288")[0], NumberLiteral(PI));
	}
}
