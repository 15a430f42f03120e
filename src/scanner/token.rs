use std::fmt::Display;

/// A token produced by the scanner. Tokens own their lexeme, so syntax trees
/// and the functions built from them can outlive the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub r#type: TokenType,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line }
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} {} (line {})", self.r#type, self.lexeme, self.line)
	}
}

/// The different types of tokens in Lox. Literal tokens carry their value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
	/// New Line Character `\n`.
	NewLine,
	/// Empty Character: ` `, `\r`, `\t`.
	EmptyChar,
	/// Comment `//` or /* ... */
	Comment,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Dot `.`.
	Dot,
	/// Minus `-`.
	Minus,
	/// Plus `+`.
	Plus,
	/// Semicolon `;`.
	Semicolon,
	/// Slash `/`.
	Slash,
	/// Asterisk `*`.
	Star,
	/// Bang `!`.
	Bang,
	/// Bang equal `!=`.
	BangEqual,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Pipe operator `|>`.
	PipeGreater,
	/// Pipe placeholder `$`.
	Dollar,
	/// Identifier, e.g. variable or function name.
	Identifier,
	/// String literal, e.g. `"hello"`, without the quotes.
	StringLiteral(String),
	/// Number literal, e.g. `123.45`.
	NumberLiteral(f64),
	/// Logical AND keyword.
	And,
	/// Break keyword.
	Break,
	/// Class keyword, reserved.
	Class,
	/// Continue keyword.
	Continue,
	/// Else keyword.
	Else,
	/// Boolean literal `false`.
	False,
	/// Function keyword.
	Fun,
	/// For loop keyword.
	For,
	/// If statement keyword.
	If,
	/// Nil literal (null equivalent).
	Nil,
	/// Logical OR keyword.
	Or,
	/// Print statement keyword.
	Print,
	/// Return statement keyword.
	Return,
	/// Super keyword, reserved.
	Super,
	/// This keyword, reserved.
	This,
	/// Boolean literal `true`.
	True,
	/// Variable declaration keyword.
	Var,
	/// While loop keyword.
	While,
	/// End of file/input.
	Eof,
}

impl TokenType {
	pub fn is_ignored(&self) -> bool {
		matches!(self, TokenType::EmptyChar | TokenType::NewLine | TokenType::Comment)
	}

	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"and" => TokenType::And,
			"break" => TokenType::Break,
			"class" => TokenType::Class,
			"continue" => TokenType::Continue,
			"else" => TokenType::Else,
			"false" => TokenType::False,
			"for" => TokenType::For,
			"fun" => TokenType::Fun,
			"if" => TokenType::If,
			"nil" => TokenType::Nil,
			"or" => TokenType::Or,
			"print" => TokenType::Print,
			"return" => TokenType::Return,
			"super" => TokenType::Super,
			"this" => TokenType::This,
			"true" => TokenType::True,
			"var" => TokenType::Var,
			"while" => TokenType::While,
			_ => TokenType::Identifier,
		}
	}

	/// Keywords that begin a statement, used by the parser to resynchronize
	/// after a syntax error.
	pub fn starts_statement(&self) -> bool {
		use TokenType::*;
		matches!(self, Class | Fun | Var | For | If | While | Print | Return)
	}
}
