use std::fmt::Display;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
	pub r#type: TokenType,
	pub lexeme: &'a str,
	/// 1-based line of the first character.
	pub line:   usize,
	/// 1-based column of the first character.
	pub column: usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType, lexeme: &'a str, line: usize, column: usize) -> Self {
		Self { r#type, lexeme, line, column }
	}
}

impl Display for Token<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:<12} | {:<8} | Line {:>2}, Col {:>2}", self.r#type.to_string(), self.lexeme, self.line, self.column)
	}
}

/// The closed set of token kinds, The copying is lightweight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// Number literal, e.g. `42` or `3.14`.
	Number,
	/// Identifier, e.g. a variable name.
	Identifier,
	/// `int` keyword.
	Int,
	/// `float` keyword.
	Float,
	/// `if` keyword.
	If,
	/// `else` keyword.
	Else,
	/// `while` keyword.
	While,
	/// `print` keyword.
	Print,
	/// Plus `+`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Star,
	/// Slash `/`.
	Slash,
	/// Assignment `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Bang equal `!=`.
	BangEqual,
	/// Less than `<`.
	Less,
	/// Greater than `>`.
	Greater,
	/// Logical and `&&`.
	AndAnd,
	/// Logical or `||`.
	OrOr,
	/// Semicolon `;`.
	Semicolon,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// End of file/input.
	Eof,
	/// A character the language has no use for.
	Unknown,
}

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"int" => TokenType::Int,
			"float" => TokenType::Float,
			"if" => TokenType::If,
			"else" => TokenType::Else,
			"while" => TokenType::While,
			"print" => TokenType::Print,
			_ => TokenType::Identifier,
		}
	}
}

impl Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use TokenType::*;
		let name = match self {
			Number => "NUMBER",
			Identifier => "IDENTIFIER",
			Int => "INT",
			Float => "FLOAT",
			If => "IF",
			Else => "ELSE",
			While => "WHILE",
			Print => "PRINT",
			Plus => "PLUS",
			Minus => "MINUS",
			Star => "MULTIPLY",
			Slash => "DIVIDE",
			Equal => "ASSIGN",
			EqualEqual => "EQUAL",
			BangEqual => "NOT_EQUAL",
			Less => "LESS_THAN",
			Greater => "GREATER_THAN",
			AndAnd => "AND",
			OrOr => "OR",
			Semicolon => "SEMICOLON",
			LeftParen => "LEFT_PAREN",
			RightParen => "RIGHT_PAREN",
			LeftBrace => "LEFT_BRACE",
			RightBrace => "RIGHT_BRACE",
			Eof => "EOF",
			Unknown => "UNKNOWN",
		};
		write!(f, "{name}")
	}
}
