use crate::scanner::Token;

/// A syntax diagnostic, rendered as `Line L, Col C: message. Found 'lexeme'`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Line {line}, Col {column}: {type}. Found '{found}'")]
pub struct ParseError {
	pub line:   usize,
	pub column: usize,
	pub r#type: ParseErrorType,
	/// The offending lexeme, empty at end of input.
	pub found:  String,
}

impl ParseError {
	pub fn new(token: &Token<'_>, r#type: ParseErrorType) -> Self {
		Self { line: token.line, column: token.column, r#type, found: token.lexeme.to_string() }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	/// A specific token was required, e.g. `';' after declaration`.
	Expected(&'static str),
	/// `int` or `float` not followed by a name.
	ExpectedIdentifier(&'static str),
	/// No statement starts with this token.
	UnexpectedToken,
	/// Not a number, identifier or `(` where an operand belongs.
	ExpectedExpression,
	/// A number lexeme that does not convert to a value.
	InvalidNumber,
	/// Parenthesised nesting deeper than the configured ceiling.
	ExcessiveNesting(usize),
	/// `{` block nesting deeper than the configured ceiling.
	ExcessiveBlockNesting(usize),
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			Expected(what) => {
				write!(f, "Expected {what}")
			}
			ExpectedIdentifier(keyword) => {
				write!(f, "Expected identifier after '{keyword}'")
			}
			UnexpectedToken => {
				write!(f, "Unexpected token")
			}
			ExpectedExpression => {
				write!(f, "Expected number, identifier, or '('")
			}
			InvalidNumber => {
				write!(f, "Invalid number")
			}
			ExcessiveNesting(limit) => {
				write!(f, "Expression nested deeper than {limit} levels")
			}
			ExcessiveBlockNesting(limit) => {
				write!(f, "Blocks nested deeper than {limit} levels")
			}
		}
	}
}
