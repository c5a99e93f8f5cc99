//! Turns raw source text into tokens.
//!
//! Keywords are part of the shape of the language’s grammar, so the parser
//! often has code like, “If the next token is `while` then do . . . ” That
//! means the parser wants to know not just that it has a lexeme for some
//! identifier, but that it has a reserved word, and which keyword it is. At
//! the point that we recognize a lexeme, we also remember which kind of lexeme
//! it represents.
//!
//! We can’t easily detect a `reserved word` until we’ve reached the end of what
//! might instead be an identifier, this is `maximal munch`.
//!
//! Scanning never fails. A character the language has no use for becomes a
//! single-character [`TokenType::Unknown`] token and the parser reports it
//! when it gets there.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
pub use token::*;
use tracing::debug;

/// A scanner for source code
pub struct Scanner<'a> {
	/// User input source code
	source:       &'a str,
	/// User input source code iterator
	source_iter:  Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:        usize,
	/// Points at the character currently being considered
	cursor:       usize,
	/// Line `cursor` is on
	line:         usize,
	/// Column `cursor` is on
	column:       usize,
	/// Position of the beginning of the current lexeme
	start_line:   usize,
	start_column: usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1, column: 1, start_line: 1, start_column: 1 }
	}

	/// Scan all tokens from the source code, always terminated by exactly one
	/// `Eof` token.
	pub fn scan_tokens(mut self) -> Vec<Token<'a>> {
		let mut tokens = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			self.start_line = self.line;
			self.start_column = self.column;
			self.scan_token(&mut tokens);
		}
		tokens.push(Token::new(Eof, "", self.line, self.column));
		tokens
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token<'a>>) {
		let Some(next_char) = self.advance() else { return };
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			';' => Semicolon,
			'+' => Plus,
			'-' => Minus,
			'*' => Star,
			'<' => Less,
			'>' => Greater,
			'=' => if self.match_next('=') { EqualEqual } else { Equal },
			'!' => if self.match_next('=') { BangEqual } else { Unknown },
			'&' => if self.match_next('&') { AndAnd } else { Unknown },
			'|' => if self.match_next('|') { OrOr } else { Unknown },
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				return;
			} else { Slash },
			c if c.is_whitespace() => return,
			c if c.is_ascii_digit() => self.number(),
			c if c.is_alphabetic() || c == '_' => self.identifier(),
			_ => Unknown,
		};

		let lexeme = &self.source[self.start..self.cursor];
		if r#type == Unknown {
			debug!(line = self.start_line, column = self.start_column, lexeme, "unrecognized character");
		}
		tokens.push(Token::new(r#type, lexeme, self.start_line, self.start_column));
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character, keeping line and column in step
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Scan a number literal: digits with at most one embedded decimal point
	fn number(&mut self) -> TokenType {
		let mut seen_dot = false;
		while let Some(c) = self.peek() {
			if c == '.' && !seen_dot {
				seen_dot = true;
			} else if !c.is_ascii_digit() {
				break;
			}
			self.advance();
		}
		Number
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}

/// Scan `source` into tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> { Scanner::new(source).scan_tokens() }
