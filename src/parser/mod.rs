//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Statement`s and `Expression`s
//!
//! |Name|Operators|Associates
//! --|--|--
//! LogicalOr|\|\||Left
//! LogicalAnd|&&|Left
//! Comparison|== != < >|Left
//! Term|+ -|Left
//! Factor|* /|Left
//!
//! Grammar:
//!
//! ``` BNF
//! program     → statement* EOF ;
//! statement   → declaration | assignment | print | ifStmt | whileStmt ;
//! declaration → ( "int" | "float" ) IDENTIFIER ";" ;
//! assignment  → IDENTIFIER "=" expression ";" ;
//! print       → "print" "(" expression ")" ";" ;
//! ifStmt      → "if" "(" expression ")" block ( "else" block )? ;
//! whileStmt   → "while" "(" expression ")" block ;
//! block       → "{" statement* "}" ;
//! expression  → logicalOr ;
//! logicalOr   → logicalAnd ( "||" logicalAnd )* ;
//! logicalAnd  → comparison ( "&&" comparison )* ;
//! comparison  → term ( ( "==" | "!=" | "<" | ">" ) term )* ;
//! term        → factor ( ( "+" | "-" ) factor )* ;
//! factor      → primary ( ( "*" | "/" ) primary )* ;
//! primary     → NUMBER | IDENTIFIER | "(" expression ")" ;
//! ```
//!
//! The parser never gives up. A missing token is reported and skipped over, a
//! statement that starts with a token no statement can start with is reported
//! and discarded up to the next `;`. The result is always a best-effort
//! [`Program`] plus the list of diagnostics.

pub mod expression;

use TokenType::*;
use expression::{BinaryOperator, Expression};
use tracing::debug;

use crate::{error::parser::{ParseError, ParseErrorType}, scanner::{Token, TokenType}, statement::{DataType, Program, Statement}};

/// Default ceiling for parenthesised expression nesting and for block
/// nesting.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Recursive-descent parser with one token of lookahead.
pub struct Parser<'a> {
	/// The tokens to parse.
	tokens:    &'a [Token<'a>],
	/// Index of the token under consideration.
	current:   usize,
	/// Stands in for a missing trailing `Eof` token.
	eof:       Token<'a>,
	max_depth:   usize,
	/// Number of blocks currently open.
	block_depth: usize,
	errors:      Vec<ParseError>,
}

impl<'a> Parser<'a> {
	pub fn new(tokens: &'a [Token<'a>]) -> Self {
		let eof = match tokens.last() {
			Some(last) if last.r#type == Eof => last.clone(),
			Some(last) => Token::new(Eof, "", last.line, last.column + last.lexeme.chars().count()),
			None => Token::new(Eof, "", 1, 1),
		};
		Self { tokens, current: 0, eof, max_depth: DEFAULT_MAX_DEPTH, block_depth: 0, errors: Vec::new() }
	}

	/// Set how deeply parenthesised expressions, and blocks, may nest.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Parse the whole token sequence.
	pub fn parse(mut self) -> (Program, Vec<ParseError>) {
		let mut statements = Vec::new();
		while !self.check(Eof) {
			if let Some(statement) = self.statement() {
				statements.push(statement);
			}
		}
		(Program::new(statements), self.errors)
	}

	fn statement(&mut self) -> Option<Statement> {
		match self.peek().r#type {
			Int => self.declaration(DataType::Int),
			Float => self.declaration(DataType::Float),
			Identifier => Some(self.assignment()),
			Print => Some(self.print_statement()),
			If => Some(self.if_statement()),
			While => Some(self.while_statement()),
			_ => {
				self.report(ParseErrorType::UnexpectedToken);
				// A stray `;` is dropped on its own.
				if self.advance().r#type != Semicolon {
					self.synchronize();
				}
				None
			}
		}
	}

	fn declaration(&mut self, data_type: DataType) -> Option<Statement> {
		self.advance(); // consume type keyword
		if !self.check(Identifier) {
			let keyword = match data_type {
				DataType::Int => "int",
				DataType::Float => "float",
			};
			self.report(ParseErrorType::ExpectedIdentifier(keyword));
			self.synchronize();
			return None;
		}
		let name = self.advance().lexeme.to_string();
		self.expect(Semicolon, "';' after declaration");
		Some(Statement::Declaration { name, data_type })
	}

	fn assignment(&mut self) -> Statement {
		let name = self.advance().lexeme.to_string();
		self.expect(Equal, "'='");
		let value = self.expression(0);
		self.expect(Semicolon, "';' after assignment");
		Statement::Assignment { name, value }
	}

	fn print_statement(&mut self) -> Statement {
		self.advance(); // consume 'print'
		self.expect(LeftParen, "'(' after 'print'");
		let value = self.expression(0);
		self.expect(RightParen, "')' after expression");
		self.expect(Semicolon, "';' after print");
		Statement::Print(value)
	}

	fn if_statement(&mut self) -> Statement {
		self.advance(); // consume 'if'
		self.expect(LeftParen, "'(' after 'if'");
		let condition = self.expression(0);
		self.expect(RightParen, "')' after condition");
		let then_block = self.block();
		let else_block = if self.match_next(Else) { self.block() } else { Vec::new() };
		Statement::If { condition, then_block, else_block }
	}

	fn while_statement(&mut self) -> Statement {
		self.advance(); // consume 'while'
		self.expect(LeftParen, "'(' after 'while'");
		let condition = self.expression(0);
		self.expect(RightParen, "')' after condition");
		let body = self.block();
		Statement::While { condition, body }
	}

	fn block(&mut self) -> Vec<Statement> {
		let mut statements = Vec::new();
		self.expect(LeftBrace, "'{'");
		if self.block_depth >= self.max_depth {
			self.report(ParseErrorType::ExcessiveBlockNesting(self.max_depth));
			self.skip_nested_block();
			self.expect(RightBrace, "'}'");
			return statements;
		}
		self.block_depth += 1;
		while !self.check(RightBrace) && !self.check(Eof) {
			if let Some(statement) = self.statement() {
				statements.push(statement);
			}
		}
		self.block_depth -= 1;
		self.expect(RightBrace, "'}'");
		statements
	}

	/// Parse an expression nested `depth` parentheses deep.
	fn expression(&mut self, depth: usize) -> Expression {
		if depth > self.max_depth {
			self.report(ParseErrorType::ExcessiveNesting(self.max_depth));
			self.skip_nested_group();
			return Expression::Number(0.0);
		}
		self.logical_or(depth)
	}

	fn logical_or(&mut self, depth: usize) -> Expression {
		let mut expression = self.logical_and(depth);
		while let Some(operator) = self.match_operator(&[OrOr]) {
			expression = Expression::binary(expression, operator, self.logical_and(depth));
		}
		expression
	}

	fn logical_and(&mut self, depth: usize) -> Expression {
		let mut expression = self.comparison(depth);
		while let Some(operator) = self.match_operator(&[AndAnd]) {
			expression = Expression::binary(expression, operator, self.comparison(depth));
		}
		expression
	}

	fn comparison(&mut self, depth: usize) -> Expression {
		let mut expression = self.term(depth);
		while let Some(operator) = self.match_operator(&[EqualEqual, BangEqual, Less, Greater]) {
			expression = Expression::binary(expression, operator, self.term(depth));
		}
		expression
	}

	fn term(&mut self, depth: usize) -> Expression {
		let mut expression = self.factor(depth);
		while let Some(operator) = self.match_operator(&[Plus, Minus]) {
			expression = Expression::binary(expression, operator, self.factor(depth));
		}
		expression
	}

	fn factor(&mut self, depth: usize) -> Expression {
		let mut expression = self.primary(depth);
		while let Some(operator) = self.match_operator(&[Star, Slash]) {
			expression = Expression::binary(expression, operator, self.primary(depth));
		}
		expression
	}

	fn primary(&mut self, depth: usize) -> Expression {
		match self.peek().r#type {
			Number => {
				let lexeme = self.peek().lexeme;
				match lexeme.parse::<f64>() {
					Ok(value) => {
						self.advance();
						Expression::Number(value)
					}
					Err(_) => {
						self.report(ParseErrorType::InvalidNumber);
						self.advance();
						Expression::Number(0.0)
					}
				}
			}
			Identifier => Expression::Identifier(self.advance().lexeme.to_string()),
			LeftParen => {
				self.advance(); // consume '('
				let expression = self.expression(depth + 1);
				self.expect(RightParen, "')'");
				expression
			}
			_ => {
				self.report(ParseErrorType::ExpectedExpression);
				if !self.at_recovery_point() {
					self.advance();
				}
				Expression::Number(0.0)
			}
		}
	}

	/// Consume the next token if it is one of `types` and is a binary operator.
	fn match_operator(&mut self, types: &[TokenType]) -> Option<BinaryOperator> {
		let r#type = self.peek().r#type;
		if !types.contains(&r#type) {
			return None;
		}
		self.advance();
		BinaryOperator::from_token(r#type)
	}

	/// Consume the expected token, or report it missing. A token that can
	/// anchor recovery (`;`, braces, `)`, end of input) is left in place.
	fn expect(&mut self, r#type: TokenType, what: &'static str) -> bool {
		if self.match_next(r#type) {
			return true;
		}
		self.report(ParseErrorType::Expected(what));
		if !self.at_recovery_point() {
			self.advance();
		}
		false
	}

	fn match_next(&mut self, r#type: TokenType) -> bool {
		if self.check(r#type) {
			self.advance();
			true
		} else {
			false
		}
	}

	fn check(&self, r#type: TokenType) -> bool { self.peek().r#type == r#type }

	fn at_recovery_point(&self) -> bool {
		matches!(self.peek().r#type, Semicolon | LeftBrace | RightBrace | RightParen | Eof)
	}

	/// Advance to the next token. Never moves past `Eof`.
	fn advance(&mut self) -> Token<'a> {
		let token = self.peek().clone();
		if self.current < self.tokens.len() && token.r#type != Eof {
			self.current += 1;
		}
		token
	}

	/// Peek at the current token.
	fn peek(&self) -> &Token<'a> { self.tokens.get(self.current).unwrap_or(&self.eof) }

	fn report(&mut self, r#type: ParseErrorType) {
		let error = ParseError::new(self.peek(), r#type);
		debug!(%error, "syntax error");
		self.errors.push(error);
	}

	/// Discard everything up to and including the next `;`. Stops before a
	/// `}` so an enclosing block can still close.
	fn synchronize(&mut self) {
		while !matches!(self.peek().r#type, Semicolon | RightBrace | Eof) {
			self.advance();
		}
		self.match_next(Semicolon);
	}

	/// Skip the body of a too-deeply nested block, leaving its closing `}`.
	fn skip_nested_block(&mut self) {
		let mut open = 0usize;
		loop {
			match self.peek().r#type {
				Eof => break,
				LeftBrace => open += 1,
				RightBrace if open == 0 => break,
				RightBrace => open -= 1,
				_ => {}
			}
			self.advance();
		}
	}

	/// Skip the rest of a too-deeply nested group, leaving its closing `)`.
	fn skip_nested_group(&mut self) {
		let mut open = 0usize;
		loop {
			match self.peek().r#type {
				Eof | Semicolon | LeftBrace | RightBrace => break,
				LeftParen => open += 1,
				RightParen if open == 0 => break,
				RightParen => open -= 1,
				_ => {}
			}
			self.advance();
		}
	}
}

/// Parse `tokens` with the default nesting ceilings.
pub fn parse(tokens: &[Token<'_>]) -> (Program, Vec<ParseError>) { Parser::new(tokens).parse() }
