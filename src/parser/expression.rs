//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `(x + 1) * 2`
//! as nested nodes. Every node is owned by its parent, trees are never shared.

use std::fmt::Display;

use crate::scanner::TokenType;

/// Tolerance used when comparing numbers for (in)equality.
pub const EQUALITY_EPSILON: f64 = 1e-6;

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Number(f64),
	Identifier(String),
	Binary { left: Box<Expression>, operator: BinaryOperator, right: Box<Expression> },
}

impl Expression {
	pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
		Expression::Binary { left: Box::new(left), operator, right: Box::new(right) }
	}

	pub fn identifier(name: impl Into<String>) -> Self { Expression::Identifier(name.into()) }

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Expression::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Write the node as an indented tree, two spaces per level.
	pub(crate) fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, level: usize) -> std::fmt::Result {
		let indent = "  ".repeat(level);
		match self {
			Expression::Number(n) => writeln!(f, "{indent}Number: {n}"),
			Expression::Identifier(name) => writeln!(f, "{indent}Identifier: {name}"),
			Expression::Binary { left, operator, right } => {
				writeln!(f, "{indent}BinaryOp: {operator}")?;
				writeln!(f, "{indent}  Left:")?;
				left.fmt_tree(f, level + 2)?;
				writeln!(f, "{indent}  Right:")?;
				right.fmt_tree(f, level + 2)
			}
		}
	}
}

/// Prefix form, e.g. `(+ 2 (* x 3))`.
impl Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Expression::Number(n) => write!(f, "{n}"),
			Expression::Identifier(name) => write!(f, "{name}"),
			Expression::Binary { left, operator, right } => write!(f, "({operator} {left} {right})"),
		}
	}
}

/// Binary operators, all left associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Equal,
	NotEqual,
	Less,
	Greater,
	And,
	Or,
}

impl BinaryOperator {
	pub fn from_token(r#type: TokenType) -> Option<Self> {
		use BinaryOperator::*;
		Some(match r#type {
			TokenType::Plus => Add,
			TokenType::Minus => Subtract,
			TokenType::Star => Multiply,
			TokenType::Slash => Divide,
			TokenType::EqualEqual => Equal,
			TokenType::BangEqual => NotEqual,
			TokenType::Less => Less,
			TokenType::Greater => Greater,
			TokenType::AndAnd => And,
			TokenType::OrOr => Or,
			_ => return None,
		})
	}

	pub fn symbol(self) -> &'static str {
		use BinaryOperator::*;
		match self {
			Add => "+",
			Subtract => "-",
			Multiply => "*",
			Divide => "/",
			Equal => "==",
			NotEqual => "!=",
			Less => "<",
			Greater => ">",
			And => "&&",
			Or => "||",
		}
	}

	/// Numeric semantics shared by evaluation, folding and the VM.
	///
	/// Comparisons and logical operators produce `1.0` or `0.0`, any non-zero
	/// operand counts as true, and division by zero yields `0.0`.
	pub fn apply(self, left: f64, right: f64) -> f64 {
		use BinaryOperator::*;
		let truth = |b: bool| if b { 1.0 } else { 0.0 };
		match self {
			Add => left + right,
			Subtract => left - right,
			Multiply => left * right,
			Divide => {
				if right == 0.0 {
					0.0
				} else {
					left / right
				}
			}
			Equal => truth((left - right).abs() < EQUALITY_EPSILON),
			NotEqual => truth((left - right).abs() >= EQUALITY_EPSILON),
			Less => truth(left < right),
			Greater => truth(left > right),
			And => truth(left != 0.0 && right != 0.0),
			Or => truth(left != 0.0 || right != 0.0),
		}
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.symbol()) }
}

#[cfg(test)]
mod tests {
	use super::{BinaryOperator::*, *};

	#[test]
	fn apply_arithmetic() {
		assert_eq!(Add.apply(2.0, 3.0), 5.0);
		assert_eq!(Subtract.apply(2.0, 3.0), -1.0);
		assert_eq!(Multiply.apply(2.5, 4.0), 10.0);
		assert_eq!(Divide.apply(7.0, 2.0), 3.5);
	}

	#[test]
	fn apply_division_by_zero_is_zero() {
		assert_eq!(Divide.apply(5.0, 0.0), 0.0);
		assert_eq!(Divide.apply(0.0, 0.0), 0.0);
	}

	#[test]
	fn apply_comparisons_and_logic() {
		assert_eq!(Equal.apply(0.1 + 0.2, 0.3), 1.0);
		assert_eq!(NotEqual.apply(1.0, 1.0000001), 0.0);
		assert_eq!(Less.apply(1.0, 2.0), 1.0);
		assert_eq!(Greater.apply(1.0, 2.0), 0.0);
		assert_eq!(And.apply(2.0, 0.0), 0.0);
		assert_eq!(And.apply(2.0, -1.0), 1.0);
		assert_eq!(Or.apply(0.0, 0.0), 0.0);
		assert_eq!(Or.apply(0.0, 3.0), 1.0);
	}

	#[test]
	fn display_prefix_form() {
		let expr = Expression::binary(
			Expression::Number(2.0),
			Add,
			Expression::binary(Expression::identifier("x"), Multiply, Expression::Number(0.5)),
		);
		assert_eq!(expr.to_string(), "(+ 2 (* x 0.5))");
	}
}
