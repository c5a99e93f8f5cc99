//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `while` loop is always a block of statements.

use std::fmt::Display;

use crate::parser::expression::Expression;

/// The two declarable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	Int,
	Float,
}

impl Display for DataType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.pad(match self {
			DataType::Int => "int",
			DataType::Float => "float",
		})
	}
}

/// A statement in the programming language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// `int x;` or `float x;`
	Declaration { name: String, data_type: DataType },
	/// `x = expr;`
	Assignment { name: String, value: Expression },
	/// `print(expr);`
	Print(Expression),
	If {
		condition:  Expression,
		then_block: Vec<Statement>,
		/// Empty when there is no `else`.
		else_block: Vec<Statement>,
	},
	While {
		condition: Expression,
		body:      Vec<Statement>,
	},
}

impl Statement {
	fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, level: usize) -> std::fmt::Result {
		let indent = "  ".repeat(level);
		match self {
			Statement::Declaration { name, data_type } => writeln!(f, "{indent}Declaration: {data_type} {name}"),
			Statement::Assignment { name, value } => {
				writeln!(f, "{indent}Assignment: {name}")?;
				value.fmt_tree(f, level + 1)
			}
			Statement::Print(value) => {
				writeln!(f, "{indent}Print:")?;
				value.fmt_tree(f, level + 1)
			}
			Statement::If { condition, then_block, else_block } => {
				writeln!(f, "{indent}If:")?;
				writeln!(f, "{indent}  Condition:")?;
				condition.fmt_tree(f, level + 2)?;
				writeln!(f, "{indent}  Then:")?;
				for statement in then_block {
					statement.fmt_tree(f, level + 2)?;
				}
				if !else_block.is_empty() {
					writeln!(f, "{indent}  Else:")?;
					for statement in else_block {
						statement.fmt_tree(f, level + 2)?;
					}
				}
				Ok(())
			}
			Statement::While { condition, body } => {
				writeln!(f, "{indent}While:")?;
				writeln!(f, "{indent}  Condition:")?;
				condition.fmt_tree(f, level + 2)?;
				writeln!(f, "{indent}  Body:")?;
				for statement in body {
					statement.fmt_tree(f, level + 2)?;
				}
				Ok(())
			}
		}
	}
}

/// The AST root, rebuilt on every compile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
	pub statements: Vec<Statement>,
}

impl Program {
	pub fn new(statements: Vec<Statement>) -> Self { Self { statements } }
}

/// Indented tree rendering for display.
impl Display for Program {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Program:")?;
		for statement in &self.statements {
			statement.fmt_tree(f, 1)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::expression::BinaryOperator;

	#[test]
	fn render_tree() {
		let program = Program::new(vec![
			Statement::Declaration { name: "x".into(), data_type: DataType::Int },
			Statement::While {
				condition: Expression::binary(Expression::identifier("x"), BinaryOperator::Less, Expression::Number(3.0)),
				body:      vec![Statement::Print(Expression::identifier("x"))],
			},
		]);
		let expected = "\
Program:
  Declaration: int x
  While:
    Condition:
      BinaryOp: <
        Left:
          Identifier: x
        Right:
          Number: 3
    Body:
      Print:
        Identifier: x
";
		assert_eq!(program.to_string(), expected);
	}

	#[test]
	fn render_if_without_else_omits_else_section() {
		let program = Program::new(vec![Statement::If {
			condition:  Expression::Number(1.0),
			then_block: vec![],
			else_block: vec![],
		}]);
		assert_eq!(program.to_string(), "Program:\n  If:\n    Condition:\n      Number: 1\n    Then:\n");
	}
}
