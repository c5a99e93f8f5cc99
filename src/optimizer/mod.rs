//! Constant folding.
//!
//! `pennyArea = 3.14159 * (0.75 / 2) * (0.75 / 2);` => `pennyArea =
//! 0.44178609375`
//!
//! Folding is bottom-up: a binary node whose operands both folded down to
//! number literals becomes a literal itself. Division by a literal zero is
//! left alone so the division stays visible in the generated code. Statement
//! lists are never touched, dead branches included.

use tracing::debug;

use crate::{
	parser::expression::{BinaryOperator, Expression},
	statement::{Program, Statement},
};

/// Fold every constant sub-expression of `expression`.
pub fn fold(expression: Expression) -> Expression {
	match expression {
		Expression::Binary { left, operator, right } => {
			let left = fold(*left);
			let right = fold(*right);
			match (left.as_number(), right.as_number()) {
				(Some(_), Some(r)) if operator == BinaryOperator::Divide && r == 0.0 => {
					Expression::binary(left, operator, right)
				}
				(Some(l), Some(r)) => Expression::Number(operator.apply(l, r)),
				_ => Expression::binary(left, operator, right),
			}
		}
		leaf => leaf,
	}
}

/// Fold, in place, every expression reachable from `program`.
pub fn optimize(program: &mut Program) {
	let mut folded = 0;
	optimize_block(&mut program.statements, &mut folded);
	debug!(folded, "constant folding done");
}

fn optimize_block(statements: &mut [Statement], folded: &mut usize) {
	for statement in statements {
		match statement {
			Statement::Declaration { .. } => {}
			Statement::Assignment { value, .. } | Statement::Print(value) => fold_in_place(value, folded),
			Statement::If { condition, then_block, else_block } => {
				fold_in_place(condition, folded);
				optimize_block(then_block, folded);
				optimize_block(else_block, folded);
			}
			Statement::While { condition, body } => {
				fold_in_place(condition, folded);
				optimize_block(body, folded);
			}
		}
	}
}

fn fold_in_place(expression: &mut Expression, folded: &mut usize) {
	let original = std::mem::replace(expression, Expression::Number(0.0));
	let before = matches!(original, Expression::Binary { .. });
	*expression = fold(original);
	if before && expression.as_number().is_some() {
		*folded += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::parse, scanner::tokenize};

	fn program(input: &str) -> Program {
		let (program, errors) = parse(&tokenize(input));
		assert!(errors.is_empty(), "{errors:?}");
		program
	}

	/// Fold the value of `x = <input>;` and compare it in prefix form.
	fn folds_to(input: &str, equals: &str) {
		let mut program = program(&format!("x = {input};"));
		optimize(&mut program);
		match &program.statements[..] {
			[Statement::Assignment { value, .. }] => assert_eq!(value.to_string(), equals),
			other => panic!("unexpected statements {other:?}"),
		}
	}

	/// Block lengths, depth first, to compare control-flow shape.
	fn shape(statements: &[Statement]) -> Vec<usize> {
		let mut out = vec![statements.len()];
		for statement in statements {
			match statement {
				Statement::If { then_block, else_block, .. } => {
					out.extend(shape(then_block));
					out.extend(shape(else_block));
				}
				Statement::While { body, .. } => out.extend(shape(body)),
				_ => {}
			}
		}
		out
	}

	#[test]
	fn fold_arithmetic() {
		folds_to("2 + 3", "5");
		folds_to("2 + 3 * 4", "14");
		folds_to("(1 + 2) * (3 + 4)", "21");
		folds_to("7 / 2", "3.5");
		folds_to("0.75 / 2 * 4", "1.5");
	}

	#[test]
	fn fold_comparisons_and_logic() {
		folds_to("1 < 2", "1");
		folds_to("2 == 3", "0");
		folds_to("1 && 0 || 1", "1");
	}

	#[test]
	fn keep_non_constant_subtrees() {
		folds_to("y + 2 * 3", "(+ y 6)");
		folds_to("2 * 3 + y", "(+ 6 y)");
		// Left associative, so `1 + 2` is not a sub-tree here.
		folds_to("y + 1 + 2", "(+ (+ y 1) 2)");
		folds_to("y * (1 + 1)", "(* y 2)");
	}

	#[test]
	fn division_by_literal_zero_is_not_folded() {
		folds_to("5 / 0", "(/ 5 0)");
		folds_to("5 / (1 - 1)", "(/ 5 0)");
		folds_to("(5 / 0) + 1", "(+ (/ 5 0) 1)");
		folds_to("0 / 5", "0");
	}

	#[test]
	fn fold_is_idempotent() {
		for input in ["2 + 3", "y + 2 * 3", "5 / 0 * 2", "(y / (2 - 2)) && 1 || 3 < 4", "a * b + (1 - 1) / 0"] {
			let mut program = program(&format!("x = {input};"));
			optimize(&mut program);
			let once = program.clone();
			optimize(&mut program);
			assert_eq!(program, once, "{input}");
		}
	}

	#[test]
	fn fold_reaches_nested_blocks() {
		let mut program =
			program("if (1 + 1 > 1) { print(2 * 3); while (0 * 1) { y = 4 - 1; } } else { print(10 / 5); }");
		optimize(&mut program);
		let expected = self::program("if (1) { print(6); while (0) { y = 3; } } else { print(2); }");
		assert_eq!(program, expected);
	}

	#[test]
	fn folding_keeps_control_flow_shape() {
		let source = "int x; x = 1; if (0) { print(1 + 1); } else { } while (1 < 0) { if (2) { x = 3; print(4); } }";
		let mut program = program(source);
		let before = shape(&program.statements);
		optimize(&mut program);
		assert_eq!(shape(&program.statements), before);
	}
}
