//! Static checks over the AST.
//!
//! A single top-to-bottom walk keeps one symbol table. Declarations add
//! symbols, assignments type-check their value against the target and store
//! the value the expression evaluates to at that point, so the table ends up
//! holding what a straight-line run of the program would have computed.
//!
//! Nothing here stops early. Every problem is recorded and the walk carries on
//! with a best guess (the declared type of a name, `0` for an unknown value).

mod symbol;

pub use symbol::{Symbol, SymbolTable};
use tracing::debug;

use crate::{error::semantic::{SemanticError, SemanticWarning}, parser::expression::Expression, statement::{DataType, Program, Statement}};

/// Everything the analyzer produces for one program.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
	pub symbols:  SymbolTable,
	pub errors:   Vec<SemanticError>,
	pub warnings: Vec<SemanticWarning>,
}

/// Walks a program and builds its symbol table.
#[derive(Default)]
pub struct Analyzer {
	symbols: SymbolTable,
	errors:  Vec<SemanticError>,
}

impl Analyzer {
	pub fn new() -> Self { Self::default() }

	pub fn analyze(mut self, program: &Program) -> Analysis {
		for statement in &program.statements {
			self.statement(statement);
		}
		let warnings: Vec<SemanticWarning> = self
			.symbols
			.iter()
			.filter(|symbol| !symbol.initialized)
			.map(|symbol| SemanticWarning::NotInitialized(symbol.name.clone()))
			.collect();
		debug!(symbols = self.symbols.len(), errors = self.errors.len(), warnings = warnings.len(), "analyzed program");
		Analysis { symbols: self.symbols, errors: self.errors, warnings }
	}

	fn statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Declaration { name, data_type } => {
				if !self.symbols.define(Symbol::new(name.clone(), *data_type)) {
					self.errors.push(SemanticError::AlreadyDeclared(name.clone()));
				}
			}
			Statement::Assignment { name, value } => {
				let Some(target_type) = self.symbols.get(name).map(|symbol| symbol.data_type) else {
					self.errors.push(SemanticError::NotDeclared(name.clone()));
					return;
				};
				let value_type = self.expression_type(value);
				if target_type == DataType::Int && value_type == DataType::Float {
					self.errors.push(SemanticError::FloatToInt(name.clone()));
					return;
				}
				let result = self.evaluate(value);
				if let Some(symbol) = self.symbols.get_mut(name) {
					symbol.store(result);
				}
			}
			Statement::Print(value) => {
				self.expression_type(value);
			}
			Statement::If { condition, then_block, else_block } => {
				self.expression_type(condition);
				for statement in then_block.iter().chain(else_block) {
					self.statement(statement);
				}
			}
			Statement::While { condition, body } => {
				self.expression_type(condition);
				for statement in body {
					self.statement(statement);
				}
			}
		}
	}

	/// Infer the type of `expression`, bottom-up, reporting names that are
	/// undeclared or not yet initialized.
	fn expression_type(&mut self, expression: &Expression) -> DataType {
		match expression {
			Expression::Number(n) => {
				if n.fract() == 0.0 {
					DataType::Int
				} else {
					DataType::Float
				}
			}
			Expression::Identifier(name) => match self.symbols.get(name) {
				None => {
					self.errors.push(SemanticError::NotDeclared(name.clone()));
					DataType::Int
				}
				Some(symbol) => {
					let data_type = symbol.data_type;
					if !symbol.initialized {
						self.errors.push(SemanticError::UsedBeforeInitialization(name.clone()));
					}
					data_type
				}
			},
			Expression::Binary { left, right, .. } => {
				let left = self.expression_type(left);
				let right = self.expression_type(right);
				if left == DataType::Float || right == DataType::Float { DataType::Float } else { DataType::Int }
			}
		}
	}

	/// Numeric value of `expression` given the values stored so far. Unknown
	/// or uninitialized names count as `0`.
	fn evaluate(&self, expression: &Expression) -> f64 {
		match expression {
			Expression::Number(n) => *n,
			Expression::Identifier(name) => {
				self.symbols.get(name).filter(|symbol| symbol.initialized).map_or(0.0, |symbol| symbol.value)
			}
			Expression::Binary { left, operator, right } => operator.apply(self.evaluate(left), self.evaluate(right)),
		}
	}
}

/// Analyze `program` with a fresh symbol table.
pub fn analyze(program: &Program) -> Analysis { Analyzer::new().analyze(program) }

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::parse, scanner::tokenize};

	fn run(input: &str) -> Analysis {
		let (program, errors) = parse(&tokenize(input));
		assert!(errors.is_empty(), "{errors:?}");
		analyze(&program)
	}

	fn value_of(analysis: &Analysis, name: &str) -> f64 {
		analysis.symbols.get(name).map(|symbol| symbol.value).unwrap_or(f64::NAN)
	}

	#[test]
	fn redeclaration_keeps_first_symbol() {
		let analysis = run("int x; x = 5; int x;");
		assert_eq!(analysis.errors, vec![SemanticError::AlreadyDeclared("x".into())]);
		let x = analysis.symbols.get("x").unwrap();
		assert!(x.initialized);
		assert_eq!(x.value, 5.0);
		assert!(analysis.warnings.is_empty());
	}

	#[test]
	fn print_of_uninitialized_is_an_error() {
		let analysis = run("int x; print(x);");
		assert_eq!(analysis.errors, vec![SemanticError::UsedBeforeInitialization("x".into())]);
	}

	#[test]
	fn unused_declaration_is_a_warning() {
		let analysis = run("int y;");
		assert!(analysis.errors.is_empty());
		assert_eq!(analysis.warnings, vec![SemanticWarning::NotInitialized("y".into())]);
	}

	#[test]
	fn assignment_to_undeclared() {
		let analysis = run("z = 1;");
		assert_eq!(analysis.errors, vec![SemanticError::NotDeclared("z".into())]);
		assert!(analysis.symbols.is_empty());
	}

	#[test]
	fn undeclared_name_in_expression() {
		let analysis = run("int x; x = y + 1;");
		assert_eq!(analysis.errors, vec![SemanticError::NotDeclared("y".into())]);
		assert_eq!(value_of(&analysis, "x"), 1.0);
	}

	#[test]
	fn float_to_int_is_rejected() {
		let analysis = run("int x; x = 2.5;");
		assert_eq!(analysis.errors, vec![SemanticError::FloatToInt("x".into())]);
		assert!(!analysis.symbols.get("x").unwrap().initialized);
		assert_eq!(analysis.warnings.len(), 1);
	}

	#[test]
	fn float_operand_makes_expression_float() {
		let analysis = run("float f; f = 1.5; int i; i = 2 * f;");
		assert_eq!(analysis.errors, vec![SemanticError::FloatToInt("i".into())]);
	}

	#[test]
	fn int_to_float_is_allowed() {
		let analysis = run("float f; f = 3;");
		assert!(analysis.errors.is_empty());
		assert_eq!(value_of(&analysis, "f"), 3.0);
	}

	#[test]
	fn int_division_truncates_on_store() {
		let analysis = run("int x; x = 7 / 2;");
		assert!(analysis.errors.is_empty());
		assert_eq!(value_of(&analysis, "x"), 3.0);
	}

	#[test]
	fn division_by_zero_evaluates_to_zero() {
		let analysis = run("int x; x = 5 / 0; float y; y = 1.5; y = y / (x - x);");
		assert!(analysis.errors.is_empty());
		assert_eq!(value_of(&analysis, "x"), 0.0);
		assert_eq!(value_of(&analysis, "y"), 0.0);
	}

	#[test]
	fn comparisons_evaluate_to_one_or_zero() {
		let analysis = run("int a; a = 3 < 4; int b; b = 3 > 4; int c; c = 1 && 0 || 2;");
		assert_eq!(value_of(&analysis, "a"), 1.0);
		assert_eq!(value_of(&analysis, "b"), 0.0);
		assert_eq!(value_of(&analysis, "c"), 1.0);
	}

	#[test]
	fn uses_values_stored_so_far() {
		let analysis = run("int x; x = 10; int y; y = x * 2 + 1;");
		assert_eq!(value_of(&analysis, "y"), 21.0);
	}

	#[test]
	fn nested_blocks_are_analyzed() {
		let analysis = run("int i; i = 0; while (i < 3) { int j; j = i + 1; if (j > 1) { k = 2; } else { print(q); } }");
		assert_eq!(analysis.errors, vec![SemanticError::NotDeclared("k".into()), SemanticError::NotDeclared("q".into())]);
		assert_eq!(value_of(&analysis, "j"), 1.0);
	}

	#[test]
	fn errors_accumulate() {
		let analysis = run("int a; int a; b = 1; print(c); float d; int e; e = d;");
		assert_eq!(analysis.errors.len(), 5);
		assert_eq!(analysis.warnings, vec![
			SemanticWarning::NotInitialized("a".into()),
			SemanticWarning::NotInitialized("d".into()),
			SemanticWarning::NotInitialized("e".into())
		]);
	}

	#[test]
	fn uninitialized_operand_still_types_by_declaration() {
		let analysis = run("float f; int i; i = f;");
		assert_eq!(analysis.errors, vec![
			SemanticError::UsedBeforeInitialization("f".into()),
			SemanticError::FloatToInt("i".into())
		]);
	}
}
