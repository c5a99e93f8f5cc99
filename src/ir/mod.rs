//! Three-address code.
//!
//! Every instruction has at most one operator. Binary expressions are
//! flattened into temporaries `t0, t1, ...`, control flow into labels
//! `L0, L1, ...` and (conditional) jumps. Temporaries and labels are counted
//! separately and both counters start from zero for every generated program.

use std::fmt::Display;

use tracing::debug;

use crate::{
	parser::expression::{BinaryOperator, Expression},
	statement::{Program, Statement},
};

/// Something an instruction reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
	Const(f64),
	Var(String),
	Temp(usize),
}

impl Display for Operand {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Operand::Const(n) => write!(f, "{n}"),
			Operand::Var(name) => write!(f, "{name}"),
			Operand::Temp(t) => write!(f, "t{t}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
	/// `t0 = a + b`
	Binary { dest: Operand, op: BinaryOperator, left: Operand, right: Operand },
	/// `x = t0`
	Copy { dest: Operand, src: Operand },
	/// `PRINT x`
	Print(Operand),
	/// `L0:`
	Label(String),
	/// `GOTO L0`
	Jump(String),
	/// `IF t0 GOTO L0`
	Branch { cond: Operand, label: String },
}

impl Display for Instr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Instr::Binary { dest, op, left, right } => write!(f, "{dest} = {left} {op} {right}"),
			Instr::Copy { dest, src } => write!(f, "{dest} = {src}"),
			Instr::Print(value) => write!(f, "PRINT {value}"),
			Instr::Label(label) => write!(f, "{label}:"),
			Instr::Jump(label) => write!(f, "GOTO {label}"),
			Instr::Branch { cond, label } => write!(f, "IF {cond} GOTO {label}"),
		}
	}
}

/// Lowers one program. A generator owns its counters, so separate programs
/// never share names.
#[derive(Default)]
pub struct IrGenerator {
	instrs:        Vec<Instr>,
	temp_counter:  usize,
	label_counter: usize,
}

impl IrGenerator {
	pub fn new() -> Self { Self::default() }

	pub fn generate(mut self, program: &Program) -> Vec<Instr> {
		self.block(&program.statements);
		debug!(instructions = self.instrs.len(), temps = self.temp_counter, labels = self.label_counter, "generated three-address code");
		self.instrs
	}

	fn new_temp(&mut self) -> Operand {
		let t = self.temp_counter;
		self.temp_counter += 1;
		Operand::Temp(t)
	}

	fn new_label(&mut self) -> String {
		let l = format!("L{}", self.label_counter);
		self.label_counter += 1;
		l
	}

	fn emit(&mut self, instr: Instr) { self.instrs.push(instr); }

	fn block(&mut self, statements: &[Statement]) {
		for statement in statements {
			self.statement(statement);
		}
	}

	fn statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Declaration { .. } => {}
			Statement::Assignment { name, value } => {
				let src = self.expression(value);
				self.emit(Instr::Copy { dest: Operand::Var(name.clone()), src });
			}
			Statement::Print(value) => {
				let value = self.expression(value);
				self.emit(Instr::Print(value));
			}
			Statement::If { condition, then_block, else_block } => {
				let cond = self.expression(condition);
				let then_label = self.new_label();
				let else_label = self.new_label();
				let end_label = self.new_label();
				self.emit(Instr::Branch { cond, label: then_label.clone() });
				self.emit(Instr::Jump(else_label.clone()));
				self.emit(Instr::Label(then_label));
				self.block(then_block);
				self.emit(Instr::Jump(end_label.clone()));
				self.emit(Instr::Label(else_label));
				self.block(else_block);
				self.emit(Instr::Label(end_label));
			}
			Statement::While { condition, body } => {
				let start_label = self.new_label();
				let body_label = self.new_label();
				let exit_label = self.new_label();
				self.emit(Instr::Label(start_label.clone()));
				let cond = self.expression(condition);
				self.emit(Instr::Branch { cond, label: body_label.clone() });
				self.emit(Instr::Jump(exit_label.clone()));
				self.emit(Instr::Label(body_label));
				self.block(body);
				self.emit(Instr::Jump(start_label));
				self.emit(Instr::Label(exit_label));
			}
		}
	}

	/// Lower `expression` and return the operand holding its value. Literals
	/// and names are used directly and emit nothing.
	fn expression(&mut self, expression: &Expression) -> Operand {
		match expression {
			Expression::Number(n) => Operand::Const(*n),
			Expression::Identifier(name) => Operand::Var(name.clone()),
			Expression::Binary { left, operator, right } => {
				let left = self.expression(left);
				let right = self.expression(right);
				let dest = self.new_temp();
				self.emit(Instr::Binary { dest: dest.clone(), op: *operator, left, right });
				dest
			}
		}
	}
}

/// Lower `program` to three-address code with fresh counters.
pub fn generate(program: &Program) -> Vec<Instr> { IrGenerator::new().generate(program) }
