//! Stack-machine code.
//!
//! Lowers the AST straight to a linear instruction list for a small stack
//! machine. Operands live on an implicit evaluation stack, so expressions are
//! emitted depth first (left, right, operator) without naming intermediates.
//!
//! Variable storage is named after the variable. Labels come from a single
//! counter shared by every `if` and `while` of the program.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::{
	parser::expression::{BinaryOperator, Expression},
	semantic::SymbolTable,
	statement::{DataType, Program, Statement},
};

/// First line of every generated program.
pub const HEADER: &str = "# Stack-based VM Code";

/// A stack-machine instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
	/// Comment line, ignored when run.
	Comment(String),
	/// Reserve storage for a variable, initialised to `0`. `int` storage
	/// truncates every value stored into it.
	Alloc(String, DataType),
	Push(f64),
	Load(String),
	Store(String),
	/// Pop a value and append it to the output.
	Print,
	/// Pop right, pop left, push `left <op> right`.
	Binary(BinaryOperator),
	/// Pop a value and jump if it is zero.
	Jz(String),
	Jmp(String),
	Label(String),
	Halt,
}

impl Instr {
	fn opcode(op: BinaryOperator) -> &'static str {
		use BinaryOperator::*;
		match op {
			Add => "ADD",
			Subtract => "SUB",
			Multiply => "MUL",
			Divide => "DIV",
			Equal => "EQ",
			NotEqual => "NEQ",
			Less => "LT",
			Greater => "GT",
			And => "AND",
			Or => "OR",
		}
	}
}

impl Display for Instr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Instr::Comment(text) => write!(f, "{text}"),
			Instr::Alloc(name, _) => write!(f, "ALLOC {name}"),
			Instr::Push(n) => write!(f, "PUSH {n}"),
			Instr::Load(name) => write!(f, "LOAD {name}"),
			Instr::Store(name) => write!(f, "STORE {name}"),
			Instr::Print => write!(f, "PRINT"),
			Instr::Binary(op) => write!(f, "{}", Instr::opcode(*op)),
			Instr::Jz(label) => write!(f, "JZ {label}"),
			Instr::Jmp(label) => write!(f, "JMP {label}"),
			Instr::Label(label) => write!(f, "{label}:"),
			Instr::Halt => write!(f, "HALT"),
		}
	}
}

pub struct CodeGenerator<'a> {
	symbols:       &'a SymbolTable,
	instrs:        Vec<Instr>,
	label_counter: usize,
}

impl<'a> CodeGenerator<'a> {
	pub fn new(symbols: &'a SymbolTable) -> Self { Self { symbols, instrs: Vec::new(), label_counter: 0 } }

	pub fn generate(mut self, program: &Program) -> Vec<Instr> {
		self.emit(Instr::Comment(HEADER.to_string()));
		self.block(&program.statements);
		self.emit(Instr::Halt);
		debug!(instructions = self.instrs.len(), labels = self.label_counter, "generated stack code");
		self.instrs
	}

	fn new_label(&mut self, prefix: &str) -> String {
		let l = format!("{prefix}_{}", self.label_counter);
		self.label_counter += 1;
		l
	}

	fn emit(&mut self, instr: Instr) { self.instrs.push(instr); }

	/// Storage for `name`. Names missing from the symbol table still get a
	/// slot named after them, the run will fail on it instead.
	fn slot(&self, name: &str) -> String {
		if !self.symbols.contains(name) {
			warn!(name, "no symbol for variable, emitting code anyway");
		}
		name.to_string()
	}

	fn block(&mut self, statements: &[Statement]) {
		for statement in statements {
			self.statement(statement);
		}
	}

	fn statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Declaration { name, data_type } => {
				let slot = self.slot(name);
				self.emit(Instr::Alloc(slot, *data_type));
			}
			Statement::Assignment { name, value } => {
				self.expression(value);
				let slot = self.slot(name);
				self.emit(Instr::Store(slot));
			}
			Statement::Print(value) => {
				self.expression(value);
				self.emit(Instr::Print);
			}
			Statement::If { condition, then_block, else_block } => {
				self.expression(condition);
				let else_label = self.new_label("ELSE");
				let end_label = self.new_label("END");
				self.emit(Instr::Jz(else_label.clone()));
				self.block(then_block);
				self.emit(Instr::Jmp(end_label.clone()));
				self.emit(Instr::Label(else_label));
				self.block(else_block);
				self.emit(Instr::Label(end_label));
			}
			Statement::While { condition, body } => {
				let start_label = self.new_label("LOOP");
				let exit_label = self.new_label("EXIT");
				self.emit(Instr::Label(start_label.clone()));
				self.expression(condition);
				self.emit(Instr::Jz(exit_label.clone()));
				self.block(body);
				self.emit(Instr::Jmp(start_label));
				self.emit(Instr::Label(exit_label));
			}
		}
	}

	fn expression(&mut self, expression: &Expression) {
		match expression {
			Expression::Number(n) => self.emit(Instr::Push(*n)),
			Expression::Identifier(name) => {
				let slot = self.slot(name);
				self.emit(Instr::Load(slot));
			}
			Expression::Binary { left, operator, right } => {
				self.expression(left);
				self.expression(right);
				self.emit(Instr::Binary(*operator));
			}
		}
	}
}

/// Lower `program` to stack-machine code using `symbols` for storage.
pub fn generate(program: &Program, symbols: &SymbolTable) -> Vec<Instr> { CodeGenerator::new(symbols).generate(program) }
