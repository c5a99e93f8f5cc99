//! Reference stack machine.
//!
//! Runs the code produced by [`crate::codegen`]. Values are `f64` and the
//! arithmetic and logic opcodes share their numeric semantics with the
//! semantic analyzer and the optimizer (see [`BinaryOperator::apply`]).
//! Storage allocated as `int` truncates on every `STORE`, like the symbol
//! table does. `PRINT` collects values instead of writing them anywhere, the
//! caller decides what to do with the output.
//!
//! [`BinaryOperator::apply`]: crate::parser::expression::BinaryOperator::apply

use std::collections::HashMap;

use tracing::debug;

use crate::{codegen::Instr, error::vm::VmError, statement::DataType};

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

pub struct Vm<'a> {
	code:       &'a [Instr],
	labels:     HashMap<&'a str, usize>,
	stack:      Vec<f64>,
	memory:     HashMap<&'a str, (DataType, f64)>,
	output:     Vec<f64>,
	step_limit: usize,
}

impl<'a> Vm<'a> {
	/// Prepare `code` for running, resolving every label up front.
	pub fn new(code: &'a [Instr]) -> Result<Self, VmError> {
		let mut labels = HashMap::new();
		for (pc, instr) in code.iter().enumerate() {
			if let Instr::Label(label) = instr
				&& labels.insert(label.as_str(), pc).is_some()
			{
				return Err(VmError::DuplicateLabel(label.clone()));
			}
		}
		Ok(Self {
			code,
			labels,
			stack: Vec::new(),
			memory: HashMap::new(),
			output: Vec::new(),
			step_limit: DEFAULT_STEP_LIMIT,
		})
	}

	pub fn with_step_limit(mut self, step_limit: usize) -> Self {
		self.step_limit = step_limit;
		self
	}

	/// Run until `HALT` or the end of the code and return everything printed.
	pub fn run(mut self) -> Result<Vec<f64>, VmError> {
		let code = self.code;
		let mut pc = 0;
		let mut steps = 0;
		while let Some(instr) = code.get(pc) {
			if steps == self.step_limit {
				return Err(VmError::StepLimitExceeded(self.step_limit));
			}
			steps += 1;
			pc = match instr {
				Instr::Halt => break,
				Instr::Comment(_) | Instr::Label(_) => pc + 1,
				Instr::Alloc(name, data_type) => {
					self.memory.entry(name.as_str()).or_insert((*data_type, 0.0));
					pc + 1
				}
				Instr::Push(n) => {
					self.stack.push(*n);
					pc + 1
				}
				Instr::Load(name) => {
					let (_, value) =
						*self.memory.get(name.as_str()).ok_or_else(|| VmError::UnallocatedVariable(name.clone()))?;
					self.stack.push(value);
					pc + 1
				}
				Instr::Store(name) => {
					let value = self.pop(pc)?;
					let (data_type, slot) =
						self.memory.get_mut(name.as_str()).ok_or_else(|| VmError::UnallocatedVariable(name.clone()))?;
					*slot = match data_type {
						DataType::Int => value.trunc(),
						DataType::Float => value,
					};
					pc + 1
				}
				Instr::Print => {
					let value = self.pop(pc)?;
					self.output.push(value);
					pc + 1
				}
				Instr::Binary(op) => {
					let right = self.pop(pc)?;
					let left = self.pop(pc)?;
					self.stack.push(op.apply(left, right));
					pc + 1
				}
				Instr::Jz(label) => {
					if self.pop(pc)? == 0.0 {
						self.target(label)?
					} else {
						pc + 1
					}
				}
				Instr::Jmp(label) => self.target(label)?,
			};
		}
		debug!(steps, printed = self.output.len(), "stack code finished");
		Ok(self.output)
	}

	fn pop(&mut self, pc: usize) -> Result<f64, VmError> { self.stack.pop().ok_or(VmError::StackUnderflow(pc)) }

	fn target(&self, label: &str) -> Result<usize, VmError> {
		self.labels.get(label).copied().ok_or_else(|| VmError::UnknownLabel(label.to_string()))
	}
}

/// Run `code` with the given step budget.
pub fn run(code: &[Instr], step_limit: usize) -> Result<Vec<f64>, VmError> {
	Vm::new(code)?.with_step_limit(step_limit).run()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{codegen, parser::parse, scanner::tokenize, semantic::analyze};

	fn execute(input: &str) -> Result<Vec<f64>, VmError> {
		let (program, errors) = parse(&tokenize(input));
		assert!(errors.is_empty(), "{errors:?}");
		let analysis = analyze(&program);
		let code = codegen::generate(&program, &analysis.symbols);
		run(&code, 10_000)
	}

	#[test]
	fn if_takes_then_branch() {
		assert_eq!(execute("int x; x = 10; if (x < 20) { print(1); } else { print(0); }"), Ok(vec![1.0]));
	}

	#[test]
	fn if_takes_else_branch() {
		assert_eq!(execute("int x; x = 30; if (x < 20) { print(1); } else { print(0); }"), Ok(vec![0.0]));
	}

	#[test]
	fn while_loop_counts() {
		assert_eq!(execute("int i; i = 0; while (i < 3) { print(i); i = i + 1; }"), Ok(vec![0.0, 1.0, 2.0]));
	}

	#[test]
	fn arithmetic_and_logic() {
		assert_eq!(
			execute("print(7 / 2); print(5 / 0); print(1 == 1.0000001); print(2 && 0 || 3); print(10 - 4 * 2);"),
			Ok(vec![3.5, 0.0, 1.0, 1.0, 2.0])
		);
	}

	#[test]
	fn int_storage_truncates() {
		assert_eq!(execute("int x; x = 7 / 2; print(x);"), Ok(vec![3.0]));
		assert_eq!(execute("int x; x = 0 - 7 / 2; print(x); float y; y = 7 / 2; print(y);"), Ok(vec![-3.0, 3.5]));
		let code = [
			Instr::Alloc("n".into(), DataType::Int),
			Instr::Push(2.9),
			Instr::Store("n".into()),
			Instr::Load("n".into()),
			Instr::Print,
		];
		assert_eq!(run(&code, 100), Ok(vec![2.0]));
	}

	#[test]
	fn nonterminating_loop_hits_step_limit() {
		assert_eq!(execute("while (1) { }"), Err(VmError::StepLimitExceeded(10_000)));
	}

	#[test]
	fn stack_underflow() {
		let code = [Instr::Push(1.0), Instr::Binary(crate::parser::expression::BinaryOperator::Add)];
		assert_eq!(run(&code, 100), Err(VmError::StackUnderflow(1)));
		assert_eq!(run(&[Instr::Print], 100), Err(VmError::StackUnderflow(0)));
	}

	#[test]
	fn unknown_and_duplicate_labels() {
		assert_eq!(run(&[Instr::Jmp("NOWHERE".into())], 100), Err(VmError::UnknownLabel("NOWHERE".into())));
		let code = [Instr::Label("A".into()), Instr::Label("A".into())];
		assert!(matches!(Vm::new(&code), Err(VmError::DuplicateLabel(label)) if label == "A"));
	}

	#[test]
	fn unallocated_variable() {
		assert_eq!(execute("x = 1;"), Err(VmError::UnallocatedVariable("x".into())));
		assert_eq!(run(&[Instr::Load("y".into())], 100), Err(VmError::UnallocatedVariable("y".into())));
	}

	#[test]
	fn halt_stops_early() {
		let code = [Instr::Push(1.0), Instr::Print, Instr::Halt, Instr::Push(2.0), Instr::Print];
		assert_eq!(run(&code, 100), Ok(vec![1.0]));
	}
}
