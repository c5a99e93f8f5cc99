use std::{
	fmt::Display,
	fs::read_to_string,
	io::{Read, stdin},
	path::Path,
};

use anyhow::Context;
use tracing::{debug, info_span, warn};

use crate::{
	MinicError, codegen,
	error::{parser::ParseError, vm::VmError},
	ir, optimizer,
	parser::{DEFAULT_MAX_DEPTH, Parser},
	scanner::{Scanner, Token},
	semantic::{Analysis, analyze},
	statement::Program,
	vm::{self, DEFAULT_STEP_LIMIT},
};

/// Knobs for one compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
	/// Deepest `(` nesting the parser accepts inside one expression, and
	/// deepest `{` block nesting.
	pub max_expression_depth: usize,
	/// Fold constant sub-expressions before generating code.
	pub optimize:             bool,
	/// Generate code even when the source had syntax or semantic errors.
	pub emit_on_errors:       bool,
	/// Instructions the stack machine may execute before giving up.
	pub vm_step_limit:        usize,
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self {
			max_expression_depth: DEFAULT_MAX_DEPTH,
			optimize:             true,
			emit_on_errors:       false,
			vm_step_limit:        DEFAULT_STEP_LIMIT,
		}
	}
}

impl CompileOptions {
	pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
		self.max_expression_depth = depth;
		self
	}

	pub fn with_optimize(mut self, optimize: bool) -> Self {
		self.optimize = optimize;
		self
	}

	pub fn with_emit_on_errors(mut self, emit: bool) -> Self {
		self.emit_on_errors = emit;
		self
	}

	pub fn with_vm_step_limit(mut self, limit: usize) -> Self {
		self.vm_step_limit = limit;
		self
	}
}

/// Everything one compile produced. Borrows the source through its tokens.
#[derive(Debug, Clone)]
pub struct Compilation<'src> {
	pub tokens:        Vec<Token<'src>>,
	/// The program as parsed, before any folding.
	pub ast:           Program,
	pub syntax_errors: Vec<ParseError>,
	pub analysis:      Analysis,
	/// `None` when optimization is turned off.
	pub optimized:     Option<Program>,
	/// `None` when code generation was withheld because of errors.
	pub three_address: Option<Vec<ir::Instr>>,
	/// `None` when code generation was withheld because of errors.
	pub stack_code:    Option<Vec<codegen::Instr>>,
}

impl Compilation<'_> {
	pub fn has_errors(&self) -> bool { !self.syntax_errors.is_empty() || !self.analysis.errors.is_empty() }

	/// The program code was (or would be) generated from.
	pub fn lowered(&self) -> &Program { self.optimized.as_ref().unwrap_or(&self.ast) }

	pub fn summary(&self) -> Summary {
		Summary {
			tokens:          self.tokens.len(),
			syntax_errors:   self.syntax_errors.len(),
			semantic_errors: self.analysis.errors.len(),
			warnings:        self.analysis.warnings.len(),
			variables:       self.analysis.symbols.len(),
		}
	}

	/// Turn a compile with errors into [`MinicError::CompilationFailed`].
	pub fn check(&self) -> Result<(), MinicError> {
		if self.has_errors() {
			return Err(MinicError::CompilationFailed {
				syntax:   self.syntax_errors.len(),
				semantic: self.analysis.errors.len(),
			});
		}
		Ok(())
	}
}

fn section(f: &mut std::fmt::Formatter<'_>, title: &str) -> std::fmt::Result {
	writeln!(f)?;
	writeln!(f, "{title}")?;
	writeln!(f, "{}", "-".repeat(35))
}

fn numbered<T: Display>(f: &mut std::fmt::Formatter<'_>, code: &[T]) -> std::fmt::Result {
	for (i, instr) in code.iter().enumerate() {
		writeln!(f, "{:>3}: {instr}", i + 1)?;
	}
	Ok(())
}

/// Full listing of every artifact, one section per phase.
impl Display for Compilation<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		section(f, "Tokens:")?;
		writeln!(f, "{:<12} | {:<8} | Position", "Type", "Value")?;
		for token in &self.tokens {
			writeln!(f, "{token}")?;
		}

		section(f, "Abstract Syntax Tree:")?;
		write!(f, "{}", self.ast)?;
		if !self.syntax_errors.is_empty() {
			section(f, "Syntax Errors:")?;
			for error in &self.syntax_errors {
				writeln!(f, "  {error}")?;
			}
		}

		if !self.analysis.errors.is_empty() {
			section(f, "Semantic Errors:")?;
			for error in &self.analysis.errors {
				writeln!(f, "  {error}")?;
			}
		}
		if !self.analysis.warnings.is_empty() {
			section(f, "Warnings:")?;
			for warning in &self.analysis.warnings {
				writeln!(f, "  {warning}")?;
			}
		}
		section(f, "Symbol Table:")?;
		writeln!(f, "{:<10} | {:<6} | {:<5} | Value", "Name", "Type", "Init")?;
		for symbol in self.analysis.symbols.iter() {
			writeln!(f, "{symbol}")?;
		}

		if let Some(optimized) = &self.optimized {
			section(f, "Optimized AST:")?;
			write!(f, "{optimized}")?;
		}

		section(f, "Three-Address Code:")?;
		match &self.three_address {
			Some(code) => numbered(f, code)?,
			None => writeln!(f, "Skipped due to errors.")?,
		}
		section(f, "Stack-based VM Code:")?;
		match &self.stack_code {
			Some(code) => numbered(f, code)?,
			None => writeln!(f, "Skipped due to errors.")?,
		}

		section(f, "Compilation Summary:")?;
		write!(f, "{}", self.summary())
	}
}

/// Counts reported at the end of a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
	pub tokens:          usize,
	pub syntax_errors:   usize,
	pub semantic_errors: usize,
	pub warnings:        usize,
	pub variables:       usize,
}

impl Summary {
	pub fn succeeded(&self) -> bool { self.syntax_errors == 0 && self.semantic_errors == 0 }
}

impl Display for Summary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Tokens generated: {}", self.tokens)?;
		writeln!(f, "Syntax errors: {}", self.syntax_errors)?;
		writeln!(f, "Semantic errors: {}", self.semantic_errors)?;
		writeln!(f, "Warnings: {}", self.warnings)?;
		writeln!(f, "Variables declared: {}", self.variables)?;
		if self.succeeded() {
			writeln!(f, "Compilation completed successfully!")
		} else {
			writeln!(f, "Compilation failed with errors.")
		}
	}
}

/// Compiler drives source text through every phase.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
	options: CompileOptions,
	execute: bool,
}

impl Compiler {
	pub fn new(options: CompileOptions) -> Self { Self { options, execute: false } }

	/// Also run the generated stack code after compiling from a file or stdin.
	pub fn with_execution(mut self, execute: bool) -> Self {
		self.execute = execute;
		self
	}

	/// Compile `source`. Never fails, problems are recorded in the result.
	pub fn compile<'src>(&self, source: &'src str) -> Compilation<'src> {
		let tokens = {
			let _span = info_span!("scan").entered();
			let tokens = Scanner::new(source).scan_tokens();
			debug!(tokens = tokens.len(), "scanned source");
			tokens
		};

		let (ast, syntax_errors) = {
			let _span = info_span!("parse").entered();
			let (ast, errors) = Parser::new(&tokens).with_max_depth(self.options.max_expression_depth).parse();
			debug!(statements = ast.statements.len(), errors = errors.len(), "parsed tokens");
			(ast, errors)
		};

		let analysis = {
			let _span = info_span!("analyze").entered();
			analyze(&ast)
		};

		let optimized = self.options.optimize.then(|| {
			let _span = info_span!("optimize").entered();
			let mut optimized = ast.clone();
			optimizer::optimize(&mut optimized);
			optimized
		});

		let mut compilation =
			Compilation { tokens, ast, syntax_errors, analysis, optimized, three_address: None, stack_code: None };

		if compilation.has_errors() {
			if !self.options.emit_on_errors {
				warn!(
					syntax_errors = compilation.syntax_errors.len(),
					semantic_errors = compilation.analysis.errors.len(),
					"code generation skipped due to errors"
				);
				return compilation;
			}
			warn!("generating code for a program with errors");
		}

		compilation.three_address = Some({
			let _span = info_span!("ir").entered();
			ir::generate(compilation.lowered())
		});
		compilation.stack_code = Some({
			let _span = info_span!("codegen").entered();
			codegen::generate(compilation.lowered(), &compilation.analysis.symbols)
		});
		compilation
	}

	/// Run the stack code of `compilation` and return the printed values.
	pub fn execute(&self, compilation: &Compilation<'_>) -> Result<Vec<f64>, MinicError> {
		let Some(code) = &compilation.stack_code else {
			compilation.check()?;
			return Ok(Vec::new());
		};
		let _span = info_span!("run").entered();
		let output = vm::run(code, self.options.vm_step_limit).map_err(|e: VmError| {
			warn!(error = %e, "stack code failed");
			e
		})?;
		Ok(output)
	}

	/// Compile the file at `path` and print every artifact.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MinicError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		self.run(&source)
	}

	/// Compile all of standard input as one source unit and print every
	/// artifact.
	pub fn run_stdin(&self) -> Result<(), MinicError> {
		let mut source = String::new();
		stdin().read_to_string(&mut source).context("Failed read standard input")?;
		self.run(&source)
	}
}

impl Compiler {
	fn run(&self, source: &str) -> Result<(), MinicError> {
		let compilation = self.compile(source);
		print!("{compilation}");
		if self.execute && compilation.stack_code.is_some() {
			let output = self.execute(&compilation)?;
			println!();
			println!("Output:");
			for value in output {
				println!("{value}");
			}
		}
		compilation.check()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clean_program_generates_code() {
		let compilation = Compiler::default().compile("int x; x = 2 + 3; print(x);");
		assert!(!compilation.has_errors());
		assert!(compilation.check().is_ok());
		let stack: Vec<String> = compilation.stack_code.unwrap().iter().map(ToString::to_string).collect();
		assert!(stack.contains(&"PUSH 5".to_string()), "{stack:?}");
		assert_eq!(compilation.three_address.unwrap().len(), 2);
	}

	#[test]
	fn errors_withhold_code() {
		let compilation = Compiler::default().compile("int x; y = 1;");
		assert!(compilation.has_errors());
		assert!(compilation.three_address.is_none());
		assert!(compilation.stack_code.is_none());
		assert!(matches!(compilation.check(), Err(MinicError::CompilationFailed { syntax: 0, semantic: 1 })));
	}

	#[test]
	fn emit_on_errors_forces_code() {
		let compiler = Compiler::new(CompileOptions::default().with_emit_on_errors(true));
		let compilation = compiler.compile("print(1 +);");
		assert_eq!(compilation.syntax_errors.len(), 1);
		assert!(compilation.stack_code.is_some());
	}

	#[test]
	fn optimize_off_keeps_ast() {
		let compiler = Compiler::new(CompileOptions::default().with_optimize(false));
		let compilation = compiler.compile("print(2 * 3);");
		assert!(compilation.optimized.is_none());
		let stack: Vec<String> = compilation.stack_code.unwrap().iter().map(ToString::to_string).collect();
		assert!(stack.contains(&"MUL".to_string()), "{stack:?}");
	}

	#[test]
	fn depth_option_reaches_parser() {
		let compiler = Compiler::new(CompileOptions::default().with_max_expression_depth(2));
		assert!(compiler.compile("print(((1)));").syntax_errors.is_empty());
		assert_eq!(compiler.compile("print((((1))));").syntax_errors.len(), 1);
	}

	#[test]
	fn execute_runs_stack_code() {
		let compiler = Compiler::default();
		let compilation = compiler.compile("int i; i = 0; while (i < 2) { print(i * 10); i = i + 1; }");
		assert_eq!(compiler.execute(&compilation).unwrap(), vec![0.0, 10.0]);
	}

	#[test]
	fn execute_reports_step_limit() {
		let compiler = Compiler::new(CompileOptions::default().with_vm_step_limit(50));
		let compilation = compiler.compile("while (1) { }");
		assert!(matches!(compiler.execute(&compilation), Err(MinicError::RuntimeError(VmError::StepLimitExceeded(50)))));
	}

	#[test]
	fn summary_counts() {
		let summary = Compiler::default().compile("int a; float b; b = 1.5; print(c);").summary();
		assert_eq!(summary, Summary { tokens: 16, syntax_errors: 0, semantic_errors: 1, warnings: 1, variables: 2 });
		assert!(!summary.succeeded());
		assert!(summary.to_string().ends_with("Compilation failed with errors.\n"));
	}

	#[test]
	fn listing_has_every_section() {
		let listing = Compiler::default().compile("int x; x = 1; if (x) { print(x); }").to_string();
		for title in [
			"Tokens:",
			"Abstract Syntax Tree:",
			"Symbol Table:",
			"Optimized AST:",
			"Three-Address Code:",
			"Stack-based VM Code:",
			"Compilation Summary:",
		] {
			assert!(listing.contains(title), "{title} missing");
		}
		assert!(listing.contains("  1: # Stack-based VM Code"));
		assert!(listing.contains("Compilation completed successfully!"));
	}
}
