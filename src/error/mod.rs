pub mod parser;
pub mod semantic;
pub mod vm;

/// MinicError is the top-level error type for the compiler.
#[derive(thiserror::Error, Debug)]
pub enum MinicError {
	/// Internal compiler error or I/O failure
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The source had syntax or semantic errors
	#[error("Compilation failed with {syntax} syntax errors and {semantic} semantic errors")]
	CompilationFailed { syntax: usize, semantic: usize },
	/// Runtime errors encountered while running the generated code
	#[error("Runtime error: {0}")]
	RuntimeError(#[from] vm::VmError),
}
