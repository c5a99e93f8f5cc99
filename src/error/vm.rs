#[derive(thiserror::Error, Debug, Clone, PartialEq)]
/// Errors that can occur while running stack-machine code
pub enum VmError {
	/// An instruction needed more operands than the stack held
	#[error("Stack underflow at instruction {0}")]
	StackUnderflow(usize),
	/// A jump to a label that is never defined
	#[error("Jump to unknown label '{0}'")]
	UnknownLabel(String),
	/// A load or store of a name that was never allocated
	#[error("Variable '{0}' was never allocated")]
	UnallocatedVariable(String),
	/// The program ran longer than the configured step budget
	#[error("Step limit of {0} instructions exceeded")]
	StepLimitExceeded(usize),
	/// The same label defined twice
	#[error("Label '{0}' defined more than once")]
	DuplicateLabel(String),
}
