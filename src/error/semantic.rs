/// Semantic errors. Analysis carries on after each one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
	/// A second declaration of the same name
	#[error("Variable '{0}' already declared")]
	AlreadyDeclared(String),
	/// A name used without a prior declaration
	#[error("Variable '{0}' not declared")]
	NotDeclared(String),
	/// A float valued expression assigned to an int variable
	#[error("Cannot assign float to int variable '{0}'")]
	FloatToInt(String),
	/// A name read before anything was stored in it
	#[error("Variable '{0}' used before initialization")]
	UsedBeforeInitialization(String),
}

/// Semantic warnings, reported after the whole program was walked.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticWarning {
	#[error("Variable '{0}' declared but not initialized")]
	NotInitialized(String),
}
