//! # From source text to stack-machine code
//!
//! User's source code: `int x; x = 2 + 3 * y;`

//! ## Scanning
//!
//! Also known as `lexing` or `lexical analysis`, takes in the characters and
//! converts them into tokens. Keywords `int`, identifiers `x`, numbers `2.5`,
//! operators `==` and punctuation `;` are all tokens. Characters the language
//! does not know become `UNKNOWN` tokens, scanning never fails.
//!
//! Whitespaces and `//` comments are skipped. So the tokens are
//! `["int", "x", ";", "x", "=", "2", "+", "3", "*", "y", ";", EOF]`.

//! ## Parsing
//!
//! A recursive-descent `parser` builds the `abstract syntax tree` or `AST`.
//! Syntax errors are reported with their line and column, then the parser
//! skips ahead and keeps going, so one run reports as many as it can.
//!
//! ``` markdown
//! Program
//! ├── Declaration: int x
//! └── Assignment: x
//!     └── + (BinaryOp)
//!         ├── 2 (Number)
//!         └── * (BinaryOp)
//!             ├── 3 (Number)
//!             └── y (Identifier)
//! ```

//! ## Static analysis
//!
//! One symbol table for the whole program, no scopes. Every name must be
//! declared once before use, and a `float` value may not be stored in an
//! `int` variable. The analyzer also evaluates assignments as it walks, so
//! the table shows the value each variable would hold.

//! ## Optimization
//!
//! Constant folding: `x = 2 + 3 * 4;` => `x = 14;`. Division by a literal
//! zero is left alone.

//! ## Intermediate representation
//!
//! Three-address code, one operator per instruction:
//!
//! ``` markdown
//! t0 = 3 * y
//! t1 = 2 + t0
//! x = t1
//! ```

//! ## Code generation
//!
//! Instructions for a small stack machine. Operands are pushed, operators pop
//! them and push the result, `if` and `while` turn into labels and jumps.
//!
//! ``` markdown
//! ALLOC x
//! PUSH 2
//! PUSH 3
//! LOAD y
//! MUL
//! ADD
//! STORE x
//! ```
//!
//! A small [`vm`] runs that code, mostly so the output of the compiler can be
//! checked by running it.

pub mod cli;
pub mod codegen;
mod compiler;
mod error;
pub mod ir;
pub mod optimizer;
pub mod parser;
pub mod scanner;
pub mod semantic;
pub mod statement;
pub mod vm;

pub use compiler::{CompileOptions, Compilation, Compiler, Summary};
pub use error::{
	MinicError,
	parser::{ParseError, ParseErrorType},
	semantic::{SemanticError, SemanticWarning},
	vm::VmError,
};
