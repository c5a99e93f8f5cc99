use std::path::PathBuf;

use palc::{Parser, Subcommand};

use crate::CompileOptions;

#[derive(Parser)]
#[command(name = "minic", after_long_help = "Compiles a tiny imperative language down to stack-machine code.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode:        Mode,
	/// Deepest parenthesis nesting in one expression, and deepest block nesting
	#[arg(long)]
	pub max_depth:   Option<usize>,
	/// Skip constant folding
	#[arg(long)]
	pub no_optimize: bool,
	/// Generate code even if the source has errors
	#[arg(long)]
	pub force:       bool,
	/// Run the generated stack code and print its output
	#[arg(long)]
	pub run:         bool,
	/// Log every compiler phase to stderr
	#[arg(long)]
	pub verbose:     bool,
}

impl Cli {
	pub fn options(&self) -> CompileOptions {
		let options = CompileOptions::default().with_optimize(!self.no_optimize).with_emit_on_errors(self.force);
		match self.max_depth {
			Some(depth) => options.with_max_expression_depth(depth),
			None => options,
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Input file
	File { path: PathBuf },
	/// Read the whole program from standard input
	Stdin,
}
