use std::process::ExitCode;

use minic::{Compiler, cli::*};
use palc::Parser;
use tracing::Level;

fn main() -> ExitCode {
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_level(true)
		.with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
		.init();

	let compiler = Compiler::new(cli.options()).with_execution(cli.run);
	let result = match &cli.mode {
		Mode::File { path } => compiler.run_file(path),
		Mode::Stdin => compiler.run_stdin(),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Failed compile: {e}");
			ExitCode::FAILURE
		}
	}
}
