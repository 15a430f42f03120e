use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pipelox", after_long_help = "Lox with a `|>` pipe operator. Set RUST_LOG to trace the phases.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run a script file
	File { path: PathBuf },
	/// Read and run lines interactively
	Repl,
}
