use palc::Parser;
use pipelox::{Loxer, cli::*};

/// Install a subscriber only when `RUST_LOG` asks for one.
fn init_tracing() {
	use tracing_subscriber::{EnvFilter, fmt, prelude::*};

	if std::env::var("RUST_LOG").is_ok() {
		tracing_subscriber::registry()
			.with(fmt::layer().with_writer(std::io::stderr).with_target(true))
			.with(EnvFilter::from_default_env())
			.init();
	}
}

fn main() {
	init_tracing();
	let mut loxer = Loxer::new();

	let result = match Cli::parse().mode {
		Mode::File { path } => loxer.run_file(&path),
		Mode::Repl => loxer.run_prompt(),
	};
	if let Err(e) = result {
		if let pipelox::LoxError::InternalError(_) = e {
			eprintln!("{e}");
		}
		std::process::exit(e.exit_code());
	}
}
