//! LogiMAS command-line entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logimas::cli::{Cli, execute};

fn init_tracing(verbose: bool) {
    let default = if verbose { "logimas=debug" } else { "logimas=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = execute(&cli)?;
    if !output.is_empty() {
        print!("{output}");
    }
    Ok(())
}
