//! smp-decode CLI
//!
//! Command-line interface for decoding captured SMP responses

use clap::Parser;
use smp_decode::cli::{Cli, Runner};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
