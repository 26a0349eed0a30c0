use clap::Parser;
use colored::Colorize;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use coho::common::{CohoError, EXIT_FATAL, EXIT_USAGE};
use coho::presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version go to stdout and succeed
            let code = if err.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = err.print();
            exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(error) = CliApp::new(cli).run().await {
        eprintln!("{} {}", "Error:".red().bold(), error);
        for cause in error.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
        exit(exit_code(&error));
    }
}

/// Initialize logging. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "coho=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CohoError>()
        .map(CohoError::exit_code)
        .unwrap_or(EXIT_FATAL)
}
