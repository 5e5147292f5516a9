mod cli;
mod commands;
mod error;

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded_env_file = load_env_files(&cli);
    init_tracing();
    if loaded_env_file {
        debug!(path = %cli.env_file.display(), "loaded env file");
    }

    match commands::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// The credential file wins over `.env`; neither overrides variables that
/// are already set.
fn load_env_files(cli: &Cli) -> bool {
    let from_file = dotenv::from_path(&cli.env_file).is_ok();
    dotenv::dotenv().ok();
    from_file
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
