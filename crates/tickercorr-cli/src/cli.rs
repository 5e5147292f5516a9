//! CLI argument definitions for tickercorr.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP API |
//! | `average` | Average price of one ticker over a window |
//! | `correlate` | Correlation between two tickers over a window |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--env-file` | `env/token.env` | Credential file loaded before `.env` |
//! | `--auth-url` | provider default | Token exchange endpoint |
//! | `--series-url` | provider default | Price series endpoint prefix |
//! | `--timeout-ms` | `5000` | Per-call timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! tickercorr serve --port 3000
//! tickercorr average NVDA --minutes 50 --pretty
//! tickercorr correlate NVDA PYPL --minutes 50
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_ENV_FILE: &str = "env/token.env";

/// Stock price averages and pairwise correlation over a credentialed
/// price provider.
#[derive(Debug, Parser)]
#[command(
    name = "tickercorr",
    author,
    version,
    about = "Stock price averages and correlation",
    long_about = "tickercorr fetches recent price series from an authenticated provider \
and computes per-ticker averages and pairwise Pearson correlation.\n\
\n\
Credentials are read from EMAIL, NAME, ROLL_NO, ACCESS_CODE, CLIENT_ID and \
CLIENT_SECRET, optionally loaded from --env-file.\n\
\n\
Use 'tickercorr <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Env file with provider credentials. Missing files are ignored.
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Override the token exchange endpoint.
    #[arg(long, global = true)]
    pub auth_url: Option<String>,

    /// Override the price series endpoint prefix.
    #[arg(long, global = true)]
    pub series_url: Option<String>,

    /// Per-call timeout budget in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    ///
    /// # Examples
    ///
    ///   tickercorr serve
    ///   tickercorr serve --port 8080 --cors-origin http://localhost:5173
    Serve(ServeArgs),

    /// Average price of a ticker over the last N minutes.
    ///
    /// # Examples
    ///
    ///   tickercorr average NVDA --minutes 50
    Average(AverageArgs),

    /// Pearson correlation between two tickers over the last N minutes.
    ///
    /// # Examples
    ///
    ///   tickercorr correlate NVDA PYPL --minutes 50
    Correlate(CorrelateArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides TICKERCORR_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Allowed CORS origin; repeat for several (overrides
    /// TICKERCORR_CORS_ORIGINS).
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AverageArgs {
    /// Ticker symbol (e.g. NVDA).
    pub ticker: String,

    /// Lookback window in minutes.
    #[arg(long, short)]
    pub minutes: String,
}

#[derive(Debug, Args)]
pub struct CorrelateArgs {
    /// First ticker symbol.
    pub ticker: String,

    /// Second ticker symbol.
    pub ticker2: String,

    /// Lookback window in minutes.
    #[arg(long, short)]
    pub minutes: String,
}
