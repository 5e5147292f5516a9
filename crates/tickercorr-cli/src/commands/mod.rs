mod average;
mod correlate;
mod serve;

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tickercorr_core::{
    CredentialSet, PriceFetcher, ProviderConfig, QueryService, ReqwestHttpClient,
};
use tracing::warn;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let service = build_service(cli)?;

    match &cli.command {
        Command::Serve(args) => serve::run(args, service).await,
        Command::Average(args) => {
            let result = average::run(args, &service).await?;
            render(&result, cli.pretty)
        }
        Command::Correlate(args) => {
            let result = correlate::run(args, &service).await?;
            render(&result, cli.pretty)
        }
    }
}

/// One fetcher (and so one token cache) per process.
fn build_service(cli: &Cli) -> Result<QueryService, CliError> {
    let config = provider_config(cli)?;
    let credentials = CredentialSet::from_env();
    let missing = credentials.missing_fields();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "provider credentials incomplete; fetches will fail until they are set"
        );
    }

    let fetcher = PriceFetcher::new(Arc::new(ReqwestHttpClient::new()), credentials, config);
    Ok(QueryService::new(Arc::new(fetcher)))
}

/// Environment first, then command-line overrides.
pub fn provider_config(cli: &Cli) -> Result<ProviderConfig, CliError> {
    let base = ProviderConfig::from_env()?;
    let config = ProviderConfig::new(
        cli.auth_url.clone().unwrap_or(base.auth_url),
        cli.series_url.clone().unwrap_or(base.series_url),
        cli.timeout_ms.unwrap_or(base.timeout_ms),
    )?;
    Ok(config)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
