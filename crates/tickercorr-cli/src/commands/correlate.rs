use tickercorr_core::{CorrelationQuery, PairCorrelation, QueryService};

use crate::cli::CorrelateArgs;
use crate::error::CliError;

pub async fn run(
    args: &CorrelateArgs,
    service: &QueryService,
) -> Result<PairCorrelation, CliError> {
    let query = CorrelationQuery {
        ticker: Some(args.ticker.clone()),
        ticker2: Some(args.ticker2.clone()),
        minutes: Some(args.minutes.clone()),
    };
    Ok(service.pairwise_correlation(&query).await?)
}
