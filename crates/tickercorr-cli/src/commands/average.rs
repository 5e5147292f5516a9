use tickercorr_core::{AverageQuery, QueryService, TickerAverage};

use crate::cli::AverageArgs;
use crate::error::CliError;

pub async fn run(args: &AverageArgs, service: &QueryService) -> Result<TickerAverage, CliError> {
    let query = AverageQuery {
        ticker: Some(args.ticker.clone()),
        minutes: Some(args.minutes.clone()),
        aggregation: None,
    };
    Ok(service.ticker_average(&query).await?)
}
