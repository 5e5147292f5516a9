use tickercorr_core::QueryService;
use tickercorr_web::ServerConfig;
use tracing::info;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: &ServeArgs, service: QueryService) -> Result<(), CliError> {
    let config = server_config(args, ServerConfig::from_env()?);
    info!(host = %config.host, port = config.port, "Starting tickercorr server");
    tickercorr_web::serve(config, service).await?;
    Ok(())
}

fn server_config(args: &ServeArgs, mut config: ServerConfig) -> ServerConfig {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if !args.cors_origins.is_empty() {
        config.cors_origins = args.cors_origins.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_env_config() {
        let args = ServeArgs {
            host: None,
            port: Some(8080),
            cors_origins: vec![String::from("http://a.test")],
        };

        let config = server_config(&args, ServerConfig::default());

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.test"]);
    }
}
