use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::credentials::CredentialSet;
use crate::http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::payload::normalize_series_body;
use crate::series_source::{FetchError, SeriesSource};
use crate::token_cache::{BearerToken, CachedToken, TokenCache};
use crate::{PriceSeries, Ticker, WindowMinutes};

/// Token refreshes allowed per fetch after a 401 from the series endpoint.
const MAX_AUTH_REFRESHES: u32 = 1;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Fetches price series from the provider, holding the bearer token that
/// every request served by this instance shares.
///
/// Create one per process and hand it to request handlers behind an `Arc`.
#[derive(Clone)]
pub struct PriceFetcher {
    http_client: Arc<dyn HttpClient>,
    credentials: Arc<CredentialSet>,
    config: ProviderConfig,
    tokens: TokenCache,
}

impl PriceFetcher {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        credentials: CredentialSet,
        config: ProviderConfig,
    ) -> Self {
        Self {
            http_client,
            credentials: Arc::new(credentials),
            config,
            tokens: TokenCache::new(),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Fetch the series for `ticker` over the last `window` minutes.
    ///
    /// A 401 from the series endpoint triggers one token re-exchange and one
    /// retry; a second 401 fails the call.
    pub async fn fetch(
        &self,
        ticker: &Ticker,
        window: WindowMinutes,
    ) -> Result<PriceSeries, FetchError> {
        let endpoint = self.config.series_endpoint(ticker, window);
        let mut cached = self
            .tokens
            .get_or_exchange(|| self.exchange_token())
            .await?;
        let mut refreshes = 0;

        let response = loop {
            let response = self.request_series(&endpoint, ticker, &cached).await?;
            if !response.is_unauthorized() {
                break response;
            }

            if refreshes >= MAX_AUTH_REFRESHES {
                warn!(%ticker, "series request still unauthorized after token refresh");
                return Err(FetchError::transient(format!(
                    "series request for {ticker} unauthorized after token refresh"
                )));
            }

            refreshes += 1;
            info!(%ticker, generation = cached.generation, "bearer token rejected; refreshing");
            cached = self
                .tokens
                .refresh_after(cached.generation, || self.exchange_token())
                .await?;
        };

        self.parse_series(ticker, window, response)
    }

    async fn request_series(
        &self,
        endpoint: &str,
        ticker: &Ticker,
        cached: &CachedToken,
    ) -> Result<HttpResponse, FetchError> {
        let auth = HttpAuth::BearerToken(cached.token.as_str().to_owned());
        let request = HttpRequest::get(endpoint)
            .with_auth(&auth)
            .with_timeout_ms(self.config.timeout_ms);

        debug!(%ticker, endpoint, "requesting price series");
        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(
                %ticker,
                kind = error.kind().as_str(),
                error = error.message(),
                "series transport error"
            );
            transport_failure(&format!("series request for {ticker}"), &error)
        })?;
        debug!(%ticker, status = response.status, "series response received");

        Ok(response)
    }

    fn parse_series(
        &self,
        ticker: &Ticker,
        window: WindowMinutes,
        response: HttpResponse,
    ) -> Result<PriceSeries, FetchError> {
        if response.status == 404 {
            warn!(%ticker, "series endpoint returned 404");
            return Err(FetchError::not_found(format!(
                "no price data for {ticker}"
            )));
        }

        if !response.is_success() {
            warn!(%ticker, status = response.status, "series endpoint returned error status");
            return Err(FetchError::transient(format!(
                "series endpoint returned status {} for {ticker}",
                response.status
            )));
        }

        let payload = normalize_series_body(&response.body).map_err(|error| {
            warn!(%ticker, %error, "unusable series body");
            FetchError::not_found(format!("unusable price data for {ticker}: {error}"))
        })?;

        PriceSeries::from_prices(ticker.clone(), window, payload.prices).map_err(|_| {
            warn!(%ticker, %window, "series is empty");
            FetchError::not_found(format!(
                "no price data for {ticker} over the last {window} minutes"
            ))
        })
    }

    async fn exchange_token(&self) -> Result<BearerToken, FetchError> {
        if let Err(error) = self.credentials.validate() {
            warn!(%error, "token exchange skipped");
            return Err(FetchError::transient(format!(
                "token exchange skipped: {error}"
            )));
        }

        let body = serde_json::to_string(self.credentials.as_ref()).map_err(|error| {
            FetchError::transient(format!("failed to encode credentials: {error}"))
        })?;
        let request = HttpRequest::post(&self.config.auth_url)
            .with_json_body(body)
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(kind = error.kind().as_str(), error = error.message(), "auth transport error");
            transport_failure("auth request", &error)
        })?;

        if !response.is_success() {
            warn!(status = response.status, "auth endpoint rejected credentials");
            return Err(FetchError::transient(format!(
                "auth endpoint returned status {}",
                response.status
            )));
        }

        let parsed: AuthResponse = serde_json::from_str(&response.body).map_err(|error| {
            warn!(%error, "malformed auth response");
            FetchError::transient(format!("malformed auth response: {error}"))
        })?;

        match parsed.access_token {
            Some(token) if !token.trim().is_empty() => {
                info!("bearer token obtained");
                Ok(BearerToken::new(token))
            }
            _ => {
                warn!("auth response carried no access_token");
                Err(FetchError::transient("auth response has no access_token"))
            }
        }
    }
}

fn transport_failure(what: &str, error: &HttpError) -> FetchError {
    FetchError::transient(format!(
        "{what} failed ({}): {}",
        error.kind().as_str(),
        error.message()
    ))
}

impl SeriesSource for PriceFetcher {
    fn fetch_series<'a>(
        &'a self,
        ticker: &'a Ticker,
        window: WindowMinutes,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch(ticker, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpMethod;
    use crate::series_source::FetchErrorKind;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("script should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::connect("script exhausted")));
            Box::pin(async move { response })
        }
    }

    fn credentials() -> CredentialSet {
        CredentialSet::new("a@b.test", "Ada", "R-1", "code", "client", "secret")
    }

    fn config() -> ProviderConfig {
        ProviderConfig::new("http://p.test/auth", "http://p.test/stocks", 250).expect("valid")
    }

    fn token(value: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::ok_json(format!(r#"{{"access_token":"{value}"}}"#)))
    }

    fn ticker() -> Ticker {
        Ticker::parse("NVDA").expect("valid ticker")
    }

    fn window() -> WindowMinutes {
        WindowMinutes::new(5).expect("valid window")
    }

    #[tokio::test]
    async fn exchanges_once_then_fetches_with_bearer_token() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            token("t1"),
            Ok(HttpResponse::ok_json(r#"[{"price": 100}, {"price": 200}]"#)),
        ]));
        let fetcher = PriceFetcher::new(client.clone(), credentials(), config());

        let series = fetcher.fetch(&ticker(), window()).await.expect("fetch succeeds");
        assert_eq!(series.prices(), vec![100.0, 200.0]);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://p.test/auth");
        assert_eq!(requests[0].timeout_ms, 250);
        assert_eq!(requests[1].url, "http://p.test/stocks/NVDA?minutes=5");
        assert_eq!(requests[1].header("authorization"), Some("Bearer t1"));
    }

    #[tokio::test]
    async fn auth_body_carries_all_credential_fields() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            token("t1"),
            Ok(HttpResponse::ok_json("[{\"price\": 1}]")),
        ]));
        let fetcher = PriceFetcher::new(client.clone(), credentials(), config());
        fetcher.fetch(&ticker(), window()).await.expect("fetch succeeds");

        let body = client.recorded_requests()[0]
            .body
            .clone()
            .expect("auth request has a body");
        let value: serde_json::Value = serde_json::from_str(&body).expect("json body");
        for field in ["email", "name", "rollNo", "accessCode", "clientID", "clientSecret"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network_call() {
        let client = Arc::new(ScriptedHttpClient::new(Vec::new()));
        let mut incomplete = credentials();
        incomplete.client_secret.clear();
        let fetcher = PriceFetcher::new(client.clone(), incomplete, config());

        let error = fetcher.fetch(&ticker(), window()).await.expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
        assert!(error.message().contains("clientSecret"));
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn auth_transport_failure_names_its_kind() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Err(HttpError::connect(
            "connection refused",
        ))]));
        let fetcher = PriceFetcher::new(client, credentials(), config());

        let error = fetcher.fetch(&ticker(), window()).await.expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
        assert_eq!(
            error.message(),
            "auth request failed (connect): connection refused"
        );
    }

    #[tokio::test]
    async fn server_error_on_series_is_transient() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            token("t1"),
            Ok(HttpResponse::new(503, "busy")),
        ]));
        let fetcher = PriceFetcher::new(client, credentials(), config());

        let error = fetcher.fetch(&ticker(), window()).await.expect_err("must fail");
        assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
        assert!(error.message().contains("503"));
    }

    #[tokio::test]
    async fn series_404_is_not_found() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            token("t1"),
            Ok(HttpResponse::new(404, "{}")),
        ]));
        let fetcher = PriceFetcher::new(client, credentials(), config());

        let error = fetcher.fetch(&ticker(), window()).await.expect_err("must fail");
        assert!(error.is_not_found());
    }
}
