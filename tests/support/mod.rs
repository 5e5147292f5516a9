// Shared stub provider for the behavior tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tickercorr_core::{
    CredentialSet, HttpClient, HttpError, HttpRequest, HttpResponse, PriceFetcher, ProviderConfig,
    QueryService,
};

pub const AUTH_URL: &str = "http://provider.test/auth";
pub const SERIES_URL: &str = "http://provider.test/stocks";

/// HTTP double that answers by URL from per-URL scripted queues and records
/// every request it sees. A URL whose queue is exhausted fails with a
/// connect error.
#[derive(Default)]
pub struct StubProvider {
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, response: Result<HttpResponse, HttpError>) -> &Self {
        self.scripts
            .lock()
            .expect("script store should not be poisoned")
            .entry(url.to_owned())
            .or_default()
            .push_back(response);
        self
    }

    pub fn token(&self, value: &str) -> &Self {
        self.respond(
            AUTH_URL,
            Ok(HttpResponse::ok_json(format!(
                r#"{{"access_token":"{value}","token_type":"Bearer"}}"#
            ))),
        )
    }

    pub fn series(&self, ticker: &str, minutes: u32, body: &str) -> &Self {
        self.respond(
            &series_url(ticker, minutes),
            Ok(HttpResponse::ok_json(body.to_owned())),
        )
    }

    pub fn series_status(&self, ticker: &str, minutes: u32, status: u16) -> &Self {
        self.respond(
            &series_url(ticker, minutes),
            Ok(HttpResponse::new(status, "")),
        )
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url == url)
            .collect()
    }

    pub fn auth_calls(&self) -> usize {
        self.requests_to(AUTH_URL).len()
    }
}

impl HttpClient for StubProvider {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .scripts
            .lock()
            .expect("script store should not be poisoned")
            .get_mut(&url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(HttpError::connect(format!("no scripted response for {url}"))));
        Box::pin(async move { response })
    }
}

pub fn series_url(ticker: &str, minutes: u32) -> String {
    format!("{SERIES_URL}/{ticker}?minutes={minutes}")
}

pub fn credentials() -> CredentialSet {
    CredentialSet::new(
        "dev@example.test",
        "Dev Example",
        "RN-042",
        "access-code",
        "client-id",
        "client-secret",
    )
}

pub fn provider_config() -> ProviderConfig {
    ProviderConfig::new(AUTH_URL, SERIES_URL, 1_000).expect("valid provider config")
}

pub fn fetcher(provider: &Arc<StubProvider>) -> PriceFetcher {
    PriceFetcher::new(provider.clone(), credentials(), provider_config())
}

pub fn service(provider: &Arc<StubProvider>) -> QueryService {
    QueryService::new(Arc::new(fetcher(provider)))
}
