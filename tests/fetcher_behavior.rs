//! Behavior-driven tests for the credentialed fetcher
//!
//! These tests verify HOW the fetcher talks to the provider: token exchange,
//! token reuse, the bounded refresh on 401, and classification of failures.

mod support;

use support::{series_url, StubProvider, AUTH_URL};
use tickercorr_core::{
    FetchErrorKind, HttpError, HttpMethod, HttpResponse, Ticker, WindowMinutes,
};

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid ticker")
}

fn window(minutes: u32) -> WindowMinutes {
    WindowMinutes::new(minutes).expect("valid window")
}

// =============================================================================
// Token lifecycle
// =============================================================================

#[tokio::test]
async fn when_token_is_cached_later_fetches_skip_the_auth_endpoint() {
    // Given: A provider that issues one token and serves two series
    let provider = StubProvider::new();
    provider
        .token("t1")
        .series("NVDA", 10, r#"[{"price": 1}]"#)
        .series("PYPL", 10, r#"[{"price": 2}]"#);
    let fetcher = support::fetcher(&provider);

    // When: Two fetches run one after the other
    fetcher.fetch(&ticker("NVDA"), window(10)).await.expect("first fetch");
    fetcher.fetch(&ticker("PYPL"), window(10)).await.expect("second fetch");

    // Then: Only one token exchange happened and both fetches used it
    assert_eq!(provider.auth_calls(), 1);
    for request in provider.requests().iter().filter(|r| r.url != AUTH_URL) {
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.header("authorization"), Some("Bearer t1"));
    }
}

#[tokio::test]
async fn when_concurrent_fetches_start_cold_only_one_exchange_runs() {
    // Given: An empty token cache and two tickers
    let provider = StubProvider::new();
    provider
        .token("shared")
        .series("AAA", 5, r#"[{"price": 1}, {"price": 2}]"#)
        .series("BBB", 5, r#"[{"price": 3}, {"price": 4}]"#);
    let fetcher = support::fetcher(&provider);
    let (first, second) = (ticker("AAA"), ticker("BBB"));

    // When: Both fetches are in flight at once
    let (a, b) = tokio::join!(
        fetcher.fetch(&first, window(5)),
        fetcher.fetch(&second, window(5)),
    );

    // Then: Both succeed off a single exchange
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(provider.auth_calls(), 1);
    assert_eq!(fetcher.token_cache().exchange_count().await, 1);
}

#[tokio::test]
async fn when_series_returns_401_fetcher_reauthenticates_once_and_retries() {
    // Given: The first token is rejected but the second is accepted
    let provider = StubProvider::new();
    provider.token("stale").token("fresh");
    provider
        .series_status("NVDA", 5, 401)
        .series("NVDA", 5, r#"{"data": [{"price": 10}, {"price": 20}]}"#);
    let fetcher = support::fetcher(&provider);

    // When: The series is fetched
    let series = fetcher
        .fetch(&ticker("NVDA"), window(5))
        .await
        .expect("retry should succeed");

    // Then: Exactly one re-exchange and one retry happened
    assert_eq!(series.prices(), vec![10.0, 20.0]);
    assert_eq!(provider.auth_calls(), 2);
    let series_calls = provider.requests_to(&series_url("NVDA", 5));
    assert_eq!(series_calls.len(), 2);
    assert_eq!(series_calls[0].header("authorization"), Some("Bearer stale"));
    assert_eq!(series_calls[1].header("authorization"), Some("Bearer fresh"));
}

#[tokio::test]
async fn when_retry_is_also_unauthorized_fetcher_gives_up_without_third_attempt() {
    // Given: Every series request is rejected
    let provider = StubProvider::new();
    provider.token("t1").token("t2").token("t3");
    provider
        .series_status("NVDA", 5, 401)
        .series_status("NVDA", 5, 401)
        .series_status("NVDA", 5, 401);
    let fetcher = support::fetcher(&provider);

    // When: The series is fetched
    let error = fetcher
        .fetch(&ticker("NVDA"), window(5))
        .await
        .expect_err("second 401 must fail");

    // Then: The failure is transient and bounded to one refresh
    assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
    assert_eq!(provider.auth_calls(), 2);
    assert_eq!(provider.requests_to(&series_url("NVDA", 5)).len(), 2);
}

#[tokio::test]
async fn when_auth_endpoint_fails_no_series_request_is_made() {
    // Given: The auth endpoint is down
    let provider = StubProvider::new();
    provider.respond(AUTH_URL, Ok(HttpResponse::new(500, "oops")));
    let fetcher = support::fetcher(&provider);

    // When: A fetch is attempted
    let error = fetcher
        .fetch(&ticker("NVDA"), window(5))
        .await
        .expect_err("auth failure must fail the fetch");

    // Then: The error is transient and nothing was cached
    assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
    assert!(provider.requests_to(&series_url("NVDA", 5)).is_empty());
    assert!(fetcher.token_cache().current().await.is_none());
}

#[tokio::test]
async fn when_auth_response_lacks_access_token_fetch_is_transient() {
    // Given: The auth endpoint answers 200 without a token
    let provider = StubProvider::new();
    provider.respond(AUTH_URL, Ok(HttpResponse::ok_json(r#"{"token_type":"Bearer"}"#)));
    let fetcher = support::fetcher(&provider);

    // When: A fetch is attempted
    let error = fetcher
        .fetch(&ticker("NVDA"), window(5))
        .await
        .expect_err("missing token must fail");

    // Then: The error explains what was missing
    assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
    assert!(error.message().contains("access_token"));
}

// =============================================================================
// Response classification
// =============================================================================

#[tokio::test]
async fn when_series_body_is_empty_or_unrecognized_fetch_is_not_found() {
    for body in ["[]", r#"{"data": []}"#, r#"{"prices": []}"#, r#"{"quote": 1}"#] {
        // Given: A provider that answers with an unusable body
        let provider = StubProvider::new();
        provider.token("t1").series("NVDA", 5, body);
        let fetcher = support::fetcher(&provider);

        // When: The series is fetched
        let error = fetcher
            .fetch(&ticker("NVDA"), window(5))
            .await
            .expect_err("unusable body must fail");

        // Then: The failure is NotFound
        assert_eq!(error.kind(), FetchErrorKind::NotFound, "body {body}");
    }
}

#[tokio::test]
async fn when_transport_fails_fetch_is_transient() {
    // Given: The series request times out
    let provider = StubProvider::new();
    provider.token("t1").respond(
        &series_url("NVDA", 5),
        Err(HttpError::timeout("request exceeded 1000ms")),
    );
    let fetcher = support::fetcher(&provider);

    // When: The series is fetched
    let error = fetcher
        .fetch(&ticker("NVDA"), window(5))
        .await
        .expect_err("timeout must fail");

    // Then: The error is transient and names the timeout
    assert_eq!(error.kind(), FetchErrorKind::TransientFailure);
    assert_eq!(error.code(), "fetch.transient");
    assert_eq!(
        error.message(),
        "series request for NVDA failed (timeout): request exceeded 1000ms"
    );
}

#[tokio::test]
async fn when_series_is_not_found_upstream_fetch_reports_not_found() {
    // Given: The provider does not know the ticker
    let provider = StubProvider::new();
    provider.token("t1").series_status("ZZZZ", 5, 404);
    let fetcher = support::fetcher(&provider);

    // When: The series is fetched
    let error = fetcher
        .fetch(&ticker("ZZZZ"), window(5))
        .await
        .expect_err("404 must fail");

    // Then: The failure is NotFound
    assert!(error.is_not_found());
    assert_eq!(error.kind(), FetchErrorKind::NotFound);
    assert_eq!(error.code(), "fetch.not_found");
}
