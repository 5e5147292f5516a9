//! Process-wide bearer token cache with single-flight exchange.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

/// Opaque bearer token issued by the auth endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// A token together with the generation it was stored under. The
/// generation lets a caller that saw a 401 tell whether somebody else has
/// already replaced the token it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: BearerToken,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct TokenState {
    token: Option<BearerToken>,
    generation: u64,
    exchanges: u64,
}

impl TokenState {
    fn cached(&self) -> Option<CachedToken> {
        self.token.clone().map(|token| CachedToken {
            token,
            generation: self.generation,
        })
    }

    fn store(&mut self, token: BearerToken) -> CachedToken {
        self.generation = self.generation.wrapping_add(1);
        self.token = Some(token.clone());
        CachedToken {
            token,
            generation: self.generation,
        }
    }
}

/// Thread-safe token slot shared by every request served by one fetcher.
///
/// Exchanges run behind a gate so concurrent callers that all find the slot
/// empty (or stale) wait for a single exchange instead of each issuing one.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    state: Arc<RwLock<TokenState>>,
    exchange_gate: Arc<Mutex<()>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<CachedToken> {
        self.state.read().await.cached()
    }

    /// Return the cached token, exchanging for one if the slot is empty.
    pub async fn get_or_exchange<F, Fut, E>(&self, exchange: F) -> Result<CachedToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<BearerToken, E>>,
    {
        if let Some(cached) = self.current().await {
            return Ok(cached);
        }

        let _gate = self.exchange_gate.lock().await;
        if let Some(cached) = self.current().await {
            return Ok(cached);
        }

        let token = exchange().await?;
        let mut state = self.state.write().await;
        state.exchanges = state.exchanges.saturating_add(1);
        Ok(state.store(token))
    }

    /// Replace a token the upstream rejected.
    ///
    /// If the slot already holds a newer generation than `stale_generation`
    /// that token is returned without another exchange. On exchange failure
    /// the stale token is dropped so the next call starts from scratch.
    pub async fn refresh_after<F, Fut, E>(
        &self,
        stale_generation: u64,
        exchange: F,
    ) -> Result<CachedToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<BearerToken, E>>,
    {
        let _gate = self.exchange_gate.lock().await;
        if let Some(cached) = self.current().await {
            if cached.generation != stale_generation {
                return Ok(cached);
            }
        }

        match exchange().await {
            Ok(token) => {
                let mut state = self.state.write().await;
                state.exchanges = state.exchanges.saturating_add(1);
                Ok(state.store(token))
            }
            Err(error) => {
                let mut state = self.state.write().await;
                if state.generation == stale_generation {
                    state.token = None;
                }
                Err(error)
            }
        }
    }

    /// Number of successful exchanges stored in this cache.
    pub async fn exchange_count(&self) -> u64 {
        self.state.read().await.exchanges
    }
}
