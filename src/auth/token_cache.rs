//! Expiring cache for minted access tokens

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest lifetime trusted from a token response. OAuth access tokens
/// live an hour; anything past this is clamped.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);

/// Cached token with expiration
#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Holds at most one bearer token. A token counts as stale once it is
/// within `refresh_skew` of its expiry, so callers never hand out a token
/// that dies mid-request.
#[derive(Clone)]
pub struct TokenCache {
    inner: Arc<RwLock<Option<CachedToken>>>,
    refresh_skew: Duration,
}

impl TokenCache {
    pub fn new(refresh_skew: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            refresh_skew,
        }
    }

    /// The cached token, if it is still fresh.
    pub fn get(&self) -> Option<String> {
        let cache = self.inner.read();
        cache
            .as_ref()
            .filter(|cached| {
                // a skew too large to add means nothing is ever fresh
                Instant::now()
                    .checked_add(self.refresh_skew)
                    .is_some_and(|deadline| deadline < cached.expires_at)
            })
            .map(|cached| cached.token.clone())
    }

    pub fn store(&self, token: String, expires_in: Duration) {
        let expires_at = Instant::now() + expires_in.min(MAX_TOKEN_LIFETIME);
        *self.inner.write() = Some(CachedToken { token, expires_at });
    }

    /// Drop the cached token, e.g. after the endpoint rejected it.
    pub fn clear(&self) {
        self.inner.write().take();
    }
}
