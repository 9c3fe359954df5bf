//! Access-token resolution for the LLM endpoint.
//!
//! Order of precedence:
//! 1. `GCP_SERVICE_ACCOUNT_KEY`: mint a token, cache it until near expiry.
//! 2. `GCP_ACCESS_TOKEN`: use the static token as-is.

use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::service_account::ServiceAccount;
use super::token_cache::TokenCache;
use crate::config::CredentialSettings;
use crate::error::ApiError;

const MISSING_CREDENTIALS_HINT: &str =
    "Missing GCP_SERVICE_ACCOUNT_KEY and GCP_ACCESS_TOKEN. Configure one of them.";
const BROKEN_CREDENTIALS_HINT: &str = "Auth configuration error - see server logs.";

#[derive(Clone)]
enum TokenSource {
    ServiceAccount(Arc<ServiceAccount>),
    Static(String),
    /// A key was configured but could not be parsed.
    Invalid,
    Missing,
}

#[derive(Clone)]
pub struct CredentialProvider {
    source: TokenSource,
    http: reqwest::Client,
    cache: TokenCache,
}

impl CredentialProvider {
    /// Never fails: a broken configuration turns into per-request errors.
    pub fn from_settings(settings: &CredentialSettings, http: reqwest::Client) -> Self {
        let source = match (&settings.service_account_key, &settings.static_token) {
            (Some(raw), _) => match ServiceAccount::from_json(raw) {
                Ok(account) => {
                    tracing::info!(
                        client_email = account.client_email(),
                        "Using service account credentials"
                    );
                    TokenSource::ServiceAccount(Arc::new(account))
                }
                Err(e) => {
                    tracing::error!(error = %e, "GCP_SERVICE_ACCOUNT_KEY is unusable");
                    TokenSource::Invalid
                }
            },
            (None, Some(token)) => {
                tracing::info!("Using static access token");
                TokenSource::Static(token.clone())
            }
            (None, None) => {
                tracing::warn!("No LLM credentials configured - AI routes will fail");
                TokenSource::Missing
            }
        };

        Self {
            source,
            http,
            cache: TokenCache::new(Duration::from_secs(settings.refresh_skew_seconds)),
        }
    }

    /// Short name of the configured credential kind.
    pub fn kind(&self) -> &'static str {
        match self.source {
            TokenSource::ServiceAccount(_) => "service_account",
            TokenSource::Static(_) => "static_token",
            TokenSource::Invalid => "invalid",
            TokenSource::Missing => "missing",
        }
    }

    /// Forget a minted token the endpoint refused, so the next call mints
    /// a new one. Static tokens are unaffected.
    pub fn invalidate(&self) {
        if let TokenSource::ServiceAccount(_) = self.source {
            tracing::warn!("Discarding cached access token");
            self.cache.clear();
        }
    }

    /// Bearer token for the LLM endpoint.
    #[instrument(skip(self), fields(source = self.kind()))]
    pub async fn access_token(&self) -> Result<String, ApiError> {
        match &self.source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Missing => {
                Err(ApiError::Configuration(MISSING_CREDENTIALS_HINT.to_string()))
            }
            TokenSource::Invalid => {
                Err(ApiError::Configuration(BROKEN_CREDENTIALS_HINT.to_string()))
            }
            TokenSource::ServiceAccount(account) => {
                if let Some(token) = self.cache.get() {
                    tracing::debug!("Using cached access token");
                    return Ok(token);
                }

                let minted = account.mint(&self.http).await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to obtain access token from service account");
                    ApiError::Configuration(BROKEN_CREDENTIALS_HINT.to_string())
                })?;

                self.cache
                    .store(minted.access_token.clone(), minted.expires_in);
                tracing::info!(
                    expires_in_secs = minted.expires_in.as_secs(),
                    "Access token minted"
                );

                Ok(minted.access_token)
            }
        }
    }
}
