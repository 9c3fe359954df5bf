use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Log output format. JSON in production unless `LOG_FORMAT` says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn resolve(value: Option<&str>, env: &Environment) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") | Some("text") => Self::Pretty,
            _ if matches!(env, Environment::Prod) => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Hosted LLM endpoint (OpenAI-compatible chat completions).
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Host name, or a full base URL including the scheme.
    pub endpoint: String,
    pub region: String,
    pub project_id: String,
    pub model: String,
}

impl LlmSettings {
    pub fn chat_completions_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let base = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        };

        format!(
            "{}/v1/projects/{}/locations/{}/endpoints/openapi/chat/completions",
            base, self.project_id, self.region
        )
    }
}

/// Raw credential material for the LLM endpoint. Parsing and validation
/// happen in `auth`, so a bad key surfaces as a per-request error instead
/// of a startup failure.
#[derive(Clone, Default)]
pub struct CredentialSettings {
    pub service_account_key: Option<String>,
    pub static_token: Option<String>,
    pub refresh_skew_seconds: u64,
}

impl std::fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("service_account_key", &self.service_account_key.as_ref().map(|_| "<redacted>"))
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_skew_seconds", &self.refresh_skew_seconds)
            .finish()
    }
}

/// Open Food Facts search API.
#[derive(Debug, Clone)]
pub struct FoodDbSettings {
    pub base_url: String,
    pub page_size: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub log_format: LogFormat,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Upstream services
    pub llm: LlmSettings,
    pub credentials: CredentialSettings,
    pub food_db: FoodDbSettings,
    pub upstream_timeout_seconds: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let log_format = LogFormat::resolve(env::var("LOG_FORMAT").ok().as_deref(), &env);
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // LLM endpoint
        let llm = LlmSettings {
            endpoint: env::var("LLAMA_ENDPOINT")
                .unwrap_or_else(|_| "us-east5-aiplatform.googleapis.com".to_string()),
            region: env::var("LLAMA_REGION").unwrap_or_else(|_| "us-east5".to_string()),
            project_id: env::var("LLAMA_PROJECT_ID").context("LLAMA_PROJECT_ID must be set")?,
            model: env::var("LLAMA_MODEL")
                .unwrap_or_else(|_| "meta/llama-4-maverick-17b-128e-instruct-maas".to_string()),
        };

        // Credentials are optional here; requests fail with a configuration error instead
        let credentials = CredentialSettings {
            service_account_key: non_empty_var("GCP_SERVICE_ACCOUNT_KEY"),
            static_token: non_empty_var("GCP_ACCESS_TOKEN"),
            refresh_skew_seconds: parsed_var("TOKEN_REFRESH_SKEW_SECONDS").unwrap_or(60),
        };

        // Food database
        let food_db = FoodDbSettings {
            base_url: env::var("FOOD_DB_URL")
                .unwrap_or_else(|_| "https://world.openfoodfacts.org".to_string()),
            page_size: parsed_var("FOOD_DB_PAGE_SIZE").unwrap_or(20),
            user_agent: env::var("FOOD_DB_USER_AGENT")
                .unwrap_or_else(|_| format!("CucinaDietApp/{}", env!("CARGO_PKG_VERSION"))),
        };

        let upstream_timeout_seconds = parsed_var("UPSTREAM_TIMEOUT_SECONDS");

        Ok(Settings {
            env,
            log_format,
            server_addr,
            cors_allow_origins,
            llm,
            credentials,
            food_db,
            upstream_timeout_seconds,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
