pub mod provider;
pub mod service_account;
pub mod token_cache;

pub use provider::CredentialProvider;
pub use service_account::{CredentialError, ServiceAccount};
pub use token_cache::TokenCache;
