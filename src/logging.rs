use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, LogFormat};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "cucina_backend=debug,tower_http=debug,info",
        Environment::Staging => "cucina_backend=debug,tower_http=info,info",
        Environment::Prod => "cucina_backend=info,tower_http=info,warn",
    }
}

pub fn init_logging(env: &Environment, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    // File and line only help locally
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!(?env, ?format, "Logging initialized");
    Ok(())
}
