use anyhow::Context;
use tokio::net::TcpListener;

use cucina_backend::app::{create_app, AppState};
use cucina_backend::config::Settings;
use cucina_backend::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment wins
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    logging::init_logging(&settings.env, settings.log_format)?;

    let addr = settings.server_addr.clone();
    tracing::info!(
        env = ?settings.env,
        model = %settings.llm.model,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Cucina backend"
    );

    let app = create_app(AppState::from_settings(settings)?);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app).await.context("Server error")
}
