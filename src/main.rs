use anyhow::Context;

use pancrepal::{config::Config, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pancrepal=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();
    let addr = config.listen_addr();

    let state = AppState::init(config)
        .await
        .context("invalid DATABASE_URL")?;
    let app = router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
