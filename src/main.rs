use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hajj_costing::{app, config::Config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hajj_costing=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        draft_capacity = config.draft_capacity,
        draft_ttl_secs = config.draft_ttl.as_secs(),
        "Starting hajj-costing"
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str()).await?;
    let app = app(AppState::new(config));

    tracing::info!("Costing service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
