use anyhow::Context;

use preset_export_api::app::{build_app, services::build_services};
use preset_export_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    preset_export_observability::init();
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let services = build_services(&config).context("failed to load catalog")?;
    let app = build_app(config.jwt_secret.clone(), services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
