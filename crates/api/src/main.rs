use anyhow::Context;

use taskhub_api::app::{build_app, AppServices};
use taskhub_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    taskhub_observability::init(config.log_format);

    let auth_config = config.auth_config()?;
    let services = AppServices::build(&auth_config, config.database_url.as_deref())
        .await
        .context("failed to wire services")?;
    let app = build_app(services);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
