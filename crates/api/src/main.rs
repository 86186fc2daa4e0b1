use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sigil_observability::init();

    let config = sigil_api::config::ApiConfig::from_env()?;
    let app = sigil_api::app::build_app(config)?;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .context("failed to bind 0.0.0.0:8080")?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
