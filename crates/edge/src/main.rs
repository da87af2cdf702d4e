use anyhow::Context;

use campus_edge::EdgeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campus_observability::init();

    let config = EdgeConfig::from_env()?;
    let bind_addr = config.bind_addr;

    let app = campus_edge::app::build_app(config).inspect_err(|err| {
        tracing::error!(error = %err, "portal configuration rejected");
    })?;

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
