use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use athletics_backend::{app, app_state::AppState, config, db, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let telemetry_handles = telemetry::init_telemetry(None).await?;
    let env = config::init()?.clone();

    let pool = db::init_pool().await.context("Failed to initialize database")?;

    let state = AppState::new(pool, env.clone());
    let router = app::create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, router)
        .await
        .context("Failed to serve application")?;

    telemetry_handles.shutdown().await?;

    Ok(())
}
