use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use proba_assistant::core::config::AppPaths;
use proba_assistant::core::logging;
use proba_assistant::server;
use proba_assistant::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    // A missing .env is normal outside local development.
    dotenv::from_path(paths.project_root.join(".env")).ok();
    logging::init(&paths);

    let state = AppState::initialize(paths)
        .await
        .context("Failed to initialize application state")?;

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("PROBA_PORT={}", addr.port());
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
