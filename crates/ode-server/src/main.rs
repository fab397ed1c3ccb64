use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ode_api::{AppState, AppStateInner, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ode=debug,tower_http=debug".into()),
        )
        .init();

    // Config — a missing database path is fatal at startup.
    let db_path = std::env::var("ODE_DB_PATH").context("ODE_DB_PATH must be set")?;
    let host = std::env::var("ODE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ODE_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;

    // Init database — schema creation and seeding happen here; failure aborts.
    let db = ode_db::Database::open(&PathBuf::from(&db_path))
        .context("Failed to initialize database")?;

    let state: AppState = Arc::new(AppStateInner { db });

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Ode server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
