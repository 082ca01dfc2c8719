//! Backend-for-frontend for the customer feedback analyzer: reverse-proxies
//! `/api/**` to the analysis service and, in production, serves the prebuilt
//! SPA bundle from one origin.

use std::net::SocketAddr;

use axum::{middleware::from_fn, Router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Builds the full router for a given state. Split out so integration tests
/// can drive the app without binding a socket.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::api::api_routes())
        .merge(routes::site::site_routes(&state))
        .layer(from_fn(middleware::request_log::request_log))
        .with_state(state)
}

pub async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "web-bff configuration: port={} api_proxy_target={} mode={} static_dir={}",
        config.port,
        config.api_target,
        if config.is_production {
            "production"
        } else {
            "development"
        },
        config.static_dir.display()
    );

    let state = AppState::new(config);
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    let listener = TcpListener::bind(&address).await?;
    info!("web-bff listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
