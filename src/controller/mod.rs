use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::mail::MailDispatcher;
use crate::repositories::ReservationStore;

pub mod health_check;
pub mod reservation_controller;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReservationStore>,
    /// `None` when mail credentials are not configured.
    pub mailer: Option<Arc<MailDispatcher>>,
}

pub async fn serve(app_state: AppState, config: &Config) -> anyhow::Result<()> {
    let origins = config.cors_origins()?;
    let application = application(app_state, origins);

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("API server listening on port: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")?;

    info!("API server shut down");
    Ok(())
}

/// The full application: routes, middleware and the 404 fallback.
pub fn application(app_state: AppState, origins: Vec<HeaderValue>) -> Router {
    router_endpoints(app_state)
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_origin(origins)
                        .allow_headers([CONTENT_TYPE]),
                ),
        )
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router().nest(
        "/api/v1/reservation",
        reservation_controller::router(app_state),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler due to: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler due to: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
