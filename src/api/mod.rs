//! REST API server
//!
//! JSON in, JSON out. Handlers are thin: they extract input, call one
//! service operation and let [`MarketplaceError`](crate::error::MarketplaceError)
//! render failures as `{"error": ...}` with a matching status code.

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::services::AppState;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod ideas;
pub mod mentors;
pub mod users;

pub use auth::Identity;
pub use error::ApiResult;

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Bind the configured address and serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr = self.state.config.bind_address();
        let listener = TcpListener::bind(&addr).await?;
        info!("MentorHub API listening on {}", addr);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("MentorHub API stopped");
        Ok(())
    }
}

/// All routes, with CORS, bound to `state`
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/mentors",
            get(mentors::list_mentors).post(mentors::submit_application),
        )
        .route("/mentors/verify/{token}", get(mentors::verify_mentor))
        .route(
            "/mentors/{id}",
            get(mentors::get_mentor)
                .put(mentors::update_mentor)
                .delete(mentors::delete_mentor),
        )
        .route("/mentors/{id}/book", post(mentors::book_session))
        .route("/bookings", get(bookings::list_bookings))
        .route(
            "/bookings/analytics/weekly",
            get(bookings::weekly_analytics),
        )
        .route(
            "/bookings/analytics/weekly-report",
            post(bookings::weekly_report),
        )
        .route(
            "/bookings/{id}",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route(
            "/bookings/{id}/status",
            get(bookings::get_status).put(bookings::update_status),
        )
        .route("/bookings/{id}/feedback", put(bookings::add_feedback))
        .route(
            "/idea-analysis",
            get(ideas::list_ideas).post(ideas::create_idea),
        )
        .route("/idea-analysis/public/search", get(ideas::public_search))
        .route("/idea-analysis/public/trending", get(ideas::trending))
        .route(
            "/idea-analysis/{id}",
            get(ideas::get_idea).delete(ideas::delete_idea),
        )
        .route("/idea-analysis/{id}/analysis", put(ideas::attach_analysis))
        .route("/idea-analysis/{id}/analyze", post(ideas::analyze_idea))
        .route("/idea-analysis/{id}/interaction", put(ideas::interact))
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/users/login", post(users::record_login))
        .route("/users/idea-analysis", get(users::user_ideas))
        .route("/users/stats", get(users::stats))
        .route("/users/search", get(users::search))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.storage.health_check().await {
        Ok(health) if health.healthy => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "storage": health,
            })),
        ),
        Ok(health) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "version": env!("CARGO_PKG_VERSION"),
                "storage": health,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "down", "error": e.to_string() })),
        ),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
