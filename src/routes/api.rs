//! REST route configuration.
//!
//! # Endpoints
//!
//! - `GET /healthcheck` - liveness probe
//! - `POST /start_call` - TwiML bootstrap for Twilio Voice webhooks

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the REST router.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthcheck", get(handlers::api::health_check))
        .route("/start_call", post(handlers::twiml::start_call))
        .layer(TraceLayer::new_for_http())
}
