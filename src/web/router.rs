//! Router configuration for the JSON API.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_email, delete_email, get_email, get_email_batch, update_email, AppState,
};

/// Create the email API router.
///
/// Each route answers a single method; any other method gets 405.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let email_routes = Router::new()
        .route("/create", post(create_email))
        .route("/get", get(get_email))
        .route("/getbatch", get(get_email_batch))
        .route("/update", put(update_email))
        .route("/delete", post(delete_email));

    Router::new()
        .nest("/email", email_routes)
        .merge(create_health_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
