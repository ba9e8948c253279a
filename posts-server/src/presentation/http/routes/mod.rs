use axum::{Router, routing::get};

use super::handlers::health::healthz;
use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/auth", auth::router())
        .nest("/posts", posts::router())
        .with_state(state)
}
