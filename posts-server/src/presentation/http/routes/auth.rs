use axum::{
    Router,
    routing::{delete, post},
};

use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{delete_user, login, refresh, register};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/delete-user", delete(delete_user))
}
