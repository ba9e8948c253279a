use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, list_posts, update_post, user_posts,
};

// Protected routes take a `BearerToken`; the services verify it.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/create-post", post(create_post))
        .route("/user-posts/{username}", get(user_posts))
        .route("/{post_id}", patch(update_post).delete(delete_post))
}
