use std::time::Duration;

use axum::{BoxError, Router, error_handling::HandleErrorLayer, response::IntoResponse};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::error::Elapsed};
use tower_http::limit::RequestBodyLimitLayer;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::app_error::AppError;

/// Body size cap, per-request timeout and an in-flight cap shared by all routes.
pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_layer_error))
            .timeout(Duration::from_secs(settings.http_request_timeout_secs))
            .layer(GlobalConcurrencyLimitLayer::new(
                settings.http_concurrency_limit,
            ))
            .layer(RequestBodyLimitLayer::new(
                settings.http_request_body_limit_bytes,
            )),
    )
}

async fn handle_layer_error(err: BoxError) -> impl IntoResponse {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(anyhow::anyhow!("{err}"))
    }
}
