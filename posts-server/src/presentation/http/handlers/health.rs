use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthzResponse {
    status: &'static str,
}

pub(crate) async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
