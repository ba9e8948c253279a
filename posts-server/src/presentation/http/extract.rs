use axum::extract::{FromRequest, FromRequestParts, Path, Query};

use super::app_error::AppError;

/// `Json` whose rejection is rendered as an error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub(crate) struct AppJson<T>(pub(crate) T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub(crate) struct AppQuery<T>(pub(crate) T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub(crate) struct AppPath<T>(pub(crate) T);
