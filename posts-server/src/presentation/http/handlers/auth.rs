use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::envelope::{Envelope, PublicUser, TokenPayload};
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::AppJson;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterDto {
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 2, max = 64))]
    pub(crate) username: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    pub(crate) confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 254))]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshDto {
    pub(crate) refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteUserDto {
    pub(crate) id: Uuid,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    AppJson(dto): AppJson<RegisterDto>,
) -> AppResult<Envelope<PublicUser>> {
    dto.validate()?;

    let req = RegisterRequest {
        email: dto.email,
        username: dto.username,
        password: dto.password,
        confirm_password: dto.confirm_password,
    };

    Ok(state.auth_service.user_register(req).await?)
}

pub(crate) async fn login(
    State(state): State<AppState>,
    AppJson(dto): AppJson<LoginDto>,
) -> AppResult<Envelope<TokenPayload>> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    Ok(state.auth_service.user_login(req).await?)
}

pub(crate) async fn refresh(
    State(state): State<AppState>,
    AppJson(dto): AppJson<RefreshDto>,
) -> AppResult<Envelope<TokenPayload>> {
    Ok(state
        .auth_service
        .refresh_with_token(dto.refresh_token.trim())
        .await?)
}

/// Unauthenticated administrative removal, kept for test setup.
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    AppJson(dto): AppJson<DeleteUserDto>,
) -> AppResult<Envelope<()>> {
    Ok(state.auth_service.delete_user(dto.id).await?)
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::RegisterDto;

    fn dto(email: &str, username: Option<&str>, password: &str) -> RegisterDto {
        RegisterDto {
            email: email.to_string(),
            username: username.map(str::to_string),
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
    }

    #[test]
    fn register_dto_accepts_optional_username() {
        assert!(dto("alice@x.com", None, "pass1234").validate().is_ok());
        assert!(dto("alice@x.com", Some("al"), "pass1234").validate().is_ok());
    }

    #[test]
    fn register_dto_rejects_bad_fields() {
        assert!(dto("not-an-email", None, "pass1234").validate().is_err());
        assert!(dto("alice@x.com", Some("a"), "pass1234").validate().is_err());
        assert!(dto("alice@x.com", None, "short").validate().is_err());
    }
}
