use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::DomainError;

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) email: String,
    pub(crate) username: Option<String>,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.password != self.confirm_password {
            return Err(DomainError::Validation {
                field: "confirmPassword",
                message: "must match password",
            });
        }

        let email = normalize_email(&self.email)?;
        let username = self
            .username
            .as_deref()
            .map(normalize_username)
            .transpose()?;

        let password_len = self.password.chars().count();
        if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password_len) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }

        Ok(Self {
            email,
            username,
            password: self.password,
            confirm_password: self.confirm_password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DomainError::Validation {
                field: "email",
                message: "must not be empty",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email: email.to_string(),
            password: self.password,
        })
    }
}

/// Public view of an account. The password hash never leaves the data layer
/// except through [`crate::data::user_repository::UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) username: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: Uuid,
        email: impl Into<String>,
        username: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id.is_nil() {
            return Err(DomainError::Validation {
                field: "id",
                message: "must not be nil",
            });
        }
        let email = normalize_email(&email.into())?;
        let username = username.as_deref().map(normalize_username).transpose()?;

        Ok(Self {
            id,
            email,
            username,
            created_at,
        })
    }
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(2..=64).contains(&len) {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 2..64 chars",
        });
    }
    Ok(username.to_string())
}

// Emails are unique as stored, so only surrounding whitespace is dropped.
fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email.to_string())
}
