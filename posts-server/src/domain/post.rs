use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) owner_id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// A feed entry: the post joined with its owner's username.
#[derive(Debug, Clone)]
pub(crate) struct PostWithAuthor {
    pub(crate) post: Post,
    pub(crate) username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
        })
    }
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.title.is_none() && self.content.is_none() {
            return Err(DomainError::Validation {
                field: "payload",
                message: "at least one of title or content is required",
            });
        }

        Ok(Self {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            content: self.content.as_deref().map(normalize_content).transpose()?,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: Uuid,
        title: impl Into<String>,
        content: impl Into<String>,
        owner_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_not_nil("id", id)?;
        validate_not_nil("owner_id", owner_id)?;
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            content,
            owner_id,
            created_at,
            updated_at,
        })
    }
}

fn validate_not_nil(field: &'static str, value: Uuid) -> Result<(), DomainError> {
    if value.is_nil() {
        return Err(DomainError::Validation {
            field,
            message: "must not be nil",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}
