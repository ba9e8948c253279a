use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::page::{Page, PageMeta};
use crate::domain::post::{Post, PostWithAuthor};
use crate::domain::user::User;
use crate::infrastructure::jwt::TokenPair;

/// Uniform response wrapper shared by every operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<Uuid>,
    pub(crate) status_code: u16,
    pub(crate) message: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) payload: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<PageMeta>,
}

impl<T> Envelope<T> {
    pub(crate) fn new(status_code: u16, message: impl Into<String>, payload: T) -> Self {
        Self {
            id: None,
            status_code,
            message: message.into(),
            timestamp: Utc::now(),
            payload,
            meta: None,
        }
    }

    pub(crate) fn ok(message: impl Into<String>, payload: T) -> Self {
        Self::new(200, message, payload)
    }

    pub(crate) fn created(message: impl Into<String>, payload: T) -> Self {
        Self::new(201, message, payload)
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}

impl<T> Envelope<Vec<T>> {
    pub(crate) fn paged(message: impl Into<String>, page: Page<T>) -> Self {
        let mut envelope = Self::ok(message, page.items);
        envelope.meta = Some(page.meta);
        envelope
    }
}

/// Public fields of a freshly registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublicUser {
    pub(crate) email: String,
    pub(crate) username: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            username: user.username,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenPayload {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

impl From<TokenPair> for TokenPayload {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PostContent {
    pub(crate) title: String,
    pub(crate) content: String,
}

impl From<Post> for PostContent {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            content: post.content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostItem {
    pub(crate) id: Uuid,
    pub(crate) username: Option<String>,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) user_id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<PostWithAuthor> for PostItem {
    fn from(item: PostWithAuthor) -> Self {
        let PostWithAuthor { post, username } = item;
        Self {
            id: post.id,
            username,
            title: post.title,
            content: post.content,
            user_id: post.owner_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
