use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) email: String,
    pub(crate) username: Option<String>,
    pub(crate) password_hash: String,
}

/// User directory. Uniqueness of email and username is enforced by the
/// store: a duplicate insert fails with [`DomainError::Conflict`].
#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Removes the user and every post they own. Returns `false` if absent.
    async fn delete_user(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        (**self).create_user(input).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        (**self).find_by_username(username).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete_user(id).await
    }
}
