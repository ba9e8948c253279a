use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{MemoryStore, StoredUser};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.store.write()?;

        for stored in state.users.values() {
            if stored.user.email == input.email {
                return Err(DomainError::Conflict("email".to_string()));
            }
            if input.username.is_some() && stored.user.username == input.username {
                return Err(DomainError::Conflict("username".to_string()));
            }
        }

        let user = User::new(Uuid::new_v4(), input.email, input.username, Utc::now())?;
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: input.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.store.read()?;
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.store.read()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email == email)
            .map(|stored| UserCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.store.read()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.username.as_deref() == Some(username))
            .map(|stored| stored.user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.store.write()?;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.posts.retain(|_, stored| stored.post.owner_id != id);
        Ok(true)
    }
}
