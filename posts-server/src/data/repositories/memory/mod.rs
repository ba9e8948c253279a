use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::User;

pub(crate) mod post_repository;
pub(crate) mod user_repository;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct StoredPost {
    post: Post,
    // insertion order, breaks created_at ties
    seq: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, StoredUser>,
    posts: HashMap<Uuid, StoredPost>,
    next_seq: u64,
}

/// Process-local data store backing both memory repositories.
///
/// Users and posts sit behind a single lock so that deleting a user can
/// remove their posts in the same critical section. Intended for tests/dev.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Unexpected("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Unexpected("memory store lock poisoned".to_string()))
    }
}
