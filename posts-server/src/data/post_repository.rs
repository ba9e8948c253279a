use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::page::PageRequest;
use crate::domain::post::{Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) owner_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

/// Scope shared by the list and count queries of one feed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PostFilter {
    pub(crate) owner_id: Option<Uuid>,
}

impl PostFilter {
    pub(crate) fn all() -> Self {
        Self::default()
    }

    pub(crate) fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
        }
    }
}

/// Post store. The `*_owned` mutations are single conditional operations
/// matching both id and owner; `None` / `false` means no such owned post.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post_owned(&self, post_id: Uuid, owner_id: Uuid) -> Result<bool, DomainError>;
    /// Newest first.
    async fn list_posts(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithAuthor>, DomainError>;
    async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError>;
}

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        (**self).create_post(input).await
    }

    async fn update_post_owned(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        (**self).update_post_owned(post_id, owner_id, patch).await
    }

    async fn delete_post_owned(&self, post_id: Uuid, owner_id: Uuid) -> Result<bool, DomainError> {
        (**self).delete_post_owned(post_id, owner_id).await
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithAuthor>, DomainError> {
        (**self).list_posts(filter, page).await
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError> {
        (**self).count_posts(filter).await
    }
}
