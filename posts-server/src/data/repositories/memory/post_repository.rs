use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{MemoryStore, StoredPost};
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::page::PageRequest;
use crate::domain::post::{Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct MemoryPostRepository {
    store: MemoryStore,
}

impl MemoryPostRepository {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn matches_filter(post: &Post, filter: &PostFilter) -> bool {
    filter.owner_id.is_none_or(|owner_id| post.owner_id == owner_id)
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.store.write()?;
        if !state.users.contains_key(&input.owner_id) {
            return Err(DomainError::NotFound("user".to_string()));
        }

        let now = Utc::now();
        let post = Post::new(
            Uuid::new_v4(),
            input.title,
            input.content,
            input.owner_id,
            now,
            now,
        )?;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.posts.insert(
            post.id,
            StoredPost {
                post: post.clone(),
                seq,
            },
        );
        Ok(post)
    }

    async fn update_post_owned(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.store.write()?;
        let Some(stored) = state
            .posts
            .get_mut(&post_id)
            .filter(|stored| stored.post.owner_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            stored.post.title = title;
        }
        if let Some(content) = patch.content {
            stored.post.content = content;
        }
        stored.post.updated_at = Utc::now().max(stored.post.created_at);
        Ok(Some(stored.post.clone()))
    }

    async fn delete_post_owned(&self, post_id: Uuid, owner_id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.store.write()?;
        let owned = state
            .posts
            .get(&post_id)
            .is_some_and(|stored| stored.post.owner_id == owner_id);
        if owned {
            state.posts.remove(&post_id);
        }
        Ok(owned)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithAuthor>, DomainError> {
        let state = self.store.read()?;
        let mut matching: Vec<&StoredPost> = state
            .posts
            .values()
            .filter(|stored| matches_filter(&stored.post, &filter))
            .collect();
        matching.sort_by_key(|stored| Reverse((stored.post.created_at, stored.seq)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .map(|stored| PostWithAuthor {
                post: stored.post.clone(),
                username: state
                    .users
                    .get(&stored.post.owner_id)
                    .and_then(|owner| owner.user.username.clone()),
            })
            .collect())
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError> {
        let state = self.store.read()?;
        Ok(state
            .posts
            .values()
            .filter(|stored| matches_filter(&stored.post, &filter))
            .count() as u64)
    }
}
