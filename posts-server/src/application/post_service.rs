use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::envelope::{Envelope, PostContent, PostItem};
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageMeta, PageRequest};
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::domain::user::User;
use crate::infrastructure::jwt::TokenService;

pub(crate) struct PostService<U: UserRepository, P: PostRepository> {
    users: U,
    posts: P,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository, P: PostRepository> PostService<U, P> {
    pub(crate) fn new(users: U, posts: P, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            posts,
            tokens,
        }
    }

    pub(crate) async fn create_post(
        &self,
        req: CreatePostRequest,
        token: &str,
    ) -> Result<Envelope<PostContent>, DomainError> {
        let caller = self.authenticate(token).await?;
        let req = req.validate()?;

        let post = self
            .posts
            .create_post(NewPost {
                title: req.title,
                content: req.content,
                owner_id: caller.id,
            })
            .await
            // the caller was deleted after authentication
            .map_err(|err| match err {
                DomainError::NotFound(_) => DomainError::invalid_token(),
                other => other,
            })?;

        info!(post_id = %post.id, owner_id = %caller.id, "post created");
        let id = post.id;
        Ok(Envelope::created("Post created successfully", PostContent::from(post)).with_id(id))
    }

    /// Global feed, newest first. No authentication.
    pub(crate) async fn get_all_posts(
        &self,
        page: PageRequest,
    ) -> Result<Envelope<Vec<PostItem>>, DomainError> {
        let page = self.fetch_page(PostFilter::all(), page).await?;
        Ok(Envelope::paged("Posts retrieved successfully", page))
    }

    pub(crate) async fn get_posts_by_user(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<Envelope<Vec<PostItem>>, DomainError> {
        let owner = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let page = self.fetch_page(PostFilter::owned_by(owner.id), page).await?;
        let message = if page.meta.total_items == 0 {
            "No posts found for this user"
        } else {
            "Posts retrieved successfully"
        };
        Ok(Envelope::paged(message, page))
    }

    /// Ownership-scoped: a post owned by someone else is reported exactly
    /// like a missing one.
    pub(crate) async fn update_post(
        &self,
        post_id: Uuid,
        req: UpdatePostRequest,
        token: &str,
    ) -> Result<Envelope<PostContent>, DomainError> {
        let caller = self.authenticate(token).await?;
        let req = req.validate()?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
        };
        let post = self
            .posts
            .update_post_owned(post_id, caller.id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        info!(%post_id, owner_id = %caller.id, "post updated");
        Ok(Envelope::ok("Post updated successfully", PostContent::from(post)).with_id(post_id))
    }

    pub(crate) async fn delete_post(
        &self,
        post_id: Uuid,
        token: &str,
    ) -> Result<Envelope<()>, DomainError> {
        let caller = self.authenticate(token).await?;

        if !self.posts.delete_post_owned(post_id, caller.id).await? {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        info!(%post_id, owner_id = %caller.id, "post deleted");
        Ok(Envelope::ok("Post deleted successfully", ()).with_id(post_id))
    }

    // A valid signature is not enough: the subject must still exist.
    async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| DomainError::invalid_token())?;

        self.users
            .find_by_id(claims.uid)
            .await?
            .ok_or_else(DomainError::invalid_token)
    }

    async fn fetch_page(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostItem>, DomainError> {
        let total_items = self.posts.count_posts(filter).await?;
        let items: Vec<PostItem> = self
            .posts
            .list_posts(filter, request)
            .await?
            .into_iter()
            .map(PostItem::from)
            .collect();

        debug!(
            total_items,
            returned = items.len(),
            page = request.page(),
            "posts page fetched"
        );
        let meta = PageMeta::new(request, total_items, items.len());
        Ok(Page { items, meta })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::PostService;
    use crate::application::auth_service::AuthService;
    use crate::application::credentials::CredentialManager;
    use crate::application::credentials::tests::fast_params;
    use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
    use crate::data::repositories::memory::MemoryStore;
    use crate::data::repositories::memory::post_repository::MemoryPostRepository;
    use crate::data::repositories::memory::user_repository::MemoryUserRepository;
    use crate::domain::error::{AuthFailure, DomainError};
    use crate::domain::page::PageRequest;
    use crate::domain::post::{CreatePostRequest, Post, PostWithAuthor, UpdatePostRequest};
    use crate::domain::user::{LoginRequest, RegisterRequest};
    use crate::infrastructure::jwt::TokenService;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    struct Harness {
        auth: AuthService<MemoryUserRepository>,
        posts: PostService<MemoryUserRepository, MemoryPostRepository>,
        tokens: Arc<TokenService>,
    }

    impl Harness {
        fn new() -> Self {
            let store = MemoryStore::new();
            let users = MemoryUserRepository::new(store.clone());
            let tokens = Arc::new(TokenService::new(SECRET, 900, 3600));
            let credentials = CredentialManager::new(users.clone(), fast_params())
                .expect("manager must build");
            Self {
                auth: AuthService::new(users.clone(), credentials, tokens.clone()),
                posts: PostService::new(users, MemoryPostRepository::new(store), tokens.clone()),
                tokens,
            }
        }

        /// Registers and logs in, returning `(user_id, access_token)`.
        async fn sign_up(&self, username: &str) -> (Uuid, String) {
            let email = format!("{username}@x.com");
            let registered = self
                .auth
                .user_register(RegisterRequest {
                    email: email.clone(),
                    username: Some(username.to_string()),
                    password: "pass1234".to_string(),
                    confirm_password: "pass1234".to_string(),
                })
                .await
                .expect("register must succeed");
            let login = self
                .auth
                .user_login(LoginRequest {
                    email,
                    password: "pass1234".to_string(),
                })
                .await
                .expect("login must succeed");
            (
                registered.id.expect("id must be set"),
                login.payload.access_token,
            )
        }

        async fn create(&self, token: &str, title: &str) -> Uuid {
            self.posts
                .create_post(
                    CreatePostRequest {
                        title: title.to_string(),
                        content: "content".to_string(),
                    },
                    token,
                )
                .await
                .expect("create must succeed")
                .id
                .expect("id must be set")
        }
    }

    fn page(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).expect("valid page request")
    }

    #[tokio::test]
    async fn alice_scenario_end_to_end() {
        let h = Harness::new();
        let (alice_id, alice_token) = h.sign_up("alice").await;
        let (_, bob_token) = h.sign_up("bob").await;

        let created = h
            .posts
            .create_post(
                CreatePostRequest {
                    title: "T".to_string(),
                    content: "C".to_string(),
                },
                &alice_token,
            )
            .await
            .expect("create must succeed");
        assert_eq!(created.status_code, 201);
        assert_eq!(created.payload.title, "T");
        assert_eq!(created.payload.content, "C");
        let post_id = created.id.expect("id must be set");

        let feed = h
            .posts
            .get_posts_by_user("alice", page(1, 10))
            .await
            .expect("feed must load");
        assert_eq!(feed.payload.len(), 1);
        assert_eq!(feed.payload[0].username.as_deref(), Some("alice"));
        assert_eq!(feed.payload[0].user_id, alice_id);

        let err = h
            .posts
            .delete_post(post_id, &bob_token)
            .await
            .expect_err("non-owner delete must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let deleted = h
            .posts
            .delete_post(post_id, &alice_token)
            .await
            .expect("owner delete must succeed");
        assert_eq!(deleted.status_code, 200);
        assert_eq!(deleted.id, Some(post_id));
        let body = serde_json::to_value(&deleted).expect("must serialize");
        assert!(body["payload"].is_null());
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let h = Harness::new();
        let err = h
            .posts
            .get_posts_by_user("ghost", page(1, 10))
            .await
            .expect_err("ghost must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn existing_user_without_posts_gets_empty_page() {
        let h = Harness::new();
        h.sign_up("alice").await;

        let feed = h
            .posts
            .get_posts_by_user("alice", page(1, 10))
            .await
            .expect("feed must load");
        assert_eq!(feed.status_code, 200);
        assert!(feed.payload.is_empty());
        let meta = feed.meta.expect("meta must be set");
        assert_eq!(meta.total_items, 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.current_page, 1);
    }

    #[tokio::test]
    async fn pagination_over_twelve_posts() {
        let h = Harness::new();
        let (_, token) = h.sign_up("alice").await;
        for i in 0..12 {
            h.create(&token, &format!("post {i}")).await;
        }

        let second = h
            .posts
            .get_all_posts(page(2, 5))
            .await
            .expect("page must load");
        let meta = second.meta.expect("meta must be set");
        assert_eq!(meta.item_count, 5);
        assert_eq!(meta.total_items, 12);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.items_per_page, 5);
        assert_eq!(second.payload[0].title, "post 6");

        let beyond = h
            .posts
            .get_all_posts(page(7, 5))
            .await
            .expect("out-of-range page must not error");
        let meta = beyond.meta.expect("meta must be set");
        assert_eq!(meta.item_count, 0);
        assert_eq!(meta.current_page, 7);
        assert!(beyond.payload.is_empty());
    }

    #[tokio::test]
    async fn per_user_feed_only_counts_owner_posts() {
        let h = Harness::new();
        let (_, alice) = h.sign_up("alice").await;
        let (_, bob) = h.sign_up("bob").await;
        h.create(&alice, "a").await;
        h.create(&bob, "b1").await;
        h.create(&bob, "b2").await;

        let feed = h
            .posts
            .get_posts_by_user("bob", page(1, 10))
            .await
            .expect("feed must load");
        let meta = feed.meta.expect("meta must be set");
        assert_eq!(meta.total_items, 2);
        assert!(
            feed.payload
                .iter()
                .all(|item| item.username.as_deref() == Some("bob"))
        );
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let h = Harness::new();
        let (_, token) = h.sign_up("alice").await;
        let post_id = h.create(&token, "original").await;

        let updated = h
            .posts
            .update_post(
                post_id,
                UpdatePostRequest {
                    title: Some("renamed".to_string()),
                    content: None,
                },
                &token,
            )
            .await
            .expect("update must succeed");
        assert_eq!(updated.payload.title, "renamed");
        assert_eq!(updated.payload.content, "content");
    }

    #[tokio::test]
    async fn non_owner_update_is_not_found_not_auth() {
        let h = Harness::new();
        let (_, alice) = h.sign_up("alice").await;
        let (_, bob) = h.sign_up("bob").await;
        let post_id = h.create(&alice, "mine").await;

        let err = h
            .posts
            .update_post(
                post_id,
                UpdatePostRequest {
                    title: Some("stolen".to_string()),
                    content: None,
                },
                &bob,
            )
            .await
            .expect_err("non-owner update must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let missing = h
            .posts
            .update_post(
                Uuid::new_v4(),
                UpdatePostRequest {
                    title: Some("x".to_string()),
                    content: None,
                },
                &bob,
            )
            .await
            .expect_err("missing post must fail");
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&missing)
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_token_and_empty_fields() {
        let h = Harness::new();
        let err = h
            .posts
            .create_post(
                CreatePostRequest {
                    title: "T".to_string(),
                    content: "C".to_string(),
                },
                "garbage",
            )
            .await
            .expect_err("garbage token must fail");
        assert!(matches!(err, DomainError::Auth(AuthFailure::InvalidToken)));

        let (_, token) = h.sign_up("alice").await;
        let err = h
            .posts
            .create_post(
                CreatePostRequest {
                    title: String::new(),
                    content: "C".to_string(),
                },
                &token,
            )
            .await
            .expect_err("empty title must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_rejected_before_expiry() {
        let h = Harness::new();
        let (alice_id, token) = h.sign_up("alice").await;
        assert!(h.tokens.verify(&token).is_ok());

        h.auth
            .delete_user(alice_id)
            .await
            .expect("delete must succeed");

        let err = h
            .posts
            .create_post(
                CreatePostRequest {
                    title: "T".to_string(),
                    content: "C".to_string(),
                },
                &token,
            )
            .await
            .expect_err("deleted subject must fail");
        assert!(matches!(err, DomainError::Auth(AuthFailure::InvalidToken)));
    }

    #[derive(Clone, Default)]
    struct FakePostRepo {
        owner_vanished: bool,
        update_owned_call: Arc<Mutex<Option<(Uuid, Uuid, PostPatch)>>>,
        count_filter: Arc<Mutex<Option<PostFilter>>>,
        list_filter: Arc<Mutex<Option<PostFilter>>>,
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            if self.owner_vanished {
                return Err(DomainError::NotFound("user".to_string()));
            }
            let now = Utc::now();
            Post::new(
                Uuid::new_v4(),
                input.title,
                input.content,
                input.owner_id,
                now,
                now,
            )
        }

        async fn update_post_owned(
            &self,
            post_id: Uuid,
            owner_id: Uuid,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self
                .update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned") = Some((post_id, owner_id, patch));
            Ok(None)
        }

        async fn delete_post_owned(
            &self,
            _post_id: Uuid,
            _owner_id: Uuid,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list_posts(
            &self,
            filter: PostFilter,
            _page: PageRequest,
        ) -> Result<Vec<PostWithAuthor>, DomainError> {
            *self.list_filter.lock().expect("list_filter mutex poisoned") = Some(filter);
            Ok(Vec::new())
        }

        async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError> {
            *self.count_filter.lock().expect("count_filter mutex poisoned") = Some(filter);
            Ok(0)
        }
    }

    fn fake_harness() -> (
        PostService<MemoryUserRepository, FakePostRepo>,
        FakePostRepo,
        MemoryUserRepository,
        Arc<TokenService>,
    ) {
        let users = MemoryUserRepository::new(MemoryStore::new());
        let repo = FakePostRepo::default();
        let tokens = Arc::new(TokenService::new(SECRET, 900, 3600));
        let service = PostService::new(users.clone(), repo.clone(), tokens.clone());
        (service, repo, users, tokens)
    }

    #[tokio::test]
    async fn update_uses_single_owner_scoped_call() {
        use crate::data::user_repository::{NewUser, UserRepository};

        let (service, repo, users, tokens) = fake_harness();
        let user = users
            .create_user(NewUser {
                email: "alice@x.com".to_string(),
                username: Some("alice".to_string()),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created");
        let token = tokens
            .issue(user.id, &user.email, chrono::Duration::minutes(5))
            .expect("token must be issued");
        let post_id = Uuid::new_v4();

        let err = service
            .update_post(
                post_id,
                UpdatePostRequest {
                    title: None,
                    content: Some("  body  ".to_string()),
                },
                &token,
            )
            .await
            .expect_err("fake repo reports no owned post");
        assert!(matches!(err, DomainError::NotFound(_)));

        let call = repo
            .update_owned_call
            .lock()
            .expect("update_owned_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(call.0, post_id);
        assert_eq!(call.1, user.id);
        assert!(call.2.title.is_none());
        assert_eq!(call.2.content.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn count_and_list_share_the_same_scope() {
        use crate::data::user_repository::{NewUser, UserRepository};

        let (service, repo, users, _) = fake_harness();
        let user = users
            .create_user(NewUser {
                email: "alice@x.com".to_string(),
                username: Some("alice".to_string()),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created");

        service
            .get_posts_by_user("alice", PageRequest::default())
            .await
            .expect("feed must load");

        let count_filter = repo
            .count_filter
            .lock()
            .expect("count_filter mutex poisoned")
            .expect("count must be called");
        let list_filter = repo
            .list_filter
            .lock()
            .expect("list_filter mutex poisoned")
            .expect("list must be called");
        assert_eq!(count_filter.owner_id, Some(user.id));
        assert_eq!(list_filter.owner_id, Some(user.id));
    }

    #[tokio::test]
    async fn owner_deleted_during_create_is_auth_error() {
        use crate::data::user_repository::{NewUser, UserRepository};

        let users = MemoryUserRepository::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new(SECRET, 900, 3600));
        let repo = FakePostRepo {
            owner_vanished: true,
            ..FakePostRepo::default()
        };
        let service = PostService::new(users.clone(), repo, tokens.clone());
        let user = users
            .create_user(NewUser {
                email: "alice@x.com".to_string(),
                username: Some("alice".to_string()),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created");
        let token = tokens
            .issue(user.id, &user.email, chrono::Duration::minutes(5))
            .expect("token must be issued");

        let err = service
            .create_post(
                CreatePostRequest {
                    title: "T".to_string(),
                    content: "C".to_string(),
                },
                &token,
            )
            .await
            .expect_err("vanished owner must fail");
        assert!(matches!(err, DomainError::Auth(AuthFailure::InvalidToken)));
    }
}
