use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;

pub(crate) mod http;

pub(crate) type SharedUserRepository = Arc<dyn UserRepository>;
pub(crate) type SharedPostRepository = Arc<dyn PostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<SharedUserRepository>>,
    pub(crate) post_service: Arc<PostService<SharedUserRepository, SharedPostRepository>>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<SharedUserRepository>>,
        post_service: Arc<PostService<SharedUserRepository, SharedPostRepository>>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
        }
    }
}
