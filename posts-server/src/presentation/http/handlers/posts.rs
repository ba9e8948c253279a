use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::envelope::{Envelope, PostContent, PostItem};
use crate::domain::page::PageRequest;
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::middleware::auth::BearerToken;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
}

impl PaginationQuery {
    fn into_page_request(self) -> AppResult<PageRequest> {
        self.validate()?;
        Ok(PageRequest::new(
            self.page.unwrap_or(PageRequest::DEFAULT_PAGE),
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )?)
    }
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    AppJson(dto): AppJson<CreatePostDto>,
) -> AppResult<Envelope<PostContent>> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
    };

    Ok(state.post_service.create_post(req, &token).await?)
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> AppResult<Envelope<Vec<PostItem>>> {
    let page = query.into_page_request()?;
    Ok(state.post_service.get_all_posts(page).await?)
}

pub(crate) async fn user_posts(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> AppResult<Envelope<Vec<PostItem>>> {
    let page = query.into_page_request()?;
    Ok(state
        .post_service
        .get_posts_by_user(&username, page)
        .await?)
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    AppPath(post_id): AppPath<String>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> AppResult<Envelope<PostContent>> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
    };

    Ok(state
        .post_service
        .update_post(parse_post_id(&post_id), req, &token)
        .await?)
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    AppPath(post_id): AppPath<String>,
) -> AppResult<Envelope<()>> {
    Ok(state
        .post_service
        .delete_post(parse_post_id(&post_id), &token)
        .await?)
}

// A malformed id names no post. Nil is never stored, so the token is still
// verified before the lookup misses.
fn parse_post_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or(Uuid::nil())
}
