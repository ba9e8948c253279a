use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::page::PageRequest;
use crate::domain::post::{Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct PostWithAuthorRow {
    #[sqlx(flatten)]
    post: PostRow,
    username: Option<String>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, title, content, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn update_post_owned(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post_owned(&self, post_id: Uuid, owner_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Vec<PostWithAuthor>, DomainError> {
        let limit = i64::from(page.limit());
        let offset = i64::try_from(page.offset())
            .map_err(|_| DomainError::Validation {
                field: "page",
                message: "out of range",
            })?;

        let rows = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.content,
                p.owner_id,
                p.created_at,
                p.updated_at,
                u.username
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            WHERE ($1::uuid IS NULL OR p.owner_id = $1)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(filter.owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(PostWithAuthor {
                    post: map_row_to_post(row.post)?,
                    username: row.username,
                })
            })
            .collect()
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts p
            WHERE ($1::uuid IS NULL OR p.owner_id = $1)
            "#,
        )
        .bind(filter.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(count.max(0) as u64)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.content,
        row.owner_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("user".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
