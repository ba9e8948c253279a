use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::application::auth_service::AuthService;
use crate::application::credentials::{CredentialManager, HashingParams};
use crate::application::post_service::PostService;
use crate::data::repositories::memory::MemoryStore;
use crate::data::repositories::memory::post_repository::MemoryPostRepository;
use crate::data::repositories::memory::user_repository::MemoryUserRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::jwt::TokenService;
use crate::infrastructure::settings::{Settings, StorageBackend};
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::limits::apply_limits;
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::http::routes;
use crate::presentation::{AppState, SharedPostRepository, SharedUserRepository};

/// Binds `settings.http_addr` and serves until Ctrl-C.
pub async fn run(settings: Settings) -> Result<()> {
    let app = build_app(&settings).await?;

    let listener = TcpListener::bind(&settings.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.http_addr))?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Fully layered router for the configured storage backend.
pub async fn build_app(settings: &Settings) -> Result<Router> {
    let state = build_state(settings).await?;

    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    apply_cors(app, settings)
}

pub(crate) fn build_router(state: AppState) -> Router {
    routes::router(state)
}

async fn build_state(settings: &Settings) -> Result<AppState> {
    let (users, posts) = match &settings.storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = create_pool(database_url, *max_connections).await?;
            run_migrations(&pool).await?;
            let users: SharedUserRepository = Arc::new(PostgresUserRepository::new(pool.clone()));
            let posts: SharedPostRepository = Arc::new(PostgresPostRepository::new(pool));
            (users, posts)
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            let users: SharedUserRepository = Arc::new(MemoryUserRepository::new(store.clone()));
            let posts: SharedPostRepository = Arc::new(MemoryPostRepository::new(store));
            (users, posts)
        }
    };

    let tokens = Arc::new(TokenService::new(
        &settings.jwt_secret,
        settings.access_token_ttl_seconds,
        settings.refresh_token_ttl_seconds,
    ));
    let params = HashingParams {
        memory_kib: settings.password_hash_memory_kib,
        iterations: settings.password_hash_iterations,
    };

    let credentials = CredentialManager::new(users.clone(), params)
        .context("invalid password hashing parameters")?;
    let auth_service = AuthService::new(users.clone(), credentials, tokens.clone());
    let post_service = PostService::new(users, posts, tokens);

    Ok(AppState::new(Arc::new(auth_service), Arc::new(post_service)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
