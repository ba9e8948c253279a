use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub password_hash_memory_kib: u32,
    pub password_hash_iterations: u32,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let storage = parse_storage_backend()?;

        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let access_token_ttl_seconds = parse_i64_env("ACCESS_TOKEN_TTL_SECONDS", 15 * 60)?;
        let refresh_token_ttl_seconds =
            parse_i64_env("REFRESH_TOKEN_TTL_SECONDS", 7 * 24 * 60 * 60)?;

        let password_hash_memory_kib = parse_u32_env("PASSWORD_HASH_MEMORY_KIB", 19 * 1024)?;
        let password_hash_iterations = parse_u32_env("PASSWORD_HASH_ITERATIONS", 2)?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            storage,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            password_hash_memory_kib,
            password_hash_iterations,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        })
    }
}

fn parse_storage_backend() -> Result<StorageBackend> {
    let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string());
    match backend.trim().to_ascii_lowercase().as_str() {
        "postgres" => {
            let database_url =
                get_required("DATABASE_URL").context("DATABASE_URL is required")?;
            let max_connections = parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?;
            Ok(StorageBackend::Postgres {
                database_url,
                max_connections,
            })
        }
        "memory" => Ok(StorageBackend::Memory),
        other => Err(anyhow!(
            "STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"
        )),
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + ToString + PartialOrd + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value <= T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    parse_positive_env(key, default)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    parse_positive_env(key, default)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    parse_positive_env(key, default)
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    parse_positive_env(key, default)
}
