use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins over `default_level`; noisy dependencies are capped unless
/// named explicitly.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(default_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn default_directives(level: &str) -> String {
    if level.contains('=') {
        return level.to_string();
    }
    format!("{level},sqlx=warn,tower_http=info")
}

#[cfg(test)]
mod tests {
    use super::default_directives;

    #[test]
    fn plain_level_gets_dependency_caps() {
        assert_eq!(default_directives("debug"), "debug,sqlx=warn,tower_http=info");
    }

    #[test]
    fn explicit_directives_are_kept() {
        assert_eq!(default_directives("posts_server=trace"), "posts_server=trace");
    }
}
