use anyhow::Result;

use posts_server::infrastructure::logging::init_logging;
use posts_server::infrastructure::settings::Settings;
use posts_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    server::run(settings).await
}
