//! Runs one health check and one lookup against the database in the settings file.
//!
//! Needs a reachable PostgreSQL with a `"user"` table:
//!
//! ```text
//! $ cargo run --bin lookup_demo -- --settings=settings/dev.toml alice
//! ```

use clap::Parser;
use std::sync::Arc;
use user_soap::application_impl::RealLookupService;
use user_soap::application_port::LookupService;
use user_soap::domain_port::UserRepo;
use user_soap::infra_postgres::{PgUserRepo, connect_pool};
use user_soap::logger::*;
use user_soap::settings::parse_settings;
use user_soap::soap::EnvelopeRenderer;

#[derive(Parser, Debug)]
struct DemoCli {
    #[arg(long)]
    settings: Option<String>,
    username: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = DemoCli::parse();
    let logger = Logger::new_bootstrap();

    let settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig::from(&settings.log))?;

    let pool = connect_pool(&settings.database).await?;
    let repo: Arc<dyn UserRepo> = Arc::new(PgUserRepo::new(pool.clone()));
    let service = RealLookupService::new(repo);

    match service.check_health().await {
        Ok(()) => println!("health: ok"),
        Err(e) => println!("health: {}", e),
    }

    match service.get_user_by_username(Some(&cli.username)).await {
        Ok(user) => {
            let renderer = EnvelopeRenderer::new(settings.soap.escape_values);
            println!("{}", renderer.render_user(&user));
        }
        Err(e) => warn!("lookup failed: {}", e),
    }

    pool.close().await;
    Ok(())
}
