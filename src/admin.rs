//! Administrative command handlers: migrations, statistics and a log store
//! connectivity check.

use crate::config::Config;
use crate::error::AppResult;
use crate::log_store::MongoLogStore;
use crate::server::connect_repository;
use crate::store::{LogStore, UrlStore};
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Show url and user statistics
    Stats,

    /// Check that the log store answers
    PingLogStore,
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => migrate(config).await,
        AdminCommands::Stats => stats(config).await,
        AdminCommands::PingLogStore => ping_log_store(config).await,
    }
}

async fn migrate(config: Config) -> AppResult<()> {
    info!("Running database migrations...");

    let repository = connect_repository(&config).await?;
    repository.run_migrations().await?;

    info!("Migrations completed successfully");
    Ok(())
}

async fn stats(config: Config) -> AppResult<()> {
    info!("Fetching statistics...");

    let repository = connect_repository(&config).await?;
    let stats = repository.stats().await?;

    println!("\n=== linkforge Statistics ===");
    println!("Total URLs:      {}", stats.total_urls);
    println!("Active URLs:     {}", stats.active_urls);
    println!("Total Clicks:    {}", stats.total_clicks);
    println!("Total Users:     {}", stats.total_users);
    println!();

    Ok(())
}

async fn ping_log_store(config: Config) -> AppResult<()> {
    info!("Pinging log store...");

    let log_store = MongoLogStore::connect(&config.log_store).await?;
    log_store.ping().await?;

    info!(
        database = %config.log_store.database,
        "Log store responded"
    );
    Ok(())
}
