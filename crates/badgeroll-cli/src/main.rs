//! badgeroll - member registration and badge preparation from the terminal.
//!
//! Every command goes through the synchronization coordinator, so listing
//! keeps working from the local cache while the member directory is offline.

mod cli;
mod commands;
mod photo;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use badgeroll_core::cache::CacheManager;
use badgeroll_core::{Config, Coordinator, RemoteHandle};

use cli::{Cli, Command};

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "badgeroll.log";

/// Initialize the tracing subscriber: stderr plus a daily log file.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::load()?;
    let cache_dir = config.cache_dir()?;
    let cache = CacheManager::new(cache_dir.clone())?;

    let _guard = init_tracing(&cache_dir);
    info!(command = ?cli.command, "badgeroll starting");

    let coordinator = Coordinator::new(RemoteHandle::from_config(&config), cache)
        .with_country_prefix(config.country_prefix());

    let json = cli.json;
    match cli.command {
        Command::Status => commands::status(&coordinator, json).await,
        Command::Configure(args) => commands::configure(args),
        Command::List { limit } => commands::list(&coordinator, limit, json).await,
        Command::Show { id } => commands::show(&coordinator, &id, json).await,
        Command::Register(args) => commands::register(&coordinator, args, json).await,
        Command::Update(args) => commands::update(&coordinator, args, json).await,
        Command::Delete { id } => commands::delete(&coordinator, &id, json).await,
        Command::Export { output } => commands::export(&coordinator, output, json).await,
        Command::Import { path } => commands::import(&coordinator, path, json).await,
        Command::Stats => commands::stats(&coordinator, json).await,
        Command::Badges { id } => commands::badges(&coordinator, id.as_deref()).await,
    }
}
