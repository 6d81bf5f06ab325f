use anyhow::Context;
use clap::Parser;
use pillbox_core::config::PillboxConfig;
use pillbox_store::open_store;

mod cli;
mod commands;
mod views;

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables still win.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pillbox=info,pillbox_scheduler=info,pillbox_store=info,pillbox_notify=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > PILLBOX_CONFIG env > ~/.pillbox/pillbox.toml
    // a broken file still keeps the environment overrides
    let config = PillboxConfig::load(cli.config.as_deref())
        .or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults and environment", e);
            PillboxConfig::from_env()
        })
        .unwrap_or_else(|e| {
            tracing::warn!("Environment config invalid ({}), using defaults", e);
            PillboxConfig::default()
        });

    match cli.command {
        Command::Add(args) => {
            let store = open_store(&config.store).context("opening record store")?;
            commands::add(store.as_ref(), args).await
        }
        Command::List => {
            let store = open_store(&config.store).context("opening record store")?;
            commands::list(store.as_ref()).await
        }
        Command::Edit { id, fields } => {
            let store = open_store(&config.store).context("opening record store")?;
            commands::edit(store.as_ref(), id, fields).await
        }
        Command::Remove { id, hard } => {
            let store = open_store(&config.store).context("opening record store")?;
            commands::remove(store.as_ref(), id, hard).await
        }
        Command::Run { dry_run } => commands::run(&config, dry_run).await,
        Command::Tick { at, dry_run } => commands::tick(&config, at.as_deref(), dry_run).await,
        Command::SendTest {
            destination,
            message,
            template,
            vars,
        } => {
            commands::send_test(&config, &destination, &message, template.as_deref(), &vars).await
        }
    }
}
