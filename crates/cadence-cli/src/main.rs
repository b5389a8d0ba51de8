use std::sync::Arc;

use cadence_core::db;
use cadence_core::error::CoreError;
use cadence_core::lifecycle::RuleLifecycleManager;
use cadence_core::repository::SqliteRepository;
use cadence_core::scheduler::Scheduler;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use util::LookupError;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        config::Config::default()
    });

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(SqliteRepository::new(db_pool));
    let ctx = commands::Context {
        lifecycle: RuleLifecycleManager::new(repo.clone()),
        scheduler: Scheduler::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            config.scheduler.clone(),
        ),
        account: cli.account.unwrap_or(config.default_account),
        repo,
    };

    let result = match cli.command {
        cli::Commands::Rule(command) => commands::rule::rule_command(&ctx, command).await,
        cli::Commands::Preview(command) => commands::preview::preview_rule(&ctx, command).await,
        cli::Commands::Refresh(command) => commands::refresh::refresh(&ctx, command).await,
        cli::Commands::Done(command) => commands::done::done_task(&ctx, command).await,
        cli::Commands::Complete(command) => {
            commands::complete::complete_occurrence(&ctx, command).await
        }
        cli::Commands::Tasks(command) => commands::tasks::list_tasks(&ctx, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        match core_error {
            CoreError::Configuration(e) => {
                eprintln!("{} Invalid rule: {}", "Error:".style(error_style), e);
            }
            CoreError::RuleNotFound(id) => {
                eprintln!("{} Rule {} not found", "Error:".style(error_style), id.yellow());
            }
            CoreError::InactiveRule(id) => {
                eprintln!("{} Rule {} is disabled", "Error:".style(error_style), id.yellow());
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else if let Some(LookupError::Ambiguous {
        prefix, candidates, ..
    }) = err.downcast_ref::<LookupError>()
    {
        eprintln!("{} Ambiguous ID '{}'.", "Error:".style(error_style), prefix);
        eprintln!("Did you mean one of these?");
        for (id, title) in candidates {
            eprintln!("  {} ({})", id.yellow(), title);
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
