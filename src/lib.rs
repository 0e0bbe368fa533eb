pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Normalize,
    Rank {
        combination: Option<String>,
        max_investment: Option<u64>,
    },
    Benchmarks,
    Indicators,
    Update {
        skip_download: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fcirank starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(paths = ?config.paths, top_n = config.top_n, "Loaded config");

    match command {
        AppCommand::Normalize => cli::normalize::run(&config),
        AppCommand::Rank {
            combination,
            max_investment,
        } => cli::rank::run(&config, combination.as_deref(), max_investment).await,
        AppCommand::Benchmarks => cli::benchmarks::run(&config),
        AppCommand::Indicators => cli::indicators::run(&config).await,
        AppCommand::Update { skip_download } => cli::update::run(&config, skip_download).await,
    }
}
