use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fcirank::cli::setup::setup;
use fcirank::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fcirank::AppCommand {
    fn from(cmd: Commands) -> fcirank::AppCommand {
        match cmd {
            Commands::Normalize => fcirank::AppCommand::Normalize,
            Commands::Rank {
                combination,
                max_investment,
            } => fcirank::AppCommand::Rank {
                combination,
                max_investment,
            },
            Commands::Benchmarks => fcirank::AppCommand::Benchmarks,
            Commands::Indicators => fcirank::AppCommand::Indicators,
            Commands::Update { skip_download } => fcirank::AppCommand::Update { skip_download },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Normalize the downloaded spreadsheet into the fund table
    Normalize,
    /// Display the top funds for one or every filter combination
    Rank {
        /// Combination identifier, e.g. `base` or `sa_ytd_usd`
        #[arg(long)]
        combination: Option<String>,
        /// Only include funds whose minimum investment is below this amount
        #[arg(long)]
        max_investment: Option<u64>,
    },
    /// Display remunerated account benchmarks
    Benchmarks,
    /// Display inflation and dollar indicators
    Indicators,
    /// Download, rank and write every data block into the report
    Update {
        /// Use the spreadsheet already on disk
        #[arg(long)]
        skip_download: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fcirank::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
