mod analyze;
mod inspect;
mod output;
mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analyze::AnalyzeArgs;

#[derive(Debug, Parser)]
#[command(name = "reelscope")]
#[command(about = "Performance analytics for TikTok creator profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a profile's recent videos, compute metrics and generate a report
    Analyze {
        /// Profile username, with or without a leading `@`
        username: String,

        /// Number of recent videos to request (defaults to REELSCOPE_RESULTS_PER_PAGE)
        #[arg(long)]
        limit: Option<u32>,

        /// Ignore any cached fetch and overwrite it with fresh data
        #[arg(long)]
        refresh: bool,

        /// Write the video table as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Skip the generated strategic report
        #[arg(long)]
        skip_report: bool,

        /// Write the generated report to this path
        #[arg(long)]
        report_out: Option<PathBuf>,

        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the analysis offline on a saved JSON payload
    Inspect {
        /// JSON file holding an array of raw records or an object with `items`
        #[arg(long)]
        input: PathBuf,

        /// Identity label for the summary
        #[arg(long, default_value = "offline")]
        username: String,

        /// Write the video table as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the report prompt for a saved JSON payload without sending it
    Prompt {
        /// JSON file holding an array of raw records or an object with `items`
        #[arg(long)]
        input: PathBuf,

        /// Identity label used in the prompt
        #[arg(long)]
        username: String,
    },
}

/// Loads the credentialed config for commands that call external services.
///
/// `.env` has already been applied by `main`; this only reads the process
/// environment.
fn load_config(command: &Commands) -> anyhow::Result<Option<reelscope_core::AppConfig>> {
    match command {
        Commands::Analyze { .. } => Ok(Some(reelscope_core::load_app_config_from_env()?)),
        Commands::Inspect { .. } | Commands::Prompt { .. } => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli.command)?;
    let log_level = config
        .as_ref()
        .map_or_else(|| "info".to_owned(), |c| c.log_level.clone());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            username,
            limit,
            refresh,
            csv,
            skip_report,
            report_out,
            json,
        } => {
            let config = config.ok_or_else(|| anyhow::anyhow!("configuration not loaded"))?;
            let args = AnalyzeArgs {
                username,
                limit,
                refresh,
                csv,
                skip_report,
                report_out,
                json,
            };
            analyze::run_analyze(&config, &args).await
        }
        Commands::Inspect {
            input,
            username,
            csv,
            json,
        } => inspect::run_inspect(&input, &username, csv.as_deref(), json),
        Commands::Prompt { input, username } => inspect::run_prompt(&input, &username),
    }
}
