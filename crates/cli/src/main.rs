//! Arabot CLI — the main entry point.
//!
//! Commands:
//! - `serve`     — Start the HTTP gateway (Slack events + storage trigger)
//! - `classify`  — Show which rule a message would take (no network)
//! - `summarize` — Summarize a local PDF with the configured model
//! - `config`    — Print, locate or validate configuration
//! - `doctor`    — Report missing credentials and effective settings

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "arabot",
    about = "Arabot — Slack news-analysis bot and PDF summarizer on Gemini",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines (for Cloud Logging)
    #[arg(long, global = true, env = "ARABOT_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Classify a message without fetching anything
    Classify {
        /// Message text, mention markup included
        #[arg(short, long)]
        text: String,

        /// Thread timestamp, when the message is a threaded reply
        #[arg(long)]
        thread: Option<String>,
    },

    /// Summarize a local PDF file
    Summarize {
        /// Path to the PDF
        file: PathBuf,

        /// Also copy the summary to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: Option<commands::config_cmd::ConfigAction>,
    },

    /// Diagnose configuration and credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Classify { text, thread } => commands::classify::run(&text, thread.as_deref())?,
        Commands::Summarize { file, output } => commands::summarize::run(&file, output.as_deref()).await?,
        Commands::Config { action } => commands::config_cmd::run(action.unwrap_or_default())?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
