use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use briefly::commands::{run_ask, run_chat, run_serve, run_summarize};
use briefly::config::{run_interactive_config, show_config};
use briefly::summarizer::SourceType;

#[derive(Parser)]
#[command(name = "briefly")]
#[command(about = "News summarization, history chat, and PDF question answering")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure API endpoints and scraper settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Scrape and summarize up to 3 topics
    Summarize {
        /// Topics to analyze (max 3)
        #[arg(required = true)]
        topics: Vec<String>,
        /// Which sources to scrape
        #[arg(long, value_enum, default_value_t = SourceType::News)]
        source: SourceType,
        /// Skip per-topic breakdowns and print only the combined summary
        #[arg(long)]
        quick: bool,
        /// Write the full report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Chat with the history assistant
    Chat,
    /// Answer questions about a PDF document
    Ask {
        /// Path to the PDF file
        pdf: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Serve { host, port } => {
            run_serve(&host, port).await?;
        }
        Commands::Summarize {
            topics,
            source,
            quick,
            output,
        } => {
            run_summarize(topics, source, quick, output.as_deref()).await?;
        }
        Commands::Chat => {
            run_chat()?;
        }
        Commands::Ask { pdf } => {
            run_ask(&pdf)?;
        }
    }

    Ok(())
}
