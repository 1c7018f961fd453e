use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

use crate::chat::{HistoryAssistant, suggested_topics};
use crate::config::{Config, Secrets};
use crate::docqa::DocumentQa;
use crate::llm::GroqClient;
use crate::server;
use crate::summarizer::{SourceType, Summarizer, SummaryReport, TopicList};

/// Start the HTTP API server
#[inline]
pub async fn run_serve(host: &str, port: u16) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let secrets = Secrets::from_env().context("Missing API credentials")?;

    server::serve(config, secrets, host, port).await
}

/// Run the scrape-and-summarize pipeline from the command line
#[inline]
pub async fn run_summarize(
    topics: Vec<String>,
    source: SourceType,
    quick: bool,
    output: Option<&Path>,
) -> Result<()> {
    let topics = TopicList::from_topics(&topics).context("Invalid topic list")?;
    let config = Config::load().context("Failed to load configuration")?;
    let secrets = Secrets::from_env().context("Missing API credentials")?;
    let summarizer = Summarizer::new(&config, &secrets)?;

    info!(
        "Summarizing {} topics from {} sources",
        topics.len(),
        source
    );

    if quick {
        let summary = summarizer.quick_summary(&topics, source).await?;
        println!("{}", style("Summary").bold().cyan());
        println!();
        println!("{}", summary.summary);
        return Ok(());
    }

    let report = summarizer.generate_report(&topics, source).await?;
    print_report(&report);

    if let Some(path) = output {
        export_report(&report, path)?;
        println!();
        println!("Report saved to: {}", style(path.display()).cyan());
    }

    Ok(())
}

fn print_report(report: &SummaryReport) {
    println!("{}", style("📰 News Summary").bold().cyan());
    println!(
        "Topics: {} | Sources: {} | Generated: {}",
        report.topics.join(", "),
        report.source_type,
        report.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    println!("{}", report.summary);

    for (topic, analysis) in &report.individual_topics {
        println!();
        println!("{}", style(format!("— {topic} —")).bold().yellow());
        println!("{analysis}");
    }
}

fn export_report(report: &SummaryReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

/// Interactive history-assistant REPL
#[inline]
pub fn run_chat() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let secrets = Secrets::from_env().context("Missing API credentials")?;
    let groq = GroqClient::new(&config.groq, secrets.groq_api_key.clone())?;
    let mut assistant = HistoryAssistant::new(groq);

    println!("{}", style("🏛️ History Assistant").bold().cyan());
    println!();
    println!(
        "{}",
        assistant
            .transcript()
            .turns()
            .first()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    );
    println!();
    println!("{}", style("Suggested topics:").bold());
    for topic in suggested_topics().iter().take(5) {
        println!("  {topic}");
    }
    println!();
    println!("Commands: :topics, :clear, :quit");

    loop {
        let input: String = Input::new().with_prompt("You").interact_text()?;
        match input.trim() {
            "" => continue,
            ":quit" | ":exit" => break,
            ":clear" => {
                assistant.clear();
                println!("{}", style("Conversation cleared.").dim());
            }
            ":topics" => {
                for topic in suggested_topics() {
                    println!("  {topic}");
                }
            }
            question => {
                let answer = assistant.ask(question);
                println!();
                println!("{answer}");
                println!();
            }
        }
    }

    Ok(())
}

/// Load a PDF and answer questions about it interactively
#[inline]
pub fn run_ask(pdf: &Path) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let secrets = Secrets::from_env().context("Missing API credentials")?;
    let mut engine = DocumentQa::new(&config, &secrets)?;

    println!(
        "{} {}",
        style("📄 Loading").bold().cyan(),
        pdf.display()
    );

    let bar = if console::user_attended_stderr() {
        ProgressBar::new(0).with_style(
            ProgressStyle::with_template("{bar:40} [{pos}/{len}] Embedding chunks")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };

    let stats = engine.process(pdf, Some(&bar))?;
    bar.finish_and_clear();

    println!(
        "Loaded {}: {} pages, {} chunks, {}-dimensional embeddings",
        style(&stats.source).cyan(),
        stats.pages,
        stats.total_chunks,
        stats.embedding_dimension
    );
    println!();
    println!("Ask questions about the document. Commands: :quit");

    loop {
        let input: String = Input::new().with_prompt("Question").interact_text()?;
        match input.trim() {
            "" => continue,
            ":quit" | ":exit" => break,
            question => {
                let answer = engine.answer(question);
                println!();
                println!("{answer}");
                println!();
            }
        }
    }

    Ok(())
}
