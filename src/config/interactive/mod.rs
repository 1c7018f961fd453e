#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::settings::{Config, GroqConfig, OllamaConfig, ScraperConfig};
use crate::embeddings::ollama::OllamaClient;

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 Briefly Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Groq Configuration").bold().yellow());
    eprintln!("Configure the hosted chat-completion model used for summaries and chat.");
    eprintln!();
    configure_groq(&mut config.groq)?;

    eprintln!();
    eprintln!("{}", style("Scraper Configuration").bold().yellow());
    eprintln!("Configure the web-unlocker proxy used to fetch search pages.");
    eprintln!();
    configure_scraper(&mut config.scraper)?;

    eprintln!();
    eprintln!("{}", style("Ollama Configuration").bold().yellow());
    eprintln!("Configure the local Ollama instance used for PDF embeddings.");
    eprintln!();
    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_ollama_connection(&config.ollama) {
        eprintln!("{}", style("✓ Ollama connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not connect to Ollama").yellow()
        );
        eprintln!("You can continue, but PDF question answering needs a running Ollama.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());

        let config_path = Config::config_file_path().context("Failed to get config file path")?;
        eprintln!(
            "Configuration saved to: {}",
            style(config_path.display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Groq Settings:").bold().yellow());
    eprintln!("  API Base: {}", style(&config.groq.api_base).cyan());
    eprintln!("  Model: {}", style(&config.groq.model).cyan());
    eprintln!("  Temperature: {}", style(config.groq.temperature).cyan());
    eprintln!(
        "  Max Tokens (topic/report): {}/{}",
        style(config.groq.max_tokens_topic).cyan(),
        style(config.groq.max_tokens_report).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Scraper Settings:").bold().yellow());
    eprintln!("  Endpoint: {}", style(&config.scraper.endpoint).cyan());
    eprintln!("  Zone: {}", style(&config.scraper.zone).cyan());
    eprintln!("  Country: {}", style(&config.scraper.country).cyan());
    eprintln!(
        "  Rate Limit: {}ms between requests",
        style(config.scraper.rate_limit_ms).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!("  Model: {}", style(&config.ollama.model).cyan());

    eprintln!();
    eprintln!("{}", style("Chunking Settings:").bold().yellow());
    eprintln!(
        "  Chunk Size: {} chars",
        style(config.chunking.chunk_size).cyan()
    );
    eprintln!(
        "  Overlap: {} chars",
        style(config.chunking.chunk_overlap).cyan()
    );

    let config_path = Config::config_file_path().context("Failed to get config file path")?;
    eprintln!();
    eprintln!("Config file: {}", style(config_path.display()).dim());
    eprintln!("API keys are read from GROQ_API_KEY and BRIGHTDATA_API_KEY.");

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config::default())
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_groq(groq: &mut GroqConfig) -> Result<()> {
    groq.model = Input::new()
        .with_prompt("Model name")
        .default(groq.model.clone())
        .interact_text()?;

    let temperature: f32 = Input::new()
        .with_prompt("Temperature (0.0-2.0)")
        .default(groq.temperature)
        .validate_with(|input: &f32| {
            if (0.0..=2.0).contains(input) {
                Ok(())
            } else {
                Err("Temperature must be between 0.0 and 2.0")
            }
        })
        .interact_text()?;
    groq.temperature = temperature;

    Ok(())
}

fn configure_scraper(scraper: &mut ScraperConfig) -> Result<()> {
    scraper.zone = Input::new()
        .with_prompt("Web unlocker zone")
        .default(scraper.zone.clone())
        .interact_text()?;

    scraper.country = Input::new()
        .with_prompt("Country code")
        .default(scraper.country.clone())
        .interact_text()?;

    Ok(())
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let protocol_idx = Select::new()
        .with_prompt("Protocol")
        .items(protocols)
        .default(usize::from(ollama.protocol == "https"))
        .interact()?;
    ollama.protocol = protocols[protocol_idx].to_string();

    ollama.host = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .interact_text()?;

    ollama.port = Input::new()
        .with_prompt("Ollama port")
        .default(ollama.port)
        .interact_text()?;

    ollama.model = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.model.clone())
        .interact_text()?;

    Ok(())
}

fn test_ollama_connection(ollama: &OllamaConfig) -> bool {
    OllamaClient::new(ollama)
        .and_then(|client| client.ping())
        .is_ok()
}
