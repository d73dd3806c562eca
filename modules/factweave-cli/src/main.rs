//! Command-line entry point: fact-check statements and generate ranked lists.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::{available_providers, ChatModel, Completion, Provider};
use factweave_checker::{FactChecker, Researcher};
use factweave_common::{Category, Config, StatementInput, TimePeriod};
use factweave_lists::{ImageEnricher, ListGenerator, ListRequest};
use search_client::images::ImageFinder;
use search_client::rate_limit::RateLimiter;
use search_client::{ProviderKeys, SearchClient, SearchProviderKind, Wikipedia};

#[derive(Parser)]
#[command(name = "factweave", about = "Multi-perspective fact-checking and ranked-list generation")]
struct Cli {
    /// LLM provider: openai, groq, or gemini. Defaults to the first provider
    /// with an API key in the environment.
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Override the provider's default model name.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature passed to the LLM provider.
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Search provider: duckduckgo, serper, or brave.
    #[arg(long, global = true, default_value = "duckduckgo")]
    search: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fact-check a statement from multiple perspectives.
    Check {
        /// The statement to check.
        statement: String,

        /// Who made the statement.
        #[arg(long, default_value = "Unknown")]
        speaker: String,

        /// Where the statement was made.
        #[arg(long = "where", value_name = "WHERE")]
        location: Option<String>,

        /// When the statement was made.
        #[arg(long)]
        when: Option<String>,

        /// Skip Wikipedia for speaker research, use web search instead.
        #[arg(long)]
        no_wikipedia: bool,

        /// Also run the cross-agent synthesis (consensus, disagreements,
        /// follow-up questions).
        #[arg(long)]
        extended: bool,
    },

    /// Generate a ranked "top N" list for a category.
    List {
        /// Category: movies, sports, music, games, or anything else.
        category: String,

        /// Number of items.
        #[arg(short = 'n', long, default_value_t = factweave_lists::DEFAULT_COUNT)]
        count: usize,

        /// Time period: all_time or a decade like 1990s.
        #[arg(long, default_value = "all_time")]
        period: String,

        /// Find and validate an image URL for each item.
        #[arg(long)]
        images: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_redacted();

    let model: Arc<dyn Completion> = Arc::new(build_model(
        &config,
        cli.provider.as_deref(),
        cli.model.as_deref(),
        cli.temperature,
    )?);
    let search_kind = SearchProviderKind::parse(&cli.search)
        .ok_or_else(|| anyhow!("unknown search provider: {}", cli.search))?;
    let keys = ProviderKeys {
        serper: config.serper_api_key.clone(),
        brave: config.brave_api_key.clone(),
    };

    match cli.command {
        Command::Check {
            statement,
            speaker,
            location,
            when,
            no_wikipedia,
            extended,
        } => {
            let mut input = StatementInput::new(statement, speaker);
            if let Some(location) = location {
                input = input.with_background("where", location);
            }
            if let Some(when) = when {
                input = input.with_background("when", when);
            }

            let search = SearchClient::for_provider(search_kind, &keys, config.search_delay);
            info!(provider = search.provider_name(), "Using search provider");
            let wikipedia = (!no_wikipedia).then(Wikipedia::new);
            let researcher =
                Researcher::new(Arc::clone(&model), search, wikipedia, config.max_search_chars);
            let checker = FactChecker::new(model, researcher);

            let report = checker.check(&input, extended).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::List {
            category,
            count,
            period,
            images,
        } => {
            let category = Category::from_str(&category)?;
            let period = TimePeriod::from_str(&period).map_err(|e| anyhow!(e))?;
            let request = ListRequest::new(category.clone())
                .with_count(count)
                .with_period(period);

            let generator = ListGenerator::new(model);
            let mut items = generator.generate(&request).await?;

            if images {
                let limiter = Arc::new(RateLimiter::new(config.search_delay));
                let finder = ImageFinder::for_provider(search_kind, &keys, limiter);
                ImageEnricher::new(finder)
                    .validate_and_fix(&mut items, &category)
                    .await;
            }

            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}

/// Pick the LLM provider: an explicit flag wins, otherwise the first
/// provider with a key in the environment.
fn build_model(
    config: &Config,
    provider_flag: Option<&str>,
    model_flag: Option<&str>,
    temperature_flag: Option<f32>,
) -> Result<ChatModel> {
    let provider = match provider_flag {
        Some(name) => {
            Provider::parse(name).ok_or_else(|| anyhow!("unknown LLM provider: {name}"))?
        }
        None => *available_providers()
            .first()
            .ok_or_else(|| anyhow!("no LLM API key configured; set one of OPENAI_API_KEY, GROQ_API_KEY, GEMINI_API_KEY"))?,
    };

    let api_key = match provider {
        Provider::OpenAi => config.openai_api_key.clone(),
        Provider::Groq => config.groq_api_key.clone(),
        Provider::Gemini => config.gemini_api_key.clone(),
    }
    .ok_or_else(|| anyhow!("{} not set", provider.env_key()))?;

    let mut model = ChatModel::new(provider, api_key);
    if let Some(name) = model_flag {
        model = model.with_model(name);
    }
    if let Some(temperature) = temperature_flag {
        model = model.with_temperature(temperature);
    }
    info!(
        provider = provider.name(),
        model = model.model(),
        temperature = model.temperature(),
        "Using LLM"
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn config() -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            groq_api_key: None,
            gemini_api_key: None,
            serper_api_key: None,
            brave_api_key: None,
            search_delay: Duration::from_millis(0),
            max_search_chars: 1500,
        }
    }

    #[test]
    fn temperature_flag_reaches_the_model() {
        let model = build_model(&config(), Some("openai"), None, Some(0.9)).unwrap();
        assert_eq!(model.temperature(), 0.9);
    }

    #[test]
    fn temperature_defaults_without_the_flag() {
        let model = build_model(&config(), Some("openai"), None, None).unwrap();
        assert_eq!(model.temperature(), 0.3);
    }

    #[test]
    fn cli_parses_global_temperature() {
        let cli =
            Cli::try_parse_from(["factweave", "check", "a claim", "--temperature", "0.7"]).unwrap();
        assert_eq!(cli.temperature, Some(0.7));
    }
}
