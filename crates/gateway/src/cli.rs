use std::sync::Arc;

use clap::{Parser, Subcommand};

use ub_domain::chat::Turn;
use ub_faq::RenderedAnswer;

use crate::runtime::{self, Reply};

/// unibot — university FAQ chatbot gateway.
#[derive(Debug, Parser)]
#[command(name = "unibot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the chatbot server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Answer a single question on the command line (FAQ match or AI
    /// fallback, no session).
    Ask {
        /// The question to answer.
        question: String,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the config from `$UNIBOT_CONFIG` (default `unibot.toml`); a
/// missing file yields the built-in defaults.
pub fn load_config() -> anyhow::Result<(ub_domain::config::Config, String)> {
    let config_path =
        std::env::var("UNIBOT_CONFIG").unwrap_or_else(|_| "unibot.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        ub_domain::config::Config::default()
    };

    Ok((config, config_path))
}

/// `unibot ask "<question>"` — run the answer pipeline once and print.
pub async fn ask(config: Arc<ub_domain::config::Config>, question: String) -> anyhow::Result<()> {
    let state = crate::bootstrap::build_app_state(config)?;

    let history = [Turn::user(question.as_str())];
    let reply = runtime::answer(
        &state.config,
        &state.matcher,
        state.llm.as_ref(),
        &history,
        &question,
    )
    .await;

    match reply {
        Reply::Faq {
            answer,
            question,
            confidence,
        } => {
            eprintln!("[faq] {question} ({confidence:.2})");
            match answer {
                RenderedAnswer::Text(text) => println!("{text}"),
                RenderedAnswer::Rich(rich) => {
                    println!("{}", serde_json::to_string_pretty(&rich)?)
                }
            }
        }
        Reply::Ai { text, model, .. } => {
            if let Some(model) = model {
                eprintln!("[ai] {model}");
            }
            println!("{text}");
        }
    }
    Ok(())
}
