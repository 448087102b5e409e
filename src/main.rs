//! # QA Harness CLI (`qa`)
//!
//! The `qa` binary is the primary interface for QA Harness. It provides
//! commands for interactive question answering, one-shot answering, model
//! downloads, and listing the model manifest.
//!
//! ## Usage
//!
//! ```bash
//! qa --config ./config/qa.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qa chat` | Interactive session: context prompt, then a question loop |
//! | `qa ask "<question>"` | Answer a single question and exit |
//! | `qa fetch` | Download the configured model into the local cache |
//! | `qa models` | List supported models and their cache status |
//!
//! ## Examples
//!
//! ```bash
//! # Pre-download the model weights
//! qa fetch
//!
//! # Start an interactive session
//! qa chat
//!
//! # Answer against a file
//! qa ask "Who created Python?" --context-file ./notes.txt
//!
//! # Machine-readable output
//! qa ask "Who created Python?" --json
//! ```

mod ask;
mod chat;
mod config;
mod context;
mod fetch;
mod hub;
mod models;
mod models_cmd;
mod pipeline;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QA Harness CLI, a local-first extractive question answering assistant
/// for the terminal.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means defaults; see `config/qa.example.toml`.
#[derive(Parser)]
#[command(
    name = "qa",
    about = "QA Harness — a local-first extractive question answering assistant for the terminal",
    version,
    long_about = "QA Harness downloads a pre-trained extractive QA model on first use, caches it \
    locally, and answers questions about a passage of your choosing. Inference runs entirely \
    in-process with a pure-Rust ONNX runtime; after the initial download no network access is \
    needed."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/qa.toml`. Model, windowing, and cache settings
    /// are read from this file; a missing file selects the defaults.
    #[arg(long, global = true, default_value = "./config/qa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive question answering session.
    ///
    /// Loads the model, prompts for a context passage (or takes it from
    /// `--context`/`--context-file`), then answers questions until `quit`,
    /// `exit`, `bye`, `q`, or EOF. `context` redisplays the passage.
    Chat {
        /// Context passage passed inline, skipping the interactive prompt.
        #[arg(long)]
        context: Option<String>,

        /// Read the context passage from a file.
        #[arg(long, conflicts_with = "context")]
        context_file: Option<PathBuf>,
    },

    /// Answer a single question and exit.
    ///
    /// Uses `--context`/`--context-file` when given, otherwise the built-in
    /// default passage.
    Ask {
        /// The question to answer.
        question: String,

        /// Context passage passed inline.
        #[arg(long)]
        context: Option<String>,

        /// Read the context passage from a file.
        #[arg(long, conflicts_with = "context")]
        context_file: Option<PathBuf>,

        /// Print the result as JSON instead of the human rendering.
        #[arg(long)]
        json: bool,
    },

    /// Download the configured model's weights and tokenizer into the cache.
    ///
    /// Idempotent: files already in the cache are not fetched again.
    Fetch,

    /// List supported models and their cache status.
    Models,
}

fn main() -> anyhow::Result<()> {
    // Merge a local .env into the process environment before anything reads it.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = config::load_or_default(&cli.config)?;
    config.apply_env_overrides();

    match cli.command {
        Commands::Chat {
            context,
            context_file,
        } => {
            chat::run_chat(&config, context.as_deref(), context_file.as_deref())?;
        }
        Commands::Ask {
            question,
            context,
            context_file,
            json,
        } => {
            ask::run_ask(
                &config,
                &question,
                context.as_deref(),
                context_file.as_deref(),
                json,
            )?;
        }
        Commands::Fetch => {
            fetch::run_fetch(&config)?;
        }
        Commands::Models => {
            models_cmd::list_models(&config)?;
        }
    }

    Ok(())
}
