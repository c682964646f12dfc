//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for research results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the composed answer
    Answer,
    /// Answer plus the queries issued and evidence gathered
    Full,
    /// JSON output of the final research state
    Json,
}

/// CLI arguments for scholia
#[derive(Parser, Debug)]
#[command(name = "scholia")]
#[command(author, version, about = "Iterative research assistant over a philosophy corpus")]
#[command(long_about = r#"
Scholia answers a question by researching a vector-indexed corpus.

Each cycle runs four steps until the evidence is sufficient:
1. Plan: write search queries, optionally filtered by author or source
2. Retrieve: query the index concurrently and summarize every passage
3. Assess: decide whether the summaries answer the question
4. Compose: write the final answer from the gathered evidence

Configuration files are loaded from (in priority order):
1. SCHOLIA_<SECTION>__<KEY>              Environment variables
2. --config <path>                       Explicit config file
3. ./scholia.toml                        Project-level config
4. ~/.config/scholia/config.toml         Global config

Example:
  scholia "What did Aristotle mean by eudaimonia?"
  scholia -o full "How do Kant and Hume differ on causation?"
  scholia --chat
"#)]
pub struct Cli {
    /// The question to research (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append research events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub research_log: Option<PathBuf>,
}
