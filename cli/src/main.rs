//! CLI entrypoint for scholia
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use scholia_application::{
    EmbeddingModel, MetadataCatalog, NoProgress, ProgressNotifier, ResearchAgent, VectorIndex,
};
use scholia_domain::Message;
use scholia_infrastructure::{
    ConfigLoader, FileConfig, HttpEmbeddingModel, JsonlResearchLogger, OpenAiGateway,
    QdrantIndex, SqliteMetadataStore,
};
use scholia_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, ReplConfig, SYSTEM_MESSAGE,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };
    config.validate().context("Invalid configuration")?;

    // Held for the process lifetime so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.directory.as_deref());

    info!("Starting scholia");

    // === Dependency Injection ===
    let mut agent = build_agent(&config).await?;

    if let Some(path) = cli.research_log.as_ref().or(config.logging.research_log.as_ref()) {
        match JsonlResearchLogger::open(path) {
            Some(logger) => agent = agent.with_research_logger(Arc::new(logger)),
            None => warn!("Research log {} could not be opened", path.display()),
        }
    }

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
        };
        ChatRepl::new(Arc::new(agent), repl_config).run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let Some(question) = cli.question else {
        bail!("Question is required. Use --chat for interactive mode.");
    };

    let cancel = CancellationToken::new();
    let agent = agent.with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let messages = vec![Message::system(SYSTEM_MESSAGE), Message::user(question)];
    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !config.repl.show_progress {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let state = agent.run_cycle(&messages, progress.as_ref()).await?;

    let output = match cli.output {
        OutputFormat::Answer => ConsoleFormatter::format_answer(&state),
        OutputFormat::Full => ConsoleFormatter::format_full(&state),
        OutputFormat::Json => ConsoleFormatter::format_json(&state),
    };
    println!("{}", output.trim_end());

    Ok(())
}

/// stderr logging at the `-v` level, plus a daily-rolling file when a log
/// directory is configured.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "scholia.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

async fn build_agent(config: &FileConfig) -> Result<ResearchAgent<OpenAiGateway>> {
    let params = config.to_research_params();
    let timeout = params.call_timeout;

    let gateway = Arc::new(OpenAiGateway::new(
        &config.llm.base_url,
        &config.llm.api_key_env,
        timeout,
    )?);

    let embedder: Arc<dyn EmbeddingModel> = Arc::new(HttpEmbeddingModel::new(
        &config.embedding.base_url,
        &config.embedding.model,
        &config.embedding.api_key_env,
        timeout,
    )?);

    let qdrant_key = config
        .vector_index
        .api_key_env
        .as_deref()
        .and_then(|var| std::env::var(var).ok());
    let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(
        &config.vector_index.url,
        &config.vector_index.collection,
        qdrant_key,
        timeout,
    )?);

    let store = Arc::new(SqliteMetadataStore::open(
        &config.metadata.database,
        config.metadata.pool_size,
        Duration::from_secs(config.metadata.poll_interval_seconds),
    )?);
    let catalog = Arc::new(
        MetadataCatalog::load(store.as_ref())
            .await
            .context("Failed to load metadata catalog")?,
    );
    catalog.spawn_refresh_listener(store);

    Ok(ResearchAgent::new(
        gateway,
        embedder,
        index,
        catalog,
        config.to_model_config(),
        params,
    ))
}
