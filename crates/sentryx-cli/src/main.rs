//! sentryx: harassment-post ingestion pipeline.
//! Entry point for the command-line binary.

mod backend;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sentryx_common::{PipelineError, Stage};
use sentryx_config::{Config, ConfigError};
use sentryx_db::StageFilter;
use sentryx_ingestion::{
    collect_stats, enrich_stage, index_documents, preprocess_stage, reset_stage, run_all,
    ElasticsearchIndex,
};

use crate::backend::Backend;

#[derive(Debug, Parser)]
#[command(name = "sentryx", version, about)]
struct Cli {
    /// Config file (defaults to $SENTRYX_CONFIG or ./sentryx.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON-lines snapshot for the memory store, overriding store.snapshot_path
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalise every document not yet preprocessed
    Preprocess,
    /// Run language detection and sentiment on preprocessed documents
    Enrich,
    /// Project enriched documents into the search index
    Index,
    /// Preprocess, enrich and index in order
    Run,
    /// Clear a stage's outputs (and those of later stages) so it runs again
    Reset { stage: Stage },
    /// Print store statistics
    Stats,
}

impl Command {
    fn mutates_store(&self) -> bool {
        matches!(self, Command::Preprocess | Command::Enrich | Command::Run | Command::Reset { .. })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let (mut config, missing) = match loaded {
        Ok(c) => (c, None),
        Err(ConfigError::NotFound(path)) => (Config::default(), Some(path)),
        Err(e) => return Err(e.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = missing {
        warn!(path = %path.display(), "Config file not found, using defaults");
    }
    if let Some(snapshot) = cli.snapshot {
        config.store.snapshot_path = Some(snapshot);
    }

    let backend = Backend::open(&config.store).await?;
    let outcome = execute(&cli.cmd, &config, &backend).await;
    if cli.cmd.mutates_store() {
        backend.persist().await?;
    }
    outcome
}

async fn execute(cmd: &Command, config: &Config, backend: &Backend) -> anyhow::Result<()> {
    let store = backend.store();
    let pipeline = &config.pipeline;

    match cmd {
        Command::Preprocess => print_report(&preprocess_stage(store, pipeline.page_size).await?)?,
        Command::Enrich => print_report(&enrich_stage(store, pipeline.page_size).await?)?,
        Command::Index => {
            let index = connect_index(config).await?;
            let report = index_documents(store, &index, &config.search.index, pipeline).await?;
            print_report(&report)?;
        }
        Command::Run => {
            let index = connect_index(config).await?;
            let report = run_all(store, &index, &config.search.index, pipeline).await?;
            print_report(&report)?;
        }
        Command::Reset { stage } => {
            let changed = reset_stage(store, *stage, &StageFilter::all()).await?;
            println!("Reset {stage} on {changed} documents");
        }
        Command::Stats => print!("{}", collect_stats(store).await?),
    }
    Ok(())
}

/// Build the search client and check the cluster answers before any work starts.
async fn connect_index(config: &Config) -> anyhow::Result<ElasticsearchIndex> {
    let index = ElasticsearchIndex::from_config(&config.search)?;
    index.ping().await.map_err(PipelineError::from)?;
    info!(url = %config.search.url, index = %config.search.index, "Search cluster reachable");
    Ok(index)
}

fn print_report<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_reset_parses_stage_aliases() {
        let cli = Cli::try_parse_from(["sentryx", "reset", "nlp"]).unwrap();
        assert!(matches!(cli.cmd, Command::Reset { stage: Stage::Enrich }));

        let cli = Cli::try_parse_from(["sentryx", "reset", "preprocess"]).unwrap();
        assert!(matches!(cli.cmd, Command::Reset { stage: Stage::Preprocess }));
    }

    #[test]
    fn test_reset_rejects_unknown_stage() {
        assert!(Cli::try_parse_from(["sentryx", "reset", "index"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["sentryx", "run", "--snapshot", "posts.jsonl"]).unwrap();
        assert!(matches!(cli.cmd, Command::Run));
        assert_eq!(cli.snapshot, Some(PathBuf::from("posts.jsonl")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_only_stats_and_index_are_read_only() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().cmd;
        assert!(!parse(&["sentryx", "stats"]).mutates_store());
        assert!(!parse(&["sentryx", "index"]).mutates_store());
        assert!(parse(&["sentryx", "run"]).mutates_store());
        assert!(parse(&["sentryx", "reset", "enrich"]).mutates_store());
    }
}
