//! folio CLI: plain-text book corpus loader for a full-text search index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use folio::config::{self, FolioConfig};
use folio::ingest::Ingestor;
use folio::schema::{IndexSchema, SchemaManager};
use folio::store::{HttpSearchStore, SearchStore};

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Load plain-text book corpora into a full-text search index"
)]
struct Cli {
    /// Search backend host (falls back to $ES_HOST, then 127.0.0.1).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Destination index name.
    #[arg(long, global = true, default_value = config::DEFAULT_INDEX)]
    index: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the index and load every .txt book under the corpus directory.
    Ingest {
        /// Directory holding the plain-text corpus.
        corpus_dir: PathBuf,

        /// Documents per bulk write.
        #[arg(long, default_value_t = config::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Worker threads for cross-file parallelism (default: one per core).
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Delete and recreate the index with the fixed schema.
    Reset,

    /// Check backend cluster health.
    Health,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let host = FolioConfig::resolve_host(cli.host.clone());
    let base_url = format!("http://{host}:{}", config::DEFAULT_PORT);
    let store = HttpSearchStore::new(base_url);

    match cli.command {
        Commands::Ingest {
            corpus_dir,
            batch_size,
            workers,
        } => {
            let config = FolioConfig {
                corpus_dir,
                host,
                port: config::DEFAULT_PORT,
                index: cli.index,
                batch_size,
                workers,
            };
            let report = Ingestor::new(&config, &store).run()?;
            print!("{report}");
            if !report.failed.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Reset => {
            SchemaManager::new(&store).reset_index(&cli.index, &IndexSchema::paragraphs())?;
            println!("Reset index \"{}\"", cli.index);
        }

        Commands::Health => {
            let status = store.cluster_health()?;
            println!("cluster health: {status}");
        }
    }

    Ok(())
}
