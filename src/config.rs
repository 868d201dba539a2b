//! Run configuration for a corpus load.
//!
//! Everything the pipeline needs is carried on an explicit [`FolioConfig`]
//! passed to each component; there are no module-level globals to mutate.

use std::path::PathBuf;

/// Fixed backend port; only the host is configurable.
pub const DEFAULT_PORT: u16 = 9200;

/// Default destination index name.
pub const DEFAULT_INDEX: &str = "library";

/// Default number of documents per bulk write.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Filename suffix that marks an entry as a corpus file.
pub const CORPUS_SUFFIX: &str = ".txt";

/// Settings for one ingest run, resolved once at startup.
#[derive(Debug, Clone)]
pub struct FolioConfig {
    /// Directory holding the plain-text corpus.
    pub corpus_dir: PathBuf,
    /// Search backend host.
    pub host: String,
    /// Search backend port.
    pub port: u16,
    /// Destination index name.
    pub index: String,
    /// Documents per bulk write.
    pub batch_size: usize,
    /// Worker threads for cross-file parallelism. `None` uses one per core.
    pub workers: Option<usize>,
}

impl FolioConfig {
    /// Defaults for a corpus directory: host from `ES_HOST` (falling back to
    /// localhost), fixed port, `library` index, 500-document batches.
    pub fn new(corpus_dir: PathBuf) -> Self {
        Self {
            corpus_dir,
            host: Self::resolve_host(None),
            port: DEFAULT_PORT,
            index: DEFAULT_INDEX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
        }
    }

    /// Resolve the backend host: explicit flag, then `ES_HOST`, then localhost.
    pub fn resolve_host(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var("ES_HOST").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    /// Base URL for backend requests.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_host_wins() {
        assert_eq!(
            FolioConfig::resolve_host(Some("search.internal".into())),
            "search.internal"
        );
    }

    #[test]
    fn base_url_includes_fixed_port() {
        let config = FolioConfig::new(PathBuf::from("books"));
        assert!(config.base_url().ends_with(":9200"));
        assert!(config.base_url().starts_with("http://"));
    }
}
