//! Corpus-to-index orchestration.
//!
//! Verifies backend health, resets the index, then drives parse → load for
//! every corpus file. Files are independent, so they run on a bounded worker
//! pool; batch ordering inside one book stays sequential (`location`
//! correctness depends on it). One malformed file never blocks the rest of
//! the corpus: its failure is recorded in the report and the run continues.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info};

use crate::config::{CORPUS_SUFFIX, FolioConfig};
use crate::corpus;
use crate::error::FolioError;
use crate::loader::{BulkLoader, LoadStats};
use crate::schema::{IndexSchema, SchemaManager};
use crate::store::SearchStore;

/// A successfully loaded book.
#[derive(Debug)]
pub struct LoadedBook {
    pub path: PathBuf,
    pub title: String,
    pub author: String,
    pub stats: LoadStats,
}

/// A corpus file that failed to parse or load.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: FolioError,
}

/// Per-file outcome summary for one ingest run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub loaded: Vec<LoadedBook>,
    pub failed: Vec<FailedFile>,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} books loaded, {} files failed",
            self.loaded.len(),
            self.failed.len()
        )?;
        for book in &self.loaded {
            writeln!(
                f,
                "  ok   {} — \"{}\" by {} ({} paragraphs, {} batches)",
                book.path.display(),
                book.title,
                book.author,
                book.stats.documents,
                book.stats.batches
            )?;
        }
        for failure in &self.failed {
            writeln!(f, "  FAIL {} — {}", failure.path.display(), failure.error)?;
        }
        Ok(())
    }
}

/// Drives the whole pipeline against one corpus directory.
pub struct Ingestor<'a> {
    config: &'a FolioConfig,
    store: &'a dyn SearchStore,
}

impl<'a> Ingestor<'a> {
    pub fn new(config: &'a FolioConfig, store: &'a dyn SearchStore) -> Self {
        Self { config, store }
    }

    /// Run the full ingest: health check, index reset, per-file parse+load.
    ///
    /// Health and index-admin failures are fatal — there is no valid
    /// destination without them. Per-file failures are isolated and
    /// collected into the report.
    pub fn run(&self) -> Result<IngestReport, FolioError> {
        let status = self.store.cluster_health()?;
        info!("cluster health: {status}");

        SchemaManager::new(self.store)
            .reset_index(&self.config.index, &IndexSchema::paragraphs())?;

        let files = self.corpus_files()?;
        info!(
            "{} corpus files under {}",
            files.len(),
            self.config.corpus_dir.display()
        );

        let outcomes = self.load_all(&files)?;

        let mut report = IngestReport::default();
        for (path, result) in outcomes {
            match result {
                Ok(book) => report.loaded.push(book),
                Err(error) => {
                    error!("failed to load {}: {error}", path.display());
                    report.failed.push(FailedFile { path, error });
                }
            }
        }
        Ok(report)
    }

    /// Corpus entries with the `.txt` suffix, sorted for deterministic runs.
    fn corpus_files(&self) -> Result<Vec<PathBuf>, FolioError> {
        let dir = &self.config.corpus_dir;
        let list_err = |source| FolioError::CorpusDir {
            path: dir.display().to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(list_err)? {
            let path = entry.map_err(list_err)?.path();
            let is_corpus = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(CORPUS_SUFFIX));
            if is_corpus {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse+load every file on the worker pool.
    fn load_all(
        &self,
        files: &[PathBuf],
    ) -> Result<Vec<(PathBuf, Result<LoadedBook, FolioError>)>, FolioError> {
        let run = || {
            files
                .par_iter()
                .map(|path| (path.clone(), self.load_file(path)))
                .collect::<Vec<_>>()
        };

        match self.config.workers {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| FolioError::WorkerPool {
                        message: e.to_string(),
                    })?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }

    fn load_file(&self, path: &Path) -> Result<LoadedBook, FolioError> {
        let book = corpus::parse_book_file(path)?;
        let loader = BulkLoader::new(self.store, &self.config.index, self.config.batch_size);
        let stats = loader.load(&book)?;
        Ok(LoadedBook {
            path: path.to_path_buf(),
            title: book.title,
            author: book.author,
            stats,
        })
    }
}
