//! Rich diagnostic error types for folio.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the loader.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the operator.
#[derive(Debug, Error, Diagnostic)]
pub enum FolioError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("failed to list corpus directory {path}: {source}")]
    #[diagnostic(
        code(folio::corpus_dir),
        help("Check that the corpus directory exists and is readable.")
    )]
    CorpusDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build worker pool: {message}")]
    #[diagnostic(
        code(folio::worker_pool),
        help("Check the `--workers` value; it must be a positive thread count.")
    )]
    WorkerPool { message: String },
}

// ---------------------------------------------------------------------------
// Corpus parse errors
// ---------------------------------------------------------------------------

/// Errors from parsing one plain-text book file.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("cannot read \"{path}\": {source}")]
    #[diagnostic(
        code(folio::corpus::io),
        help("Check that the file exists and you have read permission.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("start/end markers not found in \"{path}\"")]
    #[diagnostic(
        code(folio::corpus::markers_not_found),
        help(
            "The file does not contain a recognized START/END banner pair. \
             folio understands three historical banner spellings; check that \
             the file is a complete Project Gutenberg text and that its \
             banner embeds the same title as the `Title:` header line."
        )
    )]
    MarkersNotFound { path: String },
}

/// Convenience alias for corpus parse results.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

// ---------------------------------------------------------------------------
// Search store errors
// ---------------------------------------------------------------------------

/// Errors from the search backend: connectivity, index admin, bulk writes.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("search backend unhealthy: {message}")]
    #[diagnostic(
        code(folio::store::unhealthy),
        help(
            "The backend did not answer the cluster health check. Verify it \
             is running and reachable at the configured host, or point folio \
             at it with `--host` or the ES_HOST environment variable."
        )
    )]
    Unhealthy { message: String },

    #[error("index {operation} failed for \"{index}\": {message}")]
    #[diagnostic(
        code(folio::store::index_admin),
        help(
            "Ingestion cannot proceed without a valid destination index. \
             Check the backend logs and that the client may administer \
             this index."
        )
    )]
    IndexAdmin {
        operation: &'static str,
        index: String,
        message: String,
    },

    #[error("bulk write of {count} documents to \"{index}\" failed: {message}")]
    #[diagnostic(
        code(folio::store::bulk_write),
        help(
            "Batches flushed before this one remain indexed, so the book is \
             partially loaded. Re-run the ingest to rebuild the index from \
             scratch."
        )
    )]
    BulkWrite {
        index: String,
        count: usize,
        message: String,
    },
}

/// Convenience alias for store operation results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
