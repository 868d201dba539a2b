//! # folio
//!
//! Loads a corpus of plain-text books into a full-text search index.
//!
//! ## Pipeline
//!
//! - **Corpus parsing** (`corpus`): header metadata, banner-delimited body,
//!   paragraph segmentation with fallback banner conventions
//! - **Index lifecycle** (`schema`): fixed field schema, destructive
//!   idempotent reset
//! - **Bulk loading** (`loader`): bounded batches with partial-failure
//!   reporting
//! - **Orchestration** (`ingest`): health check, reset, parallel per-file
//!   parse+load with failure isolation
//!
//! ## Library usage
//!
//! ```no_run
//! use folio::config::FolioConfig;
//! use folio::ingest::Ingestor;
//! use folio::store::HttpSearchStore;
//!
//! let config = FolioConfig::new("./books".into());
//! let store = HttpSearchStore::new(config.base_url());
//! let report = Ingestor::new(&config, &store).run().unwrap();
//! print!("{report}");
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod schema;
pub mod store;
