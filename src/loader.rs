//! Batched bulk loading of a book's paragraphs into the index.
//!
//! Batching bounds per-request payload size while amortizing request
//! overhead. Flushes within one book are strictly sequential, so `location`
//! values arrive at the store in increasing order.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::corpus::Book;
use crate::error::StoreResult;
use crate::store::SearchStore;

/// One indexed paragraph.
///
/// `location` is the paragraph's zero-based ordinal within its book — not a
/// global identifier — used for in-book ordering and reconstruction.
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphDocument {
    pub location: u64,
    pub title: String,
    pub author: String,
    pub text: String,
}

/// Counters from one book's load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Documents committed to the store.
    pub documents: usize,
    /// Bulk write calls issued.
    pub batches: usize,
}

/// Writes a [`Book`]'s paragraphs to the store in bounded batches.
pub struct BulkLoader<'a> {
    store: &'a dyn SearchStore,
    index: &'a str,
    batch_size: usize,
}

impl<'a> BulkLoader<'a> {
    pub fn new(store: &'a dyn SearchStore, index: &'a str, batch_size: usize) -> Self {
        Self {
            store,
            index,
            batch_size,
        }
    }

    /// Write every paragraph of `book` as a [`ParagraphDocument`].
    ///
    /// A batch is flushed as soon as it holds exactly `batch_size` documents;
    /// the non-empty tail (1..=batch_size documents) is flushed after the
    /// loop. A failed flush aborts the remainder of this book's load; batches
    /// already flushed stay committed (no cross-batch rollback), leaving the
    /// book partially indexed — the caller reports that as a named failure.
    pub fn load(&self, book: &Book) -> StoreResult<LoadStats> {
        let mut batch: Vec<Value> = Vec::with_capacity(self.batch_size.min(book.paragraphs.len()));
        let mut stats = LoadStats::default();

        for (i, paragraph) in book.paragraphs.iter().enumerate() {
            let doc = ParagraphDocument {
                location: i as u64,
                title: book.title.clone(),
                author: book.author.clone(),
                text: paragraph.clone(),
            };
            batch.push(
                serde_json::to_value(&doc).expect("ParagraphDocument is always serializable"),
            );

            if batch.len() == self.batch_size {
                self.flush(&batch, &mut stats)?;
                debug!(
                    "indexed paragraphs {}..={}",
                    i + 1 - self.batch_size,
                    i
                );
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.flush(&batch, &mut stats)?;
            debug!("indexed remaining {} paragraphs", batch.len());
        }

        info!(
            "indexed {} paragraphs from \"{}\" in {} batches",
            stats.documents, book.title, stats.batches
        );
        Ok(stats)
    }

    fn flush(&self, batch: &[Value], stats: &mut LoadStats) -> StoreResult<()> {
        self.store.bulk_write(self.index, batch)?;
        stats.documents += batch.len();
        stats.batches += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::StoreError;

    /// Store that records batch sizes and can fail on a given flush.
    #[derive(Default)]
    struct CountingStore {
        batches: Mutex<Vec<Vec<Value>>>,
        fail_on_batch: Option<usize>,
    }

    impl CountingStore {
        fn failing_on(n: usize) -> Self {
            Self {
                fail_on_batch: Some(n),
                ..Self::default()
            }
        }
    }

    impl SearchStore for CountingStore {
        fn index_exists(&self, _index: &str) -> StoreResult<bool> {
            Ok(true)
        }
        fn delete_index(&self, _index: &str) -> StoreResult<()> {
            Ok(())
        }
        fn create_index(&self, _index: &str, _mappings: &Value) -> StoreResult<()> {
            Ok(())
        }
        fn cluster_health(&self) -> StoreResult<String> {
            Ok("green".to_string())
        }
        fn bulk_write(&self, index: &str, docs: &[Value]) -> StoreResult<()> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_batch == Some(batches.len() + 1) {
                return Err(StoreError::BulkWrite {
                    index: index.to_string(),
                    count: docs.len(),
                    message: "rejected".to_string(),
                });
            }
            batches.push(docs.to_vec());
            Ok(())
        }
    }

    fn book_with(n: usize) -> Book {
        Book {
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            paragraphs: (0..n).map(|i| format!("Paragraph {i}.")).collect(),
        }
    }

    fn loader<'a>(store: &'a CountingStore) -> BulkLoader<'a> {
        BulkLoader::new(store, "library", 500)
    }

    #[test]
    fn locations_are_contiguous_and_ordered() {
        let store = CountingStore::default();
        loader(&store).load(&book_with(7)).unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let locations: Vec<u64> = batches[0]
            .iter()
            .map(|d| d["location"].as_u64().unwrap())
            .collect();
        assert_eq!(locations, (0..7).collect::<Vec<_>>());
        for doc in &batches[0] {
            assert_eq!(doc["title"], "Test Book");
            assert_eq!(doc["author"], "Test Author");
        }
    }

    #[test]
    fn exactly_divisible_book_flushes_full_batches_only() {
        let store = CountingStore::default();
        let stats = loader(&store).load(&book_with(1000)).unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 500);
        assert_eq!(batches[1].len(), 500);
        assert_eq!(stats, LoadStats { documents: 1000, batches: 2 });
    }

    #[test]
    fn tail_batch_holds_the_remainder() {
        let store = CountingStore::default();
        let stats = loader(&store).load(&book_with(1203)).unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].len(), 203);
        assert_eq!(stats.documents, 1203);
    }

    #[test]
    fn empty_book_issues_no_writes() {
        let store = CountingStore::default();
        let stats = loader(&store).load(&book_with(0)).unwrap();
        assert!(store.batches.lock().unwrap().is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn failed_flush_keeps_prior_batches_committed() {
        let store = CountingStore::failing_on(2);
        let err = loader(&store).load(&book_with(1200)).unwrap_err();
        assert!(matches!(err, StoreError::BulkWrite { .. }));

        // First batch committed, nothing after the failure.
        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 500);
        let last = batches[0].last().unwrap();
        assert_eq!(last["location"].as_u64(), Some(499));
    }
}
