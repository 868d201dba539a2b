//! Search backend capability: index administration plus bulk writes.
//!
//! The pipeline is written against the [`SearchStore`] trait so that tests can
//! substitute a recording store. [`HttpSearchStore`] is the production
//! implementation, a blocking client against an Elasticsearch-compatible
//! REST API.

use std::time::Duration;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Opaque document store exposing index-admin and bulk-write operations.
///
/// `Send + Sync` so one shared handle can serve the health check, schema
/// reset, and all bulk writes across worker threads.
pub trait SearchStore: Send + Sync {
    /// Whether the named index exists.
    fn index_exists(&self, index: &str) -> StoreResult<bool>;

    /// Delete the named index. Destructive and immediately visible.
    fn delete_index(&self, index: &str) -> StoreResult<()>;

    /// Create the named index with the given mappings body.
    fn create_index(&self, index: &str, mappings: &Value) -> StoreResult<()>;

    /// Cluster health status (e.g. "green"). Err when unreachable or red.
    fn cluster_health(&self) -> StoreResult<String>;

    /// Write a batch of documents to the index in one call. All-or-nothing
    /// per call from the loader's perspective: any reported item failure is
    /// an error.
    fn bulk_write(&self, index: &str, docs: &[Value]) -> StoreResult<()>;
}

/// Blocking HTTP client for an Elasticsearch-compatible backend.
pub struct HttpSearchStore {
    base_url: String,
    http: ureq::Agent,
}

/// Health probes give up quickly so an absent backend fails fast.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

impl HttpSearchStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: ureq::Agent::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl SearchStore for HttpSearchStore {
    fn index_exists(&self, index: &str) -> StoreResult<bool> {
        match self.http.head(&self.url(&format!("/{index}"))).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(StoreError::IndexAdmin {
                operation: "existence check",
                index: index.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn delete_index(&self, index: &str) -> StoreResult<()> {
        self.http
            .delete(&self.url(&format!("/{index}")))
            .call()
            .map_err(|e| StoreError::IndexAdmin {
                operation: "delete",
                index: index.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn create_index(&self, index: &str, mappings: &Value) -> StoreResult<()> {
        self.http
            .put(&self.url(&format!("/{index}")))
            .send_json(mappings)
            .map_err(|e| StoreError::IndexAdmin {
                operation: "create",
                index: index.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn cluster_health(&self) -> StoreResult<String> {
        let resp = self
            .http
            .get(&self.url("/_cluster/health"))
            .timeout(HEALTH_TIMEOUT)
            .call()
            .map_err(|e| StoreError::Unhealthy {
                message: e.to_string(),
            })?;
        let body: Value = resp.into_json().map_err(|e| StoreError::Unhealthy {
            message: format!("malformed health response: {e}"),
        })?;

        let status = body["status"].as_str().unwrap_or("unknown").to_string();
        if status == "red" {
            return Err(StoreError::Unhealthy {
                message: "cluster status is red".to_string(),
            });
        }
        Ok(status)
    }

    fn bulk_write(&self, index: &str, docs: &[Value]) -> StoreResult<()> {
        // NDJSON bulk payload: an action line per document.
        let mut payload = String::new();
        for doc in docs {
            payload.push_str("{\"index\":{}}\n");
            payload.push_str(&doc.to_string());
            payload.push('\n');
        }

        let bulk_err = |message: String| StoreError::BulkWrite {
            index: index.to_string(),
            count: docs.len(),
            message,
        };

        let resp = self
            .http
            .post(&self.url(&format!("/{index}/_bulk")))
            .set("Content-Type", "application/x-ndjson")
            .send_string(&payload)
            .map_err(|e| bulk_err(e.to_string()))?;

        let body: Value = resp
            .into_json()
            .map_err(|e| bulk_err(format!("malformed bulk response: {e}")))?;

        // The bulk endpoint answers 200 even when individual items failed;
        // surface the first item error.
        if body["errors"].as_bool().unwrap_or(false) {
            let first = body["items"]
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .find_map(|item| item["index"]["error"]["reason"].as_str())
                })
                .unwrap_or("unspecified item error");
            return Err(bulk_err(first.to_string()));
        }
        Ok(())
    }
}
