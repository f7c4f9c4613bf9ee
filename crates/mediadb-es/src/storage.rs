//! The concrete storage backend: hybrid search plus the `save`/`retrieve`
//! contract with a buffered bulk write path.

use std::sync::Arc;

use async_trait::async_trait;
use mediadb_core::error::{Error, Result};
use mediadb_core::traits::Storage;
use mediadb_core::types::SearchPage;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::client::EsChannel;
use crate::query::HybridQuery;
use crate::response::{self, SearchResponse};

/// Pending writes accumulated before an automatic `_bulk` flush.
pub const BATCH_SIZE: usize = 2000;
/// Attempts per bulk flush before the batch is reported lost.
pub const MAX_RETRIES: u32 = 5;

/// One storage instance per (channel, default index). Search handles any
/// index on the channel; `save`/`retrieve` target the default index.
pub struct EsStorage {
    channel: Arc<EsChannel>,
    index: String,
    pending: Mutex<Vec<Value>>,
}

impl EsStorage {
    #[must_use]
    pub fn new(channel: Arc<EsChannel>, index: impl Into<String>) -> Self {
        Self {
            channel,
            index: index.into(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Run a hybrid search and normalize the reply. Every failure mode
    /// (transport, timeout, engine error status, hits that do not fit the
    /// projection) surfaces as a typed error; callers that prefer the
    /// availability-first policy use [`Self::search_hybrid_or_empty`].
    pub async fn search_hybrid(&self, index: &str, query: &HybridQuery) -> Result<SearchPage> {
        let search_err = |detail: String| Error::Search {
            index: index.to_string(),
            detail,
        };
        let body = query.build_request();
        let http_response = self
            .channel
            .post(&format!("{index}/_search"))
            .json(&body)
            .send()
            .await
            .map_err(|e| search_err(e.to_string()))?;
        let status = http_response.status();
        if !status.is_success() {
            let detail = http_response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(search_err(detail));
        }
        let decoded: SearchResponse = http_response
            .json()
            .await
            .map_err(|e| search_err(e.to_string()))?;
        response::into_page(decoded, query).map_err(|e| search_err(e.to_string()))
    }

    /// Availability-first variant: any failure is logged and downgraded to
    /// an empty page without pagination metadata. An empty page from this
    /// method is ambiguous between "no matches" and "engine down"; use
    /// [`Self::search_hybrid`] when that distinction matters.
    pub async fn search_hybrid_or_empty(&self, index: &str, query: &HybridQuery) -> SearchPage {
        match self.search_hybrid(index, query).await {
            Ok(page) => page,
            Err(e) => {
                error!(index, error = %e, "hybrid search failed, returning empty page");
                SearchPage::empty()
            }
        }
    }

    /// Number of writes buffered and not yet flushed.
    pub async fn pending_writes(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Flush whatever is buffered, regardless of the batch threshold.
    pub async fn flush(&self) -> Result<()> {
        let batch = {
            let mut pending = self.pending.lock().await;
            std::mem::take(&mut *pending)
        };
        if batch.is_empty() {
            return Ok(());
        }
        self.send_bulk(&batch).await
    }

    async fn send_bulk(&self, batch: &[Value]) -> Result<()> {
        let mut body = String::new();
        for doc in batch {
            let action = match doc.get("id").and_then(Value::as_str) {
                Some(id) => json!({ "index": { "_index": self.index, "_id": id } }),
                None => json!({ "index": { "_index": self.index } }),
            };
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&doc.to_string());
            body.push('\n');
        }

        let mut last_failure = String::new();
        for attempt in 1..=MAX_RETRIES {
            let sent = self
                .channel
                .post("_bulk")
                .header(CONTENT_TYPE, "application/x-ndjson")
                .body(body.clone())
                .send()
                .await;
            match sent {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => last_failure = format!("bulk returned {}", response.status()),
                Err(e) => last_failure = e.to_string(),
            }
            warn!(index = %self.index, attempt, failure = %last_failure, "bulk flush attempt failed");
        }
        Err(Error::Operation(format!(
            "bulk flush to index {} failed after {} attempts, {} documents lost: {}",
            self.index,
            MAX_RETRIES,
            batch.len(),
            last_failure
        )))
    }
}

#[async_trait]
impl Storage for EsStorage {
    /// Append to the pending buffer; the batch is shipped once it reaches
    /// [`BATCH_SIZE`]. The buffer lock is held only for the append, never
    /// across the network call.
    async fn save(&self, data: Value) -> Result<()> {
        let batch = {
            let mut pending = self.pending.lock().await;
            pending.push(data);
            if pending.len() >= BATCH_SIZE {
                std::mem::take(&mut *pending)
            } else {
                Vec::new()
            }
        };
        if batch.is_empty() {
            Ok(())
        } else {
            self.send_bulk(&batch).await
        }
    }

    async fn retrieve(&self, identifier: &str) -> Result<Value> {
        let response = self
            .channel
            .get(&format!("{}/_doc/{identifier}", self.index))
            .send()
            .await
            .map_err(|e| Error::Operation(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(identifier.to_string()));
        }
        if !response.status().is_success() {
            return Err(Error::Operation(format!(
                "retrieve returned {}",
                response.status()
            )));
        }
        let doc: Value = response
            .json()
            .await
            .map_err(|e| Error::Operation(e.to_string()))?;
        Ok(doc.get("_source").cloned().unwrap_or(doc))
    }
}
