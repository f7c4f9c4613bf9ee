//! Domain types shared by the search backend and its callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed source projection returned for every hit.
///
/// Embedding vectors are excluded from the projection at the engine level
/// and have no field here, so they can never leak into a response.
/// `updated_at` carries the legacy `timestamp` value for documents written
/// before the field was renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    pub media_id: String,
    pub media_path: String,
    pub media_type: i64,
    pub valid_data: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

/// One ranked hit. `score` is the engine-native relevance score, not
/// renormalized. The engine reports a null score for hits that were never
/// scored (possible when `min_score` is unset); those project as `0.0`
/// here rather than carrying an optional through every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub source: MediaSource,
    pub score: f32,
}

/// Page bookkeeping derived from the engine's reported total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// `per_page` is the requested page size that page boundaries are
    /// computed from; `effective_size` is the window size actually sent to
    /// the engine (a `limit` override). They differ only when a caller
    /// passed `limit`. An empty result set still counts as one page.
    #[must_use]
    pub fn new(page_index: u32, per_page: u32, effective_size: u32, total_items: u64) -> Self {
        let per_page = u64::from(per_page.max(1));
        Self {
            page_index,
            page_size: effective_size,
            total_items,
            total_pages: total_items.div_ceil(per_page).max(1),
        }
    }
}

/// The value returned by a hybrid search. `pagination` is present on the
/// success path and absent when a degraded policy swallowed a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<ResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl SearchPage {
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new(), pagination: None }
    }
}
