//! Hybrid query construction. Pure assembly of the retrieval request from
//! independent optional signals; no I/O happens here.

use serde_json::{json, Value};

/// Hits scoring below this are dropped at the engine, not client-side.
pub const MIN_SCORE: f32 = 0.7;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_VECTOR_BOOST: f32 = 1.0;
pub const DEFAULT_TEXT_BOOST: f32 = 0.2;

/// Caller intent for one hybrid search. Every signal is optional; the
/// builder turns whatever is present into one disjunctive scored group
/// plus non-scored facet filters.
#[derive(Debug, Clone)]
pub struct HybridQuery {
    pub embedding: Option<Vec<f32>>,
    pub keywords: Option<Vec<String>>,
    pub title: Option<String>,
    pub score_threshold: Option<f32>,
    pub vector_boost: f32,
    pub text_boost: f32,
    /// 1-based page number.
    pub page_index: u32,
    pub page_size: u32,
    /// Overrides the window size (and the knn `k`) when present.
    pub limit: Option<u32>,
    pub valid_data: Option<bool>,
    pub media_type: Option<i64>,
}

impl Default for HybridQuery {
    fn default() -> Self {
        Self {
            embedding: None,
            keywords: None,
            title: None,
            score_threshold: Some(MIN_SCORE),
            vector_boost: DEFAULT_VECTOR_BOOST,
            text_boost: DEFAULT_TEXT_BOOST,
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
            limit: None,
            valid_data: None,
            media_type: None,
        }
    }
}

impl HybridQuery {
    /// Window size actually sent to the engine; `limit` wins over
    /// `page_size`.
    #[must_use]
    pub fn effective_size(&self) -> u32 {
        self.limit.unwrap_or(self.page_size)
    }

    /// Result window offset. Always derived from `page_size` even when
    /// `limit` overrides the window size; existing callers depend on page
    /// boundaries staying put.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.page_index.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Assemble the full `_search` body.
    ///
    /// With no signals at all the `should` group is empty and
    /// `minimum_should_match` drops to 0, so an all-filter query still
    /// executes and returns unscored filter-only matches. Relevance sort
    /// has no tie-break key; equal scores come back in engine-internal
    /// order, which is not stable across runs.
    #[must_use]
    pub fn build_request(&self) -> Value {
        let size = self.effective_size();

        let mut should: Vec<Value> = Vec::new();
        if let Some(keywords) = self.keywords.as_ref().filter(|k| !k.is_empty()) {
            // The description match always rides along with the terms
            // clause, even when `title` is None (query serializes as null).
            should.push(json!({
                "match": {
                    "description": {
                        "query": self.title,
                        "boost": 0.5 * self.text_boost
                    }
                }
            }));
            should.push(json!({
                "terms": {
                    "keywords": keywords,
                    "boost": self.text_boost
                }
            }));
        }
        if let Some(embedding) = self.embedding.as_ref().filter(|e| !e.is_empty()) {
            should.push(json!({
                "knn": {
                    "field": "embedding",
                    "query_vector": embedding,
                    "k": size,
                    "num_candidates": size.saturating_mul(5).max(100),
                    "boost": self.vector_boost
                }
            }));
        }

        // Filters gate eligibility only; they never contribute to score.
        let mut filter: Vec<Value> = Vec::new();
        if let Some(media_type) = self.media_type {
            filter.push(json!({ "term": { "media_type": media_type } }));
        }
        if self.valid_data == Some(true) {
            filter.push(json!({ "term": { "valid_data": true } }));
        }

        let minimum_should_match = i32::from(!should.is_empty());
        let mut body = json!({
            "_source": { "excludes": ["*.embedding", "embedding"] },
            "query": {
                "bool": {
                    "should": should,
                    "minimum_should_match": minimum_should_match
                }
            },
            "size": size,
            "from": self.offset(),
            "sort": [{ "_score": { "order": "desc" } }],
        });
        if !filter.is_empty() {
            body["query"]["bool"]["filter"] = Value::Array(filter);
        }
        if let Some(threshold) = self.score_threshold {
            body["min_score"] = json!(threshold);
        }
        body
    }
}
