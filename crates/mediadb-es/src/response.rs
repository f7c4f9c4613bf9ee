//! Decoding of the raw `_search` reply into the fixed result projection
//! plus pagination bookkeeping.

use mediadb_core::types::{MediaSource, Pagination, ResultItem, SearchPage};
use serde::Deserialize;
use serde_json::Value;

use crate::query::HybridQuery;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    pub total: TotalHits,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f32>,
    #[serde(rename = "_source")]
    pub source: Value,
}

fn project_hit(hit: Hit) -> serde_json::Result<ResultItem> {
    let mut source = hit.source;
    // Documents written before the rename carry `timestamp` instead of
    // `updated_at`.
    if let Some(doc) = source.as_object_mut() {
        let missing = doc.get("updated_at").map_or(true, Value::is_null);
        if missing {
            if let Some(legacy) = doc.remove("timestamp") {
                doc.insert("updated_at".to_string(), legacy);
            }
        }
    }
    let source: MediaSource = serde_json::from_value(source)?;
    Ok(ResultItem {
        id: hit.id,
        source,
        score: hit.score.unwrap_or_default(),
    })
}

/// Normalize a decoded reply for the query that produced it. Fails only on
/// hits that do not fit the fixed projection.
pub fn into_page(response: SearchResponse, query: &HybridQuery) -> serde_json::Result<SearchPage> {
    let total_items = response.hits.total.value;
    let items = response
        .hits
        .hits
        .into_iter()
        .map(project_hit)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(SearchPage {
        items,
        pagination: Some(Pagination::new(
            query.page_index,
            query.page_size,
            query.effective_size(),
            total_items,
        )),
    })
}
