use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Polymorphic storage contract. Both operations are mandatory for a
/// concrete backend; there are no default bodies, so forgetting one is a
/// compile error rather than a runtime failure.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a record. Backends may buffer writes; `flush`-style
    /// operations are backend-specific.
    async fn save(&self, data: Value) -> Result<()>;

    /// Return the stored record for an identifier, or `Error::NotFound`.
    async fn retrieve(&self, identifier: &str) -> Result<Value>;
}
