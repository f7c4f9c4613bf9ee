#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Elasticsearch backend: channelized connections, hybrid query
//! construction and paginated result normalization.

pub mod client;
pub mod query;
pub mod response;
pub mod storage;

pub use client::{ConnectionProvider, EsChannel};
pub use query::HybridQuery;
pub use storage::EsStorage;
