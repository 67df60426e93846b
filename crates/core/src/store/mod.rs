//! Document store abstraction.
//!
//! The store is the blockchain-backed document service holding the torrent
//! data contract. This crate only consumes it through the `DocumentStore`
//! trait; network clients live outside this crate and tests use
//! `testing::MockDocumentStore`.

mod types;

pub use types::*;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors reported by a document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Submission failed: {0}")]
    SubmissionError(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of this store backend.
    fn name(&self) -> &str;

    /// Connect to the given network.
    async fn connect(&self, network: Network) -> Result<(), StoreError>;

    /// Query documents of one type, ordered and limited per `options`.
    async fn query(
        &self,
        contract_id: &str,
        document_type: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Create a document and return its id.
    async fn create(
        &self,
        contract_id: &str,
        document_type: &str,
        owner_id: &str,
        data: &Map<String, Value>,
        credentials: &Credentials,
    ) -> Result<String, StoreError>;

    /// Fetch a data contract, `None` when the store does not know it.
    async fn fetch_contract(&self, contract_id: &str) -> Result<Option<DataContract>, StoreError>;
}
