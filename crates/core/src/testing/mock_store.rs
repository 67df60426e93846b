//! Mock document store for testing.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::store::{
    Credentials, DataContract, Document, DocumentStore, FilterOperator, FilterValue, Network,
    QueryOptions, SortDirection, StoreError, WhereClause,
};

/// A recorded query for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub contract_id: String,
    pub document_type: String,
    pub options: QueryOptions,
}

/// A recorded document creation.
#[derive(Debug, Clone)]
pub struct RecordedCreate {
    pub contract_id: String,
    pub document_type: String,
    pub owner_id: String,
    pub data: Map<String, Value>,
}

/// In-memory implementation of the DocumentStore trait.
///
/// Answers queries the way the real store does: equality and prefix
/// filters, ordering on the requested field (ties broken by id), keyset
/// `start_after` and a result limit. Also:
/// - Records every query and create for assertions
/// - Fails the next call with a configured error
/// - Delays individual queries to exercise out-of-order responses
///
/// # Example
///
/// ```rust,ignore
/// use magnetdex_core::testing::{fixtures, MockDocumentStore};
///
/// let store = MockDocumentStore::new();
/// store.add_documents("movieTorrent", fixtures::movie_documents(30)).await;
///
/// // The next query fails
/// store.set_next_error(StoreError::QueryError("offline".into())).await;
///
/// // The next query takes a while
/// store.push_delay(Duration::from_millis(100)).await;
/// ```
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    /// Documents by document type.
    documents: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    /// Known contracts by id.
    contracts: Arc<RwLock<HashMap<String, DataContract>>>,
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    creates: Arc<RwLock<Vec<RecordedCreate>>>,
    /// If set, the next call fails with this error.
    next_error: Arc<RwLock<Option<StoreError>>>,
    /// Per-query delays, consumed front to back.
    delays: Arc<RwLock<VecDeque<Duration>>>,
    network: Arc<RwLock<Option<Network>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for MockDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDocumentStore")
            .field("documents", &"<documents>")
            .field("contracts", &"<contracts>")
            .field("queries", &"<queries>")
            .finish()
    }
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents of a document type.
    pub async fn add_documents(&self, document_type: &str, documents: Vec<Document>) {
        self.documents
            .write()
            .await
            .entry(document_type.to_string())
            .or_default()
            .extend(documents);
    }

    /// Make a contract fetchable.
    pub async fn add_contract(&self, contract: DataContract) {
        self.contracts
            .write()
            .await
            .insert(contract.id.clone(), contract);
    }

    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    pub async fn last_query(&self) -> Option<RecordedQuery> {
        self.queries.read().await.last().cloned()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    pub async fn recorded_creates(&self) -> Vec<RecordedCreate> {
        self.creates.read().await.clone()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: StoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay the next query that does not already have a delay.
    pub async fn push_delay(&self, delay: Duration) {
        self.delays.write().await.push_back(delay);
    }

    /// Network passed to the last successful `connect`.
    pub async fn connected_network(&self) -> Option<Network> {
        *self.network.read().await
    }

    async fn take_error(&self) -> Option<StoreError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self, network: Network) -> Result<(), StoreError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        *self.network.write().await = Some(network);
        Ok(())
    }

    async fn query(
        &self,
        contract_id: &str,
        document_type: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.queries.write().await.push(RecordedQuery {
            contract_id: contract_id.to_string(),
            document_type: document_type.to_string(),
            options: options.clone(),
        });

        let delay = self.delays.write().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let documents = self.documents.read().await;
        let all = documents
            .get(document_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(evaluate(all, options))
    }

    async fn create(
        &self,
        contract_id: &str,
        document_type: &str,
        owner_id: &str,
        data: &Map<String, Value>,
        _credentials: &Credentials,
    ) -> Result<String, StoreError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let id = format!(
            "mock-doc-{}",
            self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1
        );
        self.creates.write().await.push(RecordedCreate {
            contract_id: contract_id.to_string(),
            document_type: document_type.to_string(),
            owner_id: owner_id.to_string(),
            data: data.clone(),
        });
        self.add_documents(
            document_type,
            vec![Document {
                id: id.clone(),
                owner_id: owner_id.to_string(),
                created_at: Some(Utc::now()),
                data: data.clone(),
            }],
        )
        .await;
        Ok(id)
    }

    async fn fetch_contract(&self, contract_id: &str) -> Result<Option<DataContract>, StoreError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self.contracts.read().await.get(contract_id).cloned())
    }
}

fn evaluate(documents: &[Document], options: &QueryOptions) -> Vec<Document> {
    let mut matching: Vec<&Document> = documents
        .iter()
        .filter(|d| options.where_clauses.iter().all(|c| matches_clause(d, c)))
        .collect();

    if let Some(order) = options.order_by.first() {
        matching.sort_by(|a, b| {
            let ordering = compare_field(a, b, &order.field).then_with(|| a.id.cmp(&b.id));
            match order.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let start = match &options.start_after {
        Some(cursor) => matching
            .iter()
            .position(|d| d.id == cursor.as_str())
            .map(|i| i + 1)
            .unwrap_or(matching.len()),
        None => 0,
    };

    matching
        .into_iter()
        .skip(start)
        .take(options.limit as usize)
        .cloned()
        .collect()
}

fn matches_clause(document: &Document, clause: &WhereClause) -> bool {
    let Some(value) = document.data.get(&clause.field) else {
        return false;
    };
    match (clause.operator, &clause.value) {
        (FilterOperator::Equal, FilterValue::Integer(n)) => value.as_u64() == Some(*n),
        (FilterOperator::Equal, FilterValue::Text(t)) => value.as_str() == Some(t.as_str()),
        (FilterOperator::StartsWith, FilterValue::Text(t)) => {
            value.as_str().is_some_and(|s| s.starts_with(t.as_str()))
        }
        (FilterOperator::StartsWith, FilterValue::Integer(_)) => false,
    }
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    match (a.data.get(field), b.data.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_u64().cmp(&y.as_u64()),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
