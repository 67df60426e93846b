//! Query engine driving one browsing session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::BrowseConfig;
use crate::metrics;
use crate::record::decode_page;
use crate::schema::{CollectionId, DEFAULT_PAGE_SIZE};
use crate::store::{Cursor, DocumentStore};

use super::{normalize_search, BrowseError, Page, PageOutcome, QueryState};

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseOptions {
    /// Records per page for every collection.
    pub page_size: u32,
    /// Tab shown before the caller selects one.
    pub initial_collection: CollectionId,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            initial_collection: CollectionId::Movie,
        }
    }
}

impl From<&BrowseConfig> for BrowseOptions {
    fn from(config: &BrowseConfig) -> Self {
        Self {
            page_size: config.page_size,
            initial_collection: config.default_collection,
        }
    }
}

/// Drives browsing and search for the active collection tab.
///
/// Each navigation action plans the next [`QueryState`], issues exactly one
/// store query for it and commits the state only if the query succeeds.
/// Requests are numbered; a response that comes back after a newer request
/// was issued is discarded, so the latest action always wins.
pub struct QueryEngine {
    store: Arc<dyn DocumentStore>,
    contract_id: String,
    page_size: u32,
    state: RwLock<QueryState>,
    sequence: AtomicU64,
}

impl QueryEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        contract_id: impl Into<String>,
        options: BrowseOptions,
    ) -> Self {
        Self {
            store,
            contract_id: contract_id.into(),
            page_size: options.page_size,
            state: RwLock::new(QueryState::new(options.initial_collection)),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Snapshot of the committed state.
    pub async fn state(&self) -> QueryState {
        self.state.read().await.clone()
    }

    /// Sequence number of the most recently issued request.
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Switch tabs. Always starts over at page 1 without a filter; cursors
    /// from another collection's index mean nothing here.
    pub async fn select_collection(
        &self,
        collection: CollectionId,
    ) -> Result<PageOutcome, BrowseError> {
        self.transition("select_collection", |_| Ok(Some(QueryState::new(collection))))
            .await
    }

    /// Filter the active collection by its search field.
    ///
    /// Blank input behaves like [`clear_search`](Self::clear_search) but
    /// always re-queries.
    pub async fn search(&self, raw_query: &str) -> Result<PageOutcome, BrowseError> {
        self.transition("search", |current| {
            let target = match normalize_search(current.collection(), raw_query)? {
                Some(filter) => current.with_filter(filter),
                None => current.without_filter(),
            };
            Ok(Some(target))
        })
        .await
    }

    /// Drop the filter and go back to page 1. No-op when already there.
    pub async fn clear_search(&self) -> Result<PageOutcome, BrowseError> {
        self.transition("clear_search", |current| {
            if current.filter().is_none() && current.page() == 1 {
                return Ok(None);
            }
            Ok(Some(current.without_filter()))
        })
        .await
    }

    /// Advance one page. No-op when the current page was not full.
    pub async fn next_page(&self) -> Result<PageOutcome, BrowseError> {
        let page_size = self.page_size;
        self.transition("next_page", |current| Ok(current.advanced(page_size)))
            .await
    }

    /// Go back one page. No-op on page 1.
    pub async fn previous_page(&self) -> Result<PageOutcome, BrowseError> {
        self.transition("previous_page", |current| Ok(current.retreated()))
            .await
    }

    /// Re-run the current page's query, e.g. to retry after a failure.
    pub async fn refresh(&self) -> Result<PageOutcome, BrowseError> {
        self.transition("refresh", |current| Ok(Some(current.clone())))
            .await
    }

    async fn transition<F>(&self, action: &'static str, plan: F) -> Result<PageOutcome, BrowseError>
    where
        F: FnOnce(&QueryState) -> Result<Option<QueryState>, BrowseError>,
    {
        let (target, sequence) = {
            let current = self.state.read().await;
            match plan(&current)? {
                Some(target) => (target, self.sequence.fetch_add(1, Ordering::SeqCst) + 1),
                None => {
                    debug!(action, page = current.page(), "Navigation has nothing to do");
                    return Ok(PageOutcome::Unchanged(current.clone()));
                }
            }
        };
        self.fetch(action, target, sequence).await
    }

    async fn fetch(
        &self,
        action: &'static str,
        target: QueryState,
        sequence: u64,
    ) -> Result<PageOutcome, BrowseError> {
        let collection = target.collection();
        let options = target.query_options(self.page_size);
        debug!(
            action,
            collection = %collection,
            page = target.page(),
            sequence,
            filter = ?options.where_clauses,
            start_after = ?options.start_after,
            "Querying store"
        );

        let result = self
            .store
            .query(&self.contract_id, collection.spec().document_type, &options)
            .await;

        let mut state = self.state.write().await;
        if self.sequence.load(Ordering::SeqCst) != sequence {
            debug!(action, sequence, "Discarding superseded response");
            metrics::STALE_RESPONSES.inc();
            metrics::STORE_QUERIES
                .with_label_values(&[collection.as_str(), "stale"])
                .inc();
            return Ok(PageOutcome::Superseded);
        }

        let documents = match result {
            Ok(documents) => documents,
            Err(e) => {
                warn!(
                    action,
                    collection = %collection,
                    error = %e,
                    "Store query failed, keeping previous state"
                );
                metrics::STORE_QUERIES
                    .with_label_values(&[collection.as_str(), "error"])
                    .inc();
                return Err(e.into());
            }
        };
        metrics::STORE_QUERIES
            .with_label_values(&[collection.as_str(), "ok"])
            .inc();

        let last_record = documents.last().map(|d| Cursor::new(d.id.clone()));
        let committed = target.loaded(documents.len(), last_record);
        *state = committed.clone();
        drop(state);

        let decoded = decode_page(collection, &documents);
        debug!(
            action,
            collection = %collection,
            page = committed.page(),
            records = decoded.records.len(),
            skipped = decoded.skipped,
            "Page loaded"
        );

        Ok(PageOutcome::Loaded(Page {
            state: committed,
            records: decoded.records,
            skipped: decoded.skipped,
            sequence,
        }))
    }
}
