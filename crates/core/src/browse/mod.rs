//! Paginated browsing and search over the torrent collections.
//!
//! The store has no offsets, only keyset pagination ("start after this
//! document"), so backward navigation is served from a stack of the cursors
//! that opened each earlier page.

mod engine;
mod state;

pub use engine::{BrowseOptions, QueryEngine};
pub use state::{normalize_search, BrowsePhase, QueryState};

use thiserror::Error;

use crate::record::TorrentRecord;
use crate::schema::CollectionId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid search term {term:?} for {collection}: expected {expected} id")]
    InvalidSearchTerm {
        collection: CollectionId,
        term: String,
        expected: &'static str,
    },
}

/// A committed page: the tab's new state and the records fetched for it.
#[derive(Debug, Clone)]
pub struct Page {
    pub state: QueryState,
    pub records: Vec<TorrentRecord>,
    /// Documents on this page that could not be decoded.
    pub skipped: usize,
    /// Sequence number of the request that produced this page.
    pub sequence: u64,
}

impl Page {
    /// True when the store returned nothing for this page.
    pub fn is_empty(&self) -> bool {
        self.state.last_page_size() == 0
    }
}

/// Result of a navigation action.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The query ran and its page is now the tab's state.
    Loaded(Page),
    /// Nothing to do (no further page, or already on page 1); no query ran.
    Unchanged(QueryState),
    /// A newer request on this tab was issued while this one was in flight;
    /// its response was discarded.
    Superseded,
}

impl PageOutcome {
    pub fn page(&self) -> Option<&Page> {
        match self {
            PageOutcome::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn into_page(self) -> Option<Page> {
        match self {
            PageOutcome::Loaded(page) => Some(page),
            _ => None,
        }
    }
}
