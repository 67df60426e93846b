//! Per-tab browse state.
//!
//! `QueryState` is a plain value. Every navigation action is a pure function
//! from one state to the next; the engine decides when a planned state is
//! committed (after its query succeeds).

use serde::Serialize;

use crate::codec::parse_typed_id;
use crate::schema::{CollectionId, FieldKind};
use crate::store::{Cursor, FilterValue, OrderBy, QueryOptions, WhereClause};

use super::BrowseError;

/// Coarse phase of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowsePhase {
    /// Page 1, no filter.
    Idle,
    /// Page 1, filter active.
    Filtered,
    /// Past page 1, with or without a filter.
    Paged,
}

/// Pagination and filter state of one collection tab.
///
/// `cursor_stack.len() == page - 1` always holds; `cursor` is the id of the
/// last record of the previous page, or `None` on page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    collection: CollectionId,
    filter: Option<WhereClause>,
    page: u32,
    cursor_stack: Vec<Option<Cursor>>,
    cursor: Option<Cursor>,
    last_page_size: usize,
    last_record: Option<Cursor>,
}

impl QueryState {
    /// Initial state of a tab: page 1, no filter, nothing fetched yet.
    pub fn new(collection: CollectionId) -> Self {
        Self {
            collection,
            filter: None,
            page: 1,
            cursor_stack: Vec::new(),
            cursor: None,
            last_page_size: 0,
            last_record: None,
        }
    }

    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    pub fn filter(&self) -> Option<&WhereClause> {
        self.filter.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn cursor_stack(&self) -> &[Option<Cursor>] {
        &self.cursor_stack
    }

    /// Number of documents the last fetch of this page returned.
    pub fn last_page_size(&self) -> usize {
        self.last_page_size
    }

    pub fn phase(&self) -> BrowsePhase {
        match (self.page, &self.filter) {
            (1, None) => BrowsePhase::Idle,
            (1, Some(_)) => BrowsePhase::Filtered,
            _ => BrowsePhase::Paged,
        }
    }

    /// Whether a further page may exist.
    pub fn has_next_page(&self, page_size: u32) -> bool {
        self.last_page_size >= page_size as usize && self.last_record.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Page 1 of the same collection with `filter` applied.
    pub fn with_filter(&self, filter: WhereClause) -> Self {
        Self {
            filter: Some(filter),
            ..Self::new(self.collection)
        }
    }

    /// Page 1 of the same collection without a filter.
    pub fn without_filter(&self) -> Self {
        Self::new(self.collection)
    }

    /// The following page, or `None` when the current page was short.
    pub fn advanced(&self, page_size: u32) -> Option<Self> {
        if !self.has_next_page(page_size) {
            return None;
        }
        let mut next = self.clone();
        next.cursor_stack.push(self.cursor.clone());
        next.cursor = self.last_record.clone();
        next.page += 1;
        next.last_page_size = 0;
        next.last_record = None;
        Some(next)
    }

    /// The preceding page, or `None` on page 1.
    pub fn retreated(&self) -> Option<Self> {
        if !self.has_previous_page() {
            return None;
        }
        let mut previous = self.clone();
        previous.cursor = previous.cursor_stack.pop().flatten();
        previous.page -= 1;
        previous.last_page_size = 0;
        previous.last_record = None;
        Some(previous)
    }

    /// Record the outcome of fetching this state's page.
    pub fn loaded(mut self, page_size: usize, last_record: Option<Cursor>) -> Self {
        self.last_page_size = page_size;
        self.last_record = last_record;
        self
    }

    /// The store query that fetches this state's page.
    pub fn query_options(&self, page_size: u32) -> QueryOptions {
        QueryOptions {
            limit: page_size,
            order_by: vec![OrderBy::asc(self.collection.spec().sort_field())],
            where_clauses: self.filter.iter().cloned().collect(),
            start_after: self.cursor.clone(),
        }
    }
}

/// Turn a raw search box entry into a filter on `collection`'s search field.
///
/// Blank input yields `Ok(None)`, meaning "no filter". Typed-id collections
/// match by equality on the parsed integer; text collections by prefix.
pub fn normalize_search(
    collection: CollectionId,
    raw_query: &str,
) -> Result<Option<WhereClause>, BrowseError> {
    let term = raw_query.trim();
    if term.is_empty() {
        return Ok(None);
    }

    let spec = collection.spec();
    let value = match spec.kind {
        FieldKind::TypedId(format) => {
            let id = parse_typed_id(term, format).ok_or_else(|| BrowseError::InvalidSearchTerm {
                collection,
                term: term.to_string(),
                expected: format.as_str(),
            })?;
            FilterValue::Integer(id)
        }
        FieldKind::Text { .. } => FilterValue::Text(term.to_string()),
    };

    Ok(Some(WhereClause {
        field: spec.field.to_string(),
        operator: spec.search_operator(),
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FilterOperator;

    fn full_page(state: QueryState, last: &str) -> QueryState {
        state.loaded(12, Some(Cursor::new(last)))
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = QueryState::new(CollectionId::Movie);
        assert_eq!(state.phase(), BrowsePhase::Idle);
        assert_eq!(state.page(), 1);
        assert!(state.cursor().is_none());
        assert!(!state.has_next_page(12));
        assert!(!state.has_previous_page());
    }

    #[test]
    fn test_normalize_imdb_search() {
        let filter = normalize_search(CollectionId::Movie, "tt0133093").unwrap().unwrap();
        assert_eq!(filter.field, "imdbId");
        assert_eq!(filter.operator, FilterOperator::Equal);
        assert_eq!(filter.value, FilterValue::Integer(133093));
    }

    #[test]
    fn test_normalize_openlibrary_search() {
        let filter = normalize_search(CollectionId::Book, " OL8483260W ").unwrap().unwrap();
        assert_eq!(filter.field, "workId");
        assert_eq!(filter.value, FilterValue::Integer(8483260));
    }

    #[test]
    fn test_normalize_text_search_is_prefix() {
        let filter = normalize_search(CollectionId::Software, "  Debian ").unwrap().unwrap();
        assert_eq!(filter.field, "title");
        assert_eq!(filter.operator, FilterOperator::StartsWith);
        assert_eq!(filter.value, FilterValue::Text("Debian".to_string()));
    }

    #[test]
    fn test_normalize_blank_is_no_filter() {
        assert_eq!(normalize_search(CollectionId::Tv, "   ").unwrap(), None);
    }

    #[test]
    fn test_normalize_rejects_unparseable_id() {
        let err = normalize_search(CollectionId::Tv, "breaking bad").unwrap_err();
        assert!(matches!(
            err,
            BrowseError::InvalidSearchTerm {
                collection: CollectionId::Tv,
                ..
            }
        ));
    }

    #[test]
    fn test_advance_and_retreat_keep_invariant() {
        let page1 = full_page(QueryState::new(CollectionId::Movie), "r12");
        let page2 = page1.advanced(12).unwrap();
        assert_eq!(page2.page(), 2);
        assert_eq!(page2.cursor(), Some(&Cursor::new("r12")));
        assert_eq!(page2.cursor_stack(), [None::<Cursor>].as_slice());
        assert_eq!(page2.phase(), BrowsePhase::Paged);

        let page3 = full_page(page2, "r24").advanced(12).unwrap();
        assert_eq!(page3.page(), 3);
        assert_eq!(page3.cursor_stack().len(), 2);
        assert_eq!(page3.cursor(), Some(&Cursor::new("r24")));

        let back = page3.retreated().unwrap();
        assert_eq!(back.page(), 2);
        assert_eq!(back.cursor(), Some(&Cursor::new("r12")));
        assert_eq!(back.cursor_stack().len(), 1);

        let first = back.retreated().unwrap();
        assert_eq!(first.page(), 1);
        assert!(first.cursor().is_none());
        assert!(first.cursor_stack().is_empty());
        assert!(first.retreated().is_none());
    }

    #[test]
    fn test_short_page_cannot_advance() {
        let state = QueryState::new(CollectionId::Movie).loaded(5, Some(Cursor::new("r5")));
        assert!(state.advanced(12).is_none());

        let empty = QueryState::new(CollectionId::Movie).loaded(0, None);
        assert!(empty.advanced(12).is_none());
    }

    #[test]
    fn test_filter_resets_paging() {
        let page2 = full_page(QueryState::new(CollectionId::Other), "x")
            .advanced(12)
            .unwrap();
        let filter = normalize_search(CollectionId::Other, "abc").unwrap().unwrap();
        let filtered = page2.with_filter(filter.clone());
        assert_eq!(filtered.page(), 1);
        assert!(filtered.cursor_stack().is_empty());
        assert_eq!(filtered.filter(), Some(&filter));
        assert_eq!(filtered.phase(), BrowsePhase::Filtered);

        let cleared = filtered.without_filter();
        assert_eq!(cleared.phase(), BrowsePhase::Idle);
        assert_eq!(cleared.collection(), CollectionId::Other);
    }

    #[test]
    fn test_paging_keeps_filter() {
        let filter = normalize_search(CollectionId::Movie, "1").unwrap().unwrap();
        let state = full_page(QueryState::new(CollectionId::Movie).with_filter(filter), "z");
        let next = state.advanced(12).unwrap();
        let options = next.query_options(12);
        assert_eq!(options.where_clauses.len(), 1);
        assert_eq!(options.start_after, Some(Cursor::new("z")));
    }

    #[test]
    fn test_query_options_first_page() {
        let options = QueryState::new(CollectionId::Book).query_options(12);
        assert_eq!(options.limit, 12);
        assert_eq!(options.order_by, vec![OrderBy::asc("workId")]);
        assert!(options.where_clauses.is_empty());
        assert!(options.start_after.is_none());
    }
}
