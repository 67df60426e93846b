//! Static description of the five torrent collections.
//!
//! Each collection is one document type of the data contract with a single
//! identifying field. That field is also what the collection is searched and
//! sorted by, since the store only allows prefix and range filters on the
//! indexed ordering field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::IdFormat;
use crate::store::FilterOperator;

/// Records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound the store accepts for a query limit.
pub const MAX_PAGE_SIZE: u32 = 100;

pub const TORRENT_NAME_MAX_LEN: usize = 256;
pub const TITLE_MAX_LEN: usize = 256;
pub const TRACKERS_MAX_LEN: usize = 2048;

/// One of the five collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionId {
    Movie,
    Tv,
    Book,
    Software,
    Other,
}

impl CollectionId {
    pub const ALL: [CollectionId; 5] = [
        CollectionId::Movie,
        CollectionId::Tv,
        CollectionId::Book,
        CollectionId::Software,
        CollectionId::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionId::Movie => "movie",
            CollectionId::Tv => "tv",
            CollectionId::Book => "book",
            CollectionId::Software => "software",
            CollectionId::Other => "other",
        }
    }

    pub fn spec(&self) -> &'static CollectionSpec {
        match self {
            CollectionId::Movie => &MOVIE,
            CollectionId::Tv => &TV,
            CollectionId::Book => &BOOK,
            CollectionId::Software => &SOFTWARE,
            CollectionId::Other => &OTHER,
        }
    }

    /// Reverse lookup from a contract document type.
    pub fn from_document_type(document_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.spec().document_type == document_type)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown collection: {}", s))
    }
}

/// What the identifying field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer stored, displayed in the given format.
    TypedId(IdFormat),
    /// Free text up to `max_len` characters.
    Text { max_len: usize },
}

/// Schema of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub id: CollectionId,
    /// Document type name in the data contract.
    pub document_type: &'static str,
    /// Identifying field; also the search and sort field.
    pub field: &'static str,
    pub kind: FieldKind,
    /// Human label for the identifying field.
    pub label: &'static str,
}

impl CollectionSpec {
    pub fn search_operator(&self) -> FilterOperator {
        match self.kind {
            FieldKind::TypedId(_) => FilterOperator::Equal,
            FieldKind::Text { .. } => FilterOperator::StartsWith,
        }
    }

    pub fn sort_field(&self) -> &'static str {
        self.field
    }
}

static MOVIE: CollectionSpec = CollectionSpec {
    id: CollectionId::Movie,
    document_type: "movieTorrent",
    field: "imdbId",
    kind: FieldKind::TypedId(IdFormat::Imdb),
    label: "IMDB ID",
};

static TV: CollectionSpec = CollectionSpec {
    id: CollectionId::Tv,
    document_type: "tvTorrent",
    field: "seriesImdbId",
    kind: FieldKind::TypedId(IdFormat::Imdb),
    label: "Series IMDB ID",
};

static BOOK: CollectionSpec = CollectionSpec {
    id: CollectionId::Book,
    document_type: "bookTorrent",
    field: "workId",
    kind: FieldKind::TypedId(IdFormat::OpenlibraryWork),
    label: "OpenLibrary Work ID",
};

static SOFTWARE: CollectionSpec = CollectionSpec {
    id: CollectionId::Software,
    document_type: "softwareTorrent",
    field: "title",
    kind: FieldKind::Text {
        max_len: TITLE_MAX_LEN,
    },
    label: "Title",
};

static OTHER: CollectionSpec = CollectionSpec {
    id: CollectionId::Other,
    document_type: "otherTorrent",
    field: "title",
    kind: FieldKind::Text {
        max_len: TITLE_MAX_LEN,
    },
    label: "Title",
};
