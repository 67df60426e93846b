//! Record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{format_typed_id, IdFormat, InfoHash, Trackers, TYPED_ID_MAX};
use crate::schema::{
    CollectionId, FieldKind, TITLE_MAX_LEN, TORRENT_NAME_MAX_LEN, TRACKERS_MAX_LEN,
};

use super::ValidationError;

/// The collection-specific identifying value of a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "snake_case")]
pub enum Subject {
    Movie { imdb_id: u64 },
    Tv { series_imdb_id: u64 },
    Book { work_id: u64 },
    Software { title: String },
    Other { title: String },
}

impl Subject {
    pub fn collection(&self) -> CollectionId {
        match self {
            Subject::Movie { .. } => CollectionId::Movie,
            Subject::Tv { .. } => CollectionId::Tv,
            Subject::Book { .. } => CollectionId::Book,
            Subject::Software { .. } => CollectionId::Software,
            Subject::Other { .. } => CollectionId::Other,
        }
    }

    /// Build the subject of `collection` from a typed id.
    ///
    /// Returns `None` for the free-text collections.
    pub fn from_typed_id(collection: CollectionId, id: u64) -> Option<Self> {
        match collection {
            CollectionId::Movie => Some(Subject::Movie { imdb_id: id }),
            CollectionId::Tv => Some(Subject::Tv { series_imdb_id: id }),
            CollectionId::Book => Some(Subject::Book { work_id: id }),
            CollectionId::Software | CollectionId::Other => None,
        }
    }

    /// Build the subject of `collection` from a title.
    ///
    /// Returns `None` for the typed-id collections.
    pub fn from_title(collection: CollectionId, title: impl Into<String>) -> Option<Self> {
        match collection {
            CollectionId::Software => Some(Subject::Software { title: title.into() }),
            CollectionId::Other => Some(Subject::Other { title: title.into() }),
            _ => None,
        }
    }

    pub fn typed_id(&self) -> Option<(u64, IdFormat)> {
        match self {
            Subject::Movie { imdb_id } => Some((*imdb_id, IdFormat::Imdb)),
            Subject::Tv { series_imdb_id } => Some((*series_imdb_id, IdFormat::Imdb)),
            Subject::Book { work_id } => Some((*work_id, IdFormat::OpenlibraryWork)),
            Subject::Software { .. } | Subject::Other { .. } => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Subject::Software { title } | Subject::Other { title } => Some(title),
            _ => None,
        }
    }

    /// Display form: `tt0133093`, `OL8483260W`, or the title.
    pub fn display(&self) -> String {
        match (self.typed_id(), self.title()) {
            (Some((id, format)), _) => format_typed_id(id, format),
            (None, Some(title)) => title.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn external_url(&self) -> Option<String> {
        self.typed_id().map(|(id, format)| format.external_url(id))
    }
}

/// Torrent fields shared by all collections plus the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Torrent {
    pub info_hash: InfoHash,
    pub name: String,
    #[serde(default)]
    pub trackers: Trackers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub subject: Subject,
}

impl Torrent {
    pub fn collection(&self) -> CollectionId {
        self.subject.collection()
    }

    /// Check the contract's field limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("torrentName", &self.name, TORRENT_NAME_MAX_LEN)?;

        let stored = self.trackers.to_stored();
        if stored.chars().count() > TRACKERS_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "trackers",
                len: stored.chars().count(),
                max: TRACKERS_MAX_LEN,
            });
        }

        let spec = self.collection().spec();
        match (&spec.kind, self.subject.typed_id(), self.subject.title()) {
            (FieldKind::TypedId(_), Some((id, _)), _) if id > TYPED_ID_MAX => {
                Err(ValidationError::Invalid {
                    field: spec.field,
                    reason: format!("{} exceeds {}", id, TYPED_ID_MAX),
                })
            }
            (FieldKind::Text { max_len }, _, Some(title)) => {
                check_text(spec.field, title, (*max_len).min(TITLE_MAX_LEN))
            }
            _ => Ok(()),
        }
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}

/// A torrent document read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub torrent: Torrent,
}

impl TorrentRecord {
    pub fn collection(&self) -> CollectionId {
        self.torrent.collection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(subject: Subject) -> Torrent {
        Torrent {
            info_hash: InfoHash::from_bytes([7u8; 20]),
            name: "Some Torrent".to_string(),
            trackers: Trackers::new(),
            size_bytes: Some(1),
            subject,
        }
    }

    #[test]
    fn test_subject_display() {
        assert_eq!(Subject::Movie { imdb_id: 133093 }.display(), "tt0133093");
        assert_eq!(Subject::Book { work_id: 8483260 }.display(), "OL8483260W");
        assert_eq!(
            Subject::Software {
                title: "Debian 12".to_string()
            }
            .display(),
            "Debian 12"
        );
        assert_eq!(Subject::Software { title: "x".into() }.external_url(), None);
        assert_eq!(
            Subject::Tv { series_imdb_id: 903747 }.external_url().unwrap(),
            "https://www.imdb.com/title/tt0903747/"
        );
    }

    #[test]
    fn test_subject_constructors_match_collection_kind() {
        assert_eq!(
            Subject::from_typed_id(CollectionId::Tv, 5),
            Some(Subject::Tv { series_imdb_id: 5 })
        );
        assert_eq!(Subject::from_typed_id(CollectionId::Other, 5), None);
        assert_eq!(Subject::from_title(CollectionId::Movie, "x"), None);
        for collection in CollectionId::ALL {
            let subject = Subject::from_typed_id(collection, 1)
                .or_else(|| Subject::from_title(collection, "t"))
                .unwrap();
            assert_eq!(subject.collection(), collection);
        }
    }

    #[test]
    fn test_validate_accepts_reasonable_torrent() {
        assert!(torrent(Subject::Movie { imdb_id: 133093 }).validate().is_ok());
    }

    #[test]
    fn test_validate_name_limits() {
        let mut t = torrent(Subject::Movie { imdb_id: 1 });
        t.name = "  ".to_string();
        assert_eq!(t.validate(), Err(ValidationError::Missing { field: "torrentName" }));

        t.name = "é".repeat(256);
        assert!(t.validate().is_ok());
        t.name.push('x');
        assert!(matches!(
            t.validate(),
            Err(ValidationError::TooLong { field: "torrentName", len: 257, .. })
        ));
    }

    #[test]
    fn test_validate_typed_id_range() {
        let t = torrent(Subject::Book { work_id: TYPED_ID_MAX + 1 });
        assert!(matches!(
            t.validate(),
            Err(ValidationError::Invalid { field: "workId", .. })
        ));
    }

    #[test]
    fn test_validate_title() {
        let t = torrent(Subject::Other { title: String::new() });
        assert_eq!(t.validate(), Err(ValidationError::Missing { field: "title" }));
        let t = torrent(Subject::Other { title: "t".repeat(300) });
        assert!(matches!(t.validate(), Err(ValidationError::TooLong { field: "title", .. })));
    }

    #[test]
    fn test_validate_tracker_length() {
        let mut t = torrent(Subject::Movie { imdb_id: 1 });
        t.trackers = (0..100)
            .map(|i| format!("udp://tracker-{:03}.example.org:1337/announce", i))
            .collect();
        assert!(matches!(t.validate(), Err(ValidationError::TooLong { field: "trackers", .. })));
    }
}
