//! Testing utilities and mock implementations.
//!
//! Provides an in-memory `DocumentStore` and fixtures so browsing,
//! submission and contract binding can be exercised without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use magnetdex_core::testing::{fixtures, MockDocumentStore};
//!
//! let store = Arc::new(MockDocumentStore::new());
//! store.add_documents("movieTorrent", fixtures::movie_documents(30)).await;
//!
//! let engine = QueryEngine::new(store.clone(), "contract", BrowseOptions::default());
//! engine.select_collection(CollectionId::Movie).await?;
//! ```

mod mock_store;

pub use mock_store::{MockDocumentStore, RecordedCreate, RecordedQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::codec::{InfoHash, Trackers};
    use crate::record::{Subject, Torrent};
    use crate::store::{DataContract, Document};

    pub const OWNER_ID: &str = "4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF";

    /// A distinct, deterministic info hash per seed.
    pub fn info_hash(seed: u8) -> InfoHash {
        let mut bytes = [seed; 20];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = b.wrapping_add(i as u8);
        }
        InfoHash::from_bytes(bytes)
    }

    fn hash_value(seed: u8) -> Value {
        json!(info_hash(seed).as_bytes().to_vec())
    }

    /// Build a document from its data object.
    pub fn document(id: &str, data: Value) -> Document {
        Document {
            id: id.to_string(),
            owner_id: OWNER_ID.to_string(),
            created_at: None,
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    /// Movie document number `index`; its IMDB id is `index + 1`.
    pub fn movie_document(index: usize) -> Document {
        document(
            &format!("movie-{:04}", index),
            json!({
                "infoHash": hash_value(index as u8),
                "torrentName": format!("Movie {}", index + 1),
                "imdbId": index as u64 + 1,
                "trackers": "udp://tracker.example:1337/announce",
                "sizeBytes": 700 * 1024 * 1024
            }),
        )
    }

    /// `count` movie documents with ascending IMDB ids.
    pub fn movie_documents(count: usize) -> Vec<Document> {
        (0..count).map(movie_document).collect()
    }

    /// Document for a title-keyed collection (software, other).
    pub fn title_document(id: &str, title: &str) -> Document {
        document(
            id,
            json!({
                "infoHash": hash_value(title.len() as u8),
                "torrentName": format!("{}.iso", title),
                "title": title
            }),
        )
    }

    /// A valid torrent for the given subject.
    pub fn torrent(subject: Subject) -> Torrent {
        Torrent {
            info_hash: info_hash(42),
            name: "Fixture Torrent".to_string(),
            trackers: Trackers::from_stored("udp://tracker.example:1337/announce"),
            size_bytes: Some(1024),
            subject,
        }
    }

    pub fn contract(id: &str) -> DataContract {
        DataContract {
            id: id.to_string(),
            owner_id: OWNER_ID.to_string(),
            document_types: crate::schema::CollectionId::ALL
                .iter()
                .map(|c| c.spec().document_type.to_string())
                .collect(),
        }
    }
}
