//! Publishing new torrent records.

mod form;

pub use form::SubmissionForm;

use thiserror::Error;
use tracing::{info, warn};

use crate::metrics;
use crate::record::{encode_torrent, Torrent, ValidationError};
use crate::store::{Credentials, DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid torrent: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate `torrent` and create it as a document owned by `owner_id`.
///
/// Returns the id the store assigned to the new document.
pub async fn submit_torrent(
    store: &dyn DocumentStore,
    contract_id: &str,
    owner_id: &str,
    torrent: &Torrent,
    credentials: &Credentials,
) -> Result<String, SubmitError> {
    let collection = torrent.collection();

    if let Err(e) = torrent.validate() {
        metrics::SUBMISSIONS
            .with_label_values(&[collection.as_str(), "invalid"])
            .inc();
        return Err(e.into());
    }

    let data = encode_torrent(torrent);
    let document_type = collection.spec().document_type;

    match store
        .create(contract_id, document_type, owner_id, &data, credentials)
        .await
    {
        Ok(id) => {
            info!(
                collection = %collection,
                document_id = %id,
                info_hash = %torrent.info_hash,
                "Torrent submitted"
            );
            metrics::SUBMISSIONS
                .with_label_values(&[collection.as_str(), "created"])
                .inc();
            Ok(id)
        }
        Err(e) => {
            warn!(collection = %collection, error = %e, "Torrent submission failed");
            metrics::SUBMISSIONS
                .with_label_values(&[collection.as_str(), "error"])
                .inc();
            let e = match e {
                StoreError::SubmissionError(_) => e,
                other => StoreError::SubmissionError(other.to_string()),
            };
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Subject;
    use crate::testing::{fixtures, MockDocumentStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_submit_creates_document() {
        let store = MockDocumentStore::new();
        let torrent = fixtures::torrent(Subject::Movie { imdb_id: 133093 });

        let id = submit_torrent(
            &store,
            "contract1",
            fixtures::OWNER_ID,
            &torrent,
            &Credentials::new("key"),
        )
        .await
        .unwrap();
        assert_eq!(id, "mock-doc-1");

        let creates = store.recorded_creates().await;
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].document_type, "movieTorrent");
        assert_eq!(creates[0].owner_id, fixtures::OWNER_ID);
        assert_eq!(creates[0].data["imdbId"], json!(133093));
    }

    #[tokio::test]
    async fn test_invalid_torrent_never_reaches_store() {
        let store = MockDocumentStore::new();
        let mut torrent = fixtures::torrent(Subject::Other {
            title: "x".to_string(),
        });
        torrent.name = String::new();

        let err = submit_torrent(&store, "c", "o", &torrent, &Credentials::new("k"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert!(store.recorded_creates().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_submission_errors() {
        let store = MockDocumentStore::new();
        store
            .set_next_error(StoreError::ConnectionError("timeout".into()))
            .await;
        let torrent = fixtures::torrent(Subject::Tv { series_imdb_id: 1 });

        let err = submit_torrent(&store, "c", "o", &torrent, &Credentials::new("k"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Store(StoreError::SubmissionError(ref m)) if m.contains("timeout")
        ));
    }
}
