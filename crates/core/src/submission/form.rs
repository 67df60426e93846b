//! Raw submission form input.

use serde::{Deserialize, Serialize};

use crate::codec::{parse_magnet_link, parse_tracker_list, parse_typed_id, InfoHash};
use crate::record::{Subject, Torrent, ValidationError};
use crate::schema::{CollectionId, FieldKind};

/// Text exactly as a user typed it into the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub collection: Option<CollectionId>,
    /// Magnet URI or 40-character hex info hash.
    pub source: String,
    pub name: String,
    /// Typed id (display form or bare) or title, depending on the collection.
    pub identifier: String,
    /// Newline or comma separated tracker URLs.
    #[serde(default)]
    pub trackers: String,
    /// Size in bytes; blank when unknown.
    #[serde(default)]
    pub size: String,
}

impl SubmissionForm {
    /// Validate the form into a torrent ready for submission.
    ///
    /// A magnet source fills in the name when the form's is blank, and its
    /// trackers come before the ones typed into the form.
    pub fn into_torrent(self) -> Result<Torrent, ValidationError> {
        let collection = self
            .collection
            .ok_or(ValidationError::Missing { field: "collection" })?;

        let source = self.source.trim();
        let (info_hash, magnet) = if source.is_empty() {
            return Err(ValidationError::Missing { field: "infoHash" });
        } else if source
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
        {
            let magnet = parse_magnet_link(source);
            let hex = magnet.info_hash.as_deref().ok_or_else(|| ValidationError::Invalid {
                field: "infoHash",
                reason: "magnet link has no BitTorrent v1 info hash".to_string(),
            })?;
            (InfoHash::from_hex(hex).map_err(|e| invalid_hash(&e))?, Some(magnet))
        } else {
            (InfoHash::from_hex(source).map_err(|e| invalid_hash(&e))?, None)
        };

        let mut name = self.name.trim().to_string();
        if name.is_empty() {
            if let Some(display_name) = magnet.as_ref().and_then(|m| m.display_name.as_deref()) {
                name = display_name.trim().to_string();
            }
        }

        let mut trackers = magnet.map(|m| m.trackers).unwrap_or_default();
        trackers.merge(&parse_tracker_list(&self.trackers));

        let spec = collection.spec();
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            return Err(ValidationError::Missing { field: spec.field });
        }
        let subject = match spec.kind {
            FieldKind::TypedId(format) => {
                let id = parse_typed_id(identifier, format).ok_or_else(|| {
                    ValidationError::Invalid {
                        field: spec.field,
                        reason: format!("not a valid {} id: {}", format, identifier),
                    }
                })?;
                Subject::from_typed_id(collection, id)
            }
            FieldKind::Text { .. } => Subject::from_title(collection, identifier),
        }
        .ok_or_else(|| ValidationError::Invalid {
            field: spec.field,
            reason: "field kind does not match collection".to_string(),
        })?;

        let size = self.size.trim();
        let size_bytes = if size.is_empty() {
            None
        } else {
            Some(size.parse::<u64>().map_err(|_| ValidationError::Invalid {
                field: "sizeBytes",
                reason: format!("expected a whole number of bytes, got {:?}", size),
            })?)
        };

        let torrent = Torrent {
            info_hash,
            name,
            trackers,
            size_bytes,
            subject,
        };
        torrent.validate()?;
        Ok(torrent)
    }
}

fn invalid_hash(error: &crate::codec::CodecError) -> ValidationError {
    ValidationError::Invalid {
        field: "infoHash",
        reason: error.to_string(),
    }
}
