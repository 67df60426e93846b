//! Conversion between store documents and typed records.

use serde_json::{Map, Value};
use tracing::warn;

use crate::codec::{InfoHash, Trackers};
use crate::metrics;
use crate::schema::{CollectionId, FieldKind};
use crate::store::Document;

use super::{DocumentError, Subject, Torrent, TorrentRecord};

const INFO_HASH_FIELD: &str = "infoHash";
const NAME_FIELD: &str = "torrentName";
const TRACKERS_FIELD: &str = "trackers";
const SIZE_FIELD: &str = "sizeBytes";

/// Records decoded from one page of documents.
#[derive(Debug, Clone, Default)]
pub struct DecodedPage {
    pub records: Vec<TorrentRecord>,
    /// Documents that did not match the collection shape.
    pub skipped: usize,
}

/// Decode a document of `collection` into a typed record.
pub fn decode_document(
    collection: CollectionId,
    document: &Document,
) -> Result<TorrentRecord, DocumentError> {
    let data = &document.data;
    let spec = collection.spec();

    let info_hash = decode_info_hash(data.get(INFO_HASH_FIELD))?;
    let name = required_str(data, NAME_FIELD)?.to_string();

    let trackers = match data.get(TRACKERS_FIELD) {
        None | Some(Value::Null) => Trackers::new(),
        Some(Value::String(stored)) => Trackers::from_stored(stored),
        Some(_) => return Err(invalid(TRACKERS_FIELD, "expected a string")),
    };

    let size_bytes = match data.get(SIZE_FIELD) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .ok_or_else(|| invalid(SIZE_FIELD, "expected a non-negative integer"))?,
        ),
    };

    let subject = match spec.kind {
        FieldKind::TypedId(_) => {
            let id = data
                .get(spec.field)
                .ok_or(DocumentError::MissingField(spec.field))?
                .as_u64()
                .ok_or_else(|| invalid(spec.field, "expected a non-negative integer"))?;
            Subject::from_typed_id(collection, id)
        }
        FieldKind::Text { .. } => {
            Subject::from_title(collection, required_str(data, spec.field)?)
        }
    }
    .ok_or_else(|| invalid(spec.field, "field kind does not match collection"))?;

    Ok(TorrentRecord {
        id: document.id.clone(),
        owner_id: document.owner_id.clone(),
        created_at: document.created_at,
        torrent: Torrent {
            info_hash,
            name,
            trackers,
            size_bytes,
            subject,
        },
    })
}

/// Decode a page of documents, skipping (and logging) the malformed ones.
pub fn decode_page(collection: CollectionId, documents: &[Document]) -> DecodedPage {
    let mut page = DecodedPage::default();
    for document in documents {
        match decode_document(collection, document) {
            Ok(record) => page.records.push(record),
            Err(e) => {
                warn!(
                    collection = %collection,
                    document_id = %document.id,
                    error = %e,
                    "Skipping malformed document"
                );
                metrics::DOCUMENTS_SKIPPED
                    .with_label_values(&[collection.as_str()])
                    .inc();
                page.skipped += 1;
            }
        }
    }
    page
}

/// Encode a torrent as document data for `create`.
pub fn encode_torrent(torrent: &Torrent) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(
        INFO_HASH_FIELD.to_string(),
        Value::Array(
            torrent
                .info_hash
                .as_bytes()
                .iter()
                .map(|&b| Value::from(b))
                .collect(),
        ),
    );
    data.insert(NAME_FIELD.to_string(), Value::from(torrent.name.as_str()));

    let field = torrent.collection().spec().field.to_string();
    match &torrent.subject {
        Subject::Movie { imdb_id: id }
        | Subject::Tv { series_imdb_id: id }
        | Subject::Book { work_id: id } => data.insert(field, Value::from(*id)),
        Subject::Software { title } | Subject::Other { title } => {
            data.insert(field, Value::from(title.as_str()))
        }
    };

    if !torrent.trackers.is_empty() {
        data.insert(
            TRACKERS_FIELD.to_string(),
            Value::from(torrent.trackers.to_stored()),
        );
    }
    if let Some(size) = torrent.size_bytes {
        data.insert(SIZE_FIELD.to_string(), Value::from(size));
    }
    data
}

fn decode_info_hash(value: Option<&Value>) -> Result<InfoHash, DocumentError> {
    match value {
        None | Some(Value::Null) => Err(DocumentError::MissingField(INFO_HASH_FIELD)),
        Some(Value::Array(items)) => {
            let bytes = items
                .iter()
                .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| invalid(INFO_HASH_FIELD, "expected an array of bytes"))?;
            InfoHash::from_slice(&bytes).map_err(|e| invalid(INFO_HASH_FIELD, &e.to_string()))
        }
        Some(Value::String(hex)) => {
            InfoHash::from_hex(hex).map_err(|e| invalid(INFO_HASH_FIELD, &e.to_string()))
        }
        Some(_) => Err(invalid(INFO_HASH_FIELD, "expected a byte array")),
    }
}

fn required_str<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DocumentError> {
    match data.get(field) {
        None | Some(Value::Null) => Err(DocumentError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(invalid(field, "expected a string")),
    }
}

fn invalid(field: &'static str, reason: &str) -> DocumentError {
    DocumentError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}
