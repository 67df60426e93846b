//! Display projection of records for the rendering layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::TorrentRecord;
use crate::schema::CollectionId;

/// Everything a result row shows, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentListing {
    pub id: String,
    pub collection: CollectionId,
    pub name: String,
    pub info_hash: String,
    pub magnet_uri: String,
    /// `tt0133093`, `OL8483260W` or the title.
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub trackers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&TorrentRecord> for TorrentListing {
    fn from(record: &TorrentRecord) -> Self {
        let torrent = &record.torrent;
        Self {
            id: record.id.clone(),
            collection: record.collection(),
            name: torrent.name.clone(),
            info_hash: torrent.info_hash.to_hex(),
            magnet_uri: torrent
                .info_hash
                .magnet_uri(Some(&torrent.name), &torrent.trackers),
            identifier: torrent.subject.display(),
            identifier_url: torrent.subject.external_url(),
            size: torrent.size_bytes.map(format_size),
            trackers: torrent.trackers.iter().map(str::to_string).collect(),
            created_at: record.created_at,
        }
    }
}

/// Listings for a page of records, in order.
pub fn listings(records: &[TorrentRecord]) -> Vec<TorrentListing> {
    records.iter().map(TorrentListing::from).collect()
}

/// Human-readable size in binary units, e.g. `1.50 GiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
