pub mod browse;
pub mod codec;
pub mod config;
pub mod contract;
pub mod listing;
pub mod metrics;
pub mod record;
pub mod schema;
pub mod store;
pub mod submission;
pub mod testing;

pub use browse::{
    normalize_search, BrowseError, BrowseOptions, BrowsePhase, Page, PageOutcome, QueryEngine,
    QueryState,
};
pub use codec::{
    base58_decode, base58_encode, build_magnet_uri, bytes_to_hex, derive_contract_id,
    format_typed_id, hex_to_bytes, parse_magnet_link, parse_tracker_list, parse_typed_id,
    CodecError, IdFormat, InfoHash, MagnetLink, Trackers,
};
pub use config::{
    load_config, load_config_from_str, validate_config, BrowseConfig, Config, ConfigError,
    ContractConfig, SanitizedConfig, StoreConfig,
};
pub use contract::{bind_contract, reconcile_contract_id, BoundContract, ContractError};
pub use listing::{format_size, listings, TorrentListing};
pub use record::{
    decode_document, decode_page, encode_torrent, DecodedPage, DocumentError, Subject, Torrent,
    TorrentRecord, ValidationError,
};
pub use schema::{CollectionId, CollectionSpec, FieldKind};
pub use store::{
    Credentials, Cursor, DataContract, Document, DocumentStore, Network, QueryOptions,
    StoreError, WhereClause,
};
pub use submission::{submit_torrent, SubmissionForm, SubmitError};
