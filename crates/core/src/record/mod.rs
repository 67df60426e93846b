//! Typed torrent records.
//!
//! Store documents are loosely typed JSON; this module turns them into a
//! closed set of record shapes, one per collection, and back.

mod types;
mod wire;

pub use types::*;
pub use wire::{decode_document, decode_page, encode_torrent, DecodedPage};

use thiserror::Error;

/// A store document that does not match its collection's shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A torrent that breaks the contract's field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is too long ({len} > {max} characters)")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}
