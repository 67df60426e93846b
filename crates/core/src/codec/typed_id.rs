//! Typed numeric identifiers (IMDB titles, OpenLibrary works).
//!
//! Documents store the bare integer; the display forms (`tt0133093`,
//! `OL8483260W`) only exist at the edges.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Largest value a typed id may hold.
pub const TYPED_ID_MAX: u64 = 9_999_999_999;

static IMDB_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[tT][tT])?([0-9]{1,10})$").unwrap());

static OPENLIBRARY_WORK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[oO][lL]([0-9]{1,10})[wW]|([0-9]{1,10}))$").unwrap());

/// Display format of a typed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdFormat {
    /// `tt` followed by at least seven zero-padded digits.
    Imdb,
    /// `OL<digits>W`.
    OpenlibraryWork,
}

impl IdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdFormat::Imdb => "imdb",
            IdFormat::OpenlibraryWork => "openlibrary-work",
        }
    }

    /// Public page for an id in this format.
    pub fn external_url(&self, id: u64) -> String {
        match self {
            IdFormat::Imdb => format!("https://www.imdb.com/title/{}/", format_typed_id(id, *self)),
            IdFormat::OpenlibraryWork => {
                format!("https://openlibrary.org/works/{}", format_typed_id(id, *self))
            }
        }
    }
}

impl fmt::Display for IdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a typed id from its display form or a bare decimal.
///
/// Returns `None` for anything unparseable or out of range; callers treat
/// that as "field absent".
pub fn parse_typed_id(input: &str, format: IdFormat) -> Option<u64> {
    let input = input.trim();
    let captures = match format {
        IdFormat::Imdb => IMDB_PATTERN.captures(input)?,
        IdFormat::OpenlibraryWork => OPENLIBRARY_WORK_PATTERN.captures(input)?,
    };
    let digits = captures.get(1).or_else(|| captures.get(2))?.as_str();
    digits.parse::<u64>().ok().filter(|&id| id <= TYPED_ID_MAX)
}

/// Render a typed id in its display form.
pub fn format_typed_id(id: u64, format: IdFormat) -> String {
    match format {
        IdFormat::Imdb => format!("tt{:07}", id),
        IdFormat::OpenlibraryWork => format!("OL{}W", id),
    }
}
