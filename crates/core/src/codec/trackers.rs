//! Tracker announce lists.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// URL schemes a tracker may use.
pub const TRACKER_SCHEMES: [&str; 4] = ["udp://", "http://", "https://", "wss://"];

/// Ordered, duplicate-free set of tracker announce URLs.
///
/// Stored on documents as a single newline-joined string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trackers(Vec<String>);

impl Trackers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the stored newline-joined form.
    pub fn from_stored(stored: &str) -> Self {
        parse_tracker_list(stored)
    }

    /// Add a tracker. Returns false when it was rejected (scheme) or already present.
    pub fn push(&mut self, url: &str) -> bool {
        let url = url.trim();
        if !has_accepted_scheme(url) || self.0.iter().any(|t| t == url) {
            return false;
        }
        self.0.push(url.to_string());
        true
    }

    /// Append every tracker of `other` not already present.
    pub fn merge(&mut self, other: &Trackers) {
        for url in &other.0 {
            self.push(url);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The newline-joined form written to documents.
    pub fn to_stored(&self) -> String {
        self.0.join("\n")
    }
}

impl fmt::Display for Trackers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stored())
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trackers {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trackers = Trackers::new();
        for url in iter {
            trackers.push(url.as_ref());
        }
        trackers
    }
}

impl<'de> Deserialize<'de> for Trackers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let urls = Vec::<String>::deserialize(deserializer)?;
        Ok(urls.into_iter().collect())
    }
}

/// Parse user-entered tracker text.
///
/// Splits on newlines and commas, trims, keeps only the accepted schemes and
/// drops duplicates keeping the first occurrence. Never fails.
pub fn parse_tracker_list(raw: &str) -> Trackers {
    raw.split(['\n', ',']).collect()
}

fn has_accepted_scheme(url: &str) -> bool {
    TRACKER_SCHEMES.iter().any(|scheme| {
        url.len() > scheme.len()
            && url
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
