//! Predefined handshapes: transcription lookup and name decomposition.
//!
//! A hand-configuration transcription resolves to a canonical handshape name only when
//! it matches a table entry exactly (after normalization). Names decompose into base
//! tokens (the shape family, e.g. `5`, `A`) and variant tokens (descriptors such as
//! `bent` or `clawed`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Thumb field codes: `L` alongside, `U` unopposed, `O` opposed, `X` across.
/// Finger field codes: `E` extended, `H` hyperextended, `b` bent at the base,
/// `c` clawed, `r` rounded, `t` touching the thumb, `T` flat contact, `F` flexed.
const PREDEFINED_HANDSHAPES: &[(&str, &str)] = &[
    ("U|E|E|E|E", "5"),
    ("U|H|H|H|H", "extended-5"),
    ("U|b|b|b|b", "bent-5"),
    ("U|c|c|c|c", "clawed-5"),
    ("L|F|F|F|F", "A"),
    ("U|F|F|F|F", "open-A"),
    ("X|F|F|F|F", "S"),
    ("X|E|E|E|E", "B"),
    ("X|b|b|b|b", "bent-B"),
    ("L|E|E|E|E", "flat-B"),
    ("X|E|F|F|F", "1"),
    ("X|b|F|F|F", "bent-1"),
    ("U|E|F|F|F", "L"),
    ("X|E|E|F|F", "V"),
    ("X|c|c|F|F", "clawed-V"),
    ("O|r|r|r|r", "C"),
    ("O|b|b|b|b", "flat-C"),
    ("O|t|t|t|t", "O"),
    ("O|T|T|T|T", "flat-O"),
    ("U|F|F|F|E", "Y"),
];

/// A canonical handshape name and its decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshapeName {
    pub name: String,
    pub base: BTreeSet<String>,
    pub variant: BTreeSet<String>,
}

impl HandshapeName {
    pub fn parse(name: &str) -> HandshapeName {
        let mut base = BTreeSet::new();
        let mut variant = BTreeSet::new();
        for token in name
            .split(|c: char| c == '-' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            if is_base_token(token) {
                base.insert(token.to_string());
            } else {
                variant.insert(token.to_lowercase());
            }
        }
        HandshapeName {
            name: name.trim().to_string(),
            base,
            variant,
        }
    }

    /// Either base set contains the other. Empty bases never match.
    pub fn shares_base(&self, other: &HandshapeName) -> bool {
        if self.base.is_empty() || other.base.is_empty() {
            return false;
        }
        self.base.is_subset(&other.base) || other.base.is_subset(&self.base)
    }

    /// Identical variant sets. Two plain shapes (no descriptors) share a variant.
    pub fn shares_variant(&self, other: &HandshapeName) -> bool {
        self.variant == other.variant
    }
}

fn is_base_token(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Joins trimmed fields with `|`. All-empty transcriptions normalize to `None`.
pub fn normalize_transcription<S: AsRef<str>>(fields: &[S]) -> Option<String> {
    let trimmed: Vec<&str> = fields.iter().map(|f| f.as_ref().trim()).collect();
    if trimmed.iter().all(|f| f.is_empty()) {
        return None;
    }
    Some(trimmed.join("|"))
}

/// Transcription-to-handshape lookup table.
///
/// Serialized as a map from `|`-separated transcription to canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct HandshapeTable {
    entries: BTreeMap<String, HandshapeName>,
}

impl HandshapeTable {
    pub fn new() -> HandshapeTable {
        HandshapeTable::default()
    }

    /// The table shipped with the crate.
    pub fn predefined() -> &'static HandshapeTable {
        static PREDEFINED: OnceLock<HandshapeTable> = OnceLock::new();
        PREDEFINED
            .get_or_init(|| HandshapeTable::from_entries(PREDEFINED_HANDSHAPES.iter().copied()))
    }

    pub fn from_entries<I, T, N>(entries: I) -> HandshapeTable
    where
        I: IntoIterator<Item = (T, N)>,
        T: AsRef<str>,
        N: AsRef<str>,
    {
        let mut table = HandshapeTable::new();
        for (transcription, name) in entries {
            table.insert(transcription.as_ref(), name.as_ref());
        }
        table
    }

    /// Adds or replaces an entry. `transcription` is `|`-separated.
    pub fn insert(&mut self, transcription: &str, name: &str) {
        let fields: Vec<&str> = transcription.split('|').collect();
        if let Some(key) = normalize_transcription(&fields) {
            self.entries.insert(key, HandshapeName::parse(name));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve<S: AsRef<str>>(&self, transcription: &[S]) -> Option<&HandshapeName> {
        let key = normalize_transcription(transcription)?;
        self.entries.get(&key)
    }
}

impl From<BTreeMap<String, String>> for HandshapeTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        HandshapeTable::from_entries(map)
    }
}

impl From<HandshapeTable> for BTreeMap<String, String> {
    fn from(table: HandshapeTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(key, name)| (key, name.name))
            .collect()
    }
}
