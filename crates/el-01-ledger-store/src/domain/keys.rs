//! # Typed Ledger Keys
//!
//! Every record lives under a [`LedgerKey`] built from a [`KeyKind`] and its
//! ordered identifier segments.
//!
//! ## Encoding
//!
//! ```text
//! simple     electionId
//! composite  \0TYPE\0segment1\0segment2\0...
//! ```
//!
//! Segments may not be empty or contain NUL, and simple keys may not start
//! with NUL, so no two kinds (or two segment tuples) ever encode to the same
//! bytes. Composite keys sort before simple keys because NUL is the smallest
//! code point; a prefix scan over `\0TYPE\0a\0` never matches `\0TYPE\0ab\0`.

use serde::{Deserialize, Serialize};
use shared_types::StoreError;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace delimiter for composite keys.
pub const COMPOSITE_DELIMITER: char = '\u{0}';

/// First code point a simple key may start with.
const SIMPLE_KEY_START: &str = "\u{1}";

/// Record family a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyKind {
    /// `electionId` (simple key).
    Election,
    /// `ELECTION_NAME#electionName`
    ElectionName,
    /// `VOTER#electionId#voterHash`
    Voter,
    /// `PERMIT#electionId#permitHash`
    Permit,
    /// `TALLY#electionId#constituencyId#candidateId`
    Tally,
}

impl KeyKind {
    /// Composite object type, `None` for simple keys.
    pub fn object_type(&self) -> Option<&'static str> {
        match self {
            Self::Election => None,
            Self::ElectionName => Some("ELECTION_NAME"),
            Self::Voter => Some("VOTER"),
            Self::Permit => Some("PERMIT"),
            Self::Tally => Some("TALLY"),
        }
    }

    /// Number of identifier segments a full key of this kind carries.
    pub fn arity(&self) -> usize {
        match self {
            Self::Election | Self::ElectionName => 1,
            Self::Voter | Self::Permit => 2,
            Self::Tally => 3,
        }
    }

    fn from_object_type(object_type: &str) -> Option<Self> {
        match object_type {
            "ELECTION_NAME" => Some(Self::ElectionName),
            "VOTER" => Some(Self::Voter),
            "PERMIT" => Some(Self::Permit),
            "TALLY" => Some(Self::Tally),
            _ => None,
        }
    }
}

fn validate_segment(kind: KeyKind, segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidKey(format!(
            "empty segment in {kind:?} key"
        )));
    }
    if segment.contains(COMPOSITE_DELIMITER) {
        return Err(StoreError::InvalidKey(format!(
            "segment in {kind:?} key contains NUL"
        )));
    }
    Ok(())
}

fn encode_composite(object_type: &str, segments: &[String]) -> String {
    let mut encoded = String::with_capacity(
        2 + object_type.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>(),
    );
    encoded.push(COMPOSITE_DELIMITER);
    encoded.push_str(object_type);
    encoded.push(COMPOSITE_DELIMITER);
    for segment in segments {
        encoded.push_str(segment);
        encoded.push(COMPOSITE_DELIMITER);
    }
    encoded
}

/// A validated ledger key.
///
/// Equality, ordering and hashing all follow the encoded form.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LedgerKey {
    kind: KeyKind,
    segments: Vec<String>,
    encoded: String,
}

impl LedgerKey {
    fn build(kind: KeyKind, segments: Vec<String>) -> Result<Self, StoreError> {
        debug_assert_eq!(segments.len(), kind.arity());
        for segment in &segments {
            validate_segment(kind, segment)?;
        }
        let encoded = match kind.object_type() {
            None => segments[0].clone(),
            Some(object_type) => encode_composite(object_type, &segments),
        };
        Ok(Self {
            kind,
            segments,
            encoded,
        })
    }

    pub fn election(election_id: &str) -> Result<Self, StoreError> {
        Self::build(KeyKind::Election, vec![election_id.to_string()])
    }

    pub fn election_name(election_name: &str) -> Result<Self, StoreError> {
        Self::build(KeyKind::ElectionName, vec![election_name.to_string()])
    }

    pub fn voter(election_id: &str, voter_hash: &str) -> Result<Self, StoreError> {
        Self::build(
            KeyKind::Voter,
            vec![election_id.to_string(), voter_hash.to_string()],
        )
    }

    pub fn permit(election_id: &str, permit_hash: &str) -> Result<Self, StoreError> {
        Self::build(
            KeyKind::Permit,
            vec![election_id.to_string(), permit_hash.to_string()],
        )
    }

    pub fn tally(
        election_id: &str,
        constituency_id: &str,
        candidate_id: &str,
    ) -> Result<Self, StoreError> {
        Self::build(
            KeyKind::Tally,
            vec![
                election_id.to_string(),
                constituency_id.to_string(),
                candidate_id.to_string(),
            ],
        )
    }

    /// Parse an encoded key back into its typed form.
    pub fn decode(encoded: &str) -> Result<Self, StoreError> {
        let Some(rest) = encoded.strip_prefix(COMPOSITE_DELIMITER) else {
            return Self::election(encoded);
        };
        let rest = rest.strip_suffix(COMPOSITE_DELIMITER).ok_or_else(|| {
            StoreError::InvalidKey("composite key missing trailing delimiter".into())
        })?;
        let mut parts = rest.split(COMPOSITE_DELIMITER);
        let object_type = parts.next().unwrap_or_default();
        let kind = KeyKind::from_object_type(object_type)
            .ok_or_else(|| StoreError::InvalidKey(format!("unknown object type {object_type:?}")))?;
        let segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.len() != kind.arity() {
            return Err(StoreError::InvalidKey(format!(
                "{kind:?} key expects {} segments, got {}",
                kind.arity(),
                segments.len()
            )));
        }
        Self::build(kind, segments)
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl PartialEq for LedgerKey {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for LedgerKey {}

impl Hash for LedgerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoded.hash(state);
    }
}

impl PartialOrd for LedgerKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LedgerKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.encoded.cmp(&other.encoded)
    }
}

impl Borrow<str> for LedgerKey {
    fn borrow(&self) -> &str {
        &self.encoded
    }
}

impl TryFrom<String> for LedgerKey {
    type Error = StoreError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        Self::decode(&encoded)
    }
}

impl From<LedgerKey> for String {
    fn from(key: LedgerKey) -> Self {
        key.encoded
    }
}

/// Human-readable `TYPE#a#b` form, used in logs and error messages.
impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.object_type() {
            None => f.write_str(&self.encoded),
            Some(object_type) => write!(f, "{}#{}", object_type, self.segments.join("#")),
        }
    }
}

impl fmt::Debug for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerKey({self})")
    }
}

/// A range of keys for prefix scans.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRange {
    /// Every simple key, i.e. every election record.
    SimpleKeys,
    /// Composite keys of `kind` whose leading segments equal `segments`.
    Partial {
        kind: KeyKind,
        segments: Vec<String>,
    },
}

impl KeyRange {
    pub fn elections() -> Self {
        Self::SimpleKeys
    }

    /// Partial composite key, as used for constituency or election scans.
    pub fn partial(kind: KeyKind, segments: &[&str]) -> Result<Self, StoreError> {
        if kind.object_type().is_none() {
            return Err(StoreError::InvalidKey(
                "partial range requires a composite key kind".into(),
            ));
        }
        if segments.len() >= kind.arity() {
            return Err(StoreError::InvalidKey(format!(
                "partial {kind:?} range takes fewer than {} segments",
                kind.arity()
            )));
        }
        for segment in segments {
            validate_segment(kind, segment)?;
        }
        Ok(Self::Partial {
            kind,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Lower bound of the range in encoded form.
    pub fn start(&self) -> String {
        match self {
            Self::SimpleKeys => SIMPLE_KEY_START.to_string(),
            Self::Partial { kind, segments } => {
                encode_composite(kind.object_type().unwrap_or_default(), segments)
            }
        }
    }

    pub fn contains(&self, key: &LedgerKey) -> bool {
        match self {
            Self::SimpleKeys => key.kind() == KeyKind::Election,
            Self::Partial { kind, .. } => {
                key.kind() == *kind && key.as_str().starts_with(&self.start())
            }
        }
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleKeys => f.write_str("<simple keys>"),
            Self::Partial { kind, segments } => {
                write!(f, "{}#{}*", kind.object_type().unwrap_or_default(), segments.join("#"))
            }
        }
    }
}

impl fmt::Debug for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyRange({self})")
    }
}
