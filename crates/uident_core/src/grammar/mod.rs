//! UID grammar table: separators, reserved markers and the tier1 category set.
//!
//! # Responsibility
//! - Declare the segment grammar as data so new tier1 categories are a
//!   data-only change, never a parser change.
//! - Validate tier1 registrations against a stable charset.
//!
//! # Invariants
//! - The parser never consults the tier1 set; membership is a validation
//!   concern, not a syntax concern.
//! - Registered tier1 values are lowercase `[a-z][a-z0-9_]*` and unique.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Segment separator in the textual UID form.
pub const SEGMENT_SEPARATOR: char = ':';
/// Required prefix of the owner segment.
pub const OWNER_PREFIX: char = '@';
/// Trailing literal segment marking a documentation reference.
pub const DOC_SUFFIX: &str = "doc";
/// Opening bracket of index notation (`params[0]`).
pub const INDEX_OPEN: char = '[';
/// Closing bracket of index notation.
pub const INDEX_CLOSE: char = ']';

/// Tier1 categories the identifier standard illustrates out of the box.
const DEFAULT_TIER1_VALUES: &[&str] = &[
    "class",
    "constant",
    "definedtypes",
    "endpoint",
    "enum",
    "function",
    "interface",
];

static TIER1_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[a-z][a-z0-9_]*$").expect("tier1 pattern must compile")
});

static INDEXED_SEGMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\[\]]+\[[0-9]+\]$").expect("indexed segment pattern must compile")
});

/// Returns whether one stored segment is well formed.
///
/// A segment must be non-empty, must not contain the separator or the owner
/// prefix (both reserved), and may carry brackets only as one trailing
/// `base[digits]` index suffix.
pub fn is_well_formed_segment(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.contains(SEGMENT_SEPARATOR) || value.contains(OWNER_PREFIX) {
        return false;
    }
    if value.contains(INDEX_OPEN) || value.contains(INDEX_CLOSE) {
        return INDEXED_SEGMENT_PATTERN.is_match(value);
    }
    true
}

pub type GrammarResult<T> = Result<T, GrammarError>;

/// Tier1 registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    EmptyTier1,
    InvalidTier1(String),
    DuplicateTier1(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTier1 => write!(f, "tier1 value must not be empty"),
            Self::InvalidTier1(value) => {
                write!(f, "tier1 value must match [a-z][a-z0-9_]*: {value}")
            }
            Self::DuplicateTier1(value) => write!(f, "tier1 value already registered: {value}"),
        }
    }
}

impl Error for GrammarError {}

/// Open set of recognized tier1 categories.
///
/// The set is deliberately extensible: the identifier standard names examples,
/// not a closed enumeration, so unknown values are a reporting concern for
/// [`crate::registry::Registry::validate_all`] rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarTable {
    tier1: BTreeSet<String>,
}

impl Default for GrammarTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl GrammarTable {
    /// Creates a table with no registered tier1 values.
    pub fn empty() -> Self {
        Self {
            tier1: BTreeSet::new(),
        }
    }

    /// Creates a table seeded with the standard's illustrated categories.
    pub fn with_defaults() -> Self {
        let mut tier1 = BTreeSet::new();
        for value in DEFAULT_TIER1_VALUES {
            tier1.insert((*value).to_string());
        }
        Self { tier1 }
    }

    /// Returns whether one tier1 category is registered.
    pub fn is_known_tier1(&self, value: &str) -> bool {
        self.tier1.contains(value)
    }

    /// Registers one tier1 category.
    pub fn register_tier1(&mut self, value: &str) -> GrammarResult<()> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(GrammarError::EmptyTier1);
        }
        if !TIER1_PATTERN.is_match(normalized) {
            return Err(GrammarError::InvalidTier1(normalized.to_string()));
        }
        if !self.tier1.insert(normalized.to_string()) {
            return Err(GrammarError::DuplicateTier1(normalized.to_string()));
        }
        Ok(())
    }

    /// Returns registered tier1 categories in sorted order.
    pub fn tier1_values(&self) -> Vec<&str> {
        self.tier1.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tier1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tier1.is_empty()
    }
}
