//! Universal identifier value object.
//!
//! # Responsibility
//! - Define the structured record behind the textual
//!   `@owner:module:tier1:name[:tier2...][:doc]` form.
//! - Provide construction and validation helpers for programmatic callers.
//!
//! # Invariants
//! - `owner` is stored without its `@` prefix; serialization re-adds it.
//! - `serialize` and `parse` are exact inverses for every valid `Uid`.
//! - A nested `type_ref` is a full `Uid`, validated recursively.

use crate::grammar::{is_well_formed_segment, DOC_SUFFIX};
use crate::parser::{self, ParseError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Structured universal identifier.
///
/// Optional tail segments keep one record shape for every addressable thing:
/// code entities, nested members (`tier2`), documentation nodes (`doc_ref`)
/// and type contracts (`type_ref`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid {
    /// Owning entity, stored without the leading `@`.
    pub owner: String,
    /// Module or namespace within the owner.
    pub module: String,
    /// Open-set category (`class`, `definedtypes`, ...); membership in the
    /// grammar table is a validation concern, not a parse concern.
    pub tier1: String,
    /// Primary entity name.
    pub name: String,
    /// Ordered refinement segments below `name` (`method`, `params[0]`, ...).
    pub tier2: Vec<String>,
    /// Whether the identifier addresses the documentation node.
    pub doc_ref: bool,
    /// Nested identifier used when a segment's value is itself a UID, e.g. a
    /// parameter type pointing at a `definedtypes` entry.
    pub type_ref: Option<Box<Uid>>,
}

impl Uid {
    /// Creates an identifier with the four required segments.
    ///
    /// Optional tail fields start empty; callers set them directly on the
    /// public fields.
    pub fn new(
        owner: impl Into<String>,
        module: impl Into<String>,
        tier1: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            module: module.into(),
            tier1: tier1.into(),
            name: name.into(),
            tier2: Vec::new(),
            doc_ref: false,
            type_ref: None,
        }
    }

    /// Returns the canonical textual form.
    pub fn canonical(&self) -> String {
        parser::serialize(self)
    }

    /// Returns the canonical form of the address alone, `type_ref` omitted.
    ///
    /// Registry identity: two UIDs differing only in their type contract map
    /// to the same entry, so a plain reference finds an entry registered with
    /// a contract attached.
    pub fn base_canonical(&self) -> String {
        match &self.type_ref {
            None => self.canonical(),
            Some(_) => {
                let stripped = Uid {
                    type_ref: None,
                    ..self.clone()
                };
                parser::serialize(&stripped)
            }
        }
    }

    /// Validates programmatically constructed identifiers.
    ///
    /// Parsed values satisfy these checks by construction; registry write
    /// paths call this before mutating state. Besides segment shape, this
    /// rejects non-canonical values whose serialization would re-parse to a
    /// different structure, keeping `parse(serialize(u)) == u` for every
    /// value that passes.
    pub fn validate(&self) -> Result<(), UidValidationError> {
        Self::check_segment("owner", &self.owner)?;
        Self::check_segment("module", &self.module)?;
        Self::check_segment("tier1", &self.tier1)?;
        Self::check_segment("name", &self.name)?;
        for segment in &self.tier2 {
            Self::check_segment("tier2", segment)?;
        }
        // A trailing literal `doc` with nothing after it would re-parse as
        // the doc marker; the canonical spelling is the doc_ref flag.
        if !self.doc_ref
            && self.type_ref.is_none()
            && self.tier2.last().map(String::as_str) == Some(DOC_SUFFIX)
        {
            return Err(UidValidationError::NonCanonical {
                detail: format!("trailing tier2 segment `{DOC_SUFFIX}` requires doc_ref"),
            });
        }
        if let Some(type_ref) = &self.type_ref {
            // A nested `:doc` would re-bind to the outermost UID on re-parse;
            // the doc marker belongs to the outer value only.
            if type_ref.doc_ref {
                return Err(UidValidationError::NonCanonical {
                    detail: "doc_ref is not allowed inside a type_ref".to_string(),
                });
            }
            type_ref.validate()?;
        }
        Ok(())
    }

    fn check_segment(field: &'static str, value: &str) -> Result<(), UidValidationError> {
        if value.is_empty() {
            return Err(UidValidationError::EmptyField { field });
        }
        if !is_well_formed_segment(value) {
            return Err(UidValidationError::InvalidSegment {
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Uid {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parser::parse(raw)
    }
}

/// Structural validation errors for programmatically built identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidValidationError {
    /// A required field is empty.
    EmptyField { field: &'static str },
    /// A stored segment contains reserved characters or malformed brackets.
    InvalidSegment { field: &'static str, value: String },
    /// The value serializes to a string that parses back differently.
    NonCanonical { detail: String },
}

impl Display for UidValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "uid field `{field}` must not be empty"),
            Self::InvalidSegment { field, value } => {
                write!(f, "uid field `{field}` holds a malformed segment: {value}")
            }
            Self::NonCanonical { detail } => write!(f, "uid is not canonical: {detail}"),
        }
    }
}

impl Error for UidValidationError {}
