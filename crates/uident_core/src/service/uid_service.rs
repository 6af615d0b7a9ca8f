//! String-level UID use-case service.
//!
//! # Responsibility
//! - Accept raw identifier text, parse it, and drive registry operations.
//! - Emit stable, metadata-only diagnostic events on mutations.
//!
//! # Invariants
//! - Service APIs never bypass parser or registry validation contracts.
//! - Unknown tier1 categories are reported, never rejected: the tier1 set is
//!   open by design.

use crate::grammar::{GrammarError, GrammarTable};
use crate::model::resource::ResourceDescriptor;
use crate::model::uid::Uid;
use crate::parser::{self, ParseError};
use crate::registry::{RegistryEntry, RegistryError, SharedRegistry, ValidationIssue};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UidResult<T> = Result<T, UidError>;

/// Aggregated error for string-level UID operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidError {
    Parse(ParseError),
    Grammar(GrammarError),
    Registry(RegistryError),
}

impl Display for UidError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Grammar(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UidError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Grammar(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<ParseError> for UidError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<GrammarError> for UidError {
    fn from(value: GrammarError) -> Self {
        Self::Grammar(value)
    }
}

impl From<RegistryError> for UidError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Use-case facade over grammar table and shared registry.
pub struct UidService {
    grammar: GrammarTable,
    registry: SharedRegistry,
}

impl Default for UidService {
    fn default() -> Self {
        Self::new()
    }
}

impl UidService {
    /// Creates a service with default grammar and an empty registry.
    pub fn new() -> Self {
        Self {
            grammar: GrammarTable::with_defaults(),
            registry: SharedRegistry::new(),
        }
    }

    /// Creates a service over caller-provided grammar and registry.
    pub fn with_parts(grammar: GrammarTable, registry: SharedRegistry) -> Self {
        Self { grammar, registry }
    }

    /// Parses raw text without touching the registry.
    pub fn parse(&self, raw: &str) -> UidResult<Uid> {
        Ok(parser::parse(raw)?)
    }

    /// Parses and registers one identifier, rejecting duplicates.
    pub fn register_str(
        &self,
        raw: &str,
        resource: ResourceDescriptor,
    ) -> UidResult<RegistryEntry> {
        let uid = parser::parse(raw)?;
        self.report_unknown_tier1(&uid);
        let entry = self.registry.register(&uid, resource)?;
        info!(
            "event=uid_registered module=service status=ok uid={} version={}",
            entry.uid.canonical(),
            entry.version
        );
        Ok(entry)
    }

    /// Parses and registers one identifier, replacing any existing entry.
    pub fn register_overwrite_str(
        &self,
        raw: &str,
        resource: ResourceDescriptor,
    ) -> UidResult<RegistryEntry> {
        let uid = parser::parse(raw)?;
        self.report_unknown_tier1(&uid);
        let entry = self.registry.register_overwrite(&uid, resource)?;
        info!(
            "event=uid_registered module=service status=ok uid={} version={} overwrite=true",
            entry.uid.canonical(),
            entry.version
        );
        Ok(entry)
    }

    /// Parses raw text and resolves it to its resource descriptor.
    pub fn resolve_str(&self, raw: &str) -> UidResult<ResourceDescriptor> {
        let uid = parser::parse(raw)?;
        Ok(self.registry.resolve(&uid)?)
    }

    /// Parses raw text and removes its registry entry.
    pub fn deregister_str(&self, raw: &str) -> UidResult<RegistryEntry> {
        let uid = parser::parse(raw)?;
        let entry = self.registry.deregister(&uid)?;
        info!(
            "event=uid_deregistered module=service status=ok uid={}",
            entry.uid.canonical()
        );
        Ok(entry)
    }

    /// Parses raw text and follows its `type_ref` chain to the terminal UID.
    pub fn resolve_type_ref_str(&self, raw: &str) -> UidResult<Uid> {
        let uid = parser::parse(raw)?;
        Ok(self.registry.resolve_type_ref(&uid)?)
    }

    /// Registers one new tier1 category.
    pub fn register_tier1(&mut self, value: &str) -> UidResult<()> {
        self.grammar.register_tier1(value)?;
        info!("event=tier1_registered module=service status=ok tier1={value}");
        Ok(())
    }

    /// Scans the registry and reports every validation issue.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let issues = self.registry.validate_all(&self.grammar);
        info!(
            "event=registry_validated module=service status=ok entries={} issues={}",
            self.registry.len(),
            issues.len()
        );
        issues
    }

    /// Returns the grammar table in use.
    pub fn grammar(&self) -> &GrammarTable {
        &self.grammar
    }

    /// Returns a handle to the underlying registry.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    fn report_unknown_tier1(&self, uid: &Uid) {
        if !self.grammar.is_known_tier1(&uid.tier1) {
            warn!(
                "event=uid_register module=service status=warn reason=unknown_tier1 tier1={}",
                uid.tier1
            );
        }
    }
}
