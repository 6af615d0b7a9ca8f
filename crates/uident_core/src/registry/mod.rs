//! Identifier registry: registration, resolution and cross-reference checks.
//!
//! # Responsibility
//! - Act as the single source of truth for which UIDs exist.
//! - Map each registered UID to its opaque resource descriptor.
//! - Validate cross-UID type references, including cycle detection.
//!
//! # Invariants
//! - Entries are keyed by base canonical form (address with `type_ref`
//!   omitted): case-sensitive, tier2 order-preserving, so a plain reference
//!   finds an entry registered with a type contract attached.
//! - Failed mutations leave the registry unchanged.
//! - Overwrite replaces an entry and bumps its version by exactly one;
//!   re-registration after deregistration starts a fresh entry at version 1.

use crate::grammar::GrammarTable;
use crate::model::resource::ResourceDescriptor;
use crate::model::uid::{Uid, UidValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

mod shared;

pub use shared::SharedRegistry;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Validation(UidValidationError),
    /// Registration without overwrite hit an existing entry.
    DuplicateUid(String),
    /// Lookup or deregistration of an absent canonical form.
    UnknownUid(String),
    /// A type-reference chain revisited an identifier before terminating.
    CyclicTypeReference(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateUid(uid) => write!(f, "uid already registered: {uid}"),
            Self::UnknownUid(uid) => write!(f, "uid not registered: {uid}"),
            Self::CyclicTypeReference(uid) => {
                write!(f, "cyclic type reference through uid: {uid}")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateUid(_) | Self::UnknownUid(_) | Self::CyclicTypeReference(_) => None,
        }
    }
}

impl From<UidValidationError> for RegistryError {
    fn from(value: UidValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One registered identifier with its resource association.
///
/// Owned exclusively by the registry; overwrite replaces the whole record
/// instead of mutating it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Stable record ID; survives overwrites, not deregistration.
    pub entry_id: Uuid,
    pub uid: Uid,
    pub resource: ResourceDescriptor,
    /// Starts at 1, bumped once per overwrite.
    pub version: u32,
    /// Unix epoch milliseconds of the latest (re-)registration.
    pub registered_at_ms: i64,
}

/// Validation findings reported by [`Registry::validate_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Canonical form of the entry the issue was found on.
    pub uid: String,
    pub kind: ValidationIssueKind,
}

/// Issue categories for registry-wide validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ValidationIssueKind {
    /// The entry's tier1 category is not registered in the grammar table.
    UnknownTier1 { tier1: String },
    /// A type-reference link points at an unregistered identifier.
    UnresolvedTypeRef { target: String },
    /// The type-reference chain revisits an identifier.
    CyclicTypeRef { target: String },
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValidationIssueKind::UnknownTier1 { tier1 } => {
                write!(f, "uid {} uses unknown tier1 `{tier1}`", self.uid)
            }
            ValidationIssueKind::UnresolvedTypeRef { target } => {
                write!(f, "uid {} references unregistered uid {target}", self.uid)
            }
            ValidationIssueKind::CyclicTypeRef { target } => {
                write!(f, "uid {} participates in a type cycle at {target}", self.uid)
            }
        }
    }
}

/// In-memory identifier registry.
///
/// Single-threaded by itself; wrap in [`SharedRegistry`] for the
/// single-writer/concurrent-reader discipline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one identifier, rejecting duplicates.
    pub fn register(
        &mut self,
        uid: &Uid,
        resource: ResourceDescriptor,
    ) -> RegistryResult<RegistryEntry> {
        uid.validate()?;
        let key = uid.base_canonical();
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateUid(key));
        }
        let entry = RegistryEntry {
            entry_id: Uuid::new_v4(),
            uid: uid.clone(),
            resource,
            version: 1,
            registered_at_ms: now_epoch_ms(),
        };
        self.entries.insert(key, entry.clone());
        Ok(entry)
    }

    /// Registers one identifier, replacing any existing entry.
    ///
    /// # Contract
    /// - Existing entry: `entry_id` is kept, version bumps by exactly one,
    ///   the timestamp refreshes.
    /// - Absent entry: behaves like [`Registry::register`].
    pub fn register_overwrite(
        &mut self,
        uid: &Uid,
        resource: ResourceDescriptor,
    ) -> RegistryResult<RegistryEntry> {
        uid.validate()?;
        let key = uid.base_canonical();
        let (entry_id, version) = match self.entries.get(&key) {
            Some(existing) => (existing.entry_id, existing.version + 1),
            None => (Uuid::new_v4(), 1),
        };
        let entry = RegistryEntry {
            entry_id,
            uid: uid.clone(),
            resource,
            version,
            registered_at_ms: now_epoch_ms(),
        };
        self.entries.insert(key, entry.clone());
        Ok(entry)
    }

    /// Resolves one identifier to its resource descriptor.
    pub fn resolve(&self, uid: &Uid) -> RegistryResult<ResourceDescriptor> {
        let key = uid.base_canonical();
        match self.entries.get(&key) {
            Some(entry) => Ok(entry.resource.clone()),
            None => Err(RegistryError::UnknownUid(key)),
        }
    }

    /// Returns the full entry for one identifier, if registered.
    pub fn entry(&self, uid: &Uid) -> Option<&RegistryEntry> {
        self.entries.get(&uid.base_canonical())
    }

    /// Removes one identifier and returns its entry.
    ///
    /// Dependents holding a `type_ref` to the removed identifier are not
    /// cascaded; they surface later through [`Registry::validate_all`].
    pub fn deregister(&mut self, uid: &Uid) -> RegistryResult<RegistryEntry> {
        let key = uid.base_canonical();
        match self.entries.remove(&key) {
            Some(entry) => Ok(entry),
            None => Err(RegistryError::UnknownUid(key)),
        }
    }

    /// Follows the `type_ref` chain from one identifier to its terminal UID.
    ///
    /// Each link is looked up in the registry so a target's own registered
    /// `type_ref` continues the chain. A revisited canonical form fails with
    /// `CyclicTypeReference`; an unregistered link fails with `UnknownUid`.
    pub fn resolve_type_ref(&self, uid: &Uid) -> RegistryResult<Uid> {
        let mut visited = BTreeSet::new();
        visited.insert(uid.base_canonical());
        let mut current = uid.clone();
        while let Some(next) = &current.type_ref {
            let key = next.base_canonical();
            if !visited.insert(key.clone()) {
                return Err(RegistryError::CyclicTypeReference(key));
            }
            match self.entries.get(&key) {
                Some(entry) => current = entry.uid.clone(),
                None => return Err(RegistryError::UnknownUid(key)),
            }
        }
        Ok(current)
    }

    /// Scans the whole registry and reports every issue found.
    ///
    /// Never fails: a bad entry contributes issues without blocking the scan.
    /// Restartable; each call re-reads current state.
    pub fn validate_all(&self, grammar: &GrammarTable) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (key, entry) in &self.entries {
            if !grammar.is_known_tier1(&entry.uid.tier1) {
                issues.push(ValidationIssue {
                    uid: key.clone(),
                    kind: ValidationIssueKind::UnknownTier1 {
                        tier1: entry.uid.tier1.clone(),
                    },
                });
            }
            self.check_type_chain(key, &entry.uid, &mut issues);
        }
        issues
    }

    fn check_type_chain(&self, origin: &str, uid: &Uid, issues: &mut Vec<ValidationIssue>) {
        let mut visited = BTreeSet::new();
        visited.insert(uid.base_canonical());
        let mut current = uid.clone();
        while let Some(next) = &current.type_ref {
            let key = next.base_canonical();
            if !visited.insert(key.clone()) {
                issues.push(ValidationIssue {
                    uid: origin.to_string(),
                    kind: ValidationIssueKind::CyclicTypeRef { target: key },
                });
                return;
            }
            match self.entries.get(&key) {
                Some(entry) => current = entry.uid.clone(),
                None => {
                    issues.push(ValidationIssue {
                        uid: origin.to_string(),
                        kind: ValidationIssueKind::UnresolvedTypeRef { target: key },
                    });
                    return;
                }
            }
        }
    }

    /// Returns registered canonical forms in sorted order.
    pub fn uids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
