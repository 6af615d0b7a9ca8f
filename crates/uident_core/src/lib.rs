//! Core parser, validator and resolution registry for universal identifiers.
//! This crate is the single source of truth for the textual
//! `@owner:module:tier1:name[:tier2...][:doc]` contract.

pub mod grammar;
pub mod logging;
pub mod model;
pub mod parser;
pub mod registry;
pub mod service;

pub use grammar::{
    GrammarError, GrammarResult, GrammarTable, DOC_SUFFIX, OWNER_PREFIX, SEGMENT_SEPARATOR,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::resource::ResourceDescriptor;
pub use model::uid::{Uid, UidValidationError};
pub use parser::{parse, serialize, ParseError, ParseResult};
pub use registry::{
    Registry, RegistryEntry, RegistryError, RegistryResult, SharedRegistry, ValidationIssue,
    ValidationIssueKind,
};
pub use service::uid_service::{UidError, UidResult, UidService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
