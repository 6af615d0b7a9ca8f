//! Domain model for universal identifiers and their resources.
//!
//! # Responsibility
//! - Define the canonical `Uid` value object shared by parser and registry.
//! - Keep resource payloads opaque to the core.
//!
//! # Invariants
//! - A `Uid` is a value: equality, hashing and serialization derive from its
//!   fields, never from registry state.
//! - The canonical string form round-trips through the parser.

pub mod resource;
pub mod uid;
