//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parser, grammar and registry calls into string-level APIs.
//! - Keep external tooling decoupled from structured-model details.

pub mod uid_service;
