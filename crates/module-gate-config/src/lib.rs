// crates/module-gate-config/src/lib.rs
// ============================================================================
// Module: Module Gate Config Library
// Description: Configuration model, validation, and example generation.
// Purpose: Single source of truth for module-gate.toml semantics.
// Dependencies: module-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `module-gate-config` defines the configuration model for the module
//! descriptor validator: the injected host platform, validation settings,
//! the platform rule table, and the audit sink. Validation is strict and
//! fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
