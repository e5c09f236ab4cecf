// crates/module-gate-cli/src/lib.rs
// ============================================================================
// Module: Module Gate CLI Library
// Description: Shared helpers for the module-gate command-line interface.
// Purpose: Provide reusable components (message catalog) for the binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library houses shared CLI utilities, chiefly the message catalog. The
//! binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog helpers.
pub mod i18n;

#[cfg(test)]
mod tests;
