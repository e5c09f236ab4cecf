// crates/module-gate-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Library Tests
// Description: Unit test suites for the CLI library helpers.
// Purpose: Group library-level tests by concern.
// Dependencies: module-gate-cli
// ============================================================================
