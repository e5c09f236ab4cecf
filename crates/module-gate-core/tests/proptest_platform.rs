// crates/module-gate-core/tests/proptest_platform.rs
// ============================================================================
// Module: Platform Rule Property-Based Tests
// Description: Randomized checks of the platform matching rules.
// Purpose: Ensure matching is exact-first, family-aware, and alias-directional.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

use module_gate_core::ModuleDescriptor;
use module_gate_core::PlatformRules;
use module_gate_core::PlatformTarget;
use module_gate_core::ViolationCategory;
use proptest::prelude::*;

mod common;
use crate::common::validator_for;

proptest! {
    #[test]
    fn identical_values_always_match(
        os in "[A-Za-z0-9 ._-]{1,24}",
        arch in "[a-z0-9_]{1,12}",
    ) {
        let rules = PlatformRules::default();
        prop_assert!(rules.os_name_matches(&os, &os));
        prop_assert!(rules.os_arch_matches(&arch, &arch));
    }

    #[test]
    fn windows_editions_match_any_windows_record(
        host_suffix in "[ A-Za-z0-9]{0,16}",
        recorded_suffix in "[ A-Za-z0-9]{0,16}",
    ) {
        let rules = PlatformRules::default();
        let host = format!("Windows{host_suffix}");
        let recorded = format!("Windows{recorded_suffix}");
        prop_assert!(rules.os_name_matches(&recorded, &host));
    }

    #[test]
    fn non_alias_arch_mismatch_expects_host_value(
        host in "[a-z][a-z0-9]{2,10}",
        recorded in "[a-z][a-z0-9]{2,10}",
    ) {
        prop_assume!(host != recorded);
        prop_assume!(host != "amd64" && host != "i386");
        let rules = PlatformRules::default();
        let mismatch = rules.check_os_arch(&recorded, &host);
        prop_assert_eq!(mismatch.map_err(|m| m.expected), Err(host));
    }

    #[test]
    fn non_base_targets_never_pass(
        os in proptest::option::of("[A-Za-z]{1,8}"),
        arch in proptest::option::of("[a-z0-9]{1,8}"),
    ) {
        let target = PlatformTarget { os_name: os, os_arch: arch };
        let expect_violation = !target.is_empty();
        let dependent = ModuleDescriptor::builder("app")
            .package("app")
            .target(target)
            .build()
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let base = ModuleDescriptor::builder("java.base")
            .package("java.lang")
            .target(PlatformTarget::new("Linux", "amd64"))
            .build()
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let report = validator_for("Linux", "amd64").check(&[base.boxed(), dependent.boxed()]);
        let flagged = report.count(ViolationCategory::UnexpectedPlatformAttribute);
        prop_assert_eq!(flagged, usize::from(expect_violation));
        prop_assert_eq!(report.violations.len(), flagged);
    }
}
