// crates/module-gate-core/src/violation.rs
// ============================================================================
// Module: Validation Report
// Description: Violation records and the aggregated report of a validation run.
// Purpose: Surface every finding verbatim, in discovery order.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Each finding is a [`Violation`] with a category, the entity it concerns,
//! the field when one applies, and the expected and observed values. A
//! [`ValidationReport`] keeps every violation in the order it was found; it is
//! never truncated, summarized, or deduplicated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder for a value that is not present.
pub const ABSENT: &str = "<absent>";
/// Placeholder for a module missing from the descriptor set.
pub const MODULE_ABSENT: &str = "<module absent>";
/// Expected outcome of every mutation probe.
pub const EXPECTED_MUTATION_OUTCOME: &str = "unsupported mutation";
/// Observed outcome when a mutation probe is accepted.
pub const MUTATION_ACCEPTED: &str = "mutation succeeded";
/// Expected package state for modules outside the packageless allow-list.
pub const NON_EMPTY_PACKAGES: &str = "non-empty package set";
/// Observed package state for an empty package set.
pub const EMPTY_PACKAGES: &str = "empty package set";

// ============================================================================
// SECTION: Categories
// ============================================================================

/// Kind of invariant a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Base module platform attributes do not match the host.
    PlatformMismatch,
    /// A non-base module carries platform attributes.
    UnexpectedPlatformAttribute,
    /// A collection accepted a mutation.
    MutationSucceeded,
    /// A collection rejected a mutation with the wrong error kind.
    MutationWrongErrorKind,
    /// A module outside the allow-list has no packages.
    EmptyPackageSet,
}

impl ViolationCategory {
    /// Returns the stable category label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlatformMismatch => "platform_mismatch",
            Self::UnexpectedPlatformAttribute => "unexpected_platform_attribute",
            Self::MutationSucceeded => "mutation_succeeded",
            Self::MutationWrongErrorKind => "mutation_wrong_error_kind",
            Self::EmptyPackageSet => "empty_package_set",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Violation
// ============================================================================

/// One deviation from an expected invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation category.
    pub category: ViolationCategory,
    /// Module or sub-entity identifier.
    pub entity: String,
    /// Field name, when the violation concerns a single field.
    pub field: Option<String>,
    /// Expected value.
    pub expected: String,
    /// Observed value.
    pub actual: String,
}

impl Violation {
    /// Creates a violation record.
    #[must_use]
    pub fn new(
        category: ViolationCategory,
        entity: impl Into<String>,
        field: Option<&str>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            category,
            entity: entity.into(),
            field: field.map(str::to_string),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.entity)?;
        if let Some(field) = &self.field {
            write!(f, " {field}")?;
        }
        write!(f, ": expected {}, found {}", self.expected, self.actual)
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Aggregated result of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Violations in discovery order.
    pub violations: Vec<Violation>,
    /// Number of descriptors examined.
    pub modules_checked: usize,
    /// Number of collection fields probed for mutation.
    pub fields_probed: usize,
}

impl ValidationReport {
    /// Returns true when no violation was found.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violations in discovery order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Counts violations of one category.
    #[must_use]
    pub fn count(&self, category: ViolationCategory) -> usize {
        self.violations.iter().filter(|violation| violation.category == category).count()
    }

    /// Converts the report into a result that keeps every violation on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ViolationList`] holding the full violation list when any
    /// violation was found.
    pub fn into_result(self) -> Result<Self, ViolationList> {
        if self.is_success() { Ok(self) } else { Err(ViolationList(self.violations)) }
    }
}

/// Non-empty list of violations returned by a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module validation failed with {} violation(s)", .0.len())]
pub struct ViolationList(pub Vec<Violation>);

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::ValidationReport;
    use super::Violation;
    use super::ViolationCategory;

    fn sample() -> Violation {
        Violation::new(
            ViolationCategory::PlatformMismatch,
            "java.base",
            Some("os_arch"),
            "x86_64",
            "arm",
        )
    }

    #[test]
    fn display_includes_field_and_values() {
        assert_eq!(
            sample().to_string(),
            "[platform_mismatch] java.base os_arch: expected x86_64, found arm"
        );
    }

    #[test]
    fn into_result_keeps_all_violations() {
        let report = ValidationReport {
            violations: vec![sample(), sample()],
            modules_checked: 1,
            fields_probed: 0,
        };
        let err = report.into_result().err().map(|list| list.0.len());
        assert_eq!(err, Some(2));
    }

    #[test]
    fn category_serializes_snake_case() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&ViolationCategory::MutationWrongErrorKind)?;
        assert_eq!(json, "\"mutation_wrong_error_kind\"");
        Ok(())
    }
}
