// crates/module-gate-core/src/attributes.rs
// ============================================================================
// Module: Attribute Checker
// Description: Platform-target and package-set checks per descriptor.
// Purpose: Confirm only the base module records a platform, and that it matches the host.
// Dependencies: crate::{descriptor, platform, validator, violation}
// ============================================================================

//! ## Overview
//! The base module must record a platform target matching the host under the
//! configured [`PlatformRules`](crate::platform::PlatformRules). Every other
//! module must record none. Modules outside the packageless allow-list must
//! contain at least one package. Each failure is appended to the caller's
//! violation list; checking never stops early.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::descriptor::ModuleDescriptorView;
use crate::platform::AttributeMismatch;
use crate::platform::PlatformAttribute;
use crate::validator::ValidatorSettings;
use crate::violation::ABSENT;
use crate::violation::EMPTY_PACKAGES;
use crate::violation::MODULE_ABSENT;
use crate::violation::NON_EMPTY_PACKAGES;
use crate::violation::Violation;
use crate::violation::ViolationCategory;

// ============================================================================
// SECTION: Checker
// ============================================================================

/// Per-descriptor attribute checks driven by validator settings.
pub struct AttributeChecker<'a> {
    /// Settings supplying host, base module, rules, and allow-list.
    settings: &'a ValidatorSettings,
}

impl<'a> AttributeChecker<'a> {
    /// Creates a checker bound to `settings`.
    #[must_use]
    pub const fn new(settings: &'a ValidatorSettings) -> Self {
        Self {
            settings,
        }
    }

    /// Returns true when `descriptor` is the base module.
    #[must_use]
    pub fn is_base(&self, descriptor: &dyn ModuleDescriptorView) -> bool {
        descriptor.name() == self.settings.base_module
    }

    /// Runs the platform and package checks for one descriptor.
    pub fn check(&self, descriptor: &dyn ModuleDescriptorView, violations: &mut Vec<Violation>) {
        if self.is_base(descriptor) {
            self.check_base_target(descriptor, violations);
        } else {
            check_no_target(descriptor, violations);
        }
        if self.settings.check_packages {
            self.check_packages(descriptor, violations);
        }
    }

    /// Reports the base module as missing from the descriptor set.
    pub fn report_missing_base(&self, violations: &mut Vec<Violation>) {
        violations.push(Violation::new(
            ViolationCategory::PlatformMismatch,
            self.settings.base_module.as_str(),
            None,
            self.settings.host.to_string(),
            MODULE_ABSENT,
        ));
    }

    /// Verifies the base module target against the host.
    fn check_base_target(
        &self,
        descriptor: &dyn ModuleDescriptorView,
        violations: &mut Vec<Violation>,
    ) {
        let host = &self.settings.host;
        let rules = &self.settings.rules;
        let target = descriptor.target().cloned().unwrap_or_default();

        let os_name = match target.os_name.as_deref() {
            Some(recorded) => rules.check_os_name(recorded, &host.os_name),
            None => Err(missing(PlatformAttribute::OsName, &host.os_name)),
        };
        let os_arch = match target.os_arch.as_deref() {
            Some(recorded) => rules.check_os_arch(recorded, &host.os_arch),
            None => Err(missing(PlatformAttribute::OsArch, rules.canonical_arch(&host.os_arch))),
        };
        for mismatch in [os_name, os_arch].into_iter().filter_map(Result::err) {
            violations.push(Violation::new(
                ViolationCategory::PlatformMismatch,
                descriptor.name(),
                Some(mismatch.attribute.as_str()),
                mismatch.expected,
                mismatch.actual,
            ));
        }
    }

    /// Verifies the module has packages unless it is allow-listed.
    fn check_packages(
        &self,
        descriptor: &dyn ModuleDescriptorView,
        violations: &mut Vec<Violation>,
    ) {
        if !descriptor.packages().is_empty()
            || self.settings.packageless_modules.contains(descriptor.name())
        {
            return;
        }
        violations.push(Violation::new(
            ViolationCategory::EmptyPackageSet,
            descriptor.name(),
            Some("packages"),
            NON_EMPTY_PACKAGES,
            EMPTY_PACKAGES,
        ));
    }
}

/// Verifies a non-base module records no platform attributes.
fn check_no_target(descriptor: &dyn ModuleDescriptorView, violations: &mut Vec<Violation>) {
    let Some(target) = descriptor.target().filter(|target| !target.is_empty()) else {
        return;
    };
    violations.push(Violation::new(
        ViolationCategory::UnexpectedPlatformAttribute,
        descriptor.name(),
        Some("target"),
        ABSENT,
        target.to_string(),
    ));
}

/// Builds the mismatch for an attribute the base module did not record.
fn missing(attribute: PlatformAttribute, expected: &str) -> AttributeMismatch {
    AttributeMismatch {
        attribute,
        expected: expected.to_string(),
        actual: ABSENT.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
