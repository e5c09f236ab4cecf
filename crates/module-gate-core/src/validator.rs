// crates/module-gate-core/src/validator.rs
// ============================================================================
// Module: Descriptor Set Validator
// Description: Orchestrates attribute, package, and immutability checks.
// Purpose: Produce one complete report for a full set of module descriptors.
// Dependencies: crate::{attributes, audit, probe, source, violation}, thiserror
// ============================================================================

//! ## Overview
//! [`Validator::check`] walks every descriptor in input order and, for each
//! one, runs the platform-attribute check, the package check, and the
//! immutability probes, in that order. After the walk it reports a missing
//! base module. Every violation is collected; no check short-circuits the
//! others. The completed report is handed to the configured
//! [`ValidationAuditSink`].
//!
//! Validation reads descriptors only, so repeated runs over the same input
//! yield identical reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::attributes::AttributeChecker;
use crate::audit::CheckAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::ValidationAuditSink;
use crate::audit::ViolationAuditEvent;
use crate::descriptor::BoxedDescriptor;
use crate::platform::HostPlatform;
use crate::platform::PlatformRules;
use crate::probe::ProbeRun;
use crate::source::DescriptorSource;
use crate::source::SourceError;
use crate::violation::ValidationReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the module that must carry the host platform target.
pub const DEFAULT_BASE_MODULE: &str = "java.base";

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Inputs that parameterize a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Platform the descriptors are checked against.
    pub host: HostPlatform,
    /// Name of the module that must record the host platform.
    pub base_module: String,
    /// Platform naming equivalences.
    pub rules: PlatformRules,
    /// Modules permitted to contain no packages.
    pub packageless_modules: BTreeSet<String>,
    /// Whether the empty package set check runs.
    pub check_packages: bool,
}

impl ValidatorSettings {
    /// Creates settings for `host` with the default base module and rules.
    #[must_use]
    pub fn new(host: HostPlatform) -> Self {
        Self {
            host,
            base_module: DEFAULT_BASE_MODULE.to_string(),
            rules: PlatformRules::default(),
            packageless_modules: BTreeSet::new(),
            check_packages: true,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal errors that prevent a validation run from producing a report.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Descriptors could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validates a complete set of module descriptors.
pub struct Validator {
    /// Run parameters.
    settings: ValidatorSettings,
    /// Destination for audit events.
    audit: Arc<dyn ValidationAuditSink>,
}

impl Validator {
    /// Creates a validator that records no audit events.
    #[must_use]
    pub fn new(settings: ValidatorSettings) -> Self {
        Self {
            settings,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the run parameters.
    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Checks every descriptor and returns the full report.
    #[must_use]
    pub fn check(&self, descriptors: &[BoxedDescriptor]) -> ValidationReport {
        let checker = AttributeChecker::new(&self.settings);
        let mut violations = Vec::new();
        let mut fields_probed = 0;
        let mut base_seen = false;

        for descriptor in descriptors {
            base_seen |= checker.is_base(descriptor.as_ref());
            checker.check(descriptor.as_ref(), &mut violations);
            let mut run = ProbeRun::new(&mut violations);
            run.probe_descriptor(descriptor.as_ref());
            fields_probed += run.fields_probed();
        }
        if !base_seen {
            checker.report_missing_base(&mut violations);
        }

        let report = ValidationReport {
            violations,
            modules_checked: descriptors.len(),
            fields_probed,
        };
        self.record(&report);
        report
    }

    /// Loads descriptors from `source` and checks them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Source`] when the source cannot be loaded.
    pub fn run(&self, source: &dyn DescriptorSource) -> Result<ValidationReport, ValidationError> {
        let descriptors = source.load()?;
        Ok(self.check(&descriptors))
    }

    /// Emits the audit events for a completed report.
    fn record(&self, report: &ValidationReport) {
        for violation in &report.violations {
            self.audit.record_violation(&ViolationAuditEvent::new(violation));
        }
        let event = CheckAuditEvent::new(&self.settings.base_module, &self.settings.host, report);
        self.audit.record_check(&event);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
