// crates/module-gate-core/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for validation runs.
// Purpose: Emit JSON-lines records of each run and its violations.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each validation run emits one [`CheckAuditEvent`] summarizing the run and
//! one [`ViolationAuditEvent`] per violation. Events are routed through a
//! [`ValidationAuditSink`] so deployments can pick stderr, an append-only
//! file, or nothing at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::platform::HostPlatform;
use crate::violation::ValidationReport;
use crate::violation::Violation;
use crate::violation::ViolationCategory;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome label recorded for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// No violations were found.
    Passed,
    /// At least one violation was found.
    Failed,
}

/// Run summary audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Base module name.
    pub base_module: String,
    /// Host operating system name.
    pub host_os: String,
    /// Host architecture name.
    pub host_arch: String,
    /// Number of descriptors examined.
    pub modules_checked: usize,
    /// Number of collection fields probed.
    pub fields_probed: usize,
    /// Number of violations found.
    pub violation_count: usize,
    /// Run outcome.
    pub outcome: CheckOutcome,
}

/// Single violation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Violation category.
    pub category: ViolationCategory,
    /// Module or sub-entity identifier.
    pub entity: String,
    /// Field name when applicable.
    pub field: Option<String>,
    /// Expected value.
    pub expected: String,
    /// Observed value.
    pub actual: String,
}

impl CheckAuditEvent {
    /// Creates a run summary event with a consistent timestamp.
    #[must_use]
    pub fn new(base_module: &str, host: &HostPlatform, report: &ValidationReport) -> Self {
        Self {
            event: "module_check",
            timestamp_ms: now_ms(),
            base_module: base_module.to_string(),
            host_os: host.os_name.clone(),
            host_arch: host.os_arch.clone(),
            modules_checked: report.modules_checked,
            fields_probed: report.fields_probed,
            violation_count: report.violations.len(),
            outcome: if report.is_success() { CheckOutcome::Passed } else { CheckOutcome::Failed },
        }
    }
}

impl ViolationAuditEvent {
    /// Creates a violation event with a consistent timestamp.
    #[must_use]
    pub fn new(violation: &Violation) -> Self {
        Self {
            event: "module_violation",
            timestamp_ms: now_ms(),
            category: violation.category,
            entity: violation.entity.clone(),
            field: violation.field.clone(),
            expected: violation.expected.clone(),
            actual: violation.actual.clone(),
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation runs.
pub trait ValidationAuditSink: Send + Sync {
    /// Record a run summary event.
    fn record_check(&self, event: &CheckAuditEvent);

    /// Record a violation event.
    fn record_violation(&self, _event: &ViolationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record_check(&self, event: &CheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_violation(&self, event: &ViolationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes and appends one record.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record_check(&self, event: &CheckAuditEvent) {
        self.append(event);
    }

    fn record_violation(&self, event: &ViolationAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record_check(&self, _event: &CheckAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
