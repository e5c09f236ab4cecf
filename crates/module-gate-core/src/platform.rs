// crates/module-gate-core/src/platform.rs
// ============================================================================
// Module: Platform Normalizer
// Description: Host platform identity and recorded-target matching rules.
// Purpose: Compare recorded OS/arch attributes against the live host.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Module images may record the platform they were built for using names that
//! differ from what the running host reports (for example a build-time
//! `x86_64` versus a runtime `amd64`, or `Windows` versus `Windows 10`).
//! [`PlatformRules`] is a versioned table of those equivalences. Matching is a
//! pure function of the recorded value and the host value.
//!
//! ## Invariants
//! - An exact match always succeeds regardless of the table contents.
//! - A mismatch reports the canonical expected value and the recorded value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Version of the built-in platform rule table.
pub const PLATFORM_RULES_VERSION: u32 = 1;

/// OS family prefixes in the built-in table.
const DEFAULT_OS_FAMILIES: &[&str] = &["Windows"];

/// Host-to-recorded architecture aliases in the built-in table.
const DEFAULT_ARCH_ALIASES: &[(&str, &str)] = &[("i386", "x86"), ("amd64", "x86_64")];

/// Rust target OS names mapped to the OS names a host reports.
const TARGET_OS_NAMES: &[(&str, &str)] = &[
    ("linux", "Linux"),
    ("windows", "Windows"),
    ("macos", "Mac OS X"),
    ("freebsd", "FreeBSD"),
    ("solaris", "SunOS"),
    ("aix", "AIX"),
];

// ============================================================================
// SECTION: Host Platform
// ============================================================================

/// Operating system name and architecture reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPlatform {
    /// Host operating system name.
    pub os_name: String,
    /// Host architecture name.
    pub os_arch: String,
}

impl HostPlatform {
    /// Creates a host platform from explicit values.
    #[must_use]
    pub fn new(os_name: impl Into<String>, os_arch: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            os_arch: os_arch.into(),
        }
    }

    /// Returns the compile target's platform under host-reported names.
    #[must_use]
    pub fn from_build_target() -> Self {
        Self::from_target_names(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps Rust target OS and architecture names to host-reported names.
    ///
    /// Unknown names pass through unchanged.
    #[must_use]
    pub fn from_target_names(os: &str, arch: &str) -> Self {
        let os_name = TARGET_OS_NAMES
            .iter()
            .find(|(target, _)| *target == os)
            .map_or(os, |(_, reported)| reported);
        let os_arch = match (os, arch) {
            ("macos", "x86_64") => "x86_64",
            (_, "x86_64") => "amd64",
            ("windows", "x86") => "x86",
            (_, "x86") => "i386",
            _ => arch,
        };
        Self::new(os_name, os_arch)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os_name, self.os_arch)
    }
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Recorded architecture name accepted for a host architecture name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchAlias {
    /// Architecture reported by the host.
    pub host: String,
    /// Architecture recorded at build time.
    pub recorded: String,
}

impl ArchAlias {
    /// Creates an alias entry.
    #[must_use]
    pub fn new(host: impl Into<String>, recorded: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            recorded: recorded.into(),
        }
    }
}

/// Platform attribute being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformAttribute {
    /// Operating system name.
    OsName,
    /// Architecture name.
    OsArch,
}

impl PlatformAttribute {
    /// Returns the attribute field label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OsName => "os_name",
            Self::OsArch => "os_arch",
        }
    }
}

impl fmt::Display for PlatformAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded attribute that does not match the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMismatch {
    /// Attribute that failed.
    pub attribute: PlatformAttribute,
    /// Canonical value expected for the host.
    pub expected: String,
    /// Recorded value.
    pub actual: String,
}

/// Versioned table of platform naming equivalences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRules {
    /// Table version.
    pub version: u32,
    /// OS family prefixes; a recorded and a host name sharing a prefix match.
    pub os_families: Vec<String>,
    /// Accepted recorded architecture names per host architecture.
    pub arch_aliases: Vec<ArchAlias>,
}

impl Default for PlatformRules {
    fn default() -> Self {
        Self {
            version: PLATFORM_RULES_VERSION,
            os_families: DEFAULT_OS_FAMILIES.iter().map(|prefix| (*prefix).to_string()).collect(),
            arch_aliases: DEFAULT_ARCH_ALIASES
                .iter()
                .map(|(host, recorded)| ArchAlias::new(*host, *recorded))
                .collect(),
        }
    }
}

impl PlatformRules {
    /// Returns true when the recorded OS name is acceptable for the host.
    #[must_use]
    pub fn os_name_matches(&self, recorded: &str, host: &str) -> bool {
        recorded == host
            || self.os_families.iter().any(|prefix| {
                host.starts_with(prefix.as_str()) && recorded.starts_with(prefix.as_str())
            })
    }

    /// Returns true when the recorded architecture is acceptable for the host.
    #[must_use]
    pub fn os_arch_matches(&self, recorded: &str, host: &str) -> bool {
        recorded == host
            || self
                .arch_aliases
                .iter()
                .any(|alias| alias.host == host && alias.recorded == recorded)
    }

    /// Returns the canonical recorded architecture for a host architecture.
    #[must_use]
    pub fn canonical_arch<'a>(&'a self, host: &'a str) -> &'a str {
        self.arch_aliases
            .iter()
            .find(|alias| alias.host == host)
            .map_or(host, |alias| alias.recorded.as_str())
    }

    /// Checks a recorded OS name against the host.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeMismatch`] naming the host value when no rule matches.
    pub fn check_os_name(&self, recorded: &str, host: &str) -> Result<(), AttributeMismatch> {
        if self.os_name_matches(recorded, host) {
            return Ok(());
        }
        Err(AttributeMismatch {
            attribute: PlatformAttribute::OsName,
            expected: host.to_string(),
            actual: recorded.to_string(),
        })
    }

    /// Checks a recorded architecture against the host.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeMismatch`] naming the canonical host architecture
    /// when no rule matches.
    pub fn check_os_arch(&self, recorded: &str, host: &str) -> Result<(), AttributeMismatch> {
        if self.os_arch_matches(recorded, host) {
            return Ok(());
        }
        Err(AttributeMismatch {
            attribute: PlatformAttribute::OsArch,
            expected: self.canonical_arch(host).to_string(),
            actual: recorded.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
