// crates/module-gate-config/src/config.rs
// ============================================================================
// Module: Module Gate Configuration
// Description: Configuration loading and validation for the descriptor validator.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: module-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; omitted sections take documented defaults.
//! Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use module_gate_core::ArchAlias;
use module_gate_core::DEFAULT_BASE_MODULE;
use module_gate_core::FileAuditSink;
use module_gate_core::HostPlatform;
use module_gate_core::NoopAuditSink;
use module_gate_core::PLATFORM_RULES_VERSION;
use module_gate_core::PlatformRules;
use module_gate_core::StderrAuditSink;
use module_gate_core::ValidationAuditSink;
use module_gate_core::ValidatorSettings;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "module-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "MODULE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of packageless module entries.
pub(crate) const MAX_PACKAGELESS_MODULES: usize = 1024;
/// Maximum number of platform table entries (families or aliases).
pub(crate) const MAX_PLATFORM_RULES: usize = 256;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Top-level validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleGateConfig {
    /// Injected host platform; unset fields fall back to the caller's value.
    #[serde(default)]
    pub host: HostConfig,
    /// Validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Platform naming equivalences.
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Audit logging.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ModuleGateConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// The path is taken from `path`, then the `MODULE_GATE_CONFIG`
    /// environment variable, then `module-gate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Loads configuration when one was requested or the default file exists.
    ///
    /// An explicit path or the `MODULE_GATE_CONFIG` environment variable must
    /// resolve to a readable file. Without either, a missing
    /// `module-gate.toml` yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        let requested = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        if !requested && !Path::new(DEFAULT_CONFIG_NAME).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host.validate()?;
        self.validation.validate()?;
        self.platform.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Resolves the host platform, filling unset fields from `fallback`.
    #[must_use]
    pub fn host_platform(&self, fallback: HostPlatform) -> HostPlatform {
        HostPlatform {
            os_name: self.host.os_name.clone().unwrap_or(fallback.os_name),
            os_arch: self.host.os_arch.clone().unwrap_or(fallback.os_arch),
        }
    }

    /// Builds validator settings for `host`.
    #[must_use]
    pub fn validator_settings(&self, host: HostPlatform) -> ValidatorSettings {
        ValidatorSettings {
            host,
            base_module: self.validation.base_module.clone(),
            rules: self.platform.rules(),
            packageless_modules: self.validation.packageless_modules.iter().cloned().collect(),
            check_packages: self.validation.check_packages,
        }
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when a file sink cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn ValidationAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for the file sink".to_string())
                })?;
                let sink = FileAuditSink::new(Path::new(path))
                    .map_err(|err| ConfigError::Io(format!("audit.path {path}: {err}")))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Host
// ============================================================================

/// Host platform override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Host operating system name.
    #[serde(default)]
    pub os_name: Option<String>,
    /// Host architecture name.
    #[serde(default)]
    pub os_arch: Option<String>,
}

impl HostConfig {
    /// Validates host overrides.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_optional_non_empty("host.os_name", self.os_name.as_deref())?;
        validate_optional_non_empty("host.os_arch", self.os_arch.as_deref())
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Module that must record the host platform.
    #[serde(default = "default_base_module")]
    pub base_module: String,
    /// Whether the empty package set check runs.
    #[serde(default = "default_check_packages")]
    pub check_packages: bool,
    /// Modules permitted to contain no packages.
    #[serde(default)]
    pub packageless_modules: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            base_module: default_base_module(),
            check_packages: default_check_packages(),
            packageless_modules: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_module.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "validation.base_module must be non-empty".to_string(),
            ));
        }
        if self.packageless_modules.len() > MAX_PACKAGELESS_MODULES {
            return Err(ConfigError::Invalid(format!(
                "validation.packageless_modules exceeds max entries ({MAX_PACKAGELESS_MODULES})"
            )));
        }
        let mut seen = BTreeSet::new();
        for name in &self.packageless_modules {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "validation.packageless_modules entries must be non-empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "validation.packageless_modules contains duplicate entry: {name}"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Platform
// ============================================================================

/// Platform rule table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Rule table version.
    #[serde(default = "default_platform_version")]
    pub version: u32,
    /// OS family prefixes.
    #[serde(default = "default_os_families")]
    pub os_families: Vec<String>,
    /// Host-to-recorded architecture aliases.
    #[serde(default = "default_arch_aliases")]
    pub arch_aliases: Vec<ArchAlias>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        let rules = PlatformRules::default();
        Self {
            version: rules.version,
            os_families: rules.os_families,
            arch_aliases: rules.arch_aliases,
        }
    }
}

impl PlatformConfig {
    /// Returns the configured rule table.
    #[must_use]
    pub fn rules(&self) -> PlatformRules {
        PlatformRules {
            version: self.version,
            os_families: self.os_families.clone(),
            arch_aliases: self.arch_aliases.clone(),
        }
    }

    /// Validates the rule table.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::Invalid("platform.version must be >= 1".to_string()));
        }
        if self.os_families.len() > MAX_PLATFORM_RULES
            || self.arch_aliases.len() > MAX_PLATFORM_RULES
        {
            return Err(ConfigError::Invalid(format!(
                "platform tables exceed max entries ({MAX_PLATFORM_RULES})"
            )));
        }
        if self.os_families.iter().any(|family| family.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "platform.os_families entries must be non-empty".to_string(),
            ));
        }
        let mut hosts = BTreeSet::new();
        for alias in &self.arch_aliases {
            if alias.host.trim().is_empty() || alias.recorded.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "platform.arch_aliases host and recorded must be non-empty".to_string(),
                ));
            }
            if !hosts.insert(alias.host.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "platform.arch_aliases contains duplicate host: {}",
                    alias.host
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to a file.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines); required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI input or environment.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Rejects blank values for optional string fields.
fn validate_optional_non_empty(field: &str, value: Option<&str>) -> Result<(), ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{field} must be non-empty when set")))
        }
        _ => Ok(()),
    }
}

/// Default base module name.
fn default_base_module() -> String {
    DEFAULT_BASE_MODULE.to_string()
}

/// Default to running the empty package set check.
const fn default_check_packages() -> bool {
    true
}

/// Default platform rule table version.
const fn default_platform_version() -> u32 {
    PLATFORM_RULES_VERSION
}

/// Default OS family prefixes.
fn default_os_families() -> Vec<String> {
    PlatformRules::default().os_families
}

/// Default architecture aliases.
fn default_arch_aliases() -> Vec<ArchAlias> {
    PlatformRules::default().arch_aliases
}

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

    use super::validate_path_string;

    #[test]
    fn validate_path_string_accepts_valid_path() {
        assert!(validate_path_string("audit.path", "./logs/audit.jsonl").is_ok());
    }

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let result = validate_path_string("audit.path", "   ");
        assert!(result.is_err_and(|err| err.to_string().contains("non-empty")));
    }

    #[test]
    fn validate_path_string_rejects_long_component() {
        let long = "a".repeat(super::MAX_PATH_COMPONENT_LENGTH + 1);
        let result = validate_path_string("audit.path", &format!("logs/{long}"));
        assert!(result.is_err_and(|err| err.to_string().contains("component too long")));
    }
}
