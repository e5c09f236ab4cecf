// crates/module-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for module-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use module_gate_config::ConfigError;
use module_gate_config::ModuleGateConfig;

/// Parses a TOML string into a `ModuleGateConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<ModuleGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<ModuleGateConfig, toml::de::Error> {
    config_from_toml("")
}

/// Asserts that a validation result is an error containing a specific substring.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
