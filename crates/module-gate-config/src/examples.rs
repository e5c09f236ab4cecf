// crates/module-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `module-gate.toml`. The output is deterministic and
//! validates under [`ModuleGateConfig::validate`](crate::ModuleGateConfig::validate).

/// Returns a canonical example `module-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"# Host platform the descriptors are checked against.
# Unset fields fall back to the build target of the validator.
[host]
os_name = "Linux"
os_arch = "amd64"

[validation]
base_module = "java.base"
check_packages = true
# Aggregator modules that legitimately contain no packages.
packageless_modules = ["java.se"]

[platform]
version = 1
os_families = ["Windows"]

[[platform.arch_aliases]]
host = "i386"
recorded = "x86"

[[platform.arch_aliases]]
host = "amd64"
recorded = "x86_64"

[audit]
# One of "none", "stderr", "file".
sink = "file"
path = "module-gate.audit.jsonl"
"#,
    )
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

    use super::config_toml_example;
    use crate::ModuleGateConfig;

    #[test]
    fn example_config_validates() {
        let parsed = ModuleGateConfig::from_toml_str(&config_toml_example());
        assert!(parsed.is_ok(), "example config invalid: {parsed:?}");
    }
}
