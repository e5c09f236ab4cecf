// crates/module-gate-core/tests/manifest_source.rs
// ============================================================================
// Module: Manifest Source Tests
// Description: Loading descriptor sets from JSON manifests on disk.
// Purpose: Ensure manifests load faithfully and malformed input fails closed.
// Dependencies: module-gate-core, tempfile
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;

use module_gate_core::DescriptorSource;
use module_gate_core::JsonManifestSource;
use module_gate_core::SourceError;
use module_gate_core::ValidationError;
use module_gate_core::ViolationCategory;

mod common;
use crate::common::validator_for;

type TestResult = Result<(), String>;

const MANIFEST: &str = r#"{
  "modules": [
    {
      "name": "java.base",
      "packages": ["java.lang", "java.util"],
      "exports": [{ "package": "java.lang" }],
      "target": { "os_name": "Linux", "os_arch": "x86_64" }
    },
    {
      "name": "app.core",
      "requires": [{ "name": "java.base", "modifiers": ["mandated"] }],
      "exports": [
        { "package": "app.core.api", "targets": ["app.client"], "modifiers": ["synthetic"] }
      ],
      "opens": [{ "package": "app.core.model" }],
      "uses": ["app.spi.Codec"],
      "provides": [{ "service": "app.spi.Codec", "providers": ["app.core.JsonCodec"] }]
    },
    {
      "name": "app.client",
      "target": { "os_arch": "amd64" }
    }
  ]
}"#;

fn write(dir: &Path, name: &str, contents: &[u8]) -> Result<std::path::PathBuf, String> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok(path)
}

#[test]
fn manifest_descriptors_are_validated() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write(dir.path(), "modules.json", MANIFEST.as_bytes())?;
    let source = JsonManifestSource::new(&path);
    assert_eq!(source.path(), path.as_path());

    let report = validator_for("Linux", "amd64").run(&source).map_err(|err| err.to_string())?;
    assert_eq!(report.modules_checked, 3);
    let summary: Vec<(ViolationCategory, &str)> = report
        .violations
        .iter()
        .map(|violation| (violation.category, violation.entity.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ViolationCategory::UnexpectedPlatformAttribute, "app.client"),
            (ViolationCategory::EmptyPackageSet, "app.client"),
        ]
    );
    assert_eq!(report.violations[0].actual, "os_name=<unset>, os_arch=amd64");
    Ok(())
}

#[test]
fn manifest_packages_include_granted_packages() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write(dir.path(), "modules.json", MANIFEST.as_bytes())?;
    let descriptors = JsonManifestSource::new(&path).load().map_err(|err| err.to_string())?;
    let core = descriptors
        .iter()
        .find(|descriptor| descriptor.name() == "app.core")
        .ok_or_else(|| "app.core missing".to_string())?;
    let packages: Vec<&String> = core.packages().iter().collect();
    assert_eq!(packages, vec!["app.core.api", "app.core.model"]);
    assert_eq!(core.provides().len(), 1);
    Ok(())
}

#[test]
fn oversized_manifest_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write(dir.path(), "modules.json", MANIFEST.as_bytes())?;
    let source = JsonManifestSource::new(&path).with_max_bytes(16);
    match source.load() {
        Err(SourceError::TooLarge {
            limit, ..
        }) => assert_eq!(limit, 16),
        Err(other) => return Err(format!("unexpected error: {other}")),
        Ok(_) => return Err("oversized manifest loaded".to_string()),
    }
    Ok(())
}

#[test]
fn missing_manifest_is_fatal_for_the_run() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let source = JsonManifestSource::new(dir.path().join("absent.json"));
    match validator_for("Linux", "amd64").run(&source) {
        Err(ValidationError::Source(SourceError::Io {
            ..
        })) => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}")),
        Ok(_) => Err("run succeeded without a manifest".to_string()),
    }
}

#[test]
fn blank_module_name_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write(dir.path(), "modules.json", br#"{"modules":[{"name":" "}]}"#)?;
    match JsonManifestSource::new(&path).load() {
        Err(SourceError::InvalidDescriptor {
            module, ..
        }) => assert_eq!(module, " "),
        Err(other) => return Err(format!("unexpected error: {other}")),
        Ok(_) => return Err("blank module name accepted".to_string()),
    }
    Ok(())
}

#[test]
fn malformed_json_is_a_parse_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write(dir.path(), "modules.json", b"{\"modules\": [")?;
    let result = JsonManifestSource::new(&path).load();
    assert!(matches!(result, Err(SourceError::Parse(_))));
    Ok(())
}
