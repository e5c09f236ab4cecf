// crates/module-gate-core/src/source.rs
// ============================================================================
// Module: Descriptor Sources
// Description: Loaders that hand a complete descriptor set to the validator.
// Purpose: Decouple validation from where descriptors come from.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`DescriptorSource`] yields the full descriptor set for one run.
//! [`InMemorySource`] wraps descriptors built in process;
//! [`JsonManifestSource`] reads a bounded JSON manifest from disk and builds
//! conformant [`ModuleDescriptor`] values from it.
//!
//! Security posture: manifests are untrusted input. Reads are size-limited,
//! must be UTF-8, and reject unknown fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::descriptor::BoxedDescriptor;
use crate::descriptor::DescriptorError;
use crate::descriptor::Export;
use crate::descriptor::ModuleDescriptor;
use crate::descriptor::Open;
use crate::descriptor::PackageModifier;
use crate::descriptor::PlatformTarget;
use crate::descriptor::Provision;
use crate::descriptor::Requirement;
use crate::descriptor::RequiresModifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum manifest size in bytes.
pub const DEFAULT_MAX_MANIFEST_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while loading a descriptor set.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Manifest could not be read.
    #[error("failed to read descriptor manifest {path}: {message}")]
    Io {
        /// Manifest path.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Manifest exceeds the size limit.
    #[error("descriptor manifest is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Manifest is not valid UTF-8.
    #[error("descriptor manifest must be utf-8")]
    Encoding,
    /// Manifest is not valid JSON for the manifest schema.
    #[error("failed to parse descriptor manifest: {0}")]
    Parse(String),
    /// A manifest entry does not form a valid descriptor.
    #[error("invalid descriptor {module}: {source}")]
    InvalidDescriptor {
        /// Module name as written in the manifest.
        module: String,
        /// Construction error.
        source: DescriptorError,
    },
    /// Two manifest entries share a module name.
    #[error("duplicate module in descriptor manifest: {0}")]
    DuplicateModule(String),
    /// Descriptors were already handed out.
    #[error("descriptor source already consumed")]
    Exhausted,
}

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// Supplies the complete descriptor set for one validation run.
pub trait DescriptorSource {
    /// Loads every descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the descriptor set cannot be produced.
    fn load(&self) -> Result<Vec<BoxedDescriptor>, SourceError>;
}

/// Source over descriptors already built in process.
///
/// Descriptors are moved out on the first load; later loads fail with
/// [`SourceError::Exhausted`].
pub struct InMemorySource {
    /// Descriptors awaiting hand-off.
    descriptors: Mutex<Option<Vec<BoxedDescriptor>>>,
}

impl InMemorySource {
    /// Wraps `descriptors`.
    #[must_use]
    pub fn new(descriptors: Vec<BoxedDescriptor>) -> Self {
        Self {
            descriptors: Mutex::new(Some(descriptors)),
        }
    }
}

impl DescriptorSource for InMemorySource {
    fn load(&self) -> Result<Vec<BoxedDescriptor>, SourceError> {
        let mut guard = self.descriptors.lock().map_err(|_| SourceError::Exhausted)?;
        guard.take().ok_or(SourceError::Exhausted)
    }
}

// ============================================================================
// SECTION: JSON Manifest
// ============================================================================

/// On-disk manifest listing every module in an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorManifest {
    /// Module entries in image order.
    pub modules: Vec<ManifestModule>,
}

/// One module entry of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestModule {
    /// Module name.
    pub name: String,
    /// Contained packages.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Module dependencies.
    #[serde(default)]
    pub requires: Vec<ManifestRequirement>,
    /// Exported packages.
    #[serde(default)]
    pub exports: Vec<ManifestPackageGrant>,
    /// Opened packages.
    #[serde(default)]
    pub opens: Vec<ManifestPackageGrant>,
    /// Consumed service types.
    #[serde(default)]
    pub uses: Vec<String>,
    /// Provided services.
    #[serde(default)]
    pub provides: Vec<ManifestProvision>,
    /// Recorded platform target.
    #[serde(default)]
    pub target: Option<PlatformTarget>,
}

/// Manifest form of a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestRequirement {
    /// Required module name.
    pub name: String,
    /// Dependency modifiers.
    #[serde(default)]
    pub modifiers: Vec<RequiresModifier>,
}

/// Manifest form of an export or open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestPackageGrant {
    /// Package name.
    pub package: String,
    /// Grant modifiers.
    #[serde(default)]
    pub modifiers: Vec<PackageModifier>,
    /// Target modules; empty for an unqualified grant.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Manifest form of a provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestProvision {
    /// Service interface name.
    pub service: String,
    /// Provider class names.
    pub providers: Vec<String>,
}

impl ManifestModule {
    /// Builds a conformant descriptor from this entry.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the entry is not a valid descriptor.
    pub fn into_descriptor(self) -> Result<ModuleDescriptor, DescriptorError> {
        let mut builder = ModuleDescriptor::builder(self.name);
        for package in self.packages {
            builder = builder.package(package);
        }
        for requirement in self.requires {
            builder = builder.requires(Requirement::new(requirement.name, requirement.modifiers));
        }
        for grant in self.exports {
            builder = builder.export(Export::new(grant.package, grant.modifiers, grant.targets));
        }
        for grant in self.opens {
            builder = builder.open(Open::new(grant.package, grant.modifiers, grant.targets));
        }
        for service in self.uses {
            builder = builder.uses(service);
        }
        for provision in self.provides {
            builder = builder.provides(Provision::new(provision.service, provision.providers)?);
        }
        if let Some(target) = self.target {
            builder = builder.target(target);
        }
        builder.build()
    }
}

impl DescriptorManifest {
    /// Parses a manifest from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Encoding`] or [`SourceError::Parse`] when the
    /// bytes are not a UTF-8 manifest.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SourceError> {
        let text = std::str::from_utf8(bytes).map_err(|_| SourceError::Encoding)?;
        serde_json::from_str(text).map_err(|err| SourceError::Parse(err.to_string()))
    }

    /// Builds every descriptor, rejecting duplicate module names.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] for the first invalid or duplicate entry.
    pub fn into_descriptors(self) -> Result<Vec<BoxedDescriptor>, SourceError> {
        let mut seen = BTreeSet::new();
        let mut descriptors = Vec::with_capacity(self.modules.len());
        for module in self.modules {
            if !seen.insert(module.name.clone()) {
                return Err(SourceError::DuplicateModule(module.name));
            }
            let name = module.name.clone();
            let descriptor = module.into_descriptor().map_err(|source| {
                SourceError::InvalidDescriptor {
                    module: name,
                    source,
                }
            })?;
            descriptors.push(descriptor.boxed());
        }
        Ok(descriptors)
    }
}

/// Source reading a JSON manifest file.
#[derive(Debug, Clone)]
pub struct JsonManifestSource {
    /// Manifest path.
    path: PathBuf,
    /// Maximum manifest size in bytes.
    max_bytes: usize,
}

impl JsonManifestSource {
    /// Creates a source for `path` with the default size limit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_MANIFEST_BYTES,
        }
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Returns the manifest path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DescriptorSource for JsonManifestSource {
    fn load(&self) -> Result<Vec<BoxedDescriptor>, SourceError> {
        let bytes = read_bytes_with_limit(&self.path, self.max_bytes)?;
        DescriptorManifest::from_slice(&bytes)?.into_descriptors()
    }
}

/// Reads a file, failing once it exceeds `max_bytes`.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, SourceError> {
    let io_error = |err: std::io::Error| SourceError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(SourceError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(SourceError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
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

    use super::DescriptorManifest;
    use super::DescriptorSource;
    use super::InMemorySource;
    use super::SourceError;
    use crate::descriptor::DescriptorError;
    use crate::descriptor::ModuleDescriptor;

    #[test]
    fn in_memory_source_hands_out_descriptors_once() -> Result<(), DescriptorError> {
        let source = InMemorySource::new(vec![ModuleDescriptor::builder("app").build()?.boxed()]);
        let first = source.load().map(|descriptors| descriptors.len());
        assert_eq!(first.ok(), Some(1));
        assert!(matches!(source.load(), Err(SourceError::Exhausted)));
        Ok(())
    }

    #[test]
    fn manifest_rejects_unknown_fields() {
        let result = DescriptorManifest::from_slice(br#"{"modules":[{"name":"a","extra":1}]}"#);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn manifest_rejects_non_utf8() {
        let result = DescriptorManifest::from_slice(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(SourceError::Encoding)));
    }

    #[test]
    fn manifest_rejects_duplicate_modules() -> Result<(), SourceError> {
        let manifest =
            DescriptorManifest::from_slice(br#"{"modules":[{"name":"a"},{"name":"a"}]}"#)?;
        let result = manifest.into_descriptors();
        assert!(matches!(result, Err(SourceError::DuplicateModule(name)) if name == "a"));
        Ok(())
    }

    #[test]
    fn manifest_rejects_provision_without_providers() -> Result<(), SourceError> {
        let manifest = DescriptorManifest::from_slice(
            br#"{"modules":[{"name":"a","provides":[{"service":"svc","providers":[]}]}]}"#,
        )?;
        let result = manifest.into_descriptors();
        assert!(matches!(
            result,
            Err(SourceError::InvalidDescriptor {
                source: DescriptorError::EmptyProviders(_),
                ..
            })
        ));
        Ok(())
    }
}
