// crates/module-gate-core/src/lib.rs
// ============================================================================
// Module: Module Gate Core Library
// Description: Descriptor model, platform rules, and the descriptor validator.
// Purpose: Verify that the module descriptors of an image are self-consistent.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `module-gate-core` checks a complete set of module descriptors produced by
//! a build pipeline. It confirms that the base module records the running
//! host's platform, that no other module records one, that modules outside an
//! allow-list contain packages, and that every collection exposed by a
//! descriptor refuses mutation with the read-only error.
//!
//! Findings are gathered into a [`ValidationReport`]; the run never stops at
//! the first violation.
//!
//! Security posture: descriptor manifests are untrusted input and are read
//! with hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod attributes;
pub mod audit;
pub mod collection;
pub mod descriptor;
pub mod platform;
pub mod probe;
pub mod source;
pub mod validator;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attributes::AttributeChecker;
pub use audit::CheckAuditEvent;
pub use audit::CheckOutcome;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditSink;
pub use audit::ViolationAuditEvent;
pub use collection::CollectionView;
pub use collection::FrozenList;
pub use collection::FrozenSet;
pub use collection::MutationError;
pub use descriptor::BoxedDescriptor;
pub use descriptor::DescriptorError;
pub use descriptor::Export;
pub use descriptor::ModuleDescriptor;
pub use descriptor::ModuleDescriptorBuilder;
pub use descriptor::ModuleDescriptorView;
pub use descriptor::Open;
pub use descriptor::PackageGrantView;
pub use descriptor::PackageModifier;
pub use descriptor::PlatformTarget;
pub use descriptor::Provision;
pub use descriptor::ProvisionView;
pub use descriptor::Requirement;
pub use descriptor::RequirementView;
pub use descriptor::RequiresModifier;
pub use descriptor::SharedPackageGrant;
pub use descriptor::SharedProvision;
pub use descriptor::SharedRequirement;
pub use platform::ArchAlias;
pub use platform::AttributeMismatch;
pub use platform::HostPlatform;
pub use platform::PLATFORM_RULES_VERSION;
pub use platform::PlatformAttribute;
pub use platform::PlatformRules;
pub use probe::probe_descriptor;
pub use source::DescriptorManifest;
pub use source::DescriptorSource;
pub use source::InMemorySource;
pub use source::JsonManifestSource;
pub use source::SourceError;
pub use validator::DEFAULT_BASE_MODULE;
pub use validator::ValidationError;
pub use validator::Validator;
pub use validator::ValidatorSettings;
pub use violation::ValidationReport;
pub use violation::Violation;
pub use violation::ViolationCategory;
pub use violation::ViolationList;
