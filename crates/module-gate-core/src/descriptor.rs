// crates/module-gate-core/src/descriptor.rs
// ============================================================================
// Module: Module Descriptors
// Description: Read-only descriptor model and the view trait consumed by checks.
// Purpose: Represent modules produced by an external resolver without privileged construction.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A module descriptor names a module and lists what it requires, exports,
//! opens, uses, and provides, plus an optional platform target. Checks read
//! descriptors through [`ModuleDescriptorView`] so external sources can hand
//! over their own representations; [`ModuleDescriptor`] is the conformant
//! in-crate implementation, assembled with [`ModuleDescriptorBuilder`].
//!
//! ## Invariants
//! - Collection fields are read-only once a descriptor is built.
//! - A provision always names at least one provider.
//! - Within one descriptor, requires are unique by module name and
//!   exports/opens/provides are unique by package or service name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::collection::CollectionView;
use crate::collection::FrozenList;
use crate::collection::FrozenSet;

// ============================================================================
// SECTION: Modifiers
// ============================================================================

/// Modifiers attached to a module dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiresModifier {
    /// Dependents of the requiring module implicitly read the target.
    Transitive,
    /// Dependency is mandatory at compile time and optional at run time.
    Static,
    /// Dependency was not explicitly declared in source.
    Synthetic,
    /// Dependency was implicitly declared.
    Mandated,
}


/// Modifiers attached to an exported or opened package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageModifier {
    /// Package grant was not explicitly declared in source.
    Synthetic,
    /// Package grant was implicitly declared.
    Mandated,
}


// ============================================================================
// SECTION: Sub-Entity Views
// ============================================================================

/// Read-only access to a module dependency.
pub trait RequirementView: fmt::Debug {
    /// Returns the required module name.
    fn name(&self) -> &str;
    /// Returns the dependency modifiers.
    fn modifiers(&self) -> &dyn CollectionView<RequiresModifier>;
}

/// Read-only access to an exported or opened package.
pub trait PackageGrantView: fmt::Debug {
    /// Returns the package name.
    fn package(&self) -> &str;
    /// Returns the grant modifiers.
    fn modifiers(&self) -> &dyn CollectionView<PackageModifier>;
    /// Returns the qualified target modules; empty for an unqualified grant.
    fn targets(&self) -> &dyn CollectionView<String>;
}

/// Read-only access to a provided service.
pub trait ProvisionView: fmt::Debug {
    /// Returns the service interface name.
    fn service(&self) -> &str;
    /// Returns the providers in declaration order.
    fn providers(&self) -> &dyn CollectionView<String>;
}

/// Shared dependency handle held by descriptor collections.
pub type SharedRequirement = Arc<dyn RequirementView>;
/// Shared export or open handle held by descriptor collections.
pub type SharedPackageGrant = Arc<dyn PackageGrantView>;
/// Shared provision handle held by descriptor collections.
pub type SharedProvision = Arc<dyn ProvisionView>;

// ============================================================================
// SECTION: Sub-Entities
// ============================================================================

/// Dependency on another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Name of the required module.
    name: String,
    /// Dependency modifiers.
    modifiers: FrozenSet<RequiresModifier>,
}

impl Requirement {
    /// Creates a dependency on `name` with the given modifiers.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        modifiers: impl IntoIterator<Item = RequiresModifier>,
    ) -> Self {
        Self {
            name: name.into(),
            modifiers: modifiers.into_iter().collect(),
        }
    }
}

impl RequirementView for Requirement {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> &dyn CollectionView<RequiresModifier> {
        &self.modifiers
    }
}

/// Package exported by a module, optionally to a fixed set of target modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Exported package name.
    package: String,
    /// Export modifiers.
    modifiers: FrozenSet<PackageModifier>,
    /// Target module names; empty for an unqualified export.
    targets: FrozenSet<String>,
}

impl Export {
    /// Creates an export of `package` to `targets` (empty = all modules).
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        modifiers: impl IntoIterator<Item = PackageModifier>,
        targets: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            package: package.into(),
            modifiers: modifiers.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Creates an unqualified export with no modifiers.
    #[must_use]
    pub fn unqualified(package: impl Into<String>) -> Self {
        Self::new(package, [], [])
    }
}

impl PackageGrantView for Export {
    fn package(&self) -> &str {
        &self.package
    }

    fn modifiers(&self) -> &dyn CollectionView<PackageModifier> {
        &self.modifiers
    }

    fn targets(&self) -> &dyn CollectionView<String> {
        &self.targets
    }
}

/// Package opened for deep reflection, optionally to a fixed set of modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Open {
    /// Opened package name.
    package: String,
    /// Open modifiers.
    modifiers: FrozenSet<PackageModifier>,
    /// Target module names; empty for an unqualified open.
    targets: FrozenSet<String>,
}

impl Open {
    /// Creates an open of `package` to `targets` (empty = all modules).
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        modifiers: impl IntoIterator<Item = PackageModifier>,
        targets: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            package: package.into(),
            modifiers: modifiers.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Creates an unqualified open with no modifiers.
    #[must_use]
    pub fn unqualified(package: impl Into<String>) -> Self {
        Self::new(package, [], [])
    }
}

impl PackageGrantView for Open {
    fn package(&self) -> &str {
        &self.package
    }

    fn modifiers(&self) -> &dyn CollectionView<PackageModifier> {
        &self.modifiers
    }

    fn targets(&self) -> &dyn CollectionView<String> {
        &self.targets
    }
}

/// Service implementation provided by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provision {
    /// Service interface name.
    service: String,
    /// Provider class names in declaration order.
    providers: FrozenList<String>,
}

impl Provision {
    /// Creates a provision of `service` by `providers`.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::EmptyProviders`] when no provider is given.
    pub fn new(
        service: impl Into<String>,
        providers: impl IntoIterator<Item = String>,
    ) -> Result<Self, DescriptorError> {
        let service = service.into();
        let providers: FrozenList<String> = providers.into_iter().collect();
        if providers.is_empty() {
            return Err(DescriptorError::EmptyProviders(service));
        }
        Ok(Self {
            service,
            providers,
        })
    }

    /// Creates a provision with exactly one provider.
    #[must_use]
    pub fn single(service: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            providers: std::iter::once(provider.into()).collect(),
        }
    }
}

impl ProvisionView for Provision {
    fn service(&self) -> &str {
        &self.service
    }

    fn providers(&self) -> &dyn CollectionView<String> {
        &self.providers
    }
}

// ============================================================================
// SECTION: Platform Target
// ============================================================================

/// Operating system and architecture recorded for a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformTarget {
    /// Recorded operating system name.
    #[serde(default)]
    pub os_name: Option<String>,
    /// Recorded architecture name.
    #[serde(default)]
    pub os_arch: Option<String>,
}

impl PlatformTarget {
    /// Creates a target with both attributes set.
    #[must_use]
    pub fn new(os_name: impl Into<String>, os_arch: impl Into<String>) -> Self {
        Self {
            os_name: Some(os_name.into()),
            os_arch: Some(os_arch.into()),
        }
    }

    /// Returns true when neither attribute is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.os_name.is_none() && self.os_arch.is_none()
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os_name = self.os_name.as_deref().unwrap_or("<unset>");
        let os_arch = self.os_arch.as_deref().unwrap_or("<unset>");
        write!(f, "os_name={os_name}, os_arch={os_arch}")
    }
}

// ============================================================================
// SECTION: View Trait
// ============================================================================

/// Read-only access to a module descriptor.
///
/// Every collection accessor returns a [`CollectionView`]; conformant
/// implementations reject all mutation through it. Nested entities are
/// handed out as shared views so their own collections are reachable too.
pub trait ModuleDescriptorView {
    /// Returns the module name.
    fn name(&self) -> &str;
    /// Returns the packages contained in the module.
    fn packages(&self) -> &dyn CollectionView<String>;
    /// Returns the module dependencies.
    fn requires(&self) -> &dyn CollectionView<SharedRequirement>;
    /// Returns the exported packages.
    fn exports(&self) -> &dyn CollectionView<SharedPackageGrant>;
    /// Returns the opened packages.
    fn opens(&self) -> &dyn CollectionView<SharedPackageGrant>;
    /// Returns the service types the module consumes.
    fn uses(&self) -> &dyn CollectionView<String>;
    /// Returns the service implementations the module provides.
    fn provides(&self) -> &dyn CollectionView<SharedProvision>;
    /// Returns the recorded platform target, if any.
    fn target(&self) -> Option<&PlatformTarget>;
}

/// Owned descriptor handle produced by descriptor sources.
pub type BoxedDescriptor = Box<dyn ModuleDescriptorView>;

// ============================================================================
// SECTION: Module Descriptor
// ============================================================================

/// Conformant, immutable module descriptor.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Module name.
    name: String,
    /// Contained packages.
    packages: FrozenSet<String>,
    /// Module dependencies, ordered by module name.
    requires: FrozenList<SharedRequirement>,
    /// Exported packages, ordered by package name.
    exports: FrozenList<SharedPackageGrant>,
    /// Opened packages, ordered by package name.
    opens: FrozenList<SharedPackageGrant>,
    /// Consumed service types.
    uses: FrozenSet<String>,
    /// Provided service implementations, ordered by service name.
    provides: FrozenList<SharedProvision>,
    /// Recorded platform target.
    target: Option<PlatformTarget>,
}

impl ModuleDescriptor {
    /// Starts building a descriptor for `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(name)
    }

    /// Boxes the descriptor as a view.
    #[must_use]
    pub fn boxed(self) -> BoxedDescriptor {
        Box::new(self)
    }
}

impl ModuleDescriptorView for ModuleDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn packages(&self) -> &dyn CollectionView<String> {
        &self.packages
    }

    fn requires(&self) -> &dyn CollectionView<SharedRequirement> {
        &self.requires
    }

    fn exports(&self) -> &dyn CollectionView<SharedPackageGrant> {
        &self.exports
    }

    fn opens(&self) -> &dyn CollectionView<SharedPackageGrant> {
        &self.opens
    }

    fn uses(&self) -> &dyn CollectionView<String> {
        &self.uses
    }

    fn provides(&self) -> &dyn CollectionView<SharedProvision> {
        &self.provides
    }

    fn target(&self) -> Option<&PlatformTarget> {
        self.target.as_ref()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`ModuleDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct ModuleDescriptorBuilder {
    /// Module name.
    name: String,
    /// Contained packages.
    packages: BTreeSet<String>,
    /// Module dependencies in declaration order.
    requires: Vec<Requirement>,
    /// Exported packages in declaration order.
    exports: Vec<Export>,
    /// Opened packages in declaration order.
    opens: Vec<Open>,
    /// Consumed service types.
    uses: BTreeSet<String>,
    /// Provided services in declaration order.
    provides: Vec<Provision>,
    /// Recorded platform target.
    target: Option<PlatformTarget>,
}

impl ModuleDescriptorBuilder {
    /// Creates a builder for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a contained package.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.packages.insert(package.into());
        self
    }

    /// Adds a module dependency.
    #[must_use]
    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    /// Adds an exported package; the package is also recorded as contained.
    #[must_use]
    pub fn export(mut self, export: Export) -> Self {
        self.packages.insert(export.package.clone());
        self.exports.push(export);
        self
    }

    /// Adds an opened package; the package is also recorded as contained.
    #[must_use]
    pub fn open(mut self, open: Open) -> Self {
        self.packages.insert(open.package.clone());
        self.opens.push(open);
        self
    }

    /// Adds a consumed service type.
    #[must_use]
    pub fn uses(mut self, service: impl Into<String>) -> Self {
        self.uses.insert(service.into());
        self
    }

    /// Adds a provided service.
    #[must_use]
    pub fn provides(mut self, provision: Provision) -> Self {
        self.provides.push(provision);
        self
    }

    /// Records the platform target.
    #[must_use]
    pub fn target(mut self, target: PlatformTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Finalizes the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the name is blank or an entry is
    /// declared twice.
    pub fn build(self) -> Result<ModuleDescriptor, DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        ensure_unique(
            self.requires.iter().map(Requirement::name),
            DescriptorError::DuplicateRequires,
        )?;
        ensure_unique(self.exports.iter().map(Export::package), DescriptorError::DuplicateExport)?;
        ensure_unique(self.opens.iter().map(Open::package), DescriptorError::DuplicateOpen)?;
        ensure_unique(
            self.provides.iter().map(Provision::service),
            DescriptorError::DuplicateProvides,
        )?;
        Ok(ModuleDescriptor {
            name: self.name,
            packages: self.packages.into_iter().collect(),
            requires: share_sorted(self.requires, Requirement::name, |requirement| {
                Arc::new(requirement) as SharedRequirement
            }),
            exports: share_sorted(self.exports, Export::package, |export| {
                Arc::new(export) as SharedPackageGrant
            }),
            opens: share_sorted(self.opens, Open::package, |open| {
                Arc::new(open) as SharedPackageGrant
            }),
            uses: self.uses.into_iter().collect(),
            provides: share_sorted(self.provides, Provision::service, |provision| {
                Arc::new(provision) as SharedProvision
            }),
            target: self.target,
        })
    }
}

/// Orders `items` by `key` and wraps each in a shared view.
fn share_sorted<T, S: ?Sized>(
    mut items: Vec<T>,
    key: fn(&T) -> &str,
    share: impl Fn(T) -> Arc<S>,
) -> FrozenList<Arc<S>> {
    items.sort_by(|left, right| key(left).cmp(key(right)));
    items.into_iter().map(share).collect()
}

/// Fails with `error(key)` for the first key seen twice.
fn ensure_unique<'a>(
    keys: impl Iterator<Item = &'a str>,
    error: fn(String) -> DescriptorError,
) -> Result<(), DescriptorError> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(error(key.to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Descriptor construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Module name is empty or whitespace.
    #[error("module name must be non-empty")]
    EmptyName,
    /// A module is required more than once.
    #[error("duplicate requires entry: {0}")]
    DuplicateRequires(String),
    /// A package is exported more than once.
    #[error("duplicate exports entry: {0}")]
    DuplicateExport(String),
    /// A package is opened more than once.
    #[error("duplicate opens entry: {0}")]
    DuplicateOpen(String),
    /// A service is provided more than once.
    #[error("duplicate provides entry: {0}")]
    DuplicateProvides(String),
    /// A provision names no providers.
    #[error("provision of {0} must name at least one provider")]
    EmptyProviders(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
