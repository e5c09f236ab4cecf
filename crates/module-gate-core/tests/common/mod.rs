// crates/module-gate-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared descriptor fixtures and non-conformant test doubles.
// Purpose: Reduce duplication across module-gate-core integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;

use module_gate_core::BoxedDescriptor;
use module_gate_core::CollectionView;
use module_gate_core::DescriptorError;
use module_gate_core::Export;
use module_gate_core::HostPlatform;
use module_gate_core::ModuleDescriptor;
use module_gate_core::ModuleDescriptorView;
use module_gate_core::MutationError;
use module_gate_core::PlatformTarget;
use module_gate_core::PackageGrantView;
use module_gate_core::PackageModifier;
use module_gate_core::Requirement;
use module_gate_core::RequirementView;
use module_gate_core::RequiresModifier;
use module_gate_core::SharedPackageGrant;
use module_gate_core::SharedProvision;
use module_gate_core::SharedRequirement;
use module_gate_core::Validator;
use module_gate_core::ValidatorSettings;

/// Returns a validator for the given host with default settings.
pub fn validator_for(os_name: &str, os_arch: &str) -> Validator {
    Validator::new(ValidatorSettings::new(HostPlatform::new(os_name, os_arch)))
}

/// Builds the base module recording the given platform.
pub fn base_module(os_name: &str, os_arch: &str) -> Result<BoxedDescriptor, DescriptorError> {
    let descriptor = ModuleDescriptor::builder("java.base")
        .export(Export::unqualified("java.lang"))
        .export(Export::unqualified("java.util"))
        .uses("java.nio.file.spi.FileSystemProvider")
        .target(PlatformTarget::new(os_name, os_arch))
        .build()?;
    Ok(descriptor.boxed())
}

/// Builds a dependent module with no platform target.
pub fn dependent_module(name: &str) -> Result<BoxedDescriptor, DescriptorError> {
    let descriptor = ModuleDescriptor::builder(name)
        .requires(Requirement::new("java.base", [RequiresModifier::Mandated]))
        .export(Export::unqualified(format!("{name}.api")))
        .build()?;
    Ok(descriptor.boxed())
}

/// How a test double collection answers insert attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertBehavior {
    /// Reject with the read-only error.
    Reject,
    /// Report success.
    Accept,
    /// Reject with an unrelated error.
    Fail,
}

/// Collection view whose insert behavior is chosen by the test.
#[derive(Debug)]
pub struct DoubleView<T> {
    items: Vec<T>,
    behavior: InsertBehavior,
}

impl<T> DoubleView<T> {
    pub fn new(items: Vec<T>, behavior: InsertBehavior) -> Self {
        Self { items, behavior }
    }
}

impl<T> CollectionView<T> for DoubleView<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }

    fn try_insert(&self, _value: T) -> Result<(), MutationError> {
        match self.behavior {
            InsertBehavior::Reject => Err(MutationError::Unsupported),
            InsertBehavior::Accept => Ok(()),
            InsertBehavior::Fail => Err(MutationError::Failed("capacity exceeded".to_string())),
        }
    }
}

/// Requirement built from a test double view.
#[derive(Debug)]
pub struct DoubleRequirement {
    pub name: String,
    pub modifiers: DoubleView<RequiresModifier>,
}

impl DoubleRequirement {
    /// Creates a shared requirement whose modifiers use `behavior`.
    pub fn shared(name: &str, behavior: InsertBehavior) -> SharedRequirement {
        Arc::new(Self {
            name: name.to_string(),
            modifiers: DoubleView::new(Vec::new(), behavior),
        })
    }
}

impl RequirementView for DoubleRequirement {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> &dyn CollectionView<RequiresModifier> {
        &self.modifiers
    }
}

/// Export or open built from test double views.
#[derive(Debug)]
pub struct DoublePackageGrant {
    pub package: String,
    pub modifiers: DoubleView<PackageModifier>,
    pub targets: DoubleView<String>,
}

impl DoublePackageGrant {
    /// Creates a shared grant with separate modifier and target behavior.
    pub fn shared(
        package: &str,
        modifiers: InsertBehavior,
        targets: InsertBehavior,
    ) -> SharedPackageGrant {
        Arc::new(Self {
            package: package.to_string(),
            modifiers: DoubleView::new(Vec::new(), modifiers),
            targets: DoubleView::new(vec!["app.client".to_string()], targets),
        })
    }
}

impl PackageGrantView for DoublePackageGrant {
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

/// Descriptor built from test double views.
pub struct DoubleDescriptor {
    pub name: String,
    pub packages: DoubleView<String>,
    pub requires: DoubleView<SharedRequirement>,
    pub exports: DoubleView<SharedPackageGrant>,
    pub opens: DoubleView<SharedPackageGrant>,
    pub uses: DoubleView<String>,
    pub provides: DoubleView<SharedProvision>,
    pub target: Option<PlatformTarget>,
}

impl DoubleDescriptor {
    /// Creates a descriptor whose every collection uses `behavior`.
    pub fn uniform(name: &str, behavior: InsertBehavior) -> Self {
        let requirement: SharedRequirement = Arc::new(Requirement::new("java.base", []));
        Self {
            name: name.to_string(),
            packages: DoubleView::new(vec![format!("{name}.internal")], behavior),
            requires: DoubleView::new(vec![requirement], behavior),
            exports: DoubleView::new(Vec::new(), behavior),
            opens: DoubleView::new(Vec::new(), behavior),
            uses: DoubleView::new(Vec::new(), behavior),
            provides: DoubleView::new(Vec::new(), behavior),
            target: None,
        }
    }

    pub fn boxed(self) -> BoxedDescriptor {
        Box::new(self)
    }
}

impl ModuleDescriptorView for DoubleDescriptor {
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
