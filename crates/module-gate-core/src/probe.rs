// crates/module-gate-core/src/probe.rs
// ============================================================================
// Module: Immutability Prober
// Description: Table-driven mutation probes over descriptor collections.
// Purpose: Confirm every collection field rejects mutation with the read-only error.
// Dependencies: crate::{collection, descriptor, violation}
// ============================================================================

//! ## Overview
//! Each entity type has a static table of [`FieldProbe`] rows: a field name
//! and a function that attempts one representative insert of a dummy element
//! through the field's [`CollectionView`]. A single generic loop runs the
//! rows, so a field added to a table is covered without further code.
//!
//! Nested entities (requires, exports, opens, provides) are walked by
//! [`NestedProbe`] rows that apply the entity's own table to every element,
//! reached through its view trait. Each is reported as
//! `<module>/<field>[<key>]`.
//!
//! ## Invariants
//! - Every row is attempted exactly once per entity.
//! - Only [`MutationError::Unsupported`] counts as a pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::collection::CollectionView;
use crate::collection::MutationError;
use crate::descriptor::Export;
use crate::descriptor::ModuleDescriptorView;
use crate::descriptor::Open;
use crate::descriptor::PackageGrantView;
use crate::descriptor::PackageModifier;
use crate::descriptor::Provision;
use crate::descriptor::ProvisionView;
use crate::descriptor::Requirement;
use crate::descriptor::RequirementView;
use crate::descriptor::RequiresModifier;
use crate::violation::EXPECTED_MUTATION_OUTCOME;
use crate::violation::MUTATION_ACCEPTED;
use crate::violation::Violation;
use crate::violation::ViolationCategory;

// ============================================================================
// SECTION: Probe Tables
// ============================================================================

/// One collection field of entity type `E` and its representative insert.
pub struct FieldProbe<E: ?Sized> {
    /// Field name reported in violations.
    pub field: &'static str,
    /// Attempts to insert a dummy element into the field.
    pub insert: fn(&E) -> Result<(), MutationError>,
}

/// One nested collection whose elements carry their own probe table.
pub struct NestedProbe {
    /// Field name holding the nested entities.
    pub field: &'static str,
    /// Applies the nested entity table to every element of the field.
    pub visit: fn(&(dyn ModuleDescriptorView + 'static), &'static str, &mut ProbeRun<'_>),
}

/// Descriptor-level collection fields.
pub const DESCRIPTOR_PROBES: &[FieldProbe<dyn ModuleDescriptorView>] = &[
    FieldProbe {
        field: "packages",
        insert: |descriptor| descriptor.packages().try_insert("package".to_string()),
    },
    FieldProbe {
        field: "requires",
        insert: |descriptor| {
            let dummy = Requirement::new("require", [RequiresModifier::Transitive]);
            descriptor.requires().try_insert(Arc::new(dummy))
        },
    },
    FieldProbe {
        field: "exports",
        insert: |descriptor| {
            descriptor.exports().try_insert(Arc::new(Export::unqualified("export")))
        },
    },
    FieldProbe {
        field: "opens",
        insert: |descriptor| descriptor.opens().try_insert(Arc::new(Open::unqualified("open"))),
    },
    FieldProbe {
        field: "uses",
        insert: |descriptor| descriptor.uses().try_insert("use".to_string()),
    },
    FieldProbe {
        field: "provides",
        insert: |descriptor| {
            descriptor.provides().try_insert(Arc::new(Provision::single("provide", "provide")))
        },
    },
];

/// Requirement collection fields.
pub const REQUIREMENT_PROBES: &[FieldProbe<dyn RequirementView>] = &[FieldProbe {
    field: "modifiers",
    insert: |requirement| requirement.modifiers().try_insert(RequiresModifier::Transitive),
}];

/// Export and open collection fields.
pub const PACKAGE_GRANT_PROBES: &[FieldProbe<dyn PackageGrantView>] = &[
    FieldProbe {
        field: "modifiers",
        insert: |grant| grant.modifiers().try_insert(PackageModifier::Synthetic),
    },
    FieldProbe {
        field: "targets",
        insert: |grant| grant.targets().try_insert("target".to_string()),
    },
];

/// Provision collection fields.
pub const PROVISION_PROBES: &[FieldProbe<dyn ProvisionView>] = &[FieldProbe {
    field: "providers",
    insert: |provision| provision.providers().try_insert("provide".to_string()),
}];

/// Nested entity collections walked element by element.
pub const NESTED_PROBES: &[NestedProbe] = &[
    NestedProbe {
        field: "requires",
        visit: |descriptor, field, run| {
            run.probe_each(
                descriptor.name(),
                field,
                descriptor.requires(),
                requirement_key,
                REQUIREMENT_PROBES,
            );
        },
    },
    NestedProbe {
        field: "exports",
        visit: |descriptor, field, run| {
            run.probe_each(
                descriptor.name(),
                field,
                descriptor.exports(),
                package_grant_key,
                PACKAGE_GRANT_PROBES,
            );
        },
    },
    NestedProbe {
        field: "opens",
        visit: |descriptor, field, run| {
            run.probe_each(
                descriptor.name(),
                field,
                descriptor.opens(),
                package_grant_key,
                PACKAGE_GRANT_PROBES,
            );
        },
    },
    NestedProbe {
        field: "provides",
        visit: |descriptor, field, run| {
            run.probe_each(
                descriptor.name(),
                field,
                descriptor.provides(),
                provision_key,
                PROVISION_PROBES,
            );
        },
    },
];

/// Identifies a requirement by its module name.
fn requirement_key<'a>(requirement: &'a (dyn RequirementView + 'static)) -> &'a str {
    requirement.name()
}

/// Identifies an export or open by its package.
fn package_grant_key<'a>(grant: &'a (dyn PackageGrantView + 'static)) -> &'a str {
    grant.package()
}

/// Identifies a provision by its service.
fn provision_key<'a>(provision: &'a (dyn ProvisionView + 'static)) -> &'a str {
    provision.service()
}

// ============================================================================
// SECTION: Probe Run
// ============================================================================

/// Accumulates probe outcomes for one or more descriptors.
pub struct ProbeRun<'a> {
    /// Destination for violations.
    violations: &'a mut Vec<Violation>,
    /// Number of fields probed so far.
    fields_probed: usize,
}

impl<'a> ProbeRun<'a> {
    /// Creates a run appending to `violations`.
    pub fn new(violations: &'a mut Vec<Violation>) -> Self {
        Self {
            violations,
            fields_probed: 0,
        }
    }

    /// Returns the number of fields probed.
    #[must_use]
    pub const fn fields_probed(&self) -> usize {
        self.fields_probed
    }

    /// Probes every descriptor-level and nested collection of `descriptor`.
    pub fn probe_descriptor(&mut self, descriptor: &(dyn ModuleDescriptorView + 'static)) {
        self.probe_entity(descriptor, descriptor.name(), DESCRIPTOR_PROBES);
        for nested in NESTED_PROBES {
            (nested.visit)(descriptor, nested.field, self);
        }
    }

    /// Applies `table` to one entity identified by `entity`.
    pub fn probe_entity<E: ?Sized>(
        &mut self,
        entity: &E,
        entity_id: &str,
        table: &[FieldProbe<E>],
    ) {
        for row in table {
            let outcome = (row.insert)(entity);
            self.record(entity_id, row.field, outcome);
        }
    }

    /// Applies `table` to every element of a nested collection.
    pub fn probe_each<E: ?Sized>(
        &mut self,
        module: &str,
        field: &str,
        items: &dyn CollectionView<Arc<E>>,
        key: fn(&E) -> &str,
        table: &[FieldProbe<E>],
    ) {
        for item in items.iter() {
            let entity: &E = item;
            let entity_id = format!("{module}/{field}[{}]", key(entity));
            self.probe_entity(entity, &entity_id, table);
        }
    }

    /// Classifies one probe outcome.
    fn record(&mut self, entity: &str, field: &str, outcome: Result<(), MutationError>) {
        self.fields_probed += 1;
        let violation = match outcome {
            Err(MutationError::Unsupported) => return,
            Ok(()) => Violation::new(
                ViolationCategory::MutationSucceeded,
                entity,
                Some(field),
                EXPECTED_MUTATION_OUTCOME,
                MUTATION_ACCEPTED,
            ),
            Err(other) => Violation::new(
                ViolationCategory::MutationWrongErrorKind,
                entity,
                Some(field),
                EXPECTED_MUTATION_OUTCOME,
                other.to_string(),
            ),
        };
        self.violations.push(violation);
    }
}

/// Probes one descriptor and returns the number of fields probed.
pub fn probe_descriptor(
    descriptor: &(dyn ModuleDescriptorView + 'static),
    violations: &mut Vec<Violation>,
) -> usize {
    let mut run = ProbeRun::new(violations);
    run.probe_descriptor(descriptor);
    run.fields_probed()
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

    use super::DESCRIPTOR_PROBES;
    use super::probe_descriptor;
    use crate::descriptor::DescriptorError;
    use crate::descriptor::Export;
    use crate::descriptor::ModuleDescriptor;
    use crate::descriptor::PackageModifier;
    use crate::descriptor::Provision;
    use crate::descriptor::Requirement;
    use crate::descriptor::RequiresModifier;

    #[test]
    fn conformant_descriptor_passes_every_probe() -> Result<(), DescriptorError> {
        let descriptor = ModuleDescriptor::builder("app")
            .requires(Requirement::new("java.base", [RequiresModifier::Mandated]))
            .requires(Requirement::new("lib", [RequiresModifier::Transitive]))
            .export(Export::new("app.api", [PackageModifier::Synthetic], ["lib".to_string()]))
            .provides(Provision::new("svc.Api", ["app.Impl".to_string(), "app.Alt".to_string()])?)
            .uses("svc.Other")
            .build()?;
        let mut violations = Vec::new();
        let probed = probe_descriptor(&descriptor, &mut violations);
        assert!(violations.is_empty(), "unexpected violations: {violations:?}");
        // six descriptor fields, one per requirement, two per export, one per provision
        assert_eq!(probed, DESCRIPTOR_PROBES.len() + 2 + 2 + 1);
        Ok(())
    }
}
