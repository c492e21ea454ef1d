// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher database — the declaration layer.
//!
//! Holds unit descriptors plus four bidirectional relationship indexes
//! (`after`, `before`, `binds_to`, `conflicts`). Carries no lifecycle
//! state of its own; [`crate::runtime::Supervisor`] owns that.

use crate::error::DatabaseError;
use crate::shutdown;
use crate::descriptor::UnitDescriptor;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use superv_core::{MissingDescriptorData, NameInUse, UnitName};

#[derive(Default)]
struct RelationIndex {
    forward: HashMap<UnitName, HashSet<UnitName>>,
    inverse: HashMap<UnitName, HashSet<UnitName>>,
}

impl RelationIndex {
    fn insert(&mut self, from: &UnitName, to_set: &HashSet<UnitName>) {
        self.forward.insert(from.clone(), to_set.clone());
        for to in to_set {
            self.inverse.entry(to.clone()).or_default().insert(from.clone());
        }
    }

    /// Remove `from`'s forward entry and purge the now-stale inverse
    /// references, dropping any inverse key whose set drains to empty.
    fn remove(&mut self, from: &str) {
        let Some(to_set) = self.forward.remove(from) else { return };
        for to in &to_set {
            if let Some(inverse) = self.inverse.get_mut(to) {
                inverse.remove(from);
                if inverse.is_empty() {
                    self.inverse.remove(to);
                }
            }
        }
    }

    fn forward_of(&self, name: &str) -> HashSet<UnitName> {
        self.forward.get(name).cloned().unwrap_or_default()
    }

    fn inverse_of(&self, name: &str) -> HashSet<UnitName> {
        self.inverse.get(name).cloned().unwrap_or_default()
    }
}

/// Declarative store of unit descriptors and their relationship indexes.
pub struct LauncherDatabase {
    descriptors: HashMap<UnitName, Arc<UnitDescriptor>>,
    after: RelationIndex,
    before: RelationIndex,
    binds_to: RelationIndex,
    conflicts: RelationIndex,
}

impl Default for LauncherDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl LauncherDatabase {
    /// A fresh database with `shutdown.target` pre-registered eagerly,
    /// rather than lazily on first reference.
    pub fn new() -> Self {
        let mut database = Self {
            descriptors: HashMap::new(),
            after: RelationIndex::default(),
            before: RelationIndex::default(),
            binds_to: RelationIndex::default(),
            conflicts: RelationIndex::default(),
        };
        database
            .add(shutdown::descriptor())
            .expect("shutdown target descriptor is always well-formed");
        database
    }

    /// Register a new unit. Populates relationship defaults and, when
    /// `default_dependencies` is set, adds `shutdown.target` to both
    /// `before` and `conflicts`.
    pub fn add(&mut self, mut descriptor: UnitDescriptor) -> Result<(), DatabaseError> {
        if self.descriptors.contains_key(&descriptor.name) {
            return Err(NameInUse(descriptor.name.clone()).into());
        }
        if descriptor.exec_start.is_empty() {
            return Err(MissingDescriptorData(descriptor.name.clone()).into());
        }
        if descriptor.default_dependencies {
            descriptor.before.insert(UnitName::from(shutdown::TARGET));
            descriptor.conflicts.insert(UnitName::from(shutdown::TARGET));
        }

        let name = descriptor.name.clone();
        self.after.insert(&name, &descriptor.after);
        self.before.insert(&name, &descriptor.before);
        self.binds_to.insert(&name, &descriptor.binds_to);
        self.conflicts.insert(&name, &descriptor.conflicts);
        self.descriptors.insert(name, Arc::new(descriptor));
        Ok(())
    }

    /// Idempotent: removing an absent name is a no-op.
    pub fn remove(&mut self, name: &str) {
        if self.descriptors.remove(name).is_some() {
            self.after.remove(name);
            self.before.remove(name);
            self.binds_to.remove(name);
            self.conflicts.remove(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<UnitDescriptor>> {
        self.descriptors.get(name).cloned()
    }

    /// Units referencing `name` are not checked against this database —
    /// a relation may name a unit that isn't registered yet; unknown
    /// names simply yield an empty set here.
    pub fn after_of(&self, name: &str) -> HashSet<UnitName> {
        self.after.forward_of(name)
    }

    pub fn after_inverse_of(&self, name: &str) -> HashSet<UnitName> {
        self.after.inverse_of(name)
    }

    pub fn before_of(&self, name: &str) -> HashSet<UnitName> {
        self.before.forward_of(name)
    }

    pub fn before_inverse_of(&self, name: &str) -> HashSet<UnitName> {
        self.before.inverse_of(name)
    }

    pub fn binds_to_of(&self, name: &str) -> HashSet<UnitName> {
        self.binds_to.forward_of(name)
    }

    pub fn binds_to_inverse_of(&self, name: &str) -> HashSet<UnitName> {
        self.binds_to.inverse_of(name)
    }

    pub fn conflicts_of(&self, name: &str) -> HashSet<UnitName> {
        self.conflicts.forward_of(name)
    }

    pub fn conflicts_inverse_of(&self, name: &str) -> HashSet<UnitName> {
        self.conflicts.inverse_of(name)
    }
}

#[cfg(test)]
#[path = "database_tests.rs"]
mod tests;
