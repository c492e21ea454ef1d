// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit descriptor — the immutable declaration half of a unit.

use futures::future::BoxFuture;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use superv_core::UnitName;

/// One of the four activation semantics a unit can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitType {
    Simple,
    Exec,
    Forking,
    Capability,
}

superv_core::simple_display! {
    UnitType {
        Simple => "simple",
        Exec => "exec",
        Forking => "forking",
        Capability => "capability",
    }
}

/// Error produced by an `exec_start`/`exec_stop` routine.
///
/// Wraps the caller's own error as a string — this crate doesn't know what
/// error types a unit's routines produce, only that they must propagate to
/// the start handle's awaiter (for `exec_start`) or be logged and ignored
/// (for `exec_stop`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ExecError(pub String);

impl ExecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Outcome of one `exec_start` routine call.
///
/// Only a `Forking` unit's *last* routine is expected to return
/// `RoutineOutcome::Forked`, handing back the task-like handle the
/// readiness gate then adopts as `main`. Every other routine, and every
/// routine of every other unit type, returns `RoutineOutcome::None`.
pub enum RoutineOutcome {
    None,
    Forked(tokio::task::JoinHandle<()>),
}

/// A nullary async routine invoked as part of `exec_start`.
pub type StartRoutine =
    Arc<dyn Fn() -> BoxFuture<'static, Result<RoutineOutcome, ExecError>> + Send + Sync>;

/// A nullary async routine invoked as part of `exec_stop`.
pub type StopRoutine = Arc<dyn Fn() -> BoxFuture<'static, Result<(), ExecError>> + Send + Sync>;

/// Immutable unit declaration.
#[derive(Clone)]
pub struct UnitDescriptor {
    pub name: UnitName,
    pub exec_start: Vec<StartRoutine>,
    pub exec_stop: Vec<StopRoutine>,
    pub unit_type: UnitType,
    pub capability_name: Option<String>,
    pub after: HashSet<UnitName>,
    pub before: HashSet<UnitName>,
    pub binds_to: HashSet<UnitName>,
    pub conflicts: HashSet<UnitName>,
    pub default_dependencies: bool,
}

impl fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("name", &self.name)
            .field("unit_type", &self.unit_type)
            .field("capability_name", &self.capability_name)
            .field("after", &self.after)
            .field("before", &self.before)
            .field("binds_to", &self.binds_to)
            .field("conflicts", &self.conflicts)
            .field("default_dependencies", &self.default_dependencies)
            .field("exec_start", &self.exec_start.len())
            .field("exec_stop", &self.exec_stop.len())
            .finish()
    }
}

/// Builds a [`UnitDescriptor`], applying its defaults: empty relation
/// sets, `default_dependencies = true`, and `UnitType::Capability`
/// inferred iff `capability_name` is non-empty and no explicit type was
/// set.
pub struct UnitDescriptorBuilder {
    name: UnitName,
    exec_start: Vec<StartRoutine>,
    exec_stop: Vec<StopRoutine>,
    unit_type: Option<UnitType>,
    capability_name: Option<String>,
    after: HashSet<UnitName>,
    before: HashSet<UnitName>,
    binds_to: HashSet<UnitName>,
    conflicts: HashSet<UnitName>,
    default_dependencies: bool,
}

impl UnitDescriptorBuilder {
    pub fn new(name: impl Into<UnitName>) -> Self {
        Self {
            name: name.into(),
            exec_start: Vec::new(),
            exec_stop: Vec::new(),
            unit_type: None,
            capability_name: None,
            after: HashSet::new(),
            before: HashSet::new(),
            binds_to: HashSet::new(),
            conflicts: HashSet::new(),
            default_dependencies: true,
        }
    }

    pub fn exec_start(mut self, routine: StartRoutine) -> Self {
        self.exec_start.push(routine);
        self
    }

    pub fn exec_stop(mut self, routine: StopRoutine) -> Self {
        self.exec_stop.push(routine);
        self
    }

    pub fn unit_type(mut self, unit_type: UnitType) -> Self {
        self.unit_type = Some(unit_type);
        self
    }

    pub fn capability_name(mut self, name: impl Into<String>) -> Self {
        self.capability_name = Some(name.into());
        self
    }

    pub fn after(mut self, name: impl Into<UnitName>) -> Self {
        self.after.insert(name.into());
        self
    }

    pub fn before(mut self, name: impl Into<UnitName>) -> Self {
        self.before.insert(name.into());
        self
    }

    pub fn binds_to(mut self, name: impl Into<UnitName>) -> Self {
        self.binds_to.insert(name.into());
        self
    }

    pub fn conflicts(mut self, name: impl Into<UnitName>) -> Self {
        self.conflicts.insert(name.into());
        self
    }

    pub fn default_dependencies(mut self, value: bool) -> Self {
        self.default_dependencies = value;
        self
    }

    /// Build the descriptor. Does *not* reject a missing `exec_start` —
    /// that validation is `LauncherDatabase::add`'s job, so it reports
    /// `MissingDescriptorData` naming the unit rather than the builder
    /// panicking or returning an unlabelled `None`.
    pub fn build(self) -> UnitDescriptor {
        let unit_type = self.unit_type.unwrap_or_else(|| {
            if self.capability_name.as_deref().is_some_and(|n| !n.is_empty()) {
                UnitType::Capability
            } else {
                UnitType::Simple
            }
        });
        UnitDescriptor {
            name: self.name,
            exec_start: self.exec_start,
            exec_stop: self.exec_stop,
            unit_type,
            capability_name: self.capability_name,
            after: self.after,
            before: self.before,
            binds_to: self.binds_to,
            conflicts: self.conflicts,
            default_dependencies: self.default_dependencies,
        }
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
