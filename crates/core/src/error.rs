// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The leaf error types shared across the workspace.
//!
//! Each is a small, independently matchable type rather than one big enum,
//! so callers that only care about one failure mode don't have to match
//! on variants that can't occur for the operation they called.

use crate::unit_name::UnitName;
use thiserror::Error;

/// `add` was called with a name already present in the database.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unit name already in use: {0}")]
pub struct NameInUse(pub UnitName);

/// `add` was called with a descriptor that has no `exec_start` routines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("descriptor for {0} is missing exec_start")]
pub struct MissingDescriptorData(pub UnitName);

/// A `Type.CAPABILITY` unit's event bus ended before its key was `SET`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("capability `{capability_name}` was never set before unit `{unit}` gave up waiting")]
pub struct CapabilityNotSet {
    pub unit: UnitName,
    pub capability_name: String,
}

/// `provide` collided with an already-present, differing value for the key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("capability already enabled")]
pub struct AlreadyEnabled;

/// A `CancellableQueue` operation was attempted after (or observed) close.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("queue is closed")]
pub struct Closed;

/// A `PubSubQueue` view advanced past the terminal `End` node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("end of pub/sub stream reached")]
pub struct EndReached;
