// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the launcher database and supervisor.

use crate::descriptor::ExecError;
use superv_core::{CapabilityNotSet, MissingDescriptorData, NameInUse, UnitName};
use thiserror::Error;

/// Errors from [`crate::database::LauncherDatabase::add`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    #[error(transparent)]
    NameInUse(#[from] NameInUse),
    #[error(transparent)]
    MissingDescriptorData(#[from] MissingDescriptorData),
}

/// Errors from [`crate::runtime::Supervisor::start`]/`stop`/`remove`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    CapabilityNotSet(#[from] CapabilityNotSet),
    /// `exec_start` raised; the start handle fails with this and any
    /// partial `main` is cancelled.
    #[error("exec_start failed: {0}")]
    ExecStart(#[from] ExecError),
    /// The runner task or a routine's spawned task was lost (panicked, or
    /// the runtime was shut down) rather than completing or being
    /// cancelled cleanly.
    #[error("unit task ended abnormally: {0}")]
    TaskFailure(String),
    /// `remove_nowait` was called on a unit that is still running — the
    /// caller must `stop` it first, or call `remove` instead.
    #[error("unit `{0}` is running and must be stopped before removal")]
    StillRunning(UnitName),
}
