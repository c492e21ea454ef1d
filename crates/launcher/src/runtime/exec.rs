// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running a unit's `exec_start`/`exec_stop` routine lists, in order.

use crate::descriptor::{ExecError, RoutineOutcome, UnitDescriptor};
use std::sync::Arc;

/// Run every `exec_start` routine in order; the last routine's outcome is
/// the result. `LauncherDatabase::add` rejects an empty `exec_start` list,
/// so every descriptor reaching here has at least one routine.
pub(crate) async fn run_exec_start_sequence(
    descriptor: &UnitDescriptor,
) -> Result<RoutineOutcome, ExecError> {
    let mut outcome = RoutineOutcome::None;
    for routine in &descriptor.exec_start {
        outcome = routine().await?;
    }
    Ok(outcome)
}

/// Schedule the `exec_start` chain as a background task. The SIMPLE, EXEC,
/// and CAPABILITY readiness gates all schedule rather than fully await it.
pub(crate) fn spawn_exec_start(
    descriptor: Arc<UnitDescriptor>,
) -> tokio::task::JoinHandle<Result<(), ExecError>> {
    tokio::spawn(async move {
        run_exec_start_sequence(&descriptor).await?;
        Ok(())
    })
}

/// Run every `exec_stop` routine in order. Failures are logged and
/// swallowed — stop must make forward progress regardless.
pub(crate) async fn run_exec_stop_sequence(descriptor: &UnitDescriptor) {
    for routine in &descriptor.exec_stop {
        if let Err(err) = routine().await {
            tracing::warn!(unit = %descriptor.name, error = %err, "exec_stop routine failed");
        }
    }
}
