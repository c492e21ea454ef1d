// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-unit-type readiness gate.

use super::exec::{run_exec_start_sequence, spawn_exec_start};
use super::main_handle::{wrap_forked, Main, MainGuard};
use crate::descriptor::{ExecError, RoutineOutcome, UnitDescriptor, UnitType};
use crate::error::SupervisorError;
use std::sync::Arc;
use superv_core::{CapabilityEventKind, CapabilityNotSet, CapabilityRegistry};

/// Run `exec_start` under the gate for `descriptor.unit_type` and return the
/// unit's `main` handle.
///
/// `main` is wrapped in a [`MainGuard`] from the moment it is created until
/// it is handed back here, so cancelling this function's own task — as
/// `stop` does to an in-flight `start` — aborts `main` too instead of
/// leaking it.
pub(crate) async fn await_readiness_gate(
    descriptor: &Arc<UnitDescriptor>,
    capabilities: &CapabilityRegistry,
) -> Result<Main, SupervisorError> {
    match descriptor.unit_type {
        UnitType::Simple => {
            // Considered started as soon as exec_start is scheduled.
            Ok(MainGuard::new(spawn_exec_start(descriptor.clone())).disarm())
        }
        UnitType::Exec => {
            let main = MainGuard::new(spawn_exec_start(descriptor.clone()));
            // Give exec_start at least one chance to run and suspend.
            tokio::task::yield_now().await;
            Ok(main.disarm())
        }
        UnitType::Forking => {
            let outcome = run_exec_start_sequence(descriptor).await.map_err(SupervisorError::ExecStart)?;
            match outcome {
                RoutineOutcome::Forked(handle) => Ok(wrap_forked(handle)),
                RoutineOutcome::None => Err(SupervisorError::ExecStart(ExecError::new(format!(
                    "forking unit `{}` exec_start did not return a forked handle",
                    descriptor.name
                )))),
            }
        }
        UnitType::Capability => {
            let expected = descriptor.capability_name.clone().unwrap_or_default();
            // Subscribe before invoking exec_start so no SET can be missed.
            let mut events = capabilities.event_queue().subscribe();
            let main = MainGuard::new(spawn_exec_start(descriptor.clone()));

            loop {
                match events.next().await {
                    Ok(event) if event.kind == CapabilityEventKind::Set && event.name == expected => {
                        return Ok(main.disarm());
                    }
                    Ok(_) => continue,
                    Err(_end_reached) => {
                        main.cancel().await;
                        return Err(SupervisorError::CapabilityNotSet(CapabilityNotSet {
                            unit: descriptor.name.clone(),
                            capability_name: expected,
                        }));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
