// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stop algorithm and the runner task's shielded-main cleanup.

use super::exec::run_exec_stop_sequence;
use super::handles::SharedHandle;
use super::main_handle::Main;
use super::{RunningUnit, Supervisor};
use crate::descriptor::UnitDescriptor;
use crate::error::SupervisorError;
use crate::events::SupervisorEvent;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use superv_core::UnitName;
use tokio::sync::oneshot;

pub(crate) async fn stop(sup: &Supervisor, name: &str) -> Result<(), SupervisorError> {
    let unit_name = UnitName::from(name);
    let handle = sup.inner.stops.get_or_install(unit_name.clone(), {
        let sup = sup.clone();
        move || run_stop(sup, unit_name)
    });
    handle.outcome.await.map_err(|err| (*err).clone())
}

async fn run_stop(sup: Supervisor, name: UnitName) -> Result<(), SupervisorError> {
    // Step 1: cancel-and-await an in-flight start.
    if let Some(handle) = sup.inner.starts.get(&name) {
        handle.abort.abort();
        let _ = handle.outcome.await;
    }

    // Step 2: cancel-and-await the running record, triggering cleanup
    // below. The runner, not this call, removes the `running` entry, so a
    // concurrent `is_running` stays accurate throughout.
    let (stop_tx, runner) = {
        let mut running = sup.inner.running.lock();
        match running.get_mut(&name) {
            Some(unit) => (unit.stop_tx.take(), Some(unit.runner.clone())),
            None => (None, None),
        }
    };
    if let Some(tx) = stop_tx {
        let _ = tx.send(());
    }
    if let Some(runner) = runner {
        let _ = runner.await;
    }
    Ok(())
}

/// Spawn the runner task for a freshly started unit, install it into the
/// running-units table, and publish `Start(u)`.
pub(crate) async fn install_runner(
    sup: &Supervisor,
    name: UnitName,
    descriptor: Arc<UnitDescriptor>,
    main: Main,
) {
    let (stop_tx, stop_rx) = oneshot::channel();
    let runner_sup = sup.clone();
    let runner_name = name.clone();
    let boxed: BoxFuture<'static, Result<(), Arc<SupervisorError>>> = Box::pin(async move {
        run_runner(runner_sup, runner_name, descriptor, main, stop_rx).await.map_err(Arc::new)
    });
    let runner: SharedHandle = boxed.shared();

    sup.inner.running.lock().insert(name.clone(), RunningUnit { stop_tx: Some(stop_tx), runner: runner.clone() });
    let _ = sup.inner.events.publish(SupervisorEvent::Start(name));

    // A Shared future only makes progress when polled; spawn it so the
    // unit runs to completion even if nobody ever calls `stop` or awaits.
    tokio::spawn(runner);
}

/// Await `main` under a shield, then run ordered teardown. Losing the race
/// to `stop_rx` only stops *awaiting* `main` here — the underlying task
/// keeps running untouched (dropping a `JoinHandle` does not abort it)
/// until the explicit `main.abort()` at the end of cleanup.
async fn run_runner(
    sup: Supervisor,
    name: UnitName,
    descriptor: Arc<UnitDescriptor>,
    mut main: Main,
    mut stop_rx: oneshot::Receiver<()>,
) -> Result<(), SupervisorError> {
    tokio::select! {
        _ = &mut main => {}
        _ = &mut stop_rx => {}
    }

    // Pull down dependents, without awaiting.
    let dependents = sup.inner.database.lock().binds_to_inverse_of(&name);
    for dependent in dependents {
        let sup = sup.clone();
        tokio::spawn(async move {
            let _ = sup.stop(dependent.as_str()).await;
        });
    }

    // Wait on reverse ordering: stops of units this one is before/after⁻¹.
    let reverse = {
        let database = sup.inner.database.lock();
        let mut set = database.before_of(&name);
        set.extend(database.after_inverse_of(&name));
        set
    };
    for other in &reverse {
        if let Some(handle) = sup.inner.stops.get(other.as_str()) {
            let _ = handle.outcome.await;
        }
    }

    run_exec_stop_sequence(&descriptor).await;

    // Cancel-and-await main. If it already completed during the select
    // above, `abort` is a harmless no-op and this replays the same result.
    main.abort();
    let result = match main.await {
        Ok(inner) => inner.map_err(SupervisorError::ExecStart),
        Err(join_err) if join_err.is_cancelled() => Ok(()),
        Err(join_err) => Err(SupervisorError::TaskFailure(join_err.to_string())),
    };

    sup.inner.running.lock().remove(&name);
    let _ = sup.inner.events.publish(SupervisorEvent::Stop(name));

    if let Err(err) = &result {
        tracing::error!(unit = %descriptor.name, error = %err, "unit ended abnormally");
    }
    result
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
