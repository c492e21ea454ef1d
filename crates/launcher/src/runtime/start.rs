// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The start algorithm.

use super::gate::await_readiness_gate;
use super::{stop, Supervisor};
use crate::error::SupervisorError;
use superv_core::UnitName;

pub(crate) async fn start(sup: &Supervisor, name: &str) -> Result<(), SupervisorError> {
    let unit_name = UnitName::from(name);
    let handle = sup.inner.starts.get_or_install(unit_name.clone(), {
        let sup = sup.clone();
        move || run_start(sup, unit_name)
    });
    handle.outcome.await.map_err(|err| (*err).clone())
}

async fn run_start(sup: Supervisor, name: UnitName) -> Result<(), SupervisorError> {
    // Step 1: wait for any stop in progress, giving start-after-stop
    // restart-like semantics.
    if let Some(stop_handle) = sup.inner.stops.get(&name) {
        let _ = stop_handle.outcome.await;
    }

    // Step 2: fast path.
    if sup.inner.running.lock().contains_key(&name) {
        return Ok(());
    }

    // A relation may name a unit that was never registered; there is
    // nothing to start in that case.
    let Some(descriptor) = sup.inner.database.lock().get(&name) else {
        return Ok(());
    };

    // Step 3: stop conflicts, without awaiting.
    let conflicts = {
        let database = sup.inner.database.lock();
        let mut set = database.conflicts_of(&name);
        set.extend(database.conflicts_inverse_of(&name));
        set
    };
    for conflict in conflicts {
        let sup = sup.clone();
        tokio::spawn(async move {
            let _ = sup.stop(conflict.as_str()).await;
        });
    }

    // Step 4: pull up binds_to, without awaiting.
    let binds_to = sup.inner.database.lock().binds_to_of(&name);
    for dependency in binds_to {
        let sup = sup.clone();
        tokio::spawn(async move {
            let _ = sup.start(dependency.as_str()).await;
        });
    }

    // Step 5: wait on ordering.
    let (after_set, before_set) = {
        let database = sup.inner.database.lock();
        let mut after_set = database.after_of(&name);
        after_set.extend(database.before_inverse_of(&name));
        let mut before_set = database.before_of(&name);
        before_set.extend(database.after_inverse_of(&name));
        (after_set, before_set)
    };

    let mut waits = Vec::new();
    for other in after_set.iter().chain(before_set.iter()) {
        if let Some(handle) = sup.inner.stops.get(other.as_str()) {
            waits.push(handle.outcome);
        }
    }
    for other in &after_set {
        if let Some(handle) = sup.inner.starts.get(other.as_str()) {
            waits.push(handle.outcome);
        }
    }
    for wait in waits {
        let _ = wait.await;
    }

    // Steps 6-7: invoke exec_start under the type-specific readiness gate.
    let main = await_readiness_gate(&descriptor, &sup.inner.capabilities).await?;

    // Step 8: install the runner task, publish START(u).
    stop::install_runner(&sup, name, descriptor, main).await;
    Ok(())
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
