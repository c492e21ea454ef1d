// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher supervisor — the lifecycle state machine over
//! [`crate::database::LauncherDatabase`].

mod exec;
mod gate;
mod handles;
mod main_handle;
mod start;
mod stop;

use crate::database::LauncherDatabase;
use crate::descriptor::UnitDescriptor;
use crate::error::SupervisorError;
use crate::events::SupervisorEvent;
use handles::{HandleTable, SharedHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use superv_core::{CapabilityRegistry, PubSubQueue, UnitName};
use tokio::sync::oneshot;

struct RunningUnit {
    /// Taken and fired exactly once, by whichever `stop` call first finds
    /// this record.
    stop_tx: Option<oneshot::Sender<()>>,
    /// Completion of the runner task; cloned out by `stop` so it can await
    /// cleanup without removing the record itself — the runner removes its
    /// own entry when cleanup finishes.
    runner: SharedHandle,
}

struct Inner {
    database: Mutex<LauncherDatabase>,
    running: Mutex<HashMap<UnitName, RunningUnit>>,
    starts: HandleTable,
    stops: HandleTable,
    events: PubSubQueue<SupervisorEvent>,
    capabilities: CapabilityRegistry,
}

/// The launcher supervisor. Cheap to clone — every clone shares the same
/// database, running-unit table, and event bus.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                database: Mutex::new(LauncherDatabase::new()),
                running: Mutex::new(HashMap::new()),
                starts: HandleTable::new(),
                stops: HandleTable::new(),
                events: PubSubQueue::new(),
                capabilities: CapabilityRegistry::new(),
            }),
        }
    }

    /// Register a unit, then publish `ADD(name)`. `add` never suspends —
    /// it's `async` only for API symmetry with `start`/`stop`.
    pub async fn add(&self, descriptor: UnitDescriptor) -> Result<(), SupervisorError> {
        self.add_nowait(descriptor)
    }

    /// Synchronous form of [`Self::add`] for callers outside an async
    /// context.
    pub fn add_nowait(&self, descriptor: UnitDescriptor) -> Result<(), SupervisorError> {
        let name = descriptor.name.clone();
        self.inner.database.lock().add(descriptor).map_err(SupervisorError::Database)?;
        let _ = self.inner.events.publish(SupervisorEvent::Add(name));
        Ok(())
    }

    /// Stop `name` if running, then remove it from the database and
    /// publish `REMOVE(name)`.
    pub async fn remove(&self, name: &str) -> Result<(), SupervisorError> {
        if self.is_running(name) {
            self.stop(name).await?;
        }
        self.remove_nowait(name)
    }

    /// Synchronous form of [`Self::remove`]. Fails with
    /// [`SupervisorError::StillRunning`] if `name` is currently running,
    /// since removing it safely requires awaiting `stop`.
    pub fn remove_nowait(&self, name: &str) -> Result<(), SupervisorError> {
        if self.is_running(name) {
            return Err(SupervisorError::StillRunning(UnitName::from(name)));
        }
        let mut database = self.inner.database.lock();
        let existed = database.contains(name);
        database.remove(name);
        drop(database);
        if existed {
            let _ = self.inner.events.publish(SupervisorEvent::Remove(UnitName::from(name)));
        }
        Ok(())
    }

    /// Start `name`, returning once it has passed its type's readiness
    /// gate. Concurrent callers share one in-flight handle.
    pub async fn start(&self, name: &str) -> Result<(), SupervisorError> {
        start::start(self, name).await
    }

    /// Stop `name`, returning once its runner has finished cleanup.
    /// Concurrent callers share one in-flight handle.
    pub async fn stop(&self, name: &str) -> Result<(), SupervisorError> {
        stop::stop(self, name).await
    }

    /// True while a runtime record exists in STARTING, RUNNING, or STOPPING:
    /// an in-flight start handle, a running record, or an in-flight stop
    /// handle.
    pub fn is_running(&self, name: &str) -> bool {
        self.inner.starts.contains(name)
            || self.inner.running.lock().contains_key(name)
            || self.inner.stops.contains(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.database.lock().contains(name)
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.inner.capabilities
    }

    pub fn database(&self) -> parking_lot::MutexGuard<'_, LauncherDatabase> {
        self.inner.database.lock()
    }

    pub fn events(&self) -> &PubSubQueue<SupervisorEvent> {
        &self.inner.events
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
