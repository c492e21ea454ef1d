// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared in-flight handle table.
//!
//! At most one in-flight start handle and one in-flight stop handle exist
//! per unit. Concurrent callers of `start`/`stop` for the same unit must
//! observe the same completion, so this table hands out a clone of
//! whatever transition is already running instead of starting a second,
//! independent attempt. Each entry is backed by a real spawned task (so
//! it makes progress even with nobody awaiting it yet) plus an
//! [`tokio::task::AbortHandle`] so `stop`'s "cancel-and-await a start
//! handle" can actually interrupt it.

use crate::error::SupervisorError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::task::AbortHandle;
use superv_core::UnitName;

pub(crate) type SharedOutcome = Result<(), Arc<SupervisorError>>;
pub(crate) type SharedHandle = Shared<BoxFuture<'static, SharedOutcome>>;

/// One in-flight transition: a cloneable completion future plus the means
/// to abort the task driving it.
#[derive(Clone)]
pub(crate) struct Handle {
    pub(crate) outcome: SharedHandle,
    pub(crate) abort: AbortHandle,
}

#[derive(Clone)]
pub(crate) struct HandleTable {
    inner: Arc<Mutex<HashMap<UnitName, Handle>>>,
}

impl HandleTable {
    pub(crate) fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<Handle> {
        self.inner.lock().get(name).cloned()
    }

    /// Return the existing handle for `name`, or spawn `make`'s future as a
    /// new one. The spawned task removes its own table entry when it
    /// completes, so a later call for the same name starts a fresh
    /// transition rather than replaying a stale result.
    pub(crate) fn get_or_install<F, Fut>(&self, name: UnitName, make: F) -> Handle
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), SupervisorError>> + Send + 'static,
    {
        let mut table = self.inner.lock();
        if let Some(existing) = table.get(&name) {
            return existing.clone();
        }

        let task = tokio::spawn(make());
        let abort = task.abort_handle();
        let table_for_cleanup = self.inner.clone();
        let cleanup_name = name.clone();
        let wrapped: BoxFuture<'static, SharedOutcome> = Box::pin(async move {
            let result = match task.await {
                Ok(inner) => inner,
                Err(join_err) if join_err.is_cancelled() => Ok(()),
                Err(join_err) => Err(SupervisorError::TaskFailure(join_err.to_string())),
            };
            table_for_cleanup.lock().remove(&cleanup_name);
            result.map_err(Arc::new)
        });
        let outcome = wrapped.shared();
        let handle = Handle { outcome, abort };
        table.insert(name, handle.clone());
        handle
    }
}

#[cfg(test)]
#[path = "handles_tests.rs"]
mod tests;
