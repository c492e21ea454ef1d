// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unifying `main` to a single type regardless of unit type.
//!
//! For SIMPLE/EXEC/CAPABILITY units, `main` is the `JoinHandle` of the
//! spawned `exec_start` chain. For FORKING units, `exec_start`'s last
//! routine hands back its own `JoinHandle<()>`; this module adapts it to
//! the same shape so the runner task in `stop.rs` never needs to branch
//! on unit type.

use crate::descriptor::ExecError;
use tokio::task::JoinHandle;

pub(crate) type Main = JoinHandle<Result<(), ExecError>>;

pub(crate) fn wrap_forked(handle: JoinHandle<()>) -> Main {
    tokio::spawn(async move {
        handle.await.map_err(|err| ExecError::new(format!("forked task ended abnormally: {err}")))
    })
}

/// Owns a `main` handle until the readiness gate hands it off to the
/// runner. If the gate's own task is cancelled before that handoff
/// happens — e.g. a `stop` cancels an in-flight `start` — dropping this
/// guard aborts `main` too, so the unit's background task is never
/// orphaned.
pub(crate) struct MainGuard(Option<Main>);

impl MainGuard {
    pub(crate) fn new(main: Main) -> Self {
        Self(Some(main))
    }

    /// Release `main` to its owner; no abort-on-drop happens after this.
    pub(crate) fn disarm(mut self) -> Main {
        self.0.take().expect("MainGuard disarmed twice")
    }

    /// Abort `main` and await its end, consuming the guard.
    pub(crate) async fn cancel(mut self) {
        if let Some(main) = self.0.take() {
            main.abort();
            let _ = main.await;
        }
    }
}

impl Drop for MainGuard {
    fn drop(&mut self) {
        if let Some(main) = self.0.take() {
            main.abort();
        }
    }
}
