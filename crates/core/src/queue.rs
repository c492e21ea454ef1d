// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellable async queue.
//!
//! A FIFO whose `close()` wakes every pending `get()`. Useful for
//! internal coordination that needs "wait for an item or give up because
//! we're shutting down" without a separate cancellation channel.
//!
//! Single-reader is assumed; `get` on multiple concurrent readers may
//! spuriously wake more than one.

use crate::error::Closed;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Single-reader FIFO with close-wakes-readers semantics.
pub struct CancellableQueue<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

impl<T> Default for CancellableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CancellableQueue<T> {
    pub fn new() -> Self {
        Self { state: Mutex::new(State { items: VecDeque::new(), closed: false }), notify: Notify::new() }
    }

    /// Append an item. Fails with [`Closed`] if the queue is closed.
    pub fn put_nowait(&self, value: T) -> Result<(), Closed> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Closed);
        }
        state.items.push_back(value);
        drop(state);
        self.notify.notify_waiters();
        Ok(())
    }

    /// Append an item, suspending only to hand off the notification —
    /// never blocks on capacity, since the queue is unbounded.
    pub async fn put(&self, value: T) -> Result<(), Closed> {
        self.put_nowait(value)
    }

    /// Suspend until an item is available or the queue is closed and
    /// drained.
    pub async fn get(&self) -> Result<T, Closed> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    return Ok(item);
                }
                if state.closed {
                    return Err(Closed);
                }
            }

            notified.await;
        }
    }

    /// Non-suspending variant: returns `Ok(None)` if nothing is buffered
    /// and the queue is still open.
    pub fn get_nowait(&self) -> Result<Option<T>, Closed> {
        let mut state = self.state.lock();
        if let Some(item) = state.items.pop_front() {
            return Ok(Some(item));
        }
        if state.closed {
            return Err(Closed);
        }
        Ok(None)
    }

    /// Idempotent. Wakes all pending readers so they observe `Closed`
    /// after draining any buffered items.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
