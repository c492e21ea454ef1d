// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-free-reader broadcast queue.
//!
//! A singly-linked chain of nodes, each either `Unset`, `HasValue(v, next)`,
//! or the terminal `End`. The queue owns the current `Unset` tail; a
//! [`View`] is a cursor that starts at some node and only ever walks
//! forward, so a subscriber sees exactly the values published after it
//! subscribed. A node stays reachable only while some view still
//! references it — once every view has advanced past it, it is collected
//! like any other unreferenced `Arc`.

use crate::error::Closed;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

enum Slot<T> {
    Unset,
    HasValue(T, Arc<Node<T>>),
    End,
}

struct Node<T> {
    slot: Mutex<Slot<T>>,
    notify: Notify,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self { slot: Mutex::new(Slot::Unset), notify: Notify::new() }
    }
}

/// Single-writer, multi-reader broadcast queue.
pub struct PubSubQueue<T> {
    tail: Mutex<Arc<Node<T>>>,
}

impl<T> Default for PubSubQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PubSubQueue<T> {
    pub fn new() -> Self {
        Self { tail: Mutex::new(Arc::new(Node::new())) }
    }

    /// Publish a value. Non-suspending.
    ///
    /// Fails with [`Closed`] if the queue was already closed — publishing
    /// after close is a programmer error.
    pub fn publish(&self, value: T) -> Result<(), Closed> {
        let mut tail = self.tail.lock();
        let node = tail.clone();
        let mut slot = node.slot.lock();
        match &*slot {
            Slot::Unset => {
                let next = Arc::new(Node::new());
                *slot = Slot::HasValue(value, next.clone());
                drop(slot);
                node.notify.notify_waiters();
                *tail = next;
                Ok(())
            }
            _ => Err(Closed),
        }
    }

    /// Close the queue. Idempotent. Non-suspending.
    pub fn close(&self) {
        let tail = self.tail.lock();
        let node = tail.clone();
        let mut slot = node.slot.lock();
        if matches!(&*slot, Slot::Unset) {
            *slot = Slot::End;
            drop(slot);
            node.notify.notify_waiters();
        }
    }

    /// Subscribe at the current tail. Only events published after this call
    /// (and the terminal `End`, if the queue is later closed) are observed.
    pub fn subscribe(&self) -> View<T> {
        View { node: self.tail.lock().clone() }
    }
}

/// A one-way cursor into the event log, advancing on read.
pub struct View<T> {
    node: Arc<Node<T>>,
}

impl<T: Clone> View<T> {
    /// Suspend until the referenced node leaves `Unset`.
    pub async fn next(&mut self) -> Result<T, crate::error::EndReached> {
        loop {
            let notified = self.node.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let slot = self.node.slot.lock();
                match &*slot {
                    Slot::HasValue(value, next) => {
                        let value = value.clone();
                        let next = next.clone();
                        drop(slot);
                        self.node = next;
                        return Ok(value);
                    }
                    Slot::End => return Err(crate::error::EndReached),
                    Slot::Unset => {}
                }
            }

            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "pubsub_tests.rs"]
mod tests;
