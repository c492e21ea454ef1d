// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability registry: a type-keyed store for process-wide singletons.
//!
//! A key is a Rust type — `TypeId::of::<T>()`. Each mutation publishes on
//! [`CapabilityRegistry::event_queue`], which `Type.CAPABILITY` launchers
//! subscribe to before invoking `exec_start`.

use crate::error::AlreadyEnabled;
use crate::pubsub::PubSubQueue;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityEventKind {
    Set,
    Del,
}

/// Event published on [`CapabilityRegistry::event_queue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityEvent {
    pub kind: CapabilityEventKind,
    pub key: TypeId,
    /// `std::any::type_name::<T>()` of the capability type — this is what
    /// a `Type.CAPABILITY` unit's `capability_name` is compared against.
    pub name: &'static str,
}

/// `pop` was called on an absent key with no default: a programmer error,
/// reported here as a typed `Result` rather than a panic, matching this
/// crate's no-panics-in-library-code policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("capability `{0}` is absent and no default was given")]
pub struct CapabilityAbsent(pub &'static str);

struct Slot {
    value: Box<dyn Any + Send + Sync>,
    name: &'static str,
}

struct Inner {
    slots: Mutex<HashMap<TypeId, Slot>>,
    events: PubSubQueue<CapabilityEvent>,
}

/// Typed, process-wide map that publishes SET/DEL events on every mutation.
#[derive(Clone)]
pub struct CapabilityRegistry(Arc<Inner>);

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self(Arc::new(Inner { slots: Mutex::new(HashMap::new()), events: PubSubQueue::new() }))
    }

    pub fn event_queue(&self) -> &PubSubQueue<CapabilityEvent> {
        &self.0.events
    }

    /// Assign a value. Publishes `SET` even if the key was already present
    /// with an equal value — callers rely on `SET` for synchronization,
    /// not for diffing.
    pub fn set<T: Any + Send + Sync + 'static>(&self, value: T) {
        let key = TypeId::of::<T>();
        let name = std::any::type_name::<T>();
        self.0.slots.lock().insert(key, Slot { value: Box::new(value), name });
        let _ = self.0.events.publish(CapabilityEvent { kind: CapabilityEventKind::Set, key, name });
    }

    pub fn get<T: Clone + Any + Send + Sync + 'static>(&self) -> Option<T> {
        self.0.slots.lock().get(&TypeId::of::<T>()).and_then(|slot| slot.value.downcast_ref::<T>().cloned())
    }

    pub fn contains<T: Any + 'static>(&self) -> bool {
        self.0.slots.lock().contains_key(&TypeId::of::<T>())
    }

    /// Remove `T`'s slot if present. Publishes `DEL` only when something
    /// was actually removed.
    pub fn delete<T: Any + Send + Sync + 'static>(&self) {
        let key = TypeId::of::<T>();
        let removed = self.0.slots.lock().remove(&key);
        if let Some(slot) = removed {
            let _ = self.0.events.publish(CapabilityEvent { kind: CapabilityEventKind::Del, key, name: slot.name });
        }
    }

    /// Remove and return `T`'s value, or `default` if absent.
    ///
    /// Raises [`CapabilityAbsent`] if absent and no default was given.
    pub fn pop<T: Clone + Any + Send + Sync + 'static>(
        &self,
        default: Option<T>,
    ) -> Result<T, CapabilityAbsent> {
        let key = TypeId::of::<T>();
        let removed = self.0.slots.lock().remove(&key);
        match removed {
            Some(slot) => {
                let value = slot
                    .value
                    .downcast_ref::<T>()
                    .cloned()
                    .expect("TypeId-keyed slot holds a value of a different type");
                let _ = self.0.events.publish(CapabilityEvent { kind: CapabilityEventKind::Del, key, name: slot.name });
                Ok(value)
            }
            None => default.ok_or(CapabilityAbsent(std::any::type_name::<T>())),
        }
    }

    /// Scoped acquisition: sets `value` iff the key is absent, and returns a
    /// handle whose release deletes the key again. Reentrant: if the key is
    /// already present with a value equal to `value`, this succeeds instead
    /// of failing. Fails with [`AlreadyEnabled`] only if the key is present
    /// with a *different* value.
    pub fn provide<T: Any + Send + Sync + Clone + PartialEq + 'static>(
        &self,
        value: T,
    ) -> Result<CapabilityGuard<T>, AlreadyEnabled> {
        if let Some(existing) = self.get::<T>() {
            if existing != value {
                return Err(AlreadyEnabled);
            }
        }
        self.set(value);
        Ok(CapabilityGuard { registry: self.clone(), _marker: std::marker::PhantomData })
    }
}

/// RAII handle from [`CapabilityRegistry::provide`]. Dropping (or calling
/// [`release`](Self::release)) deletes the key and publishes `DEL`. Safe to
/// release more than once or after the registry has otherwise changed —
/// `delete` is itself idempotent.
pub struct CapabilityGuard<T: Any + Send + Sync + 'static> {
    registry: CapabilityRegistry,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Any + Send + Sync + 'static> CapabilityGuard<T> {
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Any + Send + Sync + 'static> Drop for CapabilityGuard<T> {
    fn drop(&mut self) {
        self.registry.delete::<T>();
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
