// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pre-registered `shutdown.target` unit. Every unit with
//! `default_dependencies = true` declares this name in both `before` and
//! `conflicts`, so starting it stops every such unit (via `conflicts`)
//! and waits for them to finish (via `before`) before it itself becomes
//! `RUNNING` — which never happens, since its `exec_start` never
//! completes.

use crate::descriptor::{RoutineOutcome, UnitDescriptor, UnitDescriptorBuilder};
use std::sync::Arc;

pub const TARGET: &str = "shutdown.target";

pub fn descriptor() -> UnitDescriptor {
    UnitDescriptorBuilder::new(TARGET)
        .exec_start(Arc::new(|| {
            Box::pin(async {
                futures::future::pending::<()>().await;
                #[allow(unreachable_code)]
                Ok(RoutineOutcome::None)
            })
        }))
        .default_dependencies(false)
        .build()
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
