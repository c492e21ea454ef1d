// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates: a single tunable default
//! timeout used by wait_for-style helpers in tests. Gated behind
//! `#[cfg(any(test, feature = "test-support"))]`.

use std::future::Future;
use std::time::Duration;

/// Production code never imposes this on supervisor operations; it exists
/// only so tests can bound how long they wait for an event before failing
/// instead of hanging forever.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Await `future`, panicking with a clear message if it doesn't resolve
/// within [`DEFAULT_TIMEOUT`].
pub async fn wait_for<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(DEFAULT_TIMEOUT, future)
        .await
        .expect("operation did not complete within DEFAULT_TIMEOUT")
}
