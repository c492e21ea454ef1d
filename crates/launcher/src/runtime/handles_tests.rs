// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use superv_core::test_support::wait_for;

#[tokio::test]
async fn concurrent_callers_share_one_handle() {
    let table = HandleTable::new();
    let calls = Arc::new(AtomicU32::new(0));

    let make = {
        let calls = calls.clone();
        move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(())
            }
        }
    };
    let a = table.get_or_install(UnitName::from("u"), make);
    let b = table.get_or_install(UnitName::from("u"), || async { Ok(()) });

    wait_for(a.outcome).await.unwrap();
    wait_for(b.outcome).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1, "the second caller's `make` must never run");
}

#[tokio::test]
async fn entry_is_removed_on_completion() {
    let table = HandleTable::new();
    let handle = table.get_or_install(UnitName::from("u"), || async { Ok(()) });
    wait_for(handle.outcome).await.unwrap();
    assert!(!table.contains("u"));
}

#[tokio::test]
async fn abort_surfaces_as_ok() {
    let table = HandleTable::new();
    let handle = table.get_or_install(UnitName::from("u"), || async {
        futures::future::pending::<()>().await;
        Ok(())
    });
    handle.abort.abort();
    let outcome = wait_for(handle.outcome).await;
    assert!(outcome.is_ok(), "a cancelled handle should surface as success, not an error");
}
