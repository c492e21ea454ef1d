// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::descriptor::UnitDescriptorBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use superv_core::test_support::wait_for;
use superv_core::CapabilityRegistry;

fn routine_that_flags(flag: Arc<AtomicBool>) -> crate::descriptor::StartRoutine {
    Arc::new(move || {
        let flag = flag.clone();
        Box::pin(async move {
            flag.store(true, Ordering::SeqCst);
            futures::future::pending::<()>().await;
            #[allow(unreachable_code)]
            Ok(RoutineOutcome::None)
        })
    })
}

async fn scheduling_gate_returns_a_main_handle_for_a_never_completing_exec_start(unit_type: UnitType) {
    let flag = Arc::new(AtomicBool::new(false));
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("u").exec_start(routine_that_flags(flag.clone())).unit_type(unit_type).build(),
    );
    let capabilities = CapabilityRegistry::new();

    let main = wait_for(await_readiness_gate(&descriptor, &capabilities)).await.unwrap();
    assert!(flag.load(Ordering::SeqCst), "exec_start should have run at least once");
    main.abort();
}

#[tokio::test]
async fn simple_gate_returns_a_main_handle_for_a_never_completing_exec_start() {
    scheduling_gate_returns_a_main_handle_for_a_never_completing_exec_start(UnitType::Simple).await;
}

#[tokio::test]
async fn exec_gate_returns_a_main_handle_for_a_never_completing_exec_start() {
    scheduling_gate_returns_a_main_handle_for_a_never_completing_exec_start(UnitType::Exec).await;
}

#[tokio::test]
async fn forking_gate_fully_awaits_exec_start_and_adopts_the_forked_handle() {
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("f")
            .unit_type(UnitType::Forking)
            .exec_start(Arc::new(|| {
                Box::pin(async {
                    let forked = tokio::spawn(async {
                        futures::future::pending::<()>().await;
                    });
                    Ok(RoutineOutcome::Forked(forked))
                })
            }))
            .build(),
    );
    let capabilities = CapabilityRegistry::new();

    let main = wait_for(await_readiness_gate(&descriptor, &capabilities)).await.unwrap();
    assert!(!main.is_finished());
    main.abort();
}

#[tokio::test]
async fn forking_gate_errors_when_exec_start_does_not_return_a_forked_handle() {
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("f")
            .unit_type(UnitType::Forking)
            .exec_start(Arc::new(|| Box::pin(async { Ok(RoutineOutcome::None) })))
            .build(),
    );
    let capabilities = CapabilityRegistry::new();

    let err = wait_for(await_readiness_gate(&descriptor, &capabilities)).await.unwrap_err();
    assert!(matches!(err, SupervisorError::ExecStart(_)));
}

#[tokio::test]
async fn capability_gate_waits_for_the_matching_set_event() {
    let expected = std::any::type_name::<u32>().to_string();
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("cap")
            .unit_type(UnitType::Capability)
            .capability_name(expected.clone())
            .exec_start(Arc::new(move || {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    futures::future::pending::<()>().await;
                    #[allow(unreachable_code)]
                    Ok(RoutineOutcome::None)
                })
            }))
            .build(),
    );
    let capabilities = CapabilityRegistry::new();

    let gate = tokio::spawn({
        let descriptor = descriptor.clone();
        let capabilities = capabilities.clone();
        async move { await_readiness_gate(&descriptor, &capabilities).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    capabilities.set::<u32>(7);

    let main = wait_for(gate).await.unwrap().unwrap();
    main.abort();
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn capability_gate_aborts_its_background_main_if_the_gate_itself_is_cancelled() {
    let cleaned_up = Arc::new(AtomicBool::new(false));
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("cap")
            .unit_type(UnitType::Capability)
            .capability_name("never-set")
            .exec_start({
                let cleaned_up = cleaned_up.clone();
                Arc::new(move || {
                    let cleaned_up = cleaned_up.clone();
                    Box::pin(async move {
                        let _guard = SetOnDrop(cleaned_up);
                        futures::future::pending::<()>().await;
                        #[allow(unreachable_code)]
                        Ok(RoutineOutcome::None)
                    })
                })
            })
            .build(),
    );
    let capabilities = CapabilityRegistry::new();

    let gate = tokio::spawn({
        let descriptor = descriptor.clone();
        let capabilities = capabilities.clone();
        async move { await_readiness_gate(&descriptor, &capabilities).await }
    });
    // Give the gate a chance to subscribe and spawn `main` before cutting
    // it off mid-wait.
    tokio::time::sleep(Duration::from_millis(10)).await;
    gate.abort();
    let _ = gate.await;

    wait_for(async {
        while !cleaned_up.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

#[tokio::test]
async fn capability_gate_fails_when_the_bus_closes_before_the_expected_set() {
    let descriptor = Arc::new(
        UnitDescriptorBuilder::new("cap")
            .unit_type(UnitType::Capability)
            .capability_name("never-set")
            .exec_start(Arc::new(|| Box::pin(async { Ok(RoutineOutcome::None) })))
            .build(),
    );
    let capabilities = CapabilityRegistry::new();
    capabilities.event_queue().close();

    let err = wait_for(await_readiness_gate(&descriptor, &capabilities)).await.unwrap_err();
    assert!(matches!(err, SupervisorError::CapabilityNotSet(_)));
}
