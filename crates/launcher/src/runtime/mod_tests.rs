// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::descriptor::{RoutineOutcome, UnitDescriptorBuilder};
use crate::events::SupervisorEvent;
use superv_core::test_support::wait_for;

fn forever() -> crate::descriptor::StartRoutine {
    std::sync::Arc::new(|| {
        Box::pin(async {
            futures::future::pending::<()>().await;
            #[allow(unreachable_code)]
            Ok(RoutineOutcome::None)
        })
    })
}

#[test]
fn a_fresh_supervisor_has_shutdown_target_pre_registered() {
    let sup = Supervisor::new();
    assert!(sup.contains("shutdown.target"));
}

#[tokio::test]
async fn add_registers_a_unit_and_publishes_add() {
    let sup = Supervisor::new();
    let mut events = sup.events().subscribe();
    sup.add(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).await.unwrap();

    assert!(sup.contains("a"));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Add(UnitName::from("a")));
}

#[test]
fn add_nowait_is_synchronous() {
    let sup = Supervisor::new();
    sup.add_nowait(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).unwrap();
    assert!(sup.contains("a"));
}

#[test]
fn add_nowait_rejects_a_duplicate_name() {
    let sup = Supervisor::new();
    sup.add_nowait(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).unwrap();
    let err = sup.add_nowait(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).unwrap_err();
    assert!(matches!(err, SupervisorError::Database(_)));
}

#[tokio::test]
async fn remove_nowait_unregisters_and_publishes_remove() {
    let sup = Supervisor::new();
    let mut events = sup.events().subscribe();
    sup.add(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).await.unwrap();
    sup.remove_nowait("a").unwrap();

    assert!(!sup.contains("a"));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Add(UnitName::from("a")));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Remove(UnitName::from("a")));
}

#[test]
fn remove_nowait_on_an_unregistered_name_is_a_no_op() {
    let sup = Supervisor::new();
    sup.remove_nowait("ghost").unwrap();
}

#[tokio::test]
async fn remove_nowait_refuses_a_running_unit() {
    let sup = Supervisor::new();
    sup.add(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).await.unwrap();
    wait_for(sup.start("a")).await.unwrap();

    let err = sup.remove_nowait("a").unwrap_err();
    assert!(matches!(err, SupervisorError::StillRunning(name) if name == UnitName::from("a")));
    assert!(sup.contains("a"), "a rejected remove must not touch the database");
}

#[tokio::test]
async fn remove_stops_a_running_unit_first() {
    let sup = Supervisor::new();
    let mut events = sup.events().subscribe();
    sup.add(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).await.unwrap();
    wait_for(sup.start("a")).await.unwrap();

    sup.remove("a").await.unwrap();

    assert!(!sup.is_running("a"));
    assert!(!sup.contains("a"));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Add(UnitName::from("a")));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Start(UnitName::from("a")));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Stop(UnitName::from("a")));
    assert_eq!(events.next().await.unwrap(), SupervisorEvent::Remove(UnitName::from("a")));
}

#[tokio::test]
async fn database_exposes_the_registered_descriptor() {
    let sup = Supervisor::new();
    sup.add(UnitDescriptorBuilder::new("a").exec_start(forever()).build()).await.unwrap();

    assert!(sup.database().contains("a"));
}

#[test]
fn capabilities_returns_the_shared_registry() {
    let sup = Supervisor::new();
    sup.capabilities().set::<u32>(7);
    assert_eq!(sup.capabilities().get::<u32>(), Some(7));
}
