// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn noop_start() -> StartRoutine {
    Arc::new(|| Box::pin(async { Ok(RoutineOutcome::None) }))
}

#[test]
fn defaults_are_simple_type_with_default_dependencies() {
    let descriptor = UnitDescriptorBuilder::new("a").exec_start(noop_start()).build();
    assert_eq!(descriptor.unit_type, UnitType::Simple);
    assert!(descriptor.default_dependencies);
    assert!(descriptor.after.is_empty());
}

#[test]
fn capability_name_infers_capability_type() {
    let descriptor = UnitDescriptorBuilder::new("cap")
        .exec_start(noop_start())
        .capability_name("int")
        .build();
    assert_eq!(descriptor.unit_type, UnitType::Capability);
}

#[test]
fn empty_capability_name_does_not_infer_capability_type() {
    let descriptor = UnitDescriptorBuilder::new("a")
        .exec_start(noop_start())
        .capability_name("")
        .build();
    assert_eq!(descriptor.unit_type, UnitType::Simple);
}

#[test]
fn explicit_unit_type_overrides_inference() {
    let descriptor = UnitDescriptorBuilder::new("a")
        .exec_start(noop_start())
        .capability_name("int")
        .unit_type(UnitType::Exec)
        .build();
    assert_eq!(descriptor.unit_type, UnitType::Exec);
}

#[test]
fn build_without_exec_start_is_allowed_here_and_rejected_by_add() {
    let descriptor = UnitDescriptorBuilder::new("a").build();
    assert!(descriptor.exec_start.is_empty());
}

#[test]
fn display_matches_lowercase_variant_name() {
    assert_eq!(UnitType::Forking.to_string(), "forking");
}
