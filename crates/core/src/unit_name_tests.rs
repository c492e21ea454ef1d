// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn displays_as_plain_name() {
    let name = UnitName::from("network.target");
    assert_eq!(name.to_string(), "network.target");
}

#[test]
fn equal_names_from_different_sources_are_equal() {
    let a = UnitName::from("a".to_string());
    let b = UnitName::from("a");
    assert_eq!(a, b);
}

#[test]
fn borrows_as_str_for_hashmap_lookup() {
    let mut map: HashMap<UnitName, u32> = HashMap::new();
    map.insert(UnitName::from("x"), 1);
    assert_eq!(map.get("x"), Some(&1));
}

#[test]
fn clone_is_cheap_arc_share() {
    let a = UnitName::from("shared");
    let b = a.clone();
    assert_eq!(a, b);
}
