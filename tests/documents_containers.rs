//! End-to-end tests for maps, arrays, nesting, and type annotations on
//! complex values.

use carta::{parse, MapValue, Value};

fn parse_map(source: &str) -> MapValue {
    let node = parse(source).expect("parse").expect("non-empty document");
    match node.value {
        Value::Map(map) => map,
        other => panic!("expected map root, got {:?}", other),
    }
}

#[test]
fn empty_map_and_array_values() {
    let map = parse_map("M { } A [ ]");
    assert!(map.get("M").unwrap().as_map().unwrap().is_empty());
    assert!(map.get("A").unwrap().as_array().unwrap().is_empty());
}

#[test]
fn nested_maps() {
    let map = parse_map("Outer { Inner { X = 1 } Y = 2 }");
    let outer = map.get("Outer").unwrap().as_map().unwrap();
    let inner = outer.get("Inner").unwrap().as_map().unwrap();
    assert_eq!(inner.get("X").and_then(|n| n.as_i32()), Some(1));
    assert_eq!(outer.get("Y").and_then(|n| n.as_i32()), Some(2));
}

#[test]
fn arrays_of_mixed_scalars() {
    let map = parse_map("Xs [ 1, 2.5, \"three\", true ]");
    let xs = map.get("Xs").unwrap().as_array().unwrap();
    assert_eq!(xs.len(), 4);
    assert_eq!(xs[0].as_i32(), Some(1));
    assert_eq!(xs[1].as_f64(), Some(2.5));
    assert_eq!(xs[2].as_str(), Some("three"));
    assert_eq!(xs[3].as_bool(), Some(true));
}

#[test]
fn arrays_preserve_element_order() {
    let map = parse_map("Xs [ 3, 1, 2 ]");
    let xs = map.get("Xs").unwrap().as_array().unwrap();
    let values: Vec<i32> = xs.iter().filter_map(|n| n.as_i32()).collect();
    assert_eq!(values, vec![3, 1, 2]);
}

#[test]
fn arrays_of_maps_and_nested_arrays() {
    let map = parse_map("Xs [ { A = 1 }, [ 2, 3 ] ]");
    let xs = map.get("Xs").unwrap().as_array().unwrap();
    let first = xs[0].as_map().unwrap();
    assert_eq!(first.get("A").and_then(|n| n.as_i32()), Some(1));
    let second = xs[1].as_array().unwrap();
    assert_eq!(second.len(), 2);
}

#[test]
fn typed_map_value_carries_annotation() {
    let map = parse_map("Camera <Transform> { X = 0.0 }");
    let camera = map.get("Camera").unwrap();
    assert_eq!(camera.type_name.as_deref(), Some("Transform"));
    let inner = camera.as_map().unwrap();
    assert_eq!(inner.get("X").and_then(|n| n.as_f64()), Some(0.0));
}

#[test]
fn typed_array_value_carries_annotation() {
    let map = parse_map("Xs <Floats> [ 1.0, 2.0 ]");
    let xs = map.get("Xs").unwrap();
    assert_eq!(xs.type_name.as_deref(), Some("Floats"));
    assert_eq!(xs.as_array().unwrap().len(), 2);
}

#[test]
fn typed_empty_containers() {
    let map = parse_map("M <T> { } A <U> [ ]");
    assert_eq!(map.get("M").unwrap().type_name.as_deref(), Some("T"));
    assert!(map.get("M").unwrap().as_map().unwrap().is_empty());
    assert_eq!(map.get("A").unwrap().type_name.as_deref(), Some("U"));
    assert!(map.get("A").unwrap().as_array().unwrap().is_empty());
}

#[test]
fn typed_elements_inside_arrays() {
    let map = parse_map("Xs [ <P> { X = 1 }, { X = 2 } ]");
    let xs = map.get("Xs").unwrap().as_array().unwrap();
    assert_eq!(xs[0].type_name.as_deref(), Some("P"));
    assert_eq!(xs[1].type_name, None);
}

#[test]
fn map_entries_keep_declaration_order() {
    let map = parse_map("C = 1 A = 2 B { }");
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["C", "A", "B"]);
}

#[test]
fn duplicate_keys_inside_nested_maps() {
    let map = parse_map("M { A = 1 A = 2 }");
    let inner = map.get("M").unwrap().as_map().unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner.get("A").and_then(|n| n.as_i32()), Some(2));
}
