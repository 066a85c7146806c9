//! End-to-end tests for scalar pairs and empty documents.

use carta::{parse, Primitive, Value, ValueNode};

fn parse_map(source: &str) -> carta::MapValue {
    let node = parse(source).expect("parse").expect("non-empty document");
    match node.value {
        Value::Map(map) => map,
        other => panic!("expected map root, got {:?}", other),
    }
}

fn scalar(map: &carta::MapValue, key: &str) -> Primitive {
    match &map.get(key).expect("key present").value {
        Value::Primitive(p) => p.clone(),
        other => panic!("expected primitive for {}, got {:?}", key, other),
    }
}

#[test]
fn empty_documents_yield_no_tree() {
    assert_eq!(parse("").unwrap(), None);
    assert_eq!(parse("   \t\r\n  ").unwrap(), None);
    assert_eq!(parse("// only a comment").unwrap(), None);
    assert_eq!(parse("// a\n// b\n").unwrap(), None);
}

#[test]
fn string_pairs() {
    let map = parse_map("Name = \"Renderer\"");
    assert_eq!(scalar(&map, "Name"), Primitive::Str("Renderer".into()));

    let map = parse_map("Empty = \"\"");
    assert_eq!(scalar(&map, "Empty"), Primitive::Str("".into()));
}

#[test]
fn escaped_quote_stays_verbatim() {
    let map = parse_map(r#"TestString = "\"""#);
    assert_eq!(scalar(&map, "TestString"), Primitive::Str("\\\"".into()));
}

#[test]
fn integer_pairs_including_signed_and_leading_zeros() {
    let map = parse_map("A = 42 B = -01234 C = 024 D = -0");
    assert_eq!(scalar(&map, "A"), Primitive::Int(42));
    assert_eq!(scalar(&map, "B"), Primitive::Int(-1234));
    assert_eq!(scalar(&map, "C"), Primitive::Int(24));
    assert_eq!(scalar(&map, "D"), Primitive::Int(0));
}

#[test]
fn decimal_literals_are_always_floats() {
    let map = parse_map("A = 1.0 B = -2.5 C = 0.0");
    assert_eq!(scalar(&map, "A"), Primitive::Float(1.0));
    assert_eq!(scalar(&map, "B"), Primitive::Float(-2.5));
    assert_eq!(scalar(&map, "C"), Primitive::Float(0.0));
}

#[test]
fn out_of_range_integer_becomes_float() {
    let map = parse_map("Big = 9999999999");
    assert_eq!(scalar(&map, "Big"), Primitive::Float(9_999_999_999.0));
}

#[test]
fn boolean_pairs() {
    let map = parse_map("Yes = true No = false");
    assert_eq!(scalar(&map, "Yes"), Primitive::Bool(true));
    assert_eq!(scalar(&map, "No"), Primitive::Bool(false));
}

#[test]
fn typed_scalar_pair_carries_annotation() {
    let map = parse_map("<Seconds> Timeout = 30");
    let node: &ValueNode = map.get("Timeout").unwrap();
    assert_eq!(node.type_name.as_deref(), Some("Seconds"));
    assert_eq!(node.as_i32(), Some(30));
}

#[test]
fn layout_is_insignificant() {
    let compact = parse_map("A=1 B=2");
    let spread = parse_map("  A  =  1\n\n\tB = 2  // end\n");
    assert_eq!(compact, spread);
}

#[test]
fn duplicate_keys_keep_last_value_and_first_position() {
    let map = parse_map("A = 1 B = 2 A = 3");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("A").and_then(|n| n.as_i32()), Some(3));
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["A", "B"]);
}
