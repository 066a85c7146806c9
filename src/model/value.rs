//! The value-tree model: the parser's public output.
//!
//! A document reduces to a tree of `ValueNode`s. Every node optionally
//! carries a type annotation (from a `<Type>` marker in the source); the
//! annotation is metadata only and never changes the runtime structure.
//! The root of a document tree is always a map or an array, never a bare
//! scalar.
//!
//! The containers here are plain owned types exposing only the operations
//! the model needs: `MapValue` is an insertion-ordered string-keyed
//! association, `ArrayValue` an ordered element list.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A value plus its optional type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub type_name: Option<String>,
    pub value: Value,
}

impl ValueNode {
    /// Wraps a value without a type annotation.
    pub fn untyped(value: Value) -> Self {
        ValueNode {
            type_name: None,
            value,
        }
    }

    /// Attaches a type annotation, consuming the node.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match &self.value {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match &self.value {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&SymbolicPath> {
        match &self.value {
            Value::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Primitive(Primitive::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            Value::Primitive(Primitive::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match &self.value {
            Value::Primitive(Primitive::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            Value::Primitive(Primitive::Float(f)) => Some(*f),
            _ => None,
        }
    }
}

impl From<Value> for ValueNode {
    fn from(value: Value) -> Self {
        ValueNode::untyped(value)
    }
}

/// The value variants of the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Map(MapValue),
    Array(ArrayValue),
    Primitive(Primitive),
    Path(SymbolicPath),
}

/// A scalar of exactly one semantic kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Bool(bool),
    Int(i32),
    Float(f64),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(s) => write!(f, "\"{}\"", s),
            Primitive::Bool(b) => write!(f, "{}", b),
            Primitive::Int(i) => write!(f, "{}", i),
            Primitive::Float(x) => {
                // Always keep a decimal point so the scalar stays a float
                // when rendered and re-parsed.
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
        }
    }
}

/// An insertion-ordered mapping from string keys to value nodes.
///
/// Keys are unique: inserting a duplicate overwrites the existing value in
/// place and keeps the key's original position (last occurrence in source
/// order wins).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapValue {
    entries: Vec<(String, ValueNode)>,
}

impl MapValue {
    pub fn new() -> Self {
        MapValue::default()
    }

    /// Inserts a key/value pair, overwriting any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, node: ValueNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// An ordered, index-addressable sequence of value nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayValue {
    items: Vec<ValueNode>,
}

impl ArrayValue {
    pub fn new() -> Self {
        ArrayValue::default()
    }

    pub fn push(&mut self, node: ValueNode) {
        self.items.push(node);
    }

    pub fn get(&self, index: usize) -> Option<&ValueNode> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueNode> {
        self.items.iter()
    }
}

impl std::ops::Index<usize> for ArrayValue {
    type Output = ValueNode;

    fn index(&self, index: usize) -> &ValueNode {
        &self.items[index]
    }
}

/// A dotted chain of at least two identifier segments used as a value, the
/// format's enumerated/qualified reference literal. The first segment is
/// conventionally a path/type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicPath {
    segments: Vec<String>,
}

impl SymbolicPath {
    /// Builds a path from its segments. Returns `None` for fewer than two
    /// segments; a single identifier is not a path.
    pub fn new(segments: Vec<String>) -> Option<Self> {
        if segments.len() < 2 {
            return None;
        }
        Some(SymbolicPath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The leading segment, conventionally the path's type name.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The final segment.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for SymbolicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// Serialization renders the plain data shape: maps as objects, arrays as
// sequences, paths as dotted strings. Type annotations are metadata and are
// not emitted.

impl Serialize for ValueNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Map(map) => map.serialize(serializer),
            Value::Array(array) => array.serialize(serializer),
            Value::Primitive(primitive) => primitive.serialize(serializer),
            Value::Path(path) => serializer.serialize_str(&path.to_string()),
        }
    }
}

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Primitive::Str(s) => serializer.serialize_str(s),
            Primitive::Bool(b) => serializer.serialize_bool(*b),
            Primitive::Int(i) => serializer.serialize_i32(*i),
            Primitive::Float(x) => serializer.serialize_f64(*x),
        }
    }
}

impl Serialize for MapValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self.iter() {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for ArrayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for node in self.iter() {
            seq.serialize_element(node)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_insertion_order() {
        let mut map = MapValue::new();
        map.insert("b", Value::Primitive(Primitive::Int(1)).into());
        map.insert("a", Value::Primitive(Primitive::Int(2)).into());
        map.insert("c", Value::Primitive(Primitive::Int(3)).into());
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut map = MapValue::new();
        map.insert("a", Value::Primitive(Primitive::Int(1)).into());
        map.insert("b", Value::Primitive(Primitive::Int(2)).into());
        map.insert("a", Value::Primitive(Primitive::Int(3)).into());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a").and_then(|n| n.as_i32()), Some(3));
        // The key keeps its original position.
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn symbolic_path_requires_two_segments() {
        assert!(SymbolicPath::new(vec!["A".to_string()]).is_none());
        let path = SymbolicPath::new(vec!["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(path.head(), "A");
        assert_eq!(path.last(), "B");
        assert_eq!(path.to_string(), "A.B");
    }

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Primitive::Float(1.0).to_string(), "1.0");
        assert_eq!(Primitive::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Primitive::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn json_serialization_uses_plain_shapes() {
        let mut map = MapValue::new();
        map.insert("n", Value::Primitive(Primitive::Int(7)).into());
        let mut array = ArrayValue::new();
        array.push(Value::Primitive(Primitive::Bool(true)).into());
        map.insert("flags", Value::Array(array).into());
        map.insert(
            "mode",
            Value::Path(SymbolicPath::new(vec!["Mode".into(), "Fast".into()]).unwrap()).into(),
        );
        let json = serde_json::to_string(&ValueNode::untyped(Value::Map(map))).unwrap();
        assert_eq!(json, r#"{"n":7,"flags":[true],"mode":"Mode.Fast"}"#);
    }
}
