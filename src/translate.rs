//! Boundary to the object-mapping layer.
//!
//! The language engine stops at the value tree; turning that tree into
//! native values (and back) is the mapping layer's job. This module defines
//! the contract at that boundary:
//!
//! - `Translate`: one implementation per native type, with three
//!   operations — build a new value from a node, populate an existing value
//!   in place, and serialize a value back into a node. Each type reports a
//!   capability flag per operation so callers need not special-case any
//!   native type.
//! - `PathRegistry`: an explicit, caller-constructed registry mapping
//!   symbolic-path type names to their known variants. There is no
//!   process-wide registry; the registry travels inside the
//!   `TranslateContext` handed to every operation, which keeps the mapping
//!   layer's dependencies explicit and testable in isolation.

use std::collections::HashMap;
use std::fmt;

use crate::model::value::{ArrayValue, MapValue, Primitive, SymbolicPath, Value, ValueNode};

/// Which of the three boundary operations a type supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub deserialize: bool,
    pub populate: bool,
    pub serialize: bool,
}

impl Capability {
    /// All three operations supported.
    pub fn full() -> Self {
        Capability {
            deserialize: true,
            populate: true,
            serialize: true,
        }
    }
}

/// Errors crossing the mapping boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The node's shape does not fit the target type.
    Mismatch { expected: &'static str, found: String },
    /// A symbolic path references a type name the registry does not know.
    UnknownPathType(String),
    /// A symbolic path references a variant the registry does not list.
    UnknownPathVariant { type_name: String, variant: String },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Mismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            TranslateError::UnknownPathType(name) => {
                write!(f, "unknown path type '{}'", name)
            }
            TranslateError::UnknownPathVariant { type_name, variant } => {
                write!(f, "path type '{}' has no variant '{}'", type_name, variant)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

fn describe(node: &ValueNode) -> String {
    match &node.value {
        Value::Map(_) => "map".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Path(path) => format!("path {}", path),
        Value::Primitive(Primitive::Str(_)) => "string".to_string(),
        Value::Primitive(Primitive::Bool(_)) => "boolean".to_string(),
        Value::Primitive(Primitive::Int(_)) => "integer".to_string(),
        Value::Primitive(Primitive::Float(_)) => "float".to_string(),
    }
}

fn mismatch(expected: &'static str, node: &ValueNode) -> TranslateError {
    TranslateError::Mismatch {
        expected,
        found: describe(node),
    }
}

/// Registry of symbolic-path type names and their variants, built by the
/// caller and passed in through the context.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    types: HashMap<String, Vec<String>>,
}

impl PathRegistry {
    pub fn new() -> Self {
        PathRegistry::default()
    }

    /// Registers a path type with its known variants.
    pub fn register(&mut self, type_name: impl Into<String>, variants: &[&str]) {
        self.types.insert(
            type_name.into(),
            variants.iter().map(|v| v.to_string()).collect(),
        );
    }

    pub fn knows(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Validates a path against the registry, returning its final segment.
    pub fn resolve<'a>(&self, path: &'a SymbolicPath) -> Result<&'a str, TranslateError> {
        let variants = self
            .types
            .get(path.head())
            .ok_or_else(|| TranslateError::UnknownPathType(path.head().to_string()))?;
        let variant = path.last();
        if variants.iter().any(|v| v == variant) {
            Ok(variant)
        } else {
            Err(TranslateError::UnknownPathVariant {
                type_name: path.head().to_string(),
                variant: variant.to_string(),
            })
        }
    }
}

/// Options steering the mapping layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    /// When set, paths whose type name is absent from the registry fail
    /// instead of passing through unresolved.
    pub strict_paths: bool,
}

/// Everything a translation operation may consult, passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct TranslateContext {
    pub registry: PathRegistry,
    pub options: TranslateOptions,
}

impl TranslateContext {
    pub fn new(registry: PathRegistry, options: TranslateOptions) -> Self {
        TranslateContext { registry, options }
    }
}

/// The mapping boundary for one native type.
pub trait Translate: Sized {
    /// Which operations this type supports.
    fn capability() -> Capability {
        Capability::full()
    }

    /// Deserializes a node into a new native value.
    fn from_node(node: &ValueNode, ctx: &TranslateContext) -> Result<Self, TranslateError>;

    /// Populates an existing native value in place. The default replaces
    /// the value wholesale.
    fn populate_node(
        &mut self,
        node: &ValueNode,
        ctx: &TranslateContext,
    ) -> Result<(), TranslateError> {
        *self = Self::from_node(node, ctx)?;
        Ok(())
    }

    /// Serializes a native value back into a node.
    fn to_node(&self, ctx: &TranslateContext) -> Result<ValueNode, TranslateError>;
}

impl Translate for String {
    fn from_node(node: &ValueNode, _ctx: &TranslateContext) -> Result<Self, TranslateError> {
        node.as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| mismatch("string", node))
    }

    fn to_node(&self, _ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        Ok(ValueNode::untyped(Value::Primitive(Primitive::Str(
            self.clone(),
        ))))
    }
}

impl Translate for bool {
    fn from_node(node: &ValueNode, _ctx: &TranslateContext) -> Result<Self, TranslateError> {
        node.as_bool().ok_or_else(|| mismatch("boolean", node))
    }

    fn to_node(&self, _ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        Ok(ValueNode::untyped(Value::Primitive(Primitive::Bool(*self))))
    }
}

impl Translate for i32 {
    fn from_node(node: &ValueNode, _ctx: &TranslateContext) -> Result<Self, TranslateError> {
        node.as_i32().ok_or_else(|| mismatch("integer", node))
    }

    fn to_node(&self, _ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        Ok(ValueNode::untyped(Value::Primitive(Primitive::Int(*self))))
    }
}

impl Translate for f64 {
    /// Accepts integer nodes as well; the reverse narrowing is not offered.
    fn from_node(node: &ValueNode, _ctx: &TranslateContext) -> Result<Self, TranslateError> {
        match &node.value {
            Value::Primitive(Primitive::Float(f)) => Ok(*f),
            Value::Primitive(Primitive::Int(i)) => Ok(*i as f64),
            _ => Err(mismatch("number", node)),
        }
    }

    fn to_node(&self, _ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        Ok(ValueNode::untyped(Value::Primitive(Primitive::Float(
            *self,
        ))))
    }
}

impl<T: Translate> Translate for Vec<T> {
    fn from_node(node: &ValueNode, ctx: &TranslateContext) -> Result<Self, TranslateError> {
        let array = node.as_array().ok_or_else(|| mismatch("array", node))?;
        array.iter().map(|item| T::from_node(item, ctx)).collect()
    }

    fn to_node(&self, ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        let mut array = ArrayValue::new();
        for item in self {
            array.push(item.to_node(ctx)?);
        }
        Ok(ValueNode::untyped(Value::Array(array)))
    }
}

impl<T: Translate> Translate for HashMap<String, T> {
    fn from_node(node: &ValueNode, ctx: &TranslateContext) -> Result<Self, TranslateError> {
        let map = node.as_map().ok_or_else(|| mismatch("map", node))?;
        map.iter()
            .map(|(key, value)| Ok((key.to_string(), T::from_node(value, ctx)?)))
            .collect()
    }

    fn to_node(&self, ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        let mut map = MapValue::new();
        for (key, value) in self {
            map.insert(key.clone(), value.to_node(ctx)?);
        }
        Ok(ValueNode::untyped(Value::Map(map)))
    }
}

/// A resolved symbolic path: its type name and validated variant.
///
/// This is the generic native form of a path value; applications with real
/// enums implement `Translate` on them directly, using the context's
/// registry the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub type_name: String,
    pub variant: String,
}

impl Translate for ResolvedPath {
    fn capability() -> Capability {
        Capability {
            deserialize: true,
            populate: true,
            serialize: true,
        }
    }

    fn from_node(node: &ValueNode, ctx: &TranslateContext) -> Result<Self, TranslateError> {
        let path = node.as_path().ok_or_else(|| mismatch("path", node))?;
        if ctx.registry.knows(path.head()) || ctx.options.strict_paths {
            let variant = ctx.registry.resolve(path)?;
            Ok(ResolvedPath {
                type_name: path.head().to_string(),
                variant: variant.to_string(),
            })
        } else {
            Ok(ResolvedPath {
                type_name: path.head().to_string(),
                variant: path.last().to_string(),
            })
        }
    }

    fn to_node(&self, _ctx: &TranslateContext) -> Result<ValueNode, TranslateError> {
        let segments = vec![self.type_name.clone(), self.variant.clone()];
        let path = SymbolicPath::new(segments).ok_or(TranslateError::Mismatch {
            expected: "two-segment path",
            found: "incomplete path".to_string(),
        })?;
        Ok(ValueNode::untyped(Value::Path(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TranslateContext {
        TranslateContext::default()
    }

    #[test]
    fn primitives_round_trip_across_the_boundary() {
        let ctx = ctx();
        let node = 42i32.to_node(&ctx).unwrap();
        assert_eq!(i32::from_node(&node, &ctx).unwrap(), 42);

        let node = "hello".to_string().to_node(&ctx).unwrap();
        assert_eq!(String::from_node(&node, &ctx).unwrap(), "hello");

        let node = true.to_node(&ctx).unwrap();
        assert!(bool::from_node(&node, &ctx).unwrap());
    }

    #[test]
    fn float_accepts_integer_nodes() {
        let ctx = ctx();
        let node = ValueNode::untyped(Value::Primitive(Primitive::Int(3)));
        assert_eq!(f64::from_node(&node, &ctx).unwrap(), 3.0);
    }

    #[test]
    fn mismatch_reports_both_sides() {
        let ctx = ctx();
        let node = ValueNode::untyped(Value::Primitive(Primitive::Bool(true)));
        let err = i32::from_node(&node, &ctx).unwrap_err();
        assert_eq!(
            err,
            TranslateError::Mismatch {
                expected: "integer",
                found: "boolean".to_string()
            }
        );
    }

    #[test]
    fn populate_replaces_in_place_by_default() {
        let ctx = ctx();
        let node = ValueNode::untyped(Value::Primitive(Primitive::Int(9)));
        let mut value = 1i32;
        value.populate_node(&node, &ctx).unwrap();
        assert_eq!(value, 9);
    }

    #[test]
    fn vectors_translate_elementwise() {
        let ctx = ctx();
        let node = vec![1i32, 2, 3].to_node(&ctx).unwrap();
        assert_eq!(node.as_array().unwrap().len(), 3);
        assert_eq!(Vec::<i32>::from_node(&node, &ctx).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn registry_validates_known_path_types() {
        let mut registry = PathRegistry::new();
        registry.register("Mode", &["Fast", "Safe"]);
        let ctx = TranslateContext::new(registry, TranslateOptions::default());

        let good = ValueNode::untyped(Value::Path(
            SymbolicPath::new(vec!["Mode".into(), "Fast".into()]).unwrap(),
        ));
        let resolved = ResolvedPath::from_node(&good, &ctx).unwrap();
        assert_eq!(resolved.variant, "Fast");

        let bad = ValueNode::untyped(Value::Path(
            SymbolicPath::new(vec!["Mode".into(), "Reckless".into()]).unwrap(),
        ));
        let err = ResolvedPath::from_node(&bad, &ctx).unwrap_err();
        assert!(matches!(err, TranslateError::UnknownPathVariant { .. }));
    }

    #[test]
    fn unknown_path_types_pass_through_unless_strict() {
        let node = ValueNode::untyped(Value::Path(
            SymbolicPath::new(vec!["Color".into(), "Red".into()]).unwrap(),
        ));

        let lenient = TranslateContext::default();
        let resolved = ResolvedPath::from_node(&node, &lenient).unwrap();
        assert_eq!(resolved.type_name, "Color");

        let strict = TranslateContext::new(
            PathRegistry::new(),
            TranslateOptions { strict_paths: true },
        );
        let err = ResolvedPath::from_node(&node, &strict).unwrap_err();
        assert_eq!(err, TranslateError::UnknownPathType("Color".to_string()));
    }
}
