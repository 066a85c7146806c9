//! Rendering a value tree back to carta source text.
//!
//! The output re-parses to a structurally equal tree (insertion order
//! preserved for maps and arrays), which is what the round-trip tests lean
//! on. A document root is a map rendered as a bare pair sequence; nested
//! maps get braces.
//!
//! String content is emitted verbatim between quotes, mirroring the
//! reducer's verbatim stripping; content the string pattern cannot lex
//! (a lone backslash, an unescaped quote) will not survive a round trip.
//! The same holds for non-finite floats: `inf` and `NaN` render as plain
//! text the number pattern cannot re-lex, since no source literal can
//! produce them in the first place.
//! Annotations are emitted only where the grammar can carry them: on
//! complex values and on scalar pairs.

use crate::model::value::{ArrayValue, MapValue, Primitive, Value, ValueNode};

/// Renders a map as a complete document (a bare top-level pair sequence).
pub fn document(map: &MapValue) -> String {
    let mut out = String::new();
    for (key, node) in map.iter() {
        render_pair(&mut out, key, node, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn render_pair(out: &mut String, key: &str, node: &ValueNode, depth: usize) {
    indent(out, depth);
    match &node.value {
        // A complex pair's tag sits between the key and the braces.
        Value::Map(_) | Value::Array(_) => {
            out.push_str(key);
            out.push(' ');
            if let Some(type_name) = &node.type_name {
                out.push_str(&format!("<{}> ", type_name));
            }
            render_complex(out, node, depth);
            out.push('\n');
        }
        Value::Primitive(primitive) => {
            if let Some(type_name) = &node.type_name {
                out.push_str(&format!("<{}> ", type_name));
            }
            out.push_str(&format!("{} = {}\n", key, primitive));
        }
        // The grammar has no typed path pairs; any annotation is dropped.
        Value::Path(path) => {
            out.push_str(&format!("{} = {}\n", key, path));
        }
    }
}

/// Renders the braces/brackets form of a map or array value, without its
/// leading type tag.
fn render_complex(out: &mut String, node: &ValueNode, depth: usize) {
    match &node.value {
        Value::Map(map) => render_map(out, map, depth),
        Value::Array(array) => render_array(out, array, depth),
        _ => unreachable!("render_complex called on a scalar"),
    }
}

fn render_map(out: &mut String, map: &MapValue, depth: usize) {
    if map.is_empty() {
        out.push_str("{ }");
        return;
    }
    out.push_str("{\n");
    for (key, node) in map.iter() {
        render_pair(out, key, node, depth + 1);
    }
    indent(out, depth);
    out.push('}');
}

fn render_array(out: &mut String, array: &ArrayValue, depth: usize) {
    if array.is_empty() {
        out.push_str("[ ]");
        return;
    }
    out.push('[');
    for (i, node) in array.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push(' ');
        render_element(out, node, depth);
    }
    out.push_str(" ]");
}

fn render_element(out: &mut String, node: &ValueNode, depth: usize) {
    match &node.value {
        Value::Map(_) | Value::Array(_) => {
            // Elements may carry a type tag on complex values only.
            if let Some(type_name) = &node.type_name {
                out.push_str(&format!("<{}> ", type_name));
            }
            render_complex(out, node, depth);
        }
        Value::Primitive(primitive) => out.push_str(&primitive.to_string()),
        Value::Path(path) => out.push_str(&path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::SymbolicPath;

    fn node(value: Value) -> ValueNode {
        ValueNode::untyped(value)
    }

    #[test]
    fn scalars_render_as_assignments() {
        let mut map = MapValue::new();
        map.insert("A", node(Value::Primitive(Primitive::Int(1))));
        map.insert("B", node(Value::Primitive(Primitive::Str("x".into()))));
        map.insert("C", node(Value::Primitive(Primitive::Bool(true))));
        assert_eq!(document(&map), "A = 1\nB = \"x\"\nC = true\n");
    }

    #[test]
    fn float_scalars_keep_their_point() {
        let mut map = MapValue::new();
        map.insert("F", node(Value::Primitive(Primitive::Float(2.0))));
        assert_eq!(document(&map), "F = 2.0\n");
    }

    #[test]
    fn empty_containers_render_compact() {
        let mut map = MapValue::new();
        map.insert("M", node(Value::Map(MapValue::new())));
        map.insert("A", node(Value::Array(ArrayValue::new())));
        assert_eq!(document(&map), "M { }\nA [ ]\n");
    }

    #[test]
    fn nested_map_renders_with_braces_and_indentation() {
        let mut inner = MapValue::new();
        inner.insert("X", node(Value::Primitive(Primitive::Int(5))));
        let mut map = MapValue::new();
        map.insert("Outer", node(Value::Map(inner)).with_type("Config"));
        assert_eq!(document(&map), "Outer <Config> {\n    X = 5\n}\n");
    }

    #[test]
    fn arrays_render_inline_with_separators() {
        let mut array = ArrayValue::new();
        array.push(node(Value::Primitive(Primitive::Int(1))));
        array.push(node(Value::Path(
            SymbolicPath::new(vec!["A".into(), "B".into()]).unwrap(),
        )));
        let mut map = MapValue::new();
        map.insert("Xs", node(Value::Array(array)));
        assert_eq!(document(&map), "Xs [ 1, A.B ]\n");
    }
}
