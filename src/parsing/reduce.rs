//! Reduction of a parse tree into the value-tree model.
//!
//! Total over any tree the shift-reduce engine can produce. Pair sequences
//! accumulate into a map in declaration order (so a duplicate key is
//! overwritten by its last occurrence in source order); element sequences
//! accumulate into an array preserving left-to-right source order; type
//! annotations attach to the constructed value, never to the key.
//!
//! Literal conversion happens here, not in the lexer: a numeric literal is
//! tried as a 32-bit integer first and falls back to a 64-bit float; string
//! quotes are stripped verbatim with no escape decoding.

use std::fmt;

use crate::model::value::{ArrayValue, MapValue, Primitive, SymbolicPath, Value, ValueNode};
use crate::parsing::engine::ParseNode;
use crate::parsing::symbol::{Nonterminal, Terminal};

/// A token that matched lexically as a literal category but failed semantic
/// conversion, or a parse tree that does not have the shape the grammar
/// guarantees (a defect in the rule set, not a user error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    InvalidNumber { text: String },
    InvalidBoolean { text: String },
    UnexpectedShape(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::InvalidNumber { text } => write!(f, "invalid numeric literal '{}'", text),
            ValueError::InvalidBoolean { text } => write!(f, "invalid boolean literal '{}'", text),
            ValueError::UnexpectedShape(what) => write!(f, "unexpected parse tree shape: {}", what),
        }
    }
}

impl std::error::Error for ValueError {}

fn shape_error(expected: &str, node: &ParseNode) -> ValueError {
    let found = match node {
        ParseNode::Leaf(token) => format!("{} leaf", token.terminal),
        ParseNode::Branch { symbol, .. } => format!("{} node", symbol),
    };
    ValueError::UnexpectedShape(format!("expected {}, found {}", expected, found))
}

/// Reduces a parse tree root into a value tree.
///
/// The root is a map for pair-sequence documents and an array for
/// element-sequence documents; it is never a bare scalar.
pub fn reduce(root: &ParseNode) -> Result<ValueNode, ValueError> {
    match root {
        ParseNode::Branch {
            symbol: Nonterminal::PairSeq,
            ..
        } => {
            let mut map = MapValue::new();
            fold_pairs(root, &mut map)?;
            Ok(ValueNode::untyped(Value::Map(map)))
        }
        ParseNode::Branch {
            symbol: Nonterminal::ElementSeq,
            ..
        } => {
            let mut array = ArrayValue::new();
            fold_elements(root, &mut array)?;
            Ok(ValueNode::untyped(Value::Array(array)))
        }
        other => Err(shape_error("PairSeq or ElementSeq root", other)),
    }
}

/// Accumulates a pair sequence into a map, leftmost pair first.
fn fold_pairs(node: &ParseNode, map: &mut MapValue) -> Result<(), ValueError> {
    let children = branch_children(node, Nonterminal::PairSeq)?;
    match children {
        [pair] => {
            let (key, value) = reduce_pair(pair)?;
            map.insert(key, value);
            Ok(())
        }
        [rest, pair] => {
            fold_pairs(rest, map)?;
            let (key, value) = reduce_pair(pair)?;
            map.insert(key, value);
            Ok(())
        }
        _ => Err(shape_error("pair sequence", node)),
    }
}

/// Reduces one key/value pair. A leading type annotation applies to the
/// constructed value, not to the key.
fn reduce_pair(node: &ParseNode) -> Result<(String, ValueNode), ValueError> {
    let children = branch_children(node, Nonterminal::Pair)?;
    match children {
        // Ident Complex
        [ParseNode::Leaf(ident), complex] if ident.terminal == Terminal::Ident => {
            Ok((ident.text.clone(), reduce_complex(complex)?))
        }
        // Ident '=' Scalar | Ident '=' Path
        [ParseNode::Leaf(ident), ParseNode::Leaf(assign), value]
            if ident.terminal == Terminal::Ident && assign.terminal == Terminal::Assign =>
        {
            Ok((ident.text.clone(), reduce_assigned(value)?))
        }
        // TypeTag Ident '=' Scalar
        [tag, ParseNode::Leaf(ident), ParseNode::Leaf(assign), value]
            if ident.terminal == Terminal::Ident && assign.terminal == Terminal::Assign =>
        {
            let type_name = type_tag_name(tag)?;
            Ok((ident.text.clone(), reduce_assigned(value)?.with_type(type_name)))
        }
        _ => Err(shape_error("key/value pair", node)),
    }
}

/// The right-hand side of an `=`: a scalar or a symbolic path.
fn reduce_assigned(node: &ParseNode) -> Result<ValueNode, ValueError> {
    match node {
        ParseNode::Branch {
            symbol: Nonterminal::Scalar,
            ..
        } => reduce_scalar(node),
        ParseNode::Branch {
            symbol: Nonterminal::Path,
            ..
        } => reduce_path(node),
        other => Err(shape_error("scalar or path", other)),
    }
}

/// A complex value: a map or array, possibly behind a type tag.
fn reduce_complex(node: &ParseNode) -> Result<ValueNode, ValueError> {
    let children = branch_children(node, Nonterminal::Complex)?;
    let inner = match children {
        [inner] => inner,
        _ => return Err(shape_error("complex value", node)),
    };
    match inner {
        ParseNode::Branch {
            symbol: Nonterminal::Map,
            ..
        }
        | ParseNode::Branch {
            symbol: Nonterminal::Array,
            ..
        } => reduce_map_or_array(inner),
        ParseNode::Branch {
            symbol: Nonterminal::TypedMap | Nonterminal::TypedArray,
            children,
        } => match children.as_slice() {
            [tag, body] => {
                let type_name = type_tag_name(tag)?;
                Ok(reduce_map_or_array(body)?.with_type(type_name))
            }
            _ => Err(shape_error("typed complex value", inner)),
        },
        other => Err(shape_error("map or array", other)),
    }
}

fn reduce_map_or_array(node: &ParseNode) -> Result<ValueNode, ValueError> {
    match node {
        ParseNode::Branch {
            symbol: Nonterminal::Map,
            children,
        } => {
            let mut map = MapValue::new();
            // '{' PairSeq '}' has three children; '{' '}' has two.
            if let [_, seq, _] = children.as_slice() {
                fold_pairs(seq, &mut map)?;
            }
            Ok(ValueNode::untyped(Value::Map(map)))
        }
        ParseNode::Branch {
            symbol: Nonterminal::Array,
            children,
        } => {
            let mut array = ArrayValue::new();
            if let [_, seq, _] = children.as_slice() {
                fold_elements(seq, &mut array)?;
            }
            Ok(ValueNode::untyped(Value::Array(array)))
        }
        other => Err(shape_error("map or array", other)),
    }
}

/// Accumulates an element sequence into an array, leftmost element first.
fn fold_elements(node: &ParseNode, array: &mut ArrayValue) -> Result<(), ValueError> {
    let children = branch_children(node, Nonterminal::ElementSeq)?;
    match children {
        [element] => {
            array.push(reduce_element(element)?);
            Ok(())
        }
        [rest, _separator, element] => {
            fold_elements(rest, array)?;
            array.push(reduce_element(element)?);
            Ok(())
        }
        _ => Err(shape_error("element sequence", node)),
    }
}

fn reduce_element(node: &ParseNode) -> Result<ValueNode, ValueError> {
    match node {
        ParseNode::Branch {
            symbol: Nonterminal::Scalar,
            ..
        } => reduce_scalar(node),
        ParseNode::Branch {
            symbol: Nonterminal::Path,
            ..
        } => reduce_path(node),
        ParseNode::Branch {
            symbol: Nonterminal::Complex,
            ..
        } => reduce_complex(node),
        other => Err(shape_error("array element", other)),
    }
}

/// Converts a scalar literal. Numbers try i32 first, then f64.
fn reduce_scalar(node: &ParseNode) -> Result<ValueNode, ValueError> {
    let children = branch_children(node, Nonterminal::Scalar)?;
    let token = match children {
        [ParseNode::Leaf(token)] => token,
        _ => return Err(shape_error("scalar literal", node)),
    };
    let primitive = match token.terminal {
        Terminal::StringLit => {
            // Strip the surrounding quotes; the content stays verbatim.
            Primitive::Str(token.text[1..token.text.len() - 1].to_string())
        }
        Terminal::NumberLit => {
            if let Ok(i) = token.text.parse::<i32>() {
                Primitive::Int(i)
            } else if let Ok(f) = token.text.parse::<f64>() {
                Primitive::Float(f)
            } else {
                return Err(ValueError::InvalidNumber {
                    text: token.text.clone(),
                });
            }
        }
        Terminal::BoolLit => match token.text.as_str() {
            "true" => Primitive::Bool(true),
            "false" => Primitive::Bool(false),
            _ => {
                return Err(ValueError::InvalidBoolean {
                    text: token.text.clone(),
                })
            }
        },
        _ => return Err(shape_error("literal token", node)),
    };
    Ok(ValueNode::untyped(Value::Primitive(primitive)))
}

/// Collects a dotted identifier chain, left to right.
fn reduce_path(node: &ParseNode) -> Result<ValueNode, ValueError> {
    let mut segments = Vec::new();
    let mut current = node;
    loop {
        let children = branch_children(current, Nonterminal::Path)?;
        match children {
            [ParseNode::Leaf(first), _dot, ParseNode::Leaf(last)] => {
                segments.push(first.text.clone());
                segments.push(last.text.clone());
                break;
            }
            [ParseNode::Leaf(first), _dot, rest] => {
                segments.push(first.text.clone());
                current = rest;
            }
            _ => return Err(shape_error("path chain", current)),
        }
    }
    let path = SymbolicPath::new(segments)
        .ok_or_else(|| ValueError::UnexpectedShape("path with fewer than two segments".into()))?;
    Ok(ValueNode::untyped(Value::Path(path)))
}

/// Extracts the name from a `<Name>` tag node.
fn type_tag_name(node: &ParseNode) -> Result<String, ValueError> {
    let children = branch_children(node, Nonterminal::TypeTag)?;
    match children {
        [_, ParseNode::Leaf(ident), _] if ident.terminal == Terminal::Ident => {
            Ok(ident.text.clone())
        }
        _ => Err(shape_error("type tag", node)),
    }
}

fn branch_children<'a>(
    node: &'a ParseNode,
    expected: Nonterminal,
) -> Result<&'a [ParseNode], ValueError> {
    match node {
        ParseNode::Branch { symbol, children } if *symbol == expected => Ok(children),
        other => Err(shape_error(&expected.to_string(), other)),
    }
}
