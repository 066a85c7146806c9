//! # carta
//!
//! A small configuration and data-description language.
//!
//! Documents are whitespace-insensitive sequences of key/value pairs with
//! nested maps, arrays, typed scalars, symbolic dotted paths, and optional
//! `<Type>` annotations:
//!
//! ```text
//! Title = "render farm"
//! Threads = 8
//! <Seconds> Timeout = 30
//! Mode = Render.Fast
//! Output {
//!     Path = "/tmp/out"
//!     Formats [ "exr", "png" ]
//! }
//! ```
//!
//! Dotted paths are exactly two segments: `Render.Fast` is a value,
//! `X.Y.Z` is a syntax error.
//!
//! The pipeline is an ordered-first-match lexer, an LR-style table parser
//! compiled from declarative grammar rules, and a reducer producing the
//! [`model::ValueNode`] tree. [`parse`] runs the whole pipeline; the
//! [`parsing`] module exposes each stage for callers that need tokens,
//! tables, or raw parse trees. [`translate`] defines the boundary to native
//! types, and [`model::render`] writes a value tree back out as source
//! text.

pub mod error;
pub mod model;
pub mod parsing;
pub mod translate;

pub use error::ParseError;
pub use model::{ArrayValue, MapValue, Primitive, SymbolicPath, Value, ValueNode};

/// Parses a complete document into a value tree.
///
/// Returns `Ok(None)` for a document with no content (empty, or only
/// whitespace and comments).
pub fn parse(source: &str) -> Result<Option<ValueNode>, ParseError> {
    let automaton = parsing::automaton::builtin();
    match parsing::engine::parse(automaton, parsing::lexer::tokenize(source))? {
        Some(tree) => Ok(Some(parsing::reduce::reduce(&tree)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_document() {
        let node = parse("A = 1\nB { C = \"x\" }")
            .expect("parse")
            .expect("non-empty");
        let map = node.as_map().expect("map root");
        assert_eq!(map.get("A").and_then(|n| n.as_i32()), Some(1));
        let inner = map.get("B").and_then(|n| n.as_map()).expect("nested map");
        assert_eq!(inner.get("C").and_then(|n| n.as_str()), Some("x"));
    }

    #[test]
    fn empty_document_is_none() {
        assert!(parse("").expect("parse").is_none());
        assert!(parse("  // nothing here\n").expect("parse").is_none());
    }
}
