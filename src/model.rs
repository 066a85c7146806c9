//! The value-tree model and its renderer.

pub mod render;
pub mod value;

pub use value::{ArrayValue, MapValue, Primitive, SymbolicPath, Value, ValueNode};
