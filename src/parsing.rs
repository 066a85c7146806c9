//! The parsing pipeline: source text to parse tree to value tree.
//!
//! The stages are independent and composable:
//!
//! 1. [`lexer`] turns source text into a token stream by order-precedence
//!    pattern matching.
//! 2. [`grammar`] declares the production rules; [`automaton`] compiles them
//!    into shift/reduce/goto tables at startup, rejecting conflicting
//!    grammars.
//! 3. [`engine`] drives the token stream against the tables into a parse
//!    tree.
//! 4. [`reduce`] folds the parse tree into the value-tree model.
//!
//! The crate root's [`crate::parse`] chains all four; each stage stays
//! public for callers that need the intermediate artifacts.

pub mod automaton;
pub mod engine;
pub mod grammar;
pub mod lexer;
pub mod reduce;
pub mod symbol;
