//! The crate-level error type.
//!
//! Each pipeline stage defines its own error enum next to the code that
//! raises it; `ParseError` is the umbrella the public entry points return,
//! so callers match one type regardless of which stage failed.

use std::fmt;

use crate::parsing::engine::SyntaxError;
use crate::parsing::lexer::LexError;
use crate::parsing::reduce::ValueError;

/// Any failure between source text and value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The lexer hit a character no token pattern matches.
    Lex(LexError),
    /// The token stream does not form a valid document.
    Syntax(SyntaxError),
    /// The parse tree holds a literal with no valid value.
    Value(ValueError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "lexical error: {}", err),
            ParseError::Syntax(err) => write!(f, "syntax error: {}", err),
            ParseError::Value(err) => write!(f, "value error: {}", err),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(err) => Some(err),
            ParseError::Syntax(err) => Some(err),
            ParseError::Value(err) => Some(err),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<ValueError> for ParseError {
    fn from(err: ValueError) -> Self {
        ParseError::Value(err)
    }
}
