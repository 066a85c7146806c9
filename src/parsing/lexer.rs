//! Tokenizer for carta source text.
//!
//! Tokenization is driven by a declarative pattern table: each terminal is
//! bound to a regex and a discard flag, and the table is tried *in
//! declaration order* at every scan position. The first pattern that matches
//! wins. This is order-precedence matching, not longest-match, and it is a
//! deliberate property of the format: `true` lexes as a boolean even though
//! the identifier pattern would also match, because the boolean pattern is
//! declared first.
//!
//! Discarded terminals (whitespace, comments) advance the cursor and the
//! position tracking but never reach the parser.
//!
//! Position tracking: a newline resets the column to 0 and bumps the line;
//! a tab advances the column by a fixed width of 4; `\r` does not move the
//! column; every other character advances it by 1.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::parsing::symbol::{Position, Terminal, Token};

/// Fixed tab width used for column tracking. Never 100% faithful to any
/// particular editor, but better than counting a tab as one column.
const TAB_WIDTH: usize = 4;

/// The token pattern catalog, in match-precedence order.
///
/// The string literal pattern admits `\"` inside the quotes but performs no
/// other escape handling; the number pattern requires at least one digit
/// before any decimal point, so `.2` is not a number.
const TOKEN_PATTERNS: &[(Terminal, &str, bool)] = &[
    (Terminal::Whitespace, r"\s+", true),
    (Terminal::Comment, r"//[^\n]*", true),
    (Terminal::OpenMap, r"\{", false),
    (Terminal::CloseMap, r"\}", false),
    (Terminal::OpenArray, r"\[", false),
    (Terminal::CloseArray, r"\]", false),
    (Terminal::OpenType, r"<", false),
    (Terminal::CloseType, r">", false),
    (Terminal::Assign, r"=", false),
    (Terminal::Separator, r",", false),
    (Terminal::StringLit, r#""(([^"\\])*(\\")?)*""#, false),
    (Terminal::NumberLit, r"-?([0-9]+(\.[0-9]+)?)", false),
    (Terminal::BoolLit, r"(?:false|true)", false),
    (Terminal::Ident, r"[a-zA-Z_](\w*)", false),
    (Terminal::Dot, r"\.", false),
];

/// The compiled catalog. Every pattern is anchored so a match can only start
/// at the current scan position.
static COMPILED_PATTERNS: Lazy<Vec<(Terminal, Regex, bool)>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|&(terminal, pattern, discard)| {
            let anchored = format!("^(?:{})", pattern);
            let regex = Regex::new(&anchored).expect("built-in token pattern must compile");
            (terminal, regex, discard)
        })
        .collect()
});

/// An unrecognized character in the input. Fatal to the scan: the token
/// sequence ends immediately after yielding this error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub character: char,
    pub position: Position,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized character '{}' ({})",
            escape_char(self.character),
            self.position
        )
    }
}

impl std::error::Error for LexError {}

/// Printable form of a character for diagnostics.
fn escape_char(c: char) -> String {
    match c {
        '\n' => r"\n".to_string(),
        '\r' => r"\r".to_string(),
        '\t' => r"\t".to_string(),
        '\0' => r"\0".to_string(),
        other => other.to_string(),
    }
}

/// Tokenizes the given source text.
///
/// The returned iterator is lazy, single-pass, and finite. It yields
/// `Err(LexError)` at most once, as its final item.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        source,
        offset: 0,
        position: Position::start(),
        failed: false,
    }
}

/// Lazy token sequence over a borrowed source string.
pub struct Tokens<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
    failed: bool,
}

impl<'a> Tokens<'a> {
    /// Advances the position tracker over a matched segment.
    fn advance_position(&mut self, segment: &str) {
        for c in segment.chars() {
            match c {
                '\n' => {
                    self.position.line += 1;
                    self.position.column = 0;
                }
                '\t' => self.position.column += TAB_WIDTH,
                '\r' => {}
                _ => self.position.column += 1,
            }
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        'scan: while self.offset < self.source.len() {
            let rest = &self.source[self.offset..];
            for (terminal, regex, discard) in COMPILED_PATTERNS.iter() {
                let m = match regex.find(rest) {
                    Some(m) => m,
                    None => continue,
                };
                let segment = m.as_str();
                let token_position = self.position;
                self.offset += m.end();
                self.advance_position(segment);
                if *discard {
                    continue 'scan;
                }
                return Some(Ok(Token {
                    terminal: *terminal,
                    text: segment.to_string(),
                    position: token_position,
                }));
            }
            // No pattern matched at this position.
            self.failed = true;
            let character = rest.chars().next().unwrap_or('\0');
            return Some(Err(LexError {
                character,
                position: self.position,
            }));
        }
        None
    }
}
