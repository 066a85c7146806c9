//! Symbol catalog shared by the lexer, the automaton builder, and the engine.
//!
//! The grammar operates over a fixed identifier space split into three
//! disjoint categories:
//!
//!     Terminals:
//!         Lexical token categories recognized directly from source text.
//!         Densely indexed so parser action rows can be plain arrays.
//!
//!     Nonterminals:
//!         Syntactic categories synthesized by reductions. Densely indexed
//!         for the goto rows.
//!
//!     Control symbols:
//!         The synthesized goal symbol and the end-of-stream marker. These
//!         never appear in source text and never carry token text.
//!
//! `SymbolId` is the tagged union over the three categories; grammar rule
//! right-hand sides are sequences of `SymbolId`.

use std::fmt;

/// A lexical token category.
///
/// Declaration order doubles as the lexer's pattern precedence: patterns are
/// tried in this order and the first match wins. `BoolLit` must therefore
/// stay ahead of `Ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Terminal {
    Whitespace,
    Comment,
    OpenMap,
    CloseMap,
    OpenArray,
    CloseArray,
    OpenType,
    CloseType,
    Assign,
    Separator,
    StringLit,
    NumberLit,
    BoolLit,
    Ident,
    Dot,
}

impl Terminal {
    /// Number of terminal categories (the width of an action row, minus the
    /// end-of-stream column).
    pub const COUNT: usize = 15;

    /// Dense index of this terminal, for table lookup.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A syntactic category produced by a grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Nonterminal {
    TypeTag,
    Scalar,
    Path,
    Map,
    Array,
    TypedMap,
    TypedArray,
    Complex,
    Pair,
    PairSeq,
    ElementSeq,
}

impl Nonterminal {
    /// Number of nonterminal categories (the width of a goto row).
    pub const COUNT: usize = 11;

    /// Dense index of this nonterminal, for table lookup.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Symbols that exist only inside the parser, never in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    /// Left-hand side of the synthesized goal rule.
    Goal,
    /// Virtual lookahead once the token stream is exhausted.
    EndOfStream,
}

/// A symbol reference, tagged with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolId {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
    Control(Control),
}

impl SymbolId {
    pub fn as_terminal(self) -> Option<Terminal> {
        match self {
            SymbolId::Terminal(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_nonterminal(self) -> Option<Nonterminal> {
        match self {
            SymbolId::Nonterminal(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Terminal> for SymbolId {
    fn from(t: Terminal) -> Self {
        SymbolId::Terminal(t)
    }
}

impl From<Nonterminal> for SymbolId {
    fn from(n: Nonterminal) -> Self {
        SymbolId::Nonterminal(n)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolId::Terminal(t) => write!(f, "{}", t),
            SymbolId::Nonterminal(n) => write!(f, "{}", n),
            SymbolId::Control(Control::Goal) => write!(f, "Goal"),
            SymbolId::Control(Control::EndOfStream) => write!(f, "EndOfStream"),
        }
    }
}

/// A source position. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character of a document.
    pub fn start() -> Self {
        Position { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.column)
    }
}

/// A realized terminal occurrence: category, literal text, and the position
/// of its first character.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub terminal: Terminal,
    pub text: String,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_indices_are_dense() {
        assert_eq!(Terminal::Whitespace.index(), 0);
        assert_eq!(Terminal::Dot.index(), Terminal::COUNT - 1);
    }

    #[test]
    fn nonterminal_indices_are_dense() {
        assert_eq!(Nonterminal::TypeTag.index(), 0);
        assert_eq!(Nonterminal::ElementSeq.index(), Nonterminal::COUNT - 1);
    }

    #[test]
    fn symbol_display_uses_variant_names() {
        assert_eq!(SymbolId::from(Terminal::OpenMap).to_string(), "OpenMap");
        assert_eq!(SymbolId::from(Nonterminal::PairSeq).to_string(), "PairSeq");
        assert_eq!(
            SymbolId::Control(Control::EndOfStream).to_string(),
            "EndOfStream"
        );
    }
}
