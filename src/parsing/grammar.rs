//! The fixed carta grammar.
//!
//! The accepted language, informally:
//!
//! ```text
//! Document    := Pair+
//! Pair        := Ident '=' Scalar
//!              | Ident '=' Path
//!              | TypeTag Ident '=' Scalar
//!              | Ident Complex
//! TypeTag     := '<' Ident '>'
//! Complex     := TypedMap | TypedArray | Map | Array
//! Map         := '{' Pair* '}'
//! Array       := '[' Element (',' Element)* ']' | '[' ']'
//! Element     := Scalar | Path | Complex
//! Scalar      := String | Number | Boolean
//! Path        := Ident '.' Ident
//! ```
//!
//! Paths are exactly two segments. The rule list below also declares the
//! recursive `Path := Ident Dot Path` form, but the automaton's closure
//! never expands a nonterminal from inside its own rules, so a third
//! segment is a syntax error at the second dot.
//!
//! The rule list below is the single authoritative encoding of that grammar.
//! It is declared once, in a fixed order, and consumed by the automaton
//! builder at startup; rule order is otherwise insignificant, but reduce
//! actions are reported against rule indices into this list, so tests that
//! assert on conflicts rely on it being stable.

use std::fmt;

use crate::parsing::symbol::{Nonterminal, SymbolId, Terminal};

/// A production rule: one output nonterminal and the ordered symbol sequence
/// that produces it. Immutable once declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRule {
    pub lhs: Nonterminal,
    pub rhs: Vec<SymbolId>,
}

impl GrammarRule {
    pub fn new(lhs: Nonterminal, rhs: Vec<SymbolId>) -> Self {
        GrammarRule { lhs, rhs }
    }

    /// Renders the rule with a cursor marker, e.g. `Path := Ident . Dot Ident`.
    pub fn display_with_cursor(&self, cursor: usize) -> String {
        let mut parts = Vec::with_capacity(self.rhs.len() + 1);
        for (i, sym) in self.rhs.iter().enumerate() {
            if i == cursor {
                parts.push(".".to_string());
            }
            parts.push(sym.to_string());
        }
        if cursor >= self.rhs.len() {
            parts.push(".".to_string());
        }
        format!("{} := {}", self.lhs, parts.join(" "))
    }
}

impl fmt::Display for GrammarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs: Vec<String> = self.rhs.iter().map(|s| s.to_string()).collect();
        write!(f, "{} := {}", self.lhs, rhs.join(" "))
    }
}

/// The start symbol of the built-in grammar: a document is a pair sequence.
pub const START_SYMBOL: Nonterminal = Nonterminal::PairSeq;

/// The built-in rule set, in declaration order.
pub fn rules() -> Vec<GrammarRule> {
    use Nonterminal as N;
    use Terminal as T;

    fn t(t: Terminal) -> SymbolId {
        SymbolId::Terminal(t)
    }
    fn n(n: Nonterminal) -> SymbolId {
        SymbolId::Nonterminal(n)
    }
    fn rule(lhs: Nonterminal, rhs: &[SymbolId]) -> GrammarRule {
        GrammarRule::new(lhs, rhs.to_vec())
    }

    vec![
        // TypeTag := '<' Ident '>'
        rule(N::TypeTag, &[t(T::OpenType), t(T::Ident), t(T::CloseType)]),
        // Scalar := String | Number | Boolean
        rule(N::Scalar, &[t(T::StringLit)]),
        rule(N::Scalar, &[t(T::NumberLit)]),
        rule(N::Scalar, &[t(T::BoolLit)]),
        // Path := Ident '.' Ident | Ident '.' Path
        rule(N::Path, &[t(T::Ident), t(T::Dot), t(T::Ident)]),
        rule(N::Path, &[t(T::Ident), t(T::Dot), n(N::Path)]),
        // Map := '{' PairSeq '}' | '{' '}'
        rule(N::Map, &[t(T::OpenMap), n(N::PairSeq), t(T::CloseMap)]),
        rule(N::Map, &[t(T::OpenMap), t(T::CloseMap)]),
        // Array := '[' ElementSeq ']' | '[' ']'
        rule(N::Array, &[t(T::OpenArray), n(N::ElementSeq), t(T::CloseArray)]),
        rule(N::Array, &[t(T::OpenArray), t(T::CloseArray)]),
        // TypedMap := TypeTag Map
        rule(N::TypedMap, &[n(N::TypeTag), n(N::Map)]),
        // TypedArray := TypeTag Array
        rule(N::TypedArray, &[n(N::TypeTag), n(N::Array)]),
        // Complex := TypedMap | TypedArray | Map | Array
        rule(N::Complex, &[n(N::TypedMap)]),
        rule(N::Complex, &[n(N::TypedArray)]),
        rule(N::Complex, &[n(N::Map)]),
        rule(N::Complex, &[n(N::Array)]),
        // Pair := Ident Complex | Ident '=' Scalar | Ident '=' Path
        //       | TypeTag Ident '=' Scalar
        rule(N::Pair, &[t(T::Ident), n(N::Complex)]),
        rule(N::Pair, &[t(T::Ident), t(T::Assign), n(N::Scalar)]),
        rule(N::Pair, &[t(T::Ident), t(T::Assign), n(N::Path)]),
        rule(
            N::Pair,
            &[n(N::TypeTag), t(T::Ident), t(T::Assign), n(N::Scalar)],
        ),
        // PairSeq := PairSeq Pair | Pair
        rule(N::PairSeq, &[n(N::PairSeq), n(N::Pair)]),
        rule(N::PairSeq, &[n(N::Pair)]),
        // ElementSeq := ElementSeq ',' Scalar | ElementSeq ',' Complex
        //             | ElementSeq ',' Path | Scalar | Complex | Path
        rule(
            N::ElementSeq,
            &[n(N::ElementSeq), t(T::Separator), n(N::Scalar)],
        ),
        rule(
            N::ElementSeq,
            &[n(N::ElementSeq), t(T::Separator), n(N::Complex)],
        ),
        rule(
            N::ElementSeq,
            &[n(N::ElementSeq), t(T::Separator), n(N::Path)],
        ),
        rule(N::ElementSeq, &[n(N::Scalar)]),
        rule(N::ElementSeq, &[n(N::Complex)]),
        rule(N::ElementSeq, &[n(N::Path)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_reference_resolves_to_a_declared_symbol() {
        // Every nonterminal on a right-hand side must be produced by at
        // least one rule, and every rule must have a non-empty rhs.
        let rules = rules();
        for rule in &rules {
            assert!(!rule.rhs.is_empty(), "empty rhs in {}", rule);
            for sym in &rule.rhs {
                if let Some(nt) = sym.as_nonterminal() {
                    assert!(
                        rules.iter().any(|r| r.lhs == nt),
                        "{} references unproduced nonterminal {}",
                        rule,
                        nt
                    );
                }
            }
        }
        assert!(rules.iter().any(|r| r.lhs == START_SYMBOL));
    }

    #[test]
    fn cursor_display_marks_progress() {
        let rule = GrammarRule::new(
            Nonterminal::Scalar,
            vec![SymbolId::Terminal(Terminal::NumberLit)],
        );
        assert_eq!(rule.display_with_cursor(0), "Scalar := . NumberLit");
        assert_eq!(rule.display_with_cursor(1), "Scalar := NumberLit .");
    }
}
