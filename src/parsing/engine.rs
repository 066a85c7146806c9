//! Table-driven shift-reduce engine.
//!
//! The engine drives an explicit stack of alternating state markers and
//! parse nodes against the compiled action/goto tables, holding one token of
//! lookahead outside the stack:
//!
//! - Shift: push the lookahead and the target state, read the next token.
//! - Reduce: pop the rule's matched symbols (state markers interleaved),
//!   wrap them in a nonterminal node, and push it together with the goto
//!   state exposed underneath. The lookahead is not consumed.
//! - Accept: stop; exactly one node must remain on the stack, the parse
//!   tree root.
//! - Error: fail with a syntax error carrying the offending token and its
//!   position, or an end-of-stream message.
//!
//! An empty token stream is the explicit "empty document" outcome, not an
//! error. A stack that does not hold exactly one node at accept time is an
//! internal invariant violation (a table construction bug), not a user
//! error, and panics.

use std::fmt;

use crate::error::ParseError;
use crate::parsing::automaton::{Action, Automaton};
use crate::parsing::lexer::LexError;
use crate::parsing::symbol::{Nonterminal, Position, Token};

/// An unexpected token or end of stream, fatal to the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedToken { text: String, position: Position },
    UnexpectedEndOfStream,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedToken { text, position } => {
                write!(f, "unexpected symbol '{}' ({})", text, position)
            }
            SyntaxError::UnexpectedEndOfStream => write!(f, "unexpected end of stream"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// A node of the parse tree: a terminal leaf carrying its token, or a
/// nonterminal synthesized by a reduction, owning its children in matched
/// order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Leaf(Token),
    Branch {
        symbol: Nonterminal,
        children: Vec<ParseNode>,
    },
}

impl ParseNode {
    /// Position of the leftmost token under this node, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseNode::Leaf(token) => Some(token.position),
            ParseNode::Branch { children, .. } => {
                children.iter().find_map(|child| child.position())
            }
        }
    }
}

/// Stack entries alternate between state markers and parse nodes.
enum StackEntry {
    State(usize),
    Node(ParseNode),
}

/// Parses a token stream into a single parse tree.
///
/// Returns `Ok(None)` for an empty stream. Lexing errors surface through
/// the stream and abort the parse.
pub fn parse<I>(automaton: &Automaton, tokens: I) -> Result<Option<ParseNode>, ParseError>
where
    I: IntoIterator<Item = Result<Token, LexError>>,
{
    let mut tokens = tokens.into_iter();
    let mut lookahead = match tokens.next() {
        None => return Ok(None),
        Some(first) => Some(first?),
    };

    let mut stack = vec![StackEntry::State(0)];
    loop {
        let state = automaton.state(top_state(&stack));
        match state.action(lookahead.as_ref().map(|t| t.terminal)) {
            Action::Shift(target) => {
                let token = lookahead
                    .take()
                    .unwrap_or_else(|| panic!("shift action compiled into end-of-stream column"));
                stack.push(StackEntry::Node(ParseNode::Leaf(token)));
                stack.push(StackEntry::State(target));
                lookahead = tokens.next().transpose()?;
            }
            Action::Reduce(rule_index) => {
                let rule = automaton.rule(rule_index);
                let mut children = vec![None; rule.rhs.len()];
                let mut remaining = rule.rhs.len();
                while remaining > 0 {
                    match stack.pop() {
                        Some(StackEntry::Node(node)) => {
                            children[remaining - 1] = Some(node);
                            remaining -= 1;
                        }
                        Some(StackEntry::State(_)) => {}
                        None => panic!("parse stack underflow while reducing {}", rule),
                    }
                }
                let node = ParseNode::Branch {
                    symbol: rule.lhs,
                    children: children.into_iter().flatten().collect(),
                };
                let exposed = automaton.state(top_state(&stack));
                let target = exposed
                    .goto(rule.lhs)
                    .unwrap_or_else(|| panic!("missing goto for {} after reduce", rule.lhs));
                stack.push(StackEntry::Node(node));
                stack.push(StackEntry::State(target));
            }
            Action::Accept => break,
            Action::Error => {
                return Err(match lookahead {
                    Some(token) => SyntaxError::UnexpectedToken {
                        text: token.text,
                        position: token.position,
                    },
                    None => SyntaxError::UnexpectedEndOfStream,
                }
                .into());
            }
        }
    }

    // Locate the parse tree: exactly one node must remain.
    let mut root = None;
    for entry in stack {
        if let StackEntry::Node(node) = entry {
            if root.is_some() {
                panic!("multiple parse trees left on stack at accept");
            }
            root = Some(node);
        }
    }
    match root {
        Some(node) => Ok(Some(node)),
        None => panic!("no parse tree left on stack at accept"),
    }
}

/// The state marker on top of the stack. The stack always ends with one.
fn top_state(stack: &[StackEntry]) -> usize {
    match stack.last() {
        Some(StackEntry::State(state)) => *state,
        _ => panic!("parse stack does not end with a state marker"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::automaton::builtin;
    use crate::parsing::lexer::tokenize;
    use crate::parsing::symbol::Terminal;

    fn parse_source(source: &str) -> Result<Option<ParseNode>, ParseError> {
        parse(builtin(), tokenize(source))
    }

    #[test]
    fn empty_stream_yields_no_tree() {
        assert_eq!(parse_source("").unwrap(), None);
        assert_eq!(parse_source(" \t\n").unwrap(), None);
        assert_eq!(parse_source("// comment only").unwrap(), None);
    }

    #[test]
    fn single_pair_produces_pair_seq_root() {
        let root = parse_source("A = 1").unwrap().expect("non-empty tree");
        match root {
            ParseNode::Branch { symbol, children } => {
                assert_eq!(symbol, Nonterminal::PairSeq);
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected branch root, got {:?}", other),
        }
    }

    #[test]
    fn leaves_keep_token_text_and_position() {
        let root = parse_source("Key = \"v\"").unwrap().expect("tree");
        assert_eq!(root.position(), Some(Position { line: 1, column: 0 }));
        // Walk down to the identifier leaf.
        let mut node = &root;
        loop {
            match node {
                ParseNode::Branch { children, .. } => node = &children[0],
                ParseNode::Leaf(token) => {
                    assert_eq!(token.terminal, Terminal::Ident);
                    assert_eq!(token.text, "Key");
                    break;
                }
            }
        }
    }

    #[test]
    fn syntax_error_reports_token_and_position() {
        let err = parse_source("A = .2").unwrap_err();
        match err {
            ParseError::Syntax(SyntaxError::UnexpectedToken { text, position }) => {
                assert_eq!(text, ".");
                assert_eq!(position, Position { line: 1, column: 4 });
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn truncated_input_reports_end_of_stream() {
        let err = parse_source("A =").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Syntax(SyntaxError::UnexpectedEndOfStream)
        ));
    }

    #[test]
    fn lex_error_aborts_the_parse() {
        let err = parse_source("A = #").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }

    #[test]
    fn lookahead_is_not_consumed_on_reduce() {
        // Two pairs in sequence force a reduce of the first pair while the
        // second pair's identifier is the lookahead; it must then shift.
        let root = parse_source("A = 1 B = 2").unwrap().expect("tree");
        match root {
            ParseNode::Branch { symbol, children } => {
                assert_eq!(symbol, Nonterminal::PairSeq);
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected branch root, got {:?}", other),
        }
    }
}
