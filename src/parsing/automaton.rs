//! LR(0) automaton construction.
//!
//! The builder runs once at initialization. It consumes the ordered grammar
//! rule list plus one synthesized goal rule (`Goal := <start nonterminal>`),
//! constructs the canonical collection of item sets, and compiles each item
//! set into a parser state: an action row indexed by terminal (plus one
//! end-of-stream column) and a goto row indexed by nonterminal.
//!
//! Construction:
//! 1. Seed state 0 with the goal item at cursor 0 and close it. Closure adds
//!    cursor-0 items for every rule producing the nonterminal expected next
//!    by some item, skipping self-recursive expansions (an item never pulls
//!    in rules for its own output symbol), repeating to a fixpoint.
//! 2. For each unresolved state and each symbol expected next by one of its
//!    items, advance the matching items, close the result, and reuse an
//!    existing structurally-equal state or allocate a new one. The
//!    transition becomes a Shift (terminal) or a goto (nonterminal).
//! 3. Every item whose cursor has reached the end of its rule stamps a
//!    Reduce over all lookahead columns of its state; the completed goal
//!    item stamps Accept on the end-of-stream column. Stamping over an
//!    existing Shift or a different Reduce is a grammar conflict and aborts
//!    the build.
//!
//! Grammar conflicts are a construction-time defect in the fixed grammar,
//! never resolved heuristically; the crate's own tests exercise them with
//! deliberately ambiguous grammars. The table for the built-in grammar is
//! built once behind a `Lazy` and shared read-only; concurrent parses
//! against it need no coordination.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::parsing::grammar::{self, GrammarRule};
use crate::parsing::symbol::{Control, Nonterminal, SymbolId, Terminal};

/// A Shift/Reduce or Reduce/Reduce collision detected while compiling the
/// action tables. Carries the offending rule, rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarConflictError {
    ShiftReduce { rule: String },
    ReduceReduce { rule: String },
}

impl fmt::Display for GrammarConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarConflictError::ShiftReduce { rule } => {
                write!(f, "shift-reduce conflict ({})", rule)
            }
            GrammarConflictError::ReduceReduce { rule } => {
                write!(f, "reduce-reduce conflict ({})", rule)
            }
        }
    }
}

impl std::error::Error for GrammarConflictError {}

/// Reference to a rule: the synthesized goal rule or an index into the
/// declared rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RuleRef {
    Goal,
    User(usize),
}

/// An LR(0) item: a rule plus how far its right-hand side has matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Item {
    rule: RuleRef,
    cursor: usize,
}

/// A closed, deduplicated item set. Ordered so two states with equal items
/// compare equal structurally.
type ItemSet = BTreeSet<Item>;

/// One cell of a state's action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    /// Reduce against the rule at this index in the declared rule list.
    Reduce(usize),
    Accept,
    Error,
}

/// A compiled parser state: one action per terminal (plus the end-of-stream
/// column) and one optional goto target per nonterminal.
#[derive(Debug, Clone)]
pub struct ParserState {
    actions: Vec<Action>,
    gotos: Vec<Option<usize>>,
}

impl ParserState {
    fn new() -> Self {
        ParserState {
            actions: vec![Action::Error; Terminal::COUNT + 1],
            gotos: vec![None; Nonterminal::COUNT],
        }
    }

    /// Action for the given lookahead; `None` is the end-of-stream column.
    pub fn action(&self, lookahead: Option<Terminal>) -> Action {
        match lookahead {
            Some(t) => self.actions[t.index()],
            None => self.actions[Terminal::COUNT],
        }
    }

    /// Successor state after reducing to the given nonterminal.
    pub fn goto(&self, nonterminal: Nonterminal) -> Option<usize> {
        self.gotos[nonterminal.index()]
    }
}

/// The compiled automaton: the declared rules plus the indexed state array.
/// Immutable once built; safe to share across concurrent parses.
#[derive(Debug)]
pub struct Automaton {
    rules: Vec<GrammarRule>,
    states: Vec<ParserState>,
}

impl Automaton {
    /// Builds the automaton for the given rule list and start nonterminal.
    ///
    /// Runs the full item-set construction and table compilation; fails fast
    /// on the first grammar conflict.
    pub fn build(
        rules: Vec<GrammarRule>,
        start: Nonterminal,
    ) -> Result<Automaton, GrammarConflictError> {
        Builder::new(&rules, start).run().map(|states| Automaton { rules, states })
    }

    /// The rule behind a `Reduce` action argument.
    pub fn rule(&self, index: usize) -> &GrammarRule {
        &self.rules[index]
    }

    pub fn state(&self, index: usize) -> &ParserState {
        &self.states[index]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// The automaton for the built-in grammar, constructed on first use.
pub fn builtin() -> &'static Automaton {
    static BUILTIN: Lazy<Automaton> = Lazy::new(|| {
        Automaton::build(grammar::rules(), grammar::START_SYMBOL)
            .expect("built-in grammar must be conflict-free")
    });
    &BUILTIN
}

/// Item-set construction and table compilation, separated from the public
/// type so the borrow of the rule list stays internal.
struct Builder<'a> {
    rules: &'a [GrammarRule],
    goal_rhs: [SymbolId; 1],
}

impl<'a> Builder<'a> {
    fn new(rules: &'a [GrammarRule], start: Nonterminal) -> Self {
        Builder {
            rules,
            goal_rhs: [SymbolId::Nonterminal(start)],
        }
    }

    fn rhs(&self, rule: RuleRef) -> &[SymbolId] {
        match rule {
            RuleRef::Goal => &self.goal_rhs,
            RuleRef::User(i) => &self.rules[i].rhs,
        }
    }

    fn lhs(&self, rule: RuleRef) -> SymbolId {
        match rule {
            RuleRef::Goal => SymbolId::Control(Control::Goal),
            RuleRef::User(i) => SymbolId::Nonterminal(self.rules[i].lhs),
        }
    }

    /// The symbol immediately after the item's cursor, if any.
    fn expected(&self, item: Item) -> Option<SymbolId> {
        self.rhs(item.rule).get(item.cursor).copied()
    }

    /// Closes an item set in place: any item whose cursor sits before a
    /// nonterminal pulls in that nonterminal's rules at cursor 0, except
    /// when the item would expand its own output symbol.
    fn close(&self, set: &mut ItemSet) {
        let mut changed = true;
        while changed {
            changed = false;
            for item in set.clone() {
                let nt = match self.expected(item) {
                    Some(SymbolId::Nonterminal(nt)) => nt,
                    _ => continue,
                };
                if self.lhs(item.rule) == SymbolId::Nonterminal(nt) {
                    continue;
                }
                for (i, rule) in self.rules.iter().enumerate() {
                    if rule.lhs == nt {
                        changed |= set.insert(Item {
                            rule: RuleRef::User(i),
                            cursor: 0,
                        });
                    }
                }
            }
        }
    }

    /// The closed successor set reached by advancing every item expecting
    /// `sym` past it.
    fn successor(&self, set: &ItemSet, sym: SymbolId) -> ItemSet {
        let mut next = ItemSet::new();
        for &item in set {
            if self.expected(item) == Some(sym) {
                next.insert(Item {
                    rule: item.rule,
                    cursor: item.cursor + 1,
                });
            }
        }
        self.close(&mut next);
        next
    }

    fn run(self) -> Result<Vec<ParserState>, GrammarConflictError> {
        // Canonical collection: item sets plus the transition on each symbol.
        let mut sets: Vec<ItemSet> = Vec::new();
        let mut transitions: Vec<BTreeMap<SymbolId, usize>> = Vec::new();

        let mut seed = ItemSet::from([Item {
            rule: RuleRef::Goal,
            cursor: 0,
        }]);
        self.close(&mut seed);
        sets.push(seed);
        transitions.push(BTreeMap::new());

        let mut unresolved = vec![0usize];
        while let Some(current) = unresolved.pop() {
            let expected: BTreeSet<SymbolId> = sets[current]
                .iter()
                .filter_map(|&item| self.expected(item))
                .collect();
            for sym in expected {
                let next = self.successor(&sets[current], sym);
                let target = match sets.iter().position(|s| *s == next) {
                    Some(existing) => existing,
                    None => {
                        sets.push(next);
                        transitions.push(BTreeMap::new());
                        unresolved.push(sets.len() - 1);
                        sets.len() - 1
                    }
                };
                transitions[current].insert(sym, target);
            }
        }

        // Compile each item set into a state row.
        let mut states = Vec::with_capacity(sets.len());
        for (set, moves) in sets.iter().zip(&transitions) {
            let mut state = ParserState::new();
            for (&sym, &target) in moves {
                match sym {
                    SymbolId::Terminal(t) => state.actions[t.index()] = Action::Shift(target),
                    SymbolId::Nonterminal(nt) => state.gotos[nt.index()] = Some(target),
                    SymbolId::Control(_) => {}
                }
            }
            for &item in set {
                if item.cursor < self.rhs(item.rule).len() {
                    continue;
                }
                match item.rule {
                    RuleRef::Goal => {
                        self.stamp(&mut state.actions, Terminal::COUNT, Action::Accept, item)?;
                    }
                    RuleRef::User(index) => {
                        for column in 0..=Terminal::COUNT {
                            self.stamp(&mut state.actions, column, Action::Reduce(index), item)?;
                        }
                    }
                }
            }
            states.push(state);
        }
        Ok(states)
    }

    /// Writes an action into a column, failing on collision with a shift or
    /// a different completed rule.
    fn stamp(
        &self,
        actions: &mut [Action],
        column: usize,
        action: Action,
        item: Item,
    ) -> Result<(), GrammarConflictError> {
        let rendered = || match item.rule {
            RuleRef::Goal => format!("Goal := {}", self.goal_rhs[0]),
            RuleRef::User(i) => self.rules[i].to_string(),
        };
        match actions[column] {
            Action::Error => {
                actions[column] = action;
                Ok(())
            }
            Action::Shift(_) => Err(GrammarConflictError::ShiftReduce { rule: rendered() }),
            existing if existing == action => Ok(()),
            _ => Err(GrammarConflictError::ReduceReduce { rule: rendered() }),
        }
    }
}
