//! FIRST and FOLLOW set computation.
//!
//! Both sets are least fixed points over the grammar's productions, iterated
//! until no set grows. FIRST is additionally defined for whole symbol
//! strings, which is what the LL(1) prediction sets and the FOLLOW update
//! rule consume.
//!
//! The end marker never enters a FIRST set: reaching `$` while scanning a
//! string means everything before it was nullable, so the scan contributes
//! EPSILON instead.

use crate::grammar::Grammar;
use crate::symbol::SymbolTable;
use std::collections::{BTreeMap, BTreeSet};

/// An ordered set of symbol names.
pub type SymbolSet = BTreeSet<String>;

/// FIRST and FOLLOW sets of one grammar.
///
/// The FIRST map also carries the trivial terminal entries (`FIRST(a) =
/// {a}`) so that [`FirstFollow::first_of_string`] can run on lookups alone.
#[derive(Debug, Clone)]
pub struct FirstFollow {
    first: BTreeMap<String, SymbolSet>,
    follow: BTreeMap<String, SymbolSet>,
}

impl FirstFollow {
    /// Computes both fixed points for `grammar`. FOLLOW seeds the axiom
    /// with the end marker, so it must run against the grammar that will be
    /// handed to the builders (augmented, for SLR).
    pub fn compute(grammar: &Grammar) -> Self {
        let mut engine = Self {
            first: BTreeMap::new(),
            follow: BTreeMap::new(),
        };
        engine.compute_first(grammar);
        engine.compute_follow(grammar);
        engine
    }

    /// FIRST of a non-terminal (or the trivial set of a terminal).
    pub fn first(&self, symbol: &str) -> &SymbolSet {
        static EMPTY: SymbolSet = SymbolSet::new();
        self.first.get(symbol).unwrap_or(&EMPTY)
    }

    /// FOLLOW of a non-terminal.
    pub fn follow(&self, non_terminal: &str) -> &SymbolSet {
        static EMPTY: SymbolSet = SymbolSet::new();
        self.follow.get(non_terminal).unwrap_or(&EMPTY)
    }

    /// FIRST of a string of symbols.
    ///
    /// An empty string yields `{EPSILON}`. A leading terminal decides the
    /// set on its own, except for the end marker which stands for "the rest
    /// of the string is beyond the input" and therefore yields EPSILON.
    pub fn first_of_string(&self, symbols: &[String]) -> SymbolSet {
        let mut result = SymbolSet::new();
        let mut nullable_so_far = true;

        for symbol in symbols {
            if !nullable_so_far {
                break;
            }
            if symbol == SymbolTable::EPSILON {
                continue;
            }
            if symbol == SymbolTable::END {
                result.insert(SymbolTable::EPSILON.to_string());
                return result;
            }
            let first_sym = self.first(symbol);
            for s in first_sym {
                if s != SymbolTable::EPSILON {
                    result.insert(s.clone());
                }
            }
            nullable_so_far = first_sym.contains(SymbolTable::EPSILON);
        }

        if nullable_so_far {
            result.insert(SymbolTable::EPSILON.to_string());
        }
        result
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        for terminal in grammar.symbols().terminals() {
            if terminal == SymbolTable::END {
                continue;
            }
            self.first.insert(
                terminal.to_string(),
                SymbolSet::from([terminal.to_string()]),
            );
        }
        for non_terminal in grammar.symbols().non_terminals() {
            self.first.insert(non_terminal.to_string(), SymbolSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.all_productions() {
                let rhs_first = self.first_of_string(&production.rhs);
                let current = self.first.entry(production.lhs.clone()).or_default();
                let before = current.len();
                current.extend(rhs_first);
                if current.len() != before {
                    changed = true;
                }
            }
        }
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        for non_terminal in grammar.symbols().non_terminals() {
            self.follow.insert(non_terminal.to_string(), SymbolSet::new());
        }
        self.follow
            .entry(grammar.axiom().to_string())
            .or_default()
            .insert(SymbolTable::END.to_string());

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.all_productions() {
                for (i, symbol) in production.rhs.iter().enumerate() {
                    if grammar.symbols().is_terminal(symbol) {
                        continue;
                    }
                    let beta = &production.rhs[i + 1..];
                    let first_beta = self.first_of_string(beta);

                    let mut additions: Vec<String> = first_beta
                        .iter()
                        .filter(|s| *s != SymbolTable::EPSILON)
                        .cloned()
                        .collect();
                    if first_beta.contains(SymbolTable::EPSILON) {
                        additions.extend(self.follow(&production.lhs).iter().cloned());
                    }

                    let target = self.follow.entry(symbol.clone()).or_default();
                    let before = target.len();
                    target.extend(additions);
                    if target.len() != before {
                        changed = true;
                    }
                }
            }
        }
    }
}
