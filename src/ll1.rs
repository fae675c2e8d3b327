//! LL(1) predictive-table construction.
//!
//! For each production `A -> α` the prediction set is FIRST(α), with
//! EPSILON replaced by FOLLOW(A) when α is nullable. The table maps
//! `(non-terminal, terminal)` to the list of productions predicted there; a
//! cell with more than one entry is a conflict. Conflicts are reported as
//! values and the table is completed anyway so callers can print it.

use crate::first_follow::{FirstFollow, SymbolSet};
use crate::grammar::{Grammar, Production};
use crate::symbol::SymbolTable;
use std::collections::BTreeMap;

/// Two-level predictive table: non-terminal, then lookahead terminal.
pub type Ll1Table = BTreeMap<String, BTreeMap<String, Vec<Production>>>;

/// First conflicting cell found while filling the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
    pub non_terminal: String,
    pub terminal: String,
    /// Every production competing for the cell.
    pub productions: Vec<Production>,
}

/// Builds the LL(1) predictive table for one grammar.
#[derive(Debug)]
pub struct Ll1Builder {
    grammar: Grammar,
    sets: FirstFollow,
    table: Ll1Table,
    conflict: Option<Ll1Conflict>,
}

impl Ll1Builder {
    pub fn new(grammar: Grammar, sets: FirstFollow) -> Self {
        Self {
            grammar,
            sets,
            table: Ll1Table::new(),
            conflict: None,
        }
    }

    /// The lookahead terminals that select `production` during a
    /// predictive parse.
    pub fn prediction_symbols(&self, production: &Production) -> SymbolSet {
        let mut symbols = self.sets.first_of_string(&production.rhs);
        if symbols.remove(SymbolTable::EPSILON) {
            symbols.extend(self.sets.follow(&production.lhs).iter().cloned());
        }
        symbols
    }

    /// Fills the table. Returns `true` iff no cell received two
    /// productions; on conflict the table is still completed and the first
    /// clash is kept for diagnostics.
    pub fn build(&mut self) -> bool {
        let mut table = Ll1Table::new();
        for non_terminal in self.grammar.symbols().non_terminals() {
            table.insert(non_terminal.to_string(), BTreeMap::new());
        }

        for production in self.grammar.all_productions() {
            let prediction = self.prediction_symbols(production);
            let column = table.entry(production.lhs.clone()).or_default();
            for terminal in prediction {
                let cell = column.entry(terminal.clone()).or_default();
                cell.push(production.clone());
                if cell.len() > 1 && self.conflict.is_none() {
                    self.conflict = Some(Ll1Conflict {
                        non_terminal: production.lhs.clone(),
                        terminal,
                        productions: cell.clone(),
                    });
                }
            }
        }

        self.table = table;
        self.conflict.is_none()
    }

    pub fn table(&self) -> &Ll1Table {
        &self.table
    }

    pub fn conflict(&self) -> Option<&Ll1Conflict> {
        self.conflict.as_ref()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn sets(&self) -> &FirstFollow {
        &self.sets
    }

    /// Releases the grammar, discarding the table. The generation loop uses
    /// this to hand an accepted grammar back to the caller.
    pub fn into_grammar(self) -> Grammar {
        self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarDescription;

    fn grammar(entries: &[(&str, &[&[&str]])]) -> Grammar {
        let desc: GrammarDescription = entries
            .iter()
            .map(|(nt, alts)| {
                (
                    nt.to_string(),
                    alts.iter()
                        .map(|rhs| rhs.iter().map(|s| s.to_string()).collect())
                        .collect(),
                )
            })
            .collect();
        Grammar::from_description(&desc).unwrap()
    }

    #[test]
    fn nullable_production_predicts_follow() {
        let g = grammar(&[("A", &[&["a", "A"], &["EPSILON"]])]);
        let sets = FirstFollow::compute(&g);
        let builder = Ll1Builder::new(g, sets);
        let empty = builder.grammar().productions_of("A")[1].clone();
        let prediction = builder.prediction_symbols(&empty);
        assert!(prediction.contains("$"));
        assert!(!prediction.contains(SymbolTable::EPSILON));
    }

    #[test]
    fn conflict_is_reported_but_table_is_complete() {
        // A -> a A | a predicts `a` twice.
        let g = grammar(&[("A", &[&["a", "A"], &["a"]])]);
        let sets = FirstFollow::compute(&g);
        let mut builder = Ll1Builder::new(g, sets);
        assert!(!builder.build());
        let conflict = builder.conflict().unwrap();
        assert_eq!(conflict.non_terminal, "A");
        assert_eq!(conflict.terminal, "a");
        assert_eq!(conflict.productions.len(), 2);
        assert_eq!(builder.table()["A"]["a"].len(), 2);
    }
}
