//! Grammar representation and description intake.
//!
//! A grammar maps each non-terminal to an ordered list of productions and
//! carries a designated axiom plus the symbol table that classifies every
//! symbol occurring on a right-hand side. Grammars are built in one shot
//! from a [`GrammarDescription`] and are immutable afterwards except through
//! the factory's transformations (left-recursion removal, augmentation).

use crate::error::{GrammarError, Result};
use crate::symbol::{display_name, SymbolKind, SymbolTable};
use std::collections::BTreeMap;
use std::fmt;

/// Wire-contract form of a grammar: non-terminal name to list of
/// productions, each production a list of symbol names.
pub type GrammarDescription = BTreeMap<String, Vec<Vec<String>>>;

/// A production rule `lhs -> rhs`. The empty right-hand side is spelled as
/// the single symbol `EPSILON`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl Production {
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs,
        }
    }

    /// True when the right-hand side is the empty word.
    pub fn is_empty_word(&self) -> bool {
        self.rhs.len() == 1 && self.rhs[0] == SymbolTable::EPSILON
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs: Vec<&str> = self.rhs.iter().map(|s| display_name(s)).collect();
        write!(f, "{} → {}", self.lhs, rhs.join(" "))
    }
}

/// A context-free grammar with a designated axiom.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: BTreeMap<String, Vec<Production>>,
    axiom: String,
    symbols: SymbolTable,
}

impl Grammar {
    /// Builds a grammar from a description, validating every symbol and the
    /// EPSILON / end-marker placement rules.
    ///
    /// If the description does not define `"S"`, a default axiom is
    /// synthesised as `S -> A $` where `A` is the lexicographically smallest
    /// non-terminal. The end marker may only close a production of the
    /// axiom, which is what legitimises its appearance there.
    pub fn from_description(description: &GrammarDescription) -> Result<Self> {
        if description.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut symbols = SymbolTable::new();
        for (antecedent, alternatives) in description {
            if SymbolTable::classify(antecedent)? != SymbolKind::NonTerminal {
                return Err(GrammarError::UnknownSymbolClass(antecedent.clone()));
            }
            symbols.put(antecedent, false);
            for rhs in alternatives {
                if rhs.is_empty() {
                    return Err(GrammarError::EmptyProduction(antecedent.clone()));
                }
                for symbol in rhs {
                    let kind = SymbolTable::classify(symbol)?;
                    symbols.put(symbol, kind == SymbolKind::Terminal);
                }
                Self::check_reserved_placement(antecedent, rhs)?;
            }
        }

        let mut rules: BTreeMap<String, Vec<Production>> = BTreeMap::new();
        for (antecedent, alternatives) in description {
            let prods = alternatives
                .iter()
                .map(|rhs| Production::new(antecedent.clone(), rhs.clone()))
                .collect();
            rules.insert(antecedent.clone(), prods);
        }

        let axiom = "S".to_string();
        if let Some(prods) = rules.get(&axiom) {
            if prods.is_empty() {
                return Err(GrammarError::MissingAxiom(axiom));
            }
        } else {
            if symbols.contains(&axiom) {
                // S occurs on a right-hand side but has no productions.
                return Err(GrammarError::MissingAxiom(axiom));
            }
            let entry = symbols
                .non_terminals()
                .next()
                .map(str::to_string)
                .ok_or(GrammarError::EmptyGrammar)?;
            symbols.put(&axiom, false);
            rules.insert(
                axiom.clone(),
                vec![Production::new(
                    axiom.clone(),
                    vec![entry, SymbolTable::END.to_string()],
                )],
            );
        }

        Ok(Self {
            rules,
            axiom,
            symbols,
        })
    }

    fn check_reserved_placement(antecedent: &str, rhs: &[String]) -> Result<()> {
        if rhs.len() > 1 && rhs.iter().any(|s| s == SymbolTable::EPSILON) {
            return Err(GrammarError::EpsilonNotAlone {
                antecedent: antecedent.to_string(),
                rhs: rhs.join(" "),
            });
        }
        for (i, symbol) in rhs.iter().enumerate() {
            if symbol == SymbolTable::END && (antecedent != "S" || i + 1 != rhs.len()) {
                return Err(GrammarError::MisplacedEndMarker {
                    antecedent: antecedent.to_string(),
                    rhs: rhs.join(" "),
                });
            }
        }
        Ok(())
    }

    /// Appends a production to `antecedent`, registering any new symbols.
    pub fn add(&mut self, antecedent: &str, rhs: Vec<String>) -> Result<()> {
        if rhs.is_empty() {
            return Err(GrammarError::EmptyProduction(antecedent.to_string()));
        }
        self.symbols.put(antecedent, false);
        for symbol in &rhs {
            let kind = SymbolTable::classify(symbol)?;
            self.symbols.put(symbol, kind == SymbolKind::Terminal);
        }
        self.rules
            .entry(antecedent.to_string())
            .or_default()
            .push(Production::new(antecedent, rhs));
        Ok(())
    }

    /// Ordered productions of one non-terminal.
    pub fn productions_of(&self, antecedent: &str) -> &[Production] {
        self.rules
            .get(antecedent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves a (non-terminal, production-index) handle.
    pub fn production(&self, antecedent: &str, index: usize) -> Option<&Production> {
        self.rules.get(antecedent).and_then(|prods| prods.get(index))
    }

    /// All productions, ordered by antecedent and then by position.
    pub fn all_productions(&self) -> impl Iterator<Item = &Production> {
        self.rules.values().flatten()
    }

    /// Every `(antecedent, production)` whose right-hand side mentions
    /// `symbol`.
    pub fn filter_by_rhs_occurrence(&self, symbol: &str) -> Vec<(&str, &Production)> {
        let mut out = Vec::new();
        for (antecedent, prods) in &self.rules {
            for prod in prods {
                if prod.rhs.iter().any(|s| s == symbol) {
                    out.push((antecedent.as_str(), prod));
                }
            }
        }
        out
    }

    /// True when `antecedent` has an empty-word production.
    pub fn has_empty(&self, antecedent: &str) -> bool {
        self.productions_of(antecedent)
            .iter()
            .any(Production::is_empty_word)
    }

    pub fn set_axiom(&mut self, axiom: &str) {
        self.axiom = axiom.to_string();
    }

    /// Introduces a fresh start symbol `S'` with the single production
    /// `S' -> S` and makes it the axiom. Run before SLR construction so the
    /// accept condition is detectable unambiguously.
    pub fn augment(&mut self) {
        let mut fresh = format!("{}'", self.axiom);
        while self.symbols.contains(&fresh) {
            fresh.push('\'');
        }
        self.symbols.put(&fresh, false);
        self.rules.insert(
            fresh.clone(),
            vec![Production::new(fresh.clone(), vec![self.axiom.clone()])],
        );
        self.axiom = fresh;
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn rules_mut(&mut self) -> &mut BTreeMap<String, Vec<Production>> {
        &mut self.rules
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (antecedent, prods) in &self.rules {
            let alts: Vec<String> = prods
                .iter()
                .map(|p| {
                    p.rhs
                        .iter()
                        .map(|s| display_name(s))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            writeln!(f, "{} → {}", antecedent, alts.join(" | "))?;
        }
        Ok(())
    }
}
