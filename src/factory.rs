//! Random grammar generation.
//!
//! The factory owns a small corpus of single-non-terminal template grammars
//! over the terminals `a`, `b`, `c`. Higher difficulty levels are built by
//! composing a lower-level base with a fresh template: the template's
//! non-terminal is renamed to a fresh letter, one base terminal is renamed
//! out of the template's way, and another base terminal is rewritten to the
//! template's non-terminal, knotting the two grammars together.
//!
//! Candidates then pass a feasibility filter (productivity, reachability,
//! and for LL(1) an attempt at direct-left-recursion elimination) before the
//! corresponding builder gets the final vote. The loop retries until a
//! candidate is accepted or the retry budget runs out.

use crate::error::{GrammarError, Result};
use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, GrammarDescription, Production};
use crate::ll1::Ll1Builder;
use crate::slr1::Slr1Builder;
use crate::symbol::SymbolTable;
use log::debug;
use rand::Rng;
use std::collections::BTreeSet;

/// Highest supported difficulty level.
pub const MAX_LEVEL: usize = 7;

/// Fresh non-terminal letters for levels 2..=7.
const COMPOSITE_NON_TERMINALS: [&str; 6] = ["B", "C", "D", "E", "F", "G"];

/// Terminal spellings available to the composition step.
const TERMINAL_ALPHABET: [&str; 12] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l",
];

/// A template or composed candidate: a raw production map plus its real
/// terminal set (reserved symbols excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
struct FactoryItem {
    rules: GrammarDescription,
    terminals: BTreeSet<String>,
}

impl FactoryItem {
    fn new(rules: GrammarDescription) -> Self {
        let mut terminals = BTreeSet::new();
        for alternatives in rules.values() {
            for rhs in alternatives {
                for symbol in rhs {
                    if symbol == SymbolTable::EPSILON || symbol == SymbolTable::END {
                        continue;
                    }
                    if symbol.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
                        terminals.insert(symbol.clone());
                    }
                }
            }
        }
        Self { rules, terminals }
    }
}

/// Generates candidate grammars and filters them until one satisfies the
/// requested parser family.
#[derive(Debug, Clone)]
pub struct GrammarFactory {
    items: Vec<FactoryItem>,
    retry_budget: usize,
}

impl GrammarFactory {
    pub const DEFAULT_RETRY_BUDGET: usize = 1000;

    pub fn new() -> Self {
        Self::with_retry_budget(Self::DEFAULT_RETRY_BUDGET)
    }

    pub fn with_retry_budget(retry_budget: usize) -> Self {
        Self {
            items: templates(),
            retry_budget,
        }
    }

    /// Draws a candidate description at the requested level. Level 1 is a
    /// bare template; each further level knots one more template onto the
    /// candidate. Identical choices from the random source reproduce the
    /// same description.
    pub fn pick_one<R: Rng>(&self, level: usize, rng: &mut R) -> GrammarDescription {
        let level = level.clamp(1, MAX_LEVEL);
        let mut candidate = self.pick_template(rng);
        for depth in 2..=level {
            let mut combinator = self.pick_template(rng);
            while combinator == candidate {
                combinator = self.pick_template(rng);
            }
            candidate = compose(
                candidate,
                COMPOSITE_NON_TERMINALS[depth - 2],
                &combinator,
                rng,
            );
        }
        candidate.rules
    }

    fn pick_template<R: Rng>(&self, rng: &mut R) -> FactoryItem {
        self.items[rng.gen_range(0..self.items.len())].clone()
    }

    /// True when some declared non-terminal derives no terminal string.
    /// Strict on purpose: a grammar with any non-productive non-terminal is
    /// discarded even if the axiom itself is productive.
    pub fn is_infinite(&self, grammar: &Grammar) -> bool {
        let mut productive: BTreeSet<&str> = BTreeSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for non_terminal in grammar.symbols().non_terminals() {
                if productive.contains(non_terminal) {
                    continue;
                }
                let derives = grammar.productions_of(non_terminal).iter().any(|p| {
                    p.rhs.iter().all(|s| {
                        grammar.symbols().is_terminal(s) || productive.contains(s.as_str())
                    })
                });
                if derives {
                    productive.insert(non_terminal);
                    changed = true;
                }
            }
        }
        grammar
            .symbols()
            .non_terminals()
            .any(|nt| !productive.contains(nt))
    }

    /// True when some declared non-terminal cannot be reached from the
    /// axiom.
    pub fn has_unreachable_symbols(&self, grammar: &Grammar) -> bool {
        let mut reached: BTreeSet<&str> = BTreeSet::new();
        let mut pending: Vec<&str> = vec![grammar.axiom()];
        while let Some(current) = pending.pop() {
            if !reached.insert(current) {
                continue;
            }
            for production in grammar.productions_of(current) {
                for symbol in &production.rhs {
                    if !grammar.symbols().is_terminal(symbol) && !reached.contains(symbol.as_str())
                    {
                        pending.push(symbol.as_str());
                    }
                }
            }
        }
        grammar
            .symbols()
            .non_terminals()
            .any(|nt| !reached.contains(nt))
    }

    /// True when some production starts with its own antecedent.
    pub fn has_direct_left_recursion(&self, grammar: &Grammar) -> bool {
        grammar
            .all_productions()
            .any(|p| p.rhs.first() == Some(&p.lhs))
    }

    /// Removes direct left recursion in place.
    ///
    /// For `A -> A α1 | … | A αm | β1 | … | βn` a fresh `A'` takes over the
    /// repetition: `A -> β1 A' | … | βn A'` (just `A -> A'` when every
    /// alternative was recursive) and `A' -> α1 A' | … | αm A' | EPSILON`.
    /// An EPSILON alternative of the original A is subsumed and dropped.
    pub fn remove_left_recursion(&self, grammar: &mut Grammar) {
        let antecedents: Vec<String> = grammar
            .symbols()
            .non_terminals()
            .map(str::to_string)
            .collect();
        for antecedent in antecedents {
            let productions = grammar.productions_of(&antecedent).to_vec();
            let (recursive, rest): (Vec<Production>, Vec<Production>) = productions
                .into_iter()
                .partition(|p| p.rhs.first() == Some(&p.lhs));
            if recursive.is_empty() {
                continue;
            }

            let mut fresh = format!("{antecedent}'");
            while grammar.symbols().contains(&fresh) {
                fresh.push('\'');
            }

            let betas: Vec<Production> =
                rest.into_iter().filter(|p| !p.is_empty_word()).collect();
            let mut replacement: Vec<Production> = Vec::new();
            if betas.is_empty() {
                replacement.push(Production::new(antecedent.clone(), vec![fresh.clone()]));
            } else {
                for beta in betas {
                    let mut rhs = beta.rhs;
                    rhs.push(fresh.clone());
                    replacement.push(Production::new(antecedent.clone(), rhs));
                }
            }

            let mut tail_productions: Vec<Production> = Vec::new();
            for prod in recursive {
                let mut rhs: Vec<String> = prod.rhs[1..].to_vec();
                rhs.push(fresh.clone());
                tail_productions.push(Production::new(fresh.clone(), rhs));
            }
            tail_productions.push(Production::new(
                fresh.clone(),
                vec![SymbolTable::EPSILON.to_string()],
            ));

            grammar.symbols_mut().put(&fresh, false);
            grammar.rules_mut().insert(antecedent.clone(), replacement);
            grammar.rules_mut().insert(fresh, tail_productions);
        }
    }

    /// Generates a grammar the LL(1) builder accepts. Candidates with
    /// direct left recursion get one elimination attempt before the builder
    /// votes.
    pub fn gen_ll1<R: Rng>(&self, level: usize, rng: &mut R) -> Result<Grammar> {
        for attempt in 1..=self.retry_budget {
            let description = self.pick_one(level, rng);
            let mut grammar = Grammar::from_description(&description)?;
            if self.is_infinite(&grammar) || self.has_unreachable_symbols(&grammar) {
                debug!("attempt {attempt}: candidate infeasible, repicking");
                continue;
            }
            if self.has_direct_left_recursion(&grammar) {
                self.remove_left_recursion(&mut grammar);
            }
            let sets = FirstFollow::compute(&grammar);
            let mut builder = Ll1Builder::new(grammar, sets);
            if builder.build() {
                debug!("attempt {attempt}: LL(1) candidate accepted");
                return Ok(builder.into_grammar());
            }
            debug!("attempt {attempt}: LL(1) conflict, repicking");
        }
        Err(GrammarError::GenerationExhausted {
            attempts: self.retry_budget,
        })
    }

    /// Generates a grammar the SLR(1) builder accepts. The candidate is
    /// validated against an augmented copy; the returned grammar is the
    /// unaugmented one, so the caller augments again before construction.
    pub fn gen_slr1<R: Rng>(&self, level: usize, rng: &mut R) -> Result<Grammar> {
        for attempt in 1..=self.retry_budget {
            let description = self.pick_one(level, rng);
            let grammar = Grammar::from_description(&description)?;
            if self.is_infinite(&grammar) || self.has_unreachable_symbols(&grammar) {
                debug!("attempt {attempt}: candidate infeasible, repicking");
                continue;
            }
            let mut augmented = grammar.clone();
            augmented.augment();
            let sets = FirstFollow::compute(&augmented);
            let mut builder = Slr1Builder::new(augmented, sets);
            if builder.build() {
                debug!("attempt {attempt}: SLR(1) candidate accepted");
                return Ok(grammar);
            }
            debug!("attempt {attempt}: SLR(1) conflict, repicking");
        }
        Err(GrammarError::GenerationExhausted {
            attempts: self.retry_budget,
        })
    }
}

impl Default for GrammarFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// The Level-1 corpus. Each template exercises one shape: repetition,
/// bracketing, left recursion, tail recursion.
fn templates() -> Vec<FactoryItem> {
    let shapes: [&[&[&str]]; 9] = [
        &[&["a", "b", "A"], &["a"]],
        &[&["a", "b", "A"], &["a", "b"]],
        &[&["a", "A", "b"], &["EPSILON"]],
        &[&["A", "a"], &["EPSILON"]],
        &[&["a", "A"], &["EPSILON"]],
        &[&["a", "A", "c"], &["b"]],
        &[&["a", "A", "a"], &["b"]],
        &[&["A", "a"], &["b"]],
        &[&["b", "A"], &["a"]],
    ];
    shapes
        .iter()
        .map(|alternatives| {
            let mut rules = GrammarDescription::new();
            rules.insert(
                "A".to_string(),
                alternatives
                    .iter()
                    .map(|rhs| rhs.iter().map(|s| s.to_string()).collect())
                    .collect(),
            );
            FactoryItem::new(rules)
        })
        .collect()
}

/// Knots `combinator` onto `base` under the fresh non-terminal name.
fn compose<R: Rng>(
    mut base: FactoryItem,
    fresh: &str,
    combinator: &FactoryItem,
    rng: &mut R,
) -> FactoryItem {
    // The combinator's single non-terminal becomes the fresh letter.
    let mut combinator_rules = GrammarDescription::new();
    for (non_terminal, alternatives) in &combinator.rules {
        let renamed = alternatives
            .iter()
            .map(|rhs| {
                rhs.iter()
                    .map(|s| {
                        if s == non_terminal {
                            fresh.to_string()
                        } else {
                            s.clone()
                        }
                    })
                    .collect()
            })
            .collect();
        combinator_rules.insert(fresh.to_string(), renamed);
    }

    // One base terminal moves out of the combinator's alphabet.
    let spare: Vec<&str> = TERMINAL_ALPHABET
        .iter()
        .copied()
        .filter(|t| !combinator.terminals.contains(*t))
        .collect();
    let new_terminal = spare[rng.gen_range(0..spare.len())].to_string();
    let base_terminals: Vec<String> = base.terminals.iter().cloned().collect();
    let replaced = base_terminals[rng.gen_range(0..base_terminals.len())].clone();
    replace_symbol(&mut base.rules, &replaced, &new_terminal);
    base.terminals.remove(&replaced);
    base.terminals.insert(new_terminal);

    // Another base terminal is rewritten to the combinator's non-terminal.
    let base_terminals: Vec<String> = base.terminals.iter().cloned().collect();
    let target = base_terminals[rng.gen_range(0..base_terminals.len())].clone();
    replace_symbol(&mut base.rules, &target, fresh);

    let mut rules = base.rules;
    for (non_terminal, alternatives) in combinator_rules {
        rules.entry(non_terminal).or_default().extend(alternatives);
    }
    FactoryItem::new(rules)
}

fn replace_symbol(rules: &mut GrammarDescription, from: &str, to: &str) {
    for alternatives in rules.values_mut() {
        for rhs in alternatives.iter_mut() {
            for symbol in rhs.iter_mut() {
                if symbol == from {
                    *symbol = to.to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn level_two_candidates_use_both_non_terminals() {
        let factory = GrammarFactory::new();
        let mut rng = StdRng::seed_from_u64(7);
        let description = factory.pick_one(2, &mut rng);
        assert!(description.contains_key("A"));
        assert!(description.contains_key("B"));
    }

    #[test]
    fn pick_one_is_deterministic_for_a_seed() {
        let factory = GrammarFactory::new();
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        assert_eq!(
            factory.pick_one(4, &mut first),
            factory.pick_one(4, &mut second)
        );
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        let factory = GrammarFactory::with_retry_budget(0);
        let mut rng = StdRng::seed_from_u64(1);
        let err = factory.gen_ll1(1, &mut rng).unwrap_err();
        assert!(matches!(err, GrammarError::GenerationExhausted { .. }));
    }
}
