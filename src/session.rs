//! Public entry points.
//!
//! Each call owns everything it builds: a grammar, its FIRST/FOLLOW sets,
//! and one builder. Builders are pure over their inputs, so identical
//! descriptions produce identical tables, and independent calls can run in
//! parallel without sharing anything.

use crate::error::Result;
use crate::factory::GrammarFactory;
use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, GrammarDescription};
use crate::ll1::Ll1Builder;
use crate::slr1::Slr1Builder;
use rand::Rng;

/// Builds the LL(1) predictive table for a grammar description.
///
/// The returned builder carries the grammar, the sets, the (complete)
/// table, and the first conflict if the grammar is not LL(1).
pub fn build_ll1(description: &GrammarDescription) -> Result<Ll1Builder> {
    let grammar = Grammar::from_description(description)?;
    let sets = FirstFollow::compute(&grammar);
    let mut builder = Ll1Builder::new(grammar, sets);
    builder.build();
    Ok(builder)
}

/// Builds the SLR(1) automaton and ACTION/GOTO tables for a grammar
/// description. The grammar is augmented before construction.
pub fn build_slr1(description: &GrammarDescription) -> Result<Slr1Builder> {
    let mut grammar = Grammar::from_description(description)?;
    grammar.augment();
    let sets = FirstFollow::compute(&grammar);
    let mut builder = Slr1Builder::new(grammar, sets);
    builder.build();
    Ok(builder)
}

/// Generates a grammar of the given difficulty that the LL(1) builder
/// accepts.
pub fn generate_ll1<R: Rng>(level: usize, rng: &mut R) -> Result<Grammar> {
    GrammarFactory::new().gen_ll1(level, rng)
}

/// Generates a grammar of the given difficulty that the SLR(1) builder
/// accepts.
pub fn generate_slr1<R: Rng>(level: usize, rng: &mut R) -> Result<Grammar> {
    GrammarFactory::new().gen_slr1(level, rng)
}
