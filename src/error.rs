//! Error types for grammar construction and generation.
//!
//! Only configuration problems and generator exhaustion are errors. Table
//! conflicts are ordinary values ([`crate::ll1::Ll1Conflict`],
//! [`crate::slr1::SlrConflict`]) so that callers can still inspect the
//! partially populated tables.

use thiserror::Error;

/// Errors raised while building a grammar from a description or while
/// generating one.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Empty grammar description")]
    EmptyGrammar,

    #[error("Symbol {0:?} has no recognisable class")]
    UnknownSymbolClass(String),

    #[error("EPSILON must stand alone in a production: {antecedent} -> {rhs}")]
    EpsilonNotAlone { antecedent: String, rhs: String },

    #[error("End marker $ may only close a production of the axiom: {antecedent} -> {rhs}")]
    MisplacedEndMarker { antecedent: String, rhs: String },

    #[error("Empty production for {0}")]
    EmptyProduction(String),

    #[error("Axiom {0} has no productions")]
    MissingAxiom(String),

    #[error("Generation gave up after {attempts} candidate grammars")]
    GenerationExhausted { attempts: usize },
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
