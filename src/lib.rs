//! Random context-free grammar generation with LL(1) and SLR(1) table
//! construction.
//!
//! The crate generates grammars of tunable difficulty and decides, by
//! building the actual parser tables, whether each one admits a top-down
//! predictive parser or a bottom-up simple LR parser:
//!
//! - FIRST and FOLLOW fixed points over symbol strings
//! - the LL(1) predictive table with per-cell conflict detection
//! - the canonical LR(0) collection and the SLR(1) ACTION/GOTO tables
//! - a grammar factory that composes small templates into larger
//!   candidates and retries until a builder accepts one
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools"
//! (2nd Edition). Addison-Wesley, 2006.

pub mod cli;
pub mod error;
pub mod factory;
pub mod first_follow;
pub mod grammar;
pub mod ll1;
pub mod print;
pub mod session;
pub mod slr1;
pub mod symbol;

// Re-export commonly used types
pub use error::{GrammarError, Result};
pub use factory::GrammarFactory;
pub use first_follow::FirstFollow;
pub use grammar::{Grammar, GrammarDescription, Production};
pub use ll1::{Ll1Builder, Ll1Conflict};
pub use session::{build_ll1, build_slr1, generate_ll1, generate_slr1};
pub use slr1::{Action, Lr0Item, Slr1Builder, SlrConflict};
pub use symbol::SymbolTable;
