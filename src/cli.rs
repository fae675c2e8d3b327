//! Command-line front end.
//!
//! `grammar_forge {ll|slr} LEVEL [--seed N]` generates a grammar of the
//! requested difficulty, prints it together with its FIRST/FOLLOW sets and
//! the tables of the chosen parser family, and closes with a one-line
//! verdict. All output goes to standard output; the core library performs
//! no I/O of its own.

use crate::error::Result;
use crate::factory::{GrammarFactory, MAX_LEVEL};
use crate::first_follow::FirstFollow;
use crate::ll1::Ll1Builder;
use crate::print;
use crate::slr1::Slr1Builder;
use clap::{Parser, ValueEnum};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Parser family to generate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Top-down predictive parsing.
    Ll,
    /// Bottom-up simple LR parsing.
    Slr,
}

/// Generate a random grammar and show why it is LL(1) or SLR(1).
#[derive(Debug, Parser)]
#[command(name = "grammar_forge", version)]
pub struct Cli {
    /// Parser family the grammar must satisfy.
    #[arg(value_enum)]
    mode: Mode,

    /// Difficulty level.
    #[arg(value_parser = clap::value_parser!(u8).range(1..=MAX_LEVEL as i64))]
    level: u8,

    /// Seed for the random source, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

/// Parses the command line and runs one generation request.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!("mode {:?}, level {}", cli.mode, cli.level);

    let factory = GrammarFactory::new();
    match cli.mode {
        Mode::Ll => {
            let grammar = factory.gen_ll1(cli.level as usize, &mut rng)?;
            let sets = FirstFollow::compute(&grammar);
            let mut builder = Ll1Builder::new(grammar, sets);
            let accepted = builder.build();
            report_ll1(&builder, accepted);
        }
        Mode::Slr => {
            let mut grammar = factory.gen_slr1(cli.level as usize, &mut rng)?;
            grammar.augment();
            let sets = FirstFollow::compute(&grammar);
            let mut builder = Slr1Builder::new(grammar, sets);
            let accepted = builder.build();
            report_slr1(&builder, accepted);
        }
    }
    Ok(())
}

fn report_ll1(builder: &Ll1Builder, accepted: bool) {
    println!("Grammar:");
    print!("{}", builder.grammar());
    println!();
    println!("{}", print::first_follow_table(builder.grammar(), builder.sets()));
    println!();
    println!("{}", print::ll1_table(builder));
    if let Some(conflict) = builder.conflict() {
        println!(
            "Conflict at M[{}, {}] between {} competing productions",
            conflict.non_terminal,
            conflict.terminal,
            conflict.productions.len()
        );
    }
    println!("Is LL(1)?: {accepted}");
}

fn report_slr1(builder: &Slr1Builder, accepted: bool) {
    println!("Grammar:");
    print!("{}", builder.grammar());
    println!();
    println!("{}", print::first_follow_table(builder.grammar(), builder.sets()));
    println!();
    println!("{}", print::states_table(builder));
    println!();
    println!("{}", print::action_goto_table(builder));
    println!();
    println!("Reduce Actions:");
    println!("{}", print::reduce_table(builder));
    if let Some(conflict) = builder.conflict() {
        println!("Conflict: {conflict:?}");
    }
    println!("Is SLR(1)?: {accepted}");
}
