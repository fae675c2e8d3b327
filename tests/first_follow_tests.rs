//! Unit tests for FIRST and FOLLOW set computation.

use grammar_forge::first_follow::FirstFollow;
use grammar_forge::grammar::{Grammar, GrammarDescription};
use grammar_forge::symbol::SymbolTable;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn desc(entries: &[(&str, &[&[&str]])]) -> GrammarDescription {
    entries
        .iter()
        .map(|(nt, alts)| {
            (
                nt.to_string(),
                alts.iter()
                    .map(|rhs| rhs.iter().map(|s| s.to_string()).collect())
                    .collect(),
            )
        })
        .collect()
}

fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_first_and_follow_of_tail_recursion() {
    // A -> a A | EPSILON, with the synthesised S -> A $.
    let g = Grammar::from_description(&desc(&[("A", &[&["a", "A"], &["EPSILON"]])])).unwrap();
    let sets = FirstFollow::compute(&g);

    assert_eq!(sets.first("A"), &set(&["a", "EPSILON"]));
    assert_eq!(sets.follow("A"), &set(&["$"]));
}

#[test]
fn test_expression_grammar_sets() {
    // E -> T E'; E' -> + T E' | EPSILON; T -> ( E ) | n
    let g = Grammar::from_description(&desc(&[
        ("E", &[&["T", "E'"]]),
        ("E'", &[&["+", "T", "E'"], &["EPSILON"]]),
        ("T", &[&["(", "E", ")"], &["n"]]),
    ]))
    .unwrap();
    let sets = FirstFollow::compute(&g);

    assert_eq!(sets.first("E"), &set(&["(", "n"]));
    assert_eq!(sets.first("E'"), &set(&["+", "EPSILON"]));
    assert_eq!(sets.first("T"), &set(&["(", "n"]));
    assert_eq!(sets.follow("E"), &set(&[")", "$"]));
    assert_eq!(sets.follow("E'"), &set(&[")", "$"]));
    assert_eq!(sets.follow("T"), &set(&["+", ")", "$"]));
}

#[test]
fn test_end_marker_never_enters_first() {
    let g = Grammar::from_description(&desc(&[("A", &[&["a"], &["EPSILON"]])])).unwrap();
    let sets = FirstFollow::compute(&g);

    for nt in g.symbols().non_terminals() {
        assert!(
            !sets.first(nt).contains(SymbolTable::END),
            "FIRST({nt}) contains the end marker"
        );
    }
    // The axiom production S -> A $ is nullable up to the marker, so FIRST(S)
    // picks up EPSILON instead of $.
    assert!(sets.first("S").contains(SymbolTable::EPSILON));
}

#[test]
fn test_epsilon_in_first_iff_nullable() {
    let g = Grammar::from_description(&desc(&[
        ("S", &[&["A", "B"]]),
        ("A", &[&["a"], &["EPSILON"]]),
        ("B", &[&["b"]]),
    ]))
    .unwrap();
    let sets = FirstFollow::compute(&g);

    assert!(sets.first("A").contains(SymbolTable::EPSILON));
    assert!(!sets.first("B").contains(SymbolTable::EPSILON));
    assert!(!sets.first("S").contains(SymbolTable::EPSILON));
}

#[test]
fn test_follow_seeds_axiom_with_end_marker() {
    let g = Grammar::from_description(&desc(&[
        ("S", &[&["A", "B"]]),
        ("A", &[&["a"]]),
        ("B", &[&["b"]]),
    ]))
    .unwrap();
    let sets = FirstFollow::compute(&g);
    assert!(sets.follow("S").contains(SymbolTable::END));
}

#[test]
fn test_follow_propagates_through_nullable_suffix() {
    // FOLLOW(A) must contain FIRST(B) and, because B is nullable, FOLLOW(S).
    let g = Grammar::from_description(&desc(&[
        ("S", &[&["A", "B"]]),
        ("A", &[&["a"]]),
        ("B", &[&["b"], &["EPSILON"]]),
    ]))
    .unwrap();
    let sets = FirstFollow::compute(&g);
    assert_eq!(sets.follow("A"), &set(&["b", "$"]));
}

#[test]
fn test_first_of_string() {
    let g = Grammar::from_description(&desc(&[
        ("S", &[&["A", "B"]]),
        ("A", &[&["a"], &["EPSILON"]]),
        ("B", &[&["b"]]),
    ]))
    .unwrap();
    let sets = FirstFollow::compute(&g);

    let string = vec!["A".to_string(), "B".to_string()];
    assert_eq!(sets.first_of_string(&string), set(&["a", "b"]));
    assert_eq!(sets.first_of_string(&[]), set(&["EPSILON"]));

    // Reaching the end marker reduces to EPSILON.
    let with_marker = vec!["A".to_string(), "$".to_string()];
    assert_eq!(sets.first_of_string(&with_marker), set(&["a", "EPSILON"]));
}
