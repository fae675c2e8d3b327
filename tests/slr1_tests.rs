//! Unit tests for the SLR(1) builder: canonical collection, ACTION/GOTO
//! tables, and the conflict policy.

use grammar_forge::grammar::GrammarDescription;
use grammar_forge::session::build_slr1;
use grammar_forge::slr1::{Action, SlrConflict};
use grammar_forge::symbol::SymbolTable;

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

#[test]
fn test_expression_grammar_is_slr1() {
    // The classic left-recursive expression grammar with an explicit axiom.
    let builder = build_slr1(&desc(&[
        ("S", &[&["S", "+", "T"], &["T"]]),
        ("T", &[&["T", "*", "F"], &["F"]]),
        ("F", &[&["(", "S", ")"], &["i"]]),
    ]))
    .unwrap();
    assert!(builder.conflict().is_none());
    assert!(builder.states().len() > 5);
}

#[test]
fn test_left_recursive_sum_reduces_on_follow() {
    // E -> E + T | T; T -> n. The state holding the complete E -> E + T
    // item must reduce on FOLLOW(E) = { +, $ } and nothing else.
    let builder = build_slr1(&desc(&[
        ("E", &[&["E", "+", "T"], &["T"]]),
        ("T", &[&["n"]]),
    ]))
    .unwrap();
    assert!(builder.conflict().is_none());

    let sum_state = builder
        .states()
        .iter()
        .position(|state| {
            state
                .iter()
                .any(|item| item.lhs == "E" && item.production == 0 && item.dot == 3)
        })
        .expect("a state completes E -> E + T");
    let row = &builder.actions()[&sum_state];
    assert!(matches!(row["+"], Action::Reduce { ref lhs, production } if lhs == "E" && production == 0));
    assert!(matches!(row["$"], Action::Reduce { ref lhs, production } if lhs == "E" && production == 0));
}

#[test]
fn test_accept_sits_on_the_augmented_item() {
    let builder = build_slr1(&desc(&[("A", &[&["a"]])])).unwrap();
    let accept_state = builder
        .states()
        .iter()
        .position(|state| {
            state
                .iter()
                .any(|item| item.lhs == builder.grammar().axiom() && item.dot == 1)
        })
        .expect("a state completes the augmented production");
    assert_eq!(
        builder.actions()[&accept_state][SymbolTable::END],
        Action::Accept
    );
}

#[test]
fn test_first_follow_overlap_is_fine_at_item_granularity() {
    // LL(1) rejects this grammar (FIRST/FOLLOW overlap at A); the item
    // sets keep the two A-alternatives apart, so SLR(1) accepts it.
    let builder = build_slr1(&desc(&[
        ("S", &[&["A", "B"]]),
        ("A", &[&["a"], &["EPSILON"]]),
        ("B", &[&["a"]]),
    ]))
    .unwrap();
    assert!(builder.conflict().is_none());
}

#[test]
fn test_ambiguous_sum_is_a_shift_reduce_conflict() {
    // E -> E + E | n: after E + E the builder may shift another + or
    // reduce, and FOLLOW(E) contains +.
    let builder = build_slr1(&desc(&[("E", &[&["E", "+", "E"], &["n"]])])).unwrap();
    assert!(matches!(
        builder.conflict(),
        Some(SlrConflict::ShiftReduce { .. })
    ));
}

#[test]
fn test_shared_prefix_is_a_reduce_reduce_conflict() {
    // A and B both rewrite to d, and their FOLLOW sets overlap.
    let builder = build_slr1(&desc(&[
        ("S", &[&["A", "a"], &["b", "A", "c"], &["B", "c"], &["b", "B", "a"]]),
        ("A", &[&["d"]]),
        ("B", &[&["d"]]),
    ]))
    .unwrap();
    assert!(matches!(
        builder.conflict(),
        Some(SlrConflict::ReduceReduce { .. })
    ));
}

#[test]
fn test_shift_cells_always_have_transitions() {
    let builder = build_slr1(&desc(&[
        ("S", &[&["S", "+", "T"], &["T"]]),
        ("T", &[&["T", "*", "F"], &["F"]]),
        ("F", &[&["(", "S", ")"], &["i"]]),
    ]))
    .unwrap();

    for (state, row) in builder.actions() {
        for (symbol, action) in row {
            if matches!(action, Action::Shift) {
                let target = builder
                    .transitions()
                    .get(state)
                    .and_then(|t| t.get(symbol));
                assert!(
                    target.is_some(),
                    "shift in state {state} on {symbol} has no transition"
                );
            }
        }
    }
}

#[test]
fn test_reduce_cells_point_at_complete_items() {
    let builder = build_slr1(&desc(&[
        ("E", &[&["E", "+", "T"], &["T"]]),
        ("T", &[&["n"]]),
    ]))
    .unwrap();

    for (state, row) in builder.actions() {
        for action in row.values() {
            if let Action::Reduce { lhs, production } = action {
                let rhs_len = builder
                    .grammar()
                    .production(lhs, *production)
                    .unwrap()
                    .rhs
                    .len();
                assert!(
                    builder.states()[*state].contains(&grammar_forge::slr1::Lr0Item::new(
                        lhs.clone(),
                        *production,
                        rhs_len,
                    )),
                    "reduce in state {state} has no matching complete item"
                );
            }
        }
    }
}

#[test]
fn test_alternative_order_does_not_change_the_automaton() {
    let forward = build_slr1(&desc(&[
        ("E", &[&["E", "+", "T"], &["T"]]),
        ("T", &[&["n"]]),
    ]))
    .unwrap();
    let reversed = build_slr1(&desc(&[
        ("E", &[&["T"], &["E", "+", "T"]]),
        ("T", &[&["n"]]),
    ]))
    .unwrap();

    assert_eq!(forward.states().len(), reversed.states().len());
    assert_eq!(forward.conflict().is_none(), reversed.conflict().is_none());
}
