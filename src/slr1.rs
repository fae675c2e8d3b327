//! SLR(1) construction: LR(0) items, the canonical collection, and the
//! ACTION/GOTO tables.
//!
//! Items reference their production by a `(non-terminal, index)` handle into
//! the grammar, so states and Reduce cells stay cheap to compare and cannot
//! dangle. The dot never moves across EPSILON or the end marker: an item
//! over the empty-word production therefore produces no action at all, and
//! reductions are keyed purely on FOLLOW of the antecedent.

use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, Production};
use crate::symbol::SymbolTable;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// An LR(0) item: a production handle plus a dot position.
///
/// The derived ordering (antecedent, production index, dot) is the
/// deterministic iteration order used everywhere a state's items are
/// visited, which keeps table construction reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lr0Item {
    pub lhs: String,
    pub production: usize,
    pub dot: usize,
}

impl Lr0Item {
    pub fn new(lhs: impl Into<String>, production: usize, dot: usize) -> Self {
        Self {
            lhs: lhs.into(),
            production,
            dot,
        }
    }

    fn rhs<'g>(&self, grammar: &'g Grammar) -> &'g [String] {
        grammar
            .production(&self.lhs, self.production)
            .map(|p| p.rhs.as_slice())
            .unwrap_or(&[])
    }

    /// Symbol to the right of the dot, or `None` past the end of the
    /// production.
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g str> {
        self.rhs(grammar).get(self.dot).map(String::as_str)
    }

    /// True when the dot sits at the very end of the right-hand side. The
    /// empty-word production never completes: its dot would have to cross
    /// EPSILON, which no transition does.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= self.rhs(grammar).len()
    }

    fn advanced(&self) -> Self {
        Self::new(self.lhs.clone(), self.production, self.dot + 1)
    }

    /// Renders the item with an interpunct dot, e.g. `A → a · A b`.
    pub fn render(&self, grammar: &Grammar) -> String {
        let rhs = self.rhs(grammar);
        let mut parts: Vec<&str> = Vec::with_capacity(rhs.len() + 1);
        for (i, symbol) in rhs.iter().enumerate() {
            if i == self.dot {
                parts.push("·");
            }
            parts.push(crate::symbol::display_name(symbol));
        }
        if self.dot >= rhs.len() {
            parts.push("·");
        }
        format!("{} → {}", self.lhs, parts.join(" "))
    }
}

/// A state of the LR(0) automaton: a closed set of items. Ids are the
/// positions in the canonical collection, assigned in discovery order.
pub type ItemSet = BTreeSet<Lr0Item>;

/// One ACTION cell. Shift destinations are read from the transition table
/// by the consumer; Reduce carries a production handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift,
    Reduce { lhs: String, production: usize },
    Accept,
}

/// First conflicting ACTION cell found while filling the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlrConflict {
    ShiftReduce {
        state: usize,
        symbol: String,
    },
    ReduceReduce {
        state: usize,
        symbol: String,
        first: Production,
        second: Production,
    },
}

/// Builds the canonical LR(0) collection and the SLR(1) ACTION/GOTO tables
/// for an augmented grammar.
#[derive(Debug)]
pub struct Slr1Builder {
    grammar: Grammar,
    sets: FirstFollow,
    states: Vec<ItemSet>,
    transitions: BTreeMap<usize, BTreeMap<String, usize>>,
    actions: BTreeMap<usize, BTreeMap<String, Action>>,
    conflict: Option<SlrConflict>,
    built: bool,
}

impl Slr1Builder {
    /// Expects a grammar whose axiom was introduced by
    /// [`Grammar::augment`], i.e. with a single production `S' -> S`.
    pub fn new(grammar: Grammar, sets: FirstFollow) -> Self {
        Self {
            grammar,
            sets,
            states: Vec::new(),
            transitions: BTreeMap::new(),
            actions: BTreeMap::new(),
            conflict: None,
            built: false,
        }
    }

    /// Computes the closure of an item set: for every item with a
    /// non-terminal after the dot, the items of all that non-terminal's
    /// productions with the dot at the start. Each non-terminal is expanded
    /// at most once per call.
    pub(crate) fn closure(grammar: &Grammar, mut items: ItemSet) -> ItemSet {
        let mut visited: BTreeSet<String> = BTreeSet::new();
        loop {
            let mut fresh: Vec<Lr0Item> = Vec::new();
            for item in &items {
                let Some(next) = item.next_symbol(grammar) else {
                    continue;
                };
                if next == SymbolTable::EPSILON || grammar.symbols().is_terminal(next) {
                    continue;
                }
                if visited.contains(next) {
                    continue;
                }
                for index in 0..grammar.productions_of(next).len() {
                    fresh.push(Lr0Item::new(next, index, 0));
                }
                visited.insert(next.to_string());
            }
            let before = items.len();
            items.extend(fresh);
            if items.len() == before {
                return items;
            }
        }
    }

    /// δ(I, X): advance the dot over `X` in every item that allows it, then
    /// close. `X` ranges over grammar symbols other than EPSILON and the
    /// end marker.
    pub(crate) fn goto_set(grammar: &Grammar, items: &ItemSet, symbol: &str) -> ItemSet {
        let mut moved = ItemSet::new();
        for item in items {
            if item.next_symbol(grammar) == Some(symbol) {
                moved.insert(item.advanced());
            }
        }
        if moved.is_empty() {
            return moved;
        }
        Self::closure(grammar, moved)
    }

    fn build_automaton(&mut self) {
        let initial_item = Lr0Item::new(self.grammar.axiom(), 0, 0);
        let initial = Self::closure(&self.grammar, ItemSet::from([initial_item]));

        let mut index: HashMap<ItemSet, usize> = HashMap::new();
        index.insert(initial.clone(), 0);
        self.states.push(initial);

        let mut pending: VecDeque<usize> = VecDeque::from([0]);
        while let Some(current) = pending.pop_front() {
            let state = self.states[current].clone();

            let mut next_symbols: BTreeSet<&str> = BTreeSet::new();
            for item in &state {
                if let Some(next) = item.next_symbol(&self.grammar) {
                    if next != SymbolTable::EPSILON && next != SymbolTable::END {
                        next_symbols.insert(next);
                    }
                }
            }

            for symbol in next_symbols {
                let next_state = Self::goto_set(&self.grammar, &state, symbol);
                let id = match index.get(&next_state) {
                    Some(&existing) => existing,
                    None => {
                        let id = self.states.len();
                        index.insert(next_state.clone(), id);
                        self.states.push(next_state);
                        pending.push_back(id);
                        id
                    }
                };
                self.transitions
                    .entry(current)
                    .or_default()
                    .insert(symbol.to_string(), id);
            }
        }
        debug!("canonical collection has {} states", self.states.len());
    }

    fn record_conflict(&mut self, conflict: SlrConflict) {
        if self.conflict.is_none() {
            self.conflict = Some(conflict);
        }
    }

    fn fill_tables(&mut self) {
        for state_id in 0..self.states.len() {
            let state = self.states[state_id].clone();
            for item in &state {
                if item.is_complete(&self.grammar) {
                    if item.lhs == self.grammar.axiom() {
                        self.actions
                            .entry(state_id)
                            .or_default()
                            .insert(SymbolTable::END.to_string(), Action::Accept);
                    } else {
                        self.reduce_on_follow(state_id, item);
                    }
                    continue;
                }
                let Some(next) = item.next_symbol(&self.grammar).map(str::to_string) else {
                    continue;
                };
                if next == SymbolTable::EPSILON
                    || next == SymbolTable::END
                    || !self.grammar.symbols().is_terminal(&next)
                {
                    continue;
                }
                let existing = self
                    .actions
                    .get(&state_id)
                    .and_then(|row| row.get(&next))
                    .cloned();
                match existing {
                    None => {
                        self.actions
                            .entry(state_id)
                            .or_default()
                            .insert(next, Action::Shift);
                    }
                    Some(Action::Shift) | Some(Action::Accept) => {}
                    Some(Action::Reduce { .. }) => {
                        self.record_conflict(SlrConflict::ShiftReduce {
                            state: state_id,
                            symbol: next,
                        });
                    }
                }
            }
        }
    }

    fn reduce_on_follow(&mut self, state_id: usize, item: &Lr0Item) {
        let follows: Vec<String> = self.sets.follow(&item.lhs).iter().cloned().collect();
        for symbol in follows {
            let existing = self
                .actions
                .get(&state_id)
                .and_then(|row| row.get(&symbol))
                .cloned();
            match existing {
                None => {
                    self.actions.entry(state_id).or_default().insert(
                        symbol,
                        Action::Reduce {
                            lhs: item.lhs.clone(),
                            production: item.production,
                        },
                    );
                }
                Some(Action::Shift) => {
                    self.record_conflict(SlrConflict::ShiftReduce {
                        state: state_id,
                        symbol,
                    });
                }
                Some(Action::Reduce { lhs, production })
                    if lhs != item.lhs || production != item.production =>
                {
                    let first = self.grammar.production(&lhs, production).cloned();
                    let second = self
                        .grammar
                        .production(&item.lhs, item.production)
                        .cloned();
                    if let (Some(first), Some(second)) = (first, second) {
                        self.record_conflict(SlrConflict::ReduceReduce {
                            state: state_id,
                            symbol,
                            first,
                            second,
                        });
                    }
                }
                // Same production again, or the Accept cell: nothing to do.
                Some(_) => {}
            }
        }
    }

    /// Builds the automaton and both tables once. Returns `true` iff no
    /// cell clashed; on conflict the states and the partially populated
    /// tables remain available for inspection.
    pub fn build(&mut self) -> bool {
        if !self.built {
            self.build_automaton();
            self.fill_tables();
            self.built = true;
        }
        self.conflict.is_none()
    }

    /// Canonical collection in discovery order; the position is the state
    /// id.
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// Every transition of the automaton, terminals and non-terminals
    /// alike.
    pub fn transitions(&self) -> &BTreeMap<usize, BTreeMap<String, usize>> {
        &self.transitions
    }

    pub fn actions(&self) -> &BTreeMap<usize, BTreeMap<String, Action>> {
        &self.actions
    }

    /// GOTO table: the non-terminal slice of the transition table.
    pub fn gotos(&self) -> BTreeMap<usize, BTreeMap<String, usize>> {
        let mut gotos: BTreeMap<usize, BTreeMap<String, usize>> = BTreeMap::new();
        for (&state, row) in &self.transitions {
            for (symbol, &target) in row {
                if !self.grammar.symbols().is_terminal(symbol) {
                    gotos.entry(state).or_default().insert(symbol.clone(), target);
                }
            }
        }
        gotos
    }

    pub fn conflict(&self) -> Option<&SlrConflict> {
        self.conflict.as_ref()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn sets(&self) -> &FirstFollow {
        &self.sets
    }
}
