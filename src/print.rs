//! Text renderings of the computed tables.
//!
//! Everything here returns a [`comfy_table::Table`]; the CLI decides where
//! the text goes. The set: a FIRST/FOLLOW overview, the LL(1) predictive
//! table with bracketed production lists, the state listing of the
//! canonical collection, the ACTION/GOTO grid with `S<n>` / `R` / `A`
//! cells, and a separate listing that spells out each reduce rule.

use crate::first_follow::{FirstFollow, SymbolSet};
use crate::grammar::Grammar;
use crate::ll1::Ll1Builder;
use crate::slr1::{Action, Slr1Builder};
use crate::symbol::{display_name, SymbolTable};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_row(names: impl IntoIterator<Item = String>) -> Vec<Cell> {
    names
        .into_iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn render_set(set: &SymbolSet) -> String {
    let names: Vec<&str> = set.iter().map(|s| display_name(s)).collect();
    format!("{{ {} }}", names.join(", "))
}

/// Lookahead columns of a grammar: every real terminal plus the end marker.
fn terminal_columns(grammar: &Grammar) -> Vec<String> {
    let mut columns: Vec<String> = grammar
        .symbols()
        .terminals()
        .filter(|t| *t != SymbolTable::EPSILON && *t != SymbolTable::END)
        .map(str::to_string)
        .collect();
    columns.push(SymbolTable::END.to_string());
    columns
}

/// FIRST and FOLLOW of every non-terminal.
pub fn first_follow_table(grammar: &Grammar, sets: &FirstFollow) -> Table {
    let mut table = new_table();
    table.add_row(header_row(
        ["Non-terminal", "FIRST", "FOLLOW"].map(str::to_string),
    ));
    for non_terminal in grammar.symbols().non_terminals() {
        table.add_row(vec![
            Cell::new(non_terminal),
            Cell::new(render_set(sets.first(non_terminal))),
            Cell::new(render_set(sets.follow(non_terminal))),
        ]);
    }
    table
}

/// The LL(1) predictive table. Conflicting cells simply show every
/// competing production.
pub fn ll1_table(builder: &Ll1Builder) -> Table {
    let grammar = builder.grammar();
    let columns = terminal_columns(grammar);

    let mut table = new_table();
    let mut header = vec!["Non-terminal".to_string()];
    header.extend(columns.iter().cloned());
    table.add_row(header_row(header));

    for non_terminal in grammar.symbols().non_terminals() {
        let mut row = vec![Cell::new(non_terminal)];
        let cells = builder.table().get(non_terminal);
        for terminal in &columns {
            let content = cells
                .and_then(|column| column.get(terminal))
                .map(|productions| {
                    productions
                        .iter()
                        .map(|p| {
                            let rhs: Vec<&str> =
                                p.rhs.iter().map(|s| display_name(s)).collect();
                            format!("[ {} ]", rhs.join(" "))
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(content));
        }
        table.add_row(row);
    }
    table
}

/// The canonical LR(0) collection, one row per state.
pub fn states_table(builder: &Slr1Builder) -> Table {
    let mut table = new_table();
    table.add_row(header_row(["State ID", "Items"].map(str::to_string)));
    for (id, state) in builder.states().iter().enumerate() {
        let items: Vec<String> = state
            .iter()
            .map(|item| item.render(builder.grammar()))
            .collect();
        table.add_row(vec![Cell::new(id), Cell::new(items.join("\n"))]);
    }
    table
}

/// The ACTION/GOTO grid: `S<n>` shift cells, `R` reduce markers, `A` for
/// accept, transition targets under the non-terminal columns.
pub fn action_goto_table(builder: &Slr1Builder) -> Table {
    let grammar = builder.grammar();
    let terminals = terminal_columns(grammar);
    let non_terminals: Vec<String> = grammar
        .symbols()
        .non_terminals()
        .map(str::to_string)
        .collect();

    let mut table = new_table();
    let mut header = vec!["State".to_string()];
    header.extend(terminals.iter().cloned());
    header.extend(non_terminals.iter().cloned());
    table.add_row(header_row(header));

    let gotos = builder.gotos();
    for id in 0..builder.states().len() {
        let mut row = vec![Cell::new(id)];
        let actions = builder.actions().get(&id);
        let transitions = builder.transitions().get(&id);
        for terminal in &terminals {
            let content = match actions.and_then(|row| row.get(terminal)) {
                Some(Action::Accept) => "A".to_string(),
                Some(Action::Reduce { .. }) => "R".to_string(),
                Some(Action::Shift) => transitions
                    .and_then(|row| row.get(terminal))
                    .map(|target| format!("S{target}"))
                    .unwrap_or_else(|| "S".to_string()),
                None => "-".to_string(),
            };
            row.push(Cell::new(content));
        }
        for non_terminal in &non_terminals {
            let content = gotos
                .get(&id)
                .and_then(|row| row.get(non_terminal))
                .map(|target| target.to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(content));
        }
        table.add_row(row);
    }
    table
}

/// Which production each `R` cell stands for.
pub fn reduce_table(builder: &Slr1Builder) -> Table {
    let mut table = new_table();
    table.add_row(header_row(
        ["State", "Symbol", "Production Rule"].map(str::to_string),
    ));
    for (state, row) in builder.actions() {
        for (symbol, action) in row {
            if let Action::Reduce { lhs, production } = action {
                if let Some(prod) = builder.grammar().production(lhs, *production) {
                    table.add_row(vec![
                        Cell::new(state),
                        Cell::new(symbol),
                        Cell::new(prod.to_string()),
                    ]);
                }
            }
        }
    }
    table
}
