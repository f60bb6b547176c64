//! Row and column insertion

use tracing::debug;

use super::CommandOutcome;
use crate::core::colspec::{
    generate_column_specification, parse_column_specifications, ColumnAlignment,
    ColumnDefinition,
};
use crate::core::model::{CellPosition, TableSelection, TableSnapshot};
use crate::core::options::EditOptions;
use crate::utils::changes::{ChangeSet, ChangeSpec};

/// Insert an empty row below the last or above the first selected row
///
/// Inserting below selects the new row; inserting above keeps the selection.
pub fn insert_row(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    below: bool,
    options: &EditOptions,
) -> CommandOutcome {
    let n = selection.normalized();
    let index = if below { n.max_y } else { n.min_y };
    let Some(row) = snapshot.positions.row_positions.get(index) else {
        debug!(row = index, "no row to insert next to");
        return CommandOutcome::default();
    };

    let columns = snapshot.table.column_count().max(1);
    let mut text = String::new();
    // The last row may end without a terminator
    if below && index >= snapshot.row_separators.len() {
        text.push(' ');
        text.push_str(&options.row_terminator);
    }
    text.push('\n');
    text.push_str(&options.cell_separator.repeat(columns - 1));
    text.push_str(&options.row_terminator);

    let position = if below { row.to } else { row.from };
    let changes: ChangeSet = std::iter::once(ChangeSpec::insert(position, text)).collect();

    if !below {
        return CommandOutcome::with_selection(changes, *selection);
    }
    let new_row = n.max_y + 1;
    CommandOutcome::with_selection(
        changes,
        TableSelection::new(
            CellPosition::new(new_row, 0),
            CellPosition::new(new_row, columns - 1),
        ),
    )
}

/// Insert an empty column after the last or before the first selected column
///
/// A merged cell that straddles the insertion point grows by one column
/// instead of being split.
pub fn insert_column(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    after: bool,
    options: &EditOptions,
) -> CommandOutcome {
    let table = &snapshot.table;
    let exploded = selection.explode(table);
    let n = exploded.normalized();
    let target = if after { n.max_x } else { n.min_x };
    let mut changes = ChangeSet::new();

    for row in 0..table.row_count() {
        let (Some(cell), Some(bounds)) = (
            table.get_cell(row, target),
            table.get_cell_boundaries(row, target),
        ) else {
            continue;
        };
        // Short rows stay short; their padding has no text to extend
        let written = snapshot.cell_separators[row].len() + 1;
        if table
            .get_cell_index(row, target)
            .is_some_and(|index| index >= written)
        {
            debug!(row, "skipping padded cell");
            continue;
        }

        let straddles = if after {
            bounds.to != target
        } else {
            bounds.from != target
        };
        match &cell.multi_column {
            Some(multi_column) if straddles => {
                changes.push(ChangeSpec::replace(
                    multi_column.span,
                    (multi_column.column_span + 1).to_string(),
                ));
            }
            _ => {
                let outer = cell.outer();
                let position = if after { outer.to } else { outer.from };
                changes.push(ChangeSpec::insert(position, options.cell_separator.clone()));
            }
        }
    }

    let mut columns = parse_column_specifications(snapshot.column_specification());
    let at = if after { n.max_x + 1 } else { n.min_x };
    columns.insert(
        at.min(columns.len()),
        ColumnDefinition::new(ColumnAlignment::Left),
    );
    changes.push(ChangeSpec::replace(
        snapshot.positions.column_declarations,
        generate_column_specification(&columns),
    ));

    if !after {
        return CommandOutcome::with_selection(changes, exploded);
    }
    let last_row = table.row_count().saturating_sub(1);
    CommandOutcome::with_selection(
        changes,
        TableSelection::new(
            CellPosition::new(0, n.max_x + 1),
            CellPosition::new(last_row, n.max_x + 1),
        ),
    )
}
