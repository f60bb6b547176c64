//! Border themes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::replace_if_changed;
use crate::core::colspec::{
    add_column_borders_to_specification, remove_column_borders_from_specification,
};
use crate::core::model::{MultiColumn, TableSnapshot};
use crate::core::options::EditOptions;
use crate::utils::changes::{ChangeSet, ChangeSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BorderTheme {
    /// No `|` and no rules anywhere
    NoBorders,
    /// A rule around every cell
    FullyBordered,
}

fn merged_cells<'s>(snapshot: &'s TableSnapshot<'_>) -> impl Iterator<Item = &'s MultiColumn> {
    snapshot
        .table
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .filter_map(|cell| cell.multi_column.as_ref())
}

/// Apply a border theme to the whole table
pub fn set_borders(
    snapshot: &TableSnapshot<'_>,
    theme: BorderTheme,
    options: &EditOptions,
) -> ChangeSet {
    let rewrite: fn(&str) -> String = match theme {
        BorderTheme::NoBorders => remove_column_borders_from_specification,
        BorderTheme::FullyBordered => add_column_borders_to_specification,
    };

    let mut changes = ChangeSet::new();
    let specification = snapshot.column_specification();
    replace_if_changed(
        &mut changes,
        snapshot.positions.column_declarations,
        specification,
        rewrite(specification),
    );

    match theme {
        BorderTheme::NoBorders => {
            for rule in snapshot
                .positions
                .row_positions
                .iter()
                .flat_map(|row| row.hlines.iter())
            {
                changes.push(ChangeSpec::delete(*rule));
            }
        }
        BorderTheme::FullyBordered => add_rules(snapshot, options, &mut changes),
    }

    for multi_column in merged_cells(snapshot) {
        let embedded = snapshot.slice(multi_column.columns);
        replace_if_changed(
            &mut changes,
            multi_column.columns,
            embedded,
            rewrite(embedded),
        );
    }

    if changes.is_empty() {
        debug!(?theme, "table already has the requested borders");
    }
    changes
}

/// A leading rule on every row and a trailing rule after the last one
fn add_rules(snapshot: &TableSnapshot<'_>, options: &EditOptions, changes: &mut ChangeSet) {
    let rows = &snapshot.positions.row_positions;
    let last = rows.len().saturating_sub(1);

    for (index, row) in rows.iter().enumerate() {
        let cells = &snapshot.positions.cells[index];
        let first_cell = cells.first().map(|cell| cell.from).unwrap_or(row.to);
        if !row.hlines.iter().any(|rule| rule.to <= first_cell) {
            changes.push(ChangeSpec::insert(row.from, format!(" {} ", options.hline)));
        }

        if index != last {
            continue;
        }
        let last_cell = cells.last().map(|cell| cell.to).unwrap_or(row.from);
        if !row.hlines.iter().any(|rule| rule.from >= last_cell) {
            let trailing = if snapshot.row_separators.len() < rows.len() {
                format!(" {} {}", options.row_terminator, options.hline)
            } else {
                format!(" {}", options.hline)
            };
            changes.push(ChangeSpec::insert(row.to, trailing));
        }
    }
}
