//! Row and column removal

use fxhash::FxHashSet;
use tracing::debug;

use super::CommandOutcome;
use crate::core::colspec::{generate_column_specification, parse_column_specifications};
use crate::core::model::{Range, TableSelection, TableSnapshot};
use crate::core::options::EditOptions;
use crate::utils::changes::{ChangeSet, ChangeSpec};

/// Remove the fully selected rows and columns
///
/// Selecting the whole table empties it down to one blank cell.
pub fn remove_row_or_columns(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    options: &EditOptions,
) -> CommandOutcome {
    let table = &snapshot.table;
    let n = selection.normalized();
    let columns = parse_column_specifications(snapshot.column_specification());

    if table.row_count() == 0 {
        debug!("table has no rows to remove");
        return CommandOutcome::default();
    }
    if selection.spans_entire_table(table) {
        return empty_table(snapshot, options);
    }

    let removed_rows = usize::from(selection.is_row_selected(n.min_y, table)) * selection.height();
    let removed_columns =
        usize::from(selection.is_column_selected(n.min_x, table)) * selection.width();
    let selected_columns: FxHashSet<usize> = (n.min_x..=n.max_x)
        .filter(|&column| selection.is_column_selected(column, table))
        .collect();

    let mut changes = ChangeSet::new();
    for row in n.min_y..=n.max_y.min(table.row_count() - 1) {
        if selection.is_row_selected(row, table) {
            changes.push(ChangeSpec::delete(
                snapshot.positions.row_positions[row].range(),
            ));
        } else if !selected_columns.is_empty() {
            remove_cells(snapshot, row, &selected_columns, &mut changes);
        }
    }

    if !selected_columns.is_empty() {
        let kept: Vec<_> = columns
            .iter()
            .enumerate()
            .filter(|(index, _)| !selected_columns.contains(index))
            .map(|(_, column)| column.clone())
            .collect();
        changes.push(ChangeSpec::replace(
            snapshot.positions.column_declarations,
            generate_column_specification(&kept),
        ));
    }

    if changes.is_empty() {
        debug!("no complete row or column selected");
        return CommandOutcome::default();
    }

    let rows_left = table.row_count().saturating_sub(removed_rows);
    let columns_left = columns.len().saturating_sub(removed_columns);
    CommandOutcome::with_selection(
        changes,
        TableSelection::cell(
            n.min_y.min(rows_left.saturating_sub(1)),
            n.min_x.min(columns_left.saturating_sub(1)),
        ),
    )
}

/// Delete the cells of `row` covering the selected columns
///
/// Each contiguous run of removed cells takes one adjoining separator along:
/// everything back to the end of the previous cell, or up to the separator
/// after it when the run starts the row.
fn remove_cells(
    snapshot: &TableSnapshot<'_>,
    row: usize,
    selected_columns: &FxHashSet<usize>,
    changes: &mut ChangeSet,
) {
    let table = &snapshot.table;
    let cells = &snapshot.positions.cells[row];
    let separators = &snapshot.cell_separators[row];
    let mut removed: Vec<usize> = Vec::new();

    let mut column = 0;
    while let (Some(index), Some(bounds)) = (
        table.get_cell_index(row, column),
        table.get_cell_boundaries(row, column),
    ) {
        let covered = (bounds.from..=bounds.to)
            .filter(|c| selected_columns.contains(c))
            .count();
        let span = bounds.to - bounds.from + 1;
        if covered == span {
            removed.push(index);
        } else if covered > 0 {
            if let Some(multi_column) = &table.rows[row].cells[index].multi_column {
                changes.push(ChangeSpec::replace(
                    multi_column.span,
                    (span - covered).to_string(),
                ));
            }
        }
        column = bounds.to + 1;
    }

    for run in contiguous_runs(&removed) {
        let (first, last) = (run[0], run[run.len() - 1]);
        let range = if first == 0 {
            match separators.get(last) {
                Some(separator) => Range::new(cells[first].from, separator.to),
                None => Range::new(cells[first].from, cells[last].to),
            }
        } else {
            // Padding cells of a short row have no separator and cover nothing
            Range::new(cells[first - 1].to, cells[last].to)
        };
        if !range.is_empty() {
            changes.push(ChangeSpec::delete(range));
        }
    }
}

fn contiguous_runs(indices: &[usize]) -> Vec<&[usize]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=indices.len() {
        if i == indices.len() || indices[i] != indices[i - 1] + 1 {
            if start < i {
                runs.push(&indices[start..i]);
            }
            start = i;
        }
    }
    runs
}

/// Collapse the table to a single empty row of its first column
fn empty_table(snapshot: &TableSnapshot<'_>, options: &EditOptions) -> CommandOutcome {
    let mut columns = parse_column_specifications(snapshot.column_specification());
    columns.truncate(1);
    for column in &mut columns {
        column.border_left = 0;
        column.border_right = 0;
    }

    let rows = &snapshot.positions.row_positions;
    let mut changes = ChangeSet::new();
    changes.push(ChangeSpec::replace(
        snapshot.positions.column_declarations,
        generate_column_specification(&columns),
    ));
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        changes.push(ChangeSpec::replace(
            Range::new(first.from, last.to),
            options.row_terminator.clone(),
        ));
    }
    CommandOutcome::with_selection(changes, TableSelection::cell(0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CellPosition;
    use crate::core::parser::parse_table;
    use pretty_assertions::assert_eq;

    const DOC: &str = r"\begin{tabular}{|l|c|r|} a & b & c \\ d & e & f \\ g & h & i \\ \end{tabular}";

    fn plan(doc: &str, from: (usize, usize), to: (usize, usize)) -> (String, CommandOutcome) {
        let snapshot = parse_table(doc).unwrap();
        let selection = TableSelection::new(
            CellPosition::new(from.0, from.1),
            CellPosition::new(to.0, to.1),
        );
        let outcome = remove_row_or_columns(&snapshot, &selection, &EditOptions::default());
        (outcome.changes.apply(doc).unwrap(), outcome)
    }

    #[test]
    fn test_remove_row() {
        let (result, outcome) = plan(DOC, (1, 0), (1, 2));
        assert_eq!(
            result,
            r"\begin{tabular}{|l|c|r|} a & b & c \\ g & h & i \\ \end{tabular}"
        );
        assert_eq!(outcome.selection, Some(TableSelection::cell(1, 0)));
    }

    #[test]
    fn test_remove_last_row_clamps_selection() {
        let (_, outcome) = plan(DOC, (2, 0), (2, 2));
        assert_eq!(outcome.selection, Some(TableSelection::cell(1, 0)));
    }

    #[test]
    fn test_remove_first_column() {
        let (result, outcome) = plan(DOC, (0, 0), (2, 0));
        assert_eq!(
            result,
            r"\begin{tabular}{c|r|}  b & c \\  e & f \\  h & i \\ \end{tabular}"
        );
        assert_eq!(outcome.selection, Some(TableSelection::cell(0, 0)));
    }

    #[test]
    fn test_remove_middle_columns() {
        let doc = r"\begin{tabular}{lcr} a & b & c \\ d & e & f \\ \end{tabular}";
        let (result, outcome) = plan(doc, (0, 1), (1, 2));
        assert_eq!(result, r"\begin{tabular}{l} a \\ d \\ \end{tabular}");
        assert_eq!(outcome.selection, Some(TableSelection::cell(0, 0)));
    }

    #[test]
    fn test_remove_leading_columns() {
        let doc = r"\begin{tabular}{lcr} a & b & c \\ \end{tabular}";
        let (result, _) = plan(doc, (0, 0), (0, 1));
        assert_eq!(result, r"\begin{tabular}{r}  c \\ \end{tabular}");

        let doc = r"\begin{tabular}{lcr} a & b & c \\ d & e & f \\ \end{tabular}";
        let (result, _) = plan(doc, (0, 0), (1, 1));
        assert_eq!(result, r"\begin{tabular}{r}  c \\  f \\ \end{tabular}");
    }

    #[test]
    fn test_remove_column_through_merged_cell() {
        let doc = r"\begin{tabular}{lcr} a & b & c \\ \multicolumn{2}{c}{m} & x \\ \end{tabular}";
        let (result, _) = plan(doc, (0, 1), (1, 1));
        assert_eq!(
            result,
            r"\begin{tabular}{lr} a & c \\ \multicolumn{1}{c}{m} & x \\ \end{tabular}"
        );
    }

    #[test]
    fn test_remove_column_missing_from_short_row() {
        let doc = r"\begin{tabular}{lll} a & b & c \\ d \\ \end{tabular}";
        let (result, outcome) = plan(doc, (0, 2), (1, 2));
        assert_eq!(result, r"\begin{tabular}{ll} a & b \\ d \\ \end{tabular}");
        assert_eq!(outcome.selection, Some(TableSelection::cell(0, 1)));

        let (result, _) = plan(doc, (0, 1), (1, 1));
        assert_eq!(result, r"\begin{tabular}{ll} a & c \\ d \\ \end{tabular}");
    }

    #[test]
    fn test_remove_trailing_columns_of_short_row() {
        let doc = r"\begin{tabular}{lll} a & b & c \\ d & e \\ \end{tabular}";
        let (result, _) = plan(doc, (0, 1), (1, 2));
        assert_eq!(result, r"\begin{tabular}{l} a \\ d \\ \end{tabular}");
    }

    #[test]
    fn test_empty_table() {
        let (result, outcome) = plan(DOC, (2, 2), (0, 0));
        assert_eq!(result, r"\begin{tabular}{l}\\ \end{tabular}");
        assert_eq!(outcome.selection, Some(TableSelection::cell(0, 0)));
    }

    #[test]
    fn test_partial_selection_is_noop() {
        let (_, outcome) = plan(DOC, (0, 0), (1, 1));
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.selection, None);
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(contiguous_runs(&[0, 1, 3, 5, 6]), vec![&[0, 1][..], &[3][..], &[5, 6][..]]);
        assert!(contiguous_runs(&[]).is_empty());
    }
}
