//! Column alignment

use tracing::debug;

use super::replace_if_changed;
use crate::core::colspec::{
    generate_column_specification, parse_column_specifications, ColumnAlignment,
};
use crate::core::model::{Range, TableSelection, TableSnapshot};
use crate::utils::changes::ChangeSet;

/// Align the fully selected columns, or the selected merged cell
pub fn set_alignment(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    alignment: ColumnAlignment,
) -> ChangeSet {
    let table = &snapshot.table;
    let n = selection.normalized();
    let mut changes = ChangeSet::new();

    if selection.is_merged_cell_selected(table) {
        let Some(multi_column) = table
            .get_cell(n.min_y, n.min_x)
            .and_then(|cell| cell.multi_column.as_ref())
        else {
            return changes;
        };
        realign(
            snapshot,
            multi_column.columns,
            |_| true,
            alignment,
            &mut changes,
        );
    } else {
        realign(
            snapshot,
            snapshot.positions.column_declarations,
            |index| {
                (n.min_x..=n.max_x).contains(&index) && selection.is_column_selected(index, table)
            },
            alignment,
            &mut changes,
        );
    }

    if changes.is_empty() {
        debug!(alignment = alignment.as_str(), "alignment unchanged");
    }
    changes
}

/// Rewrite the specifier at `range`, aligning the columns `pick` accepts
fn realign(
    snapshot: &TableSnapshot<'_>,
    range: Range,
    pick: impl Fn(usize) -> bool,
    alignment: ColumnAlignment,
    changes: &mut ChangeSet,
) {
    let specification = snapshot.slice(range);
    let mut columns = parse_column_specifications(specification);
    let mut changed = false;
    for (index, column) in columns.iter_mut().enumerate() {
        if pick(index) {
            changed |= column.set_alignment(alignment);
        }
    }
    if changed {
        replace_if_changed(
            changes,
            range,
            specification,
            generate_column_specification(&columns),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CellPosition;
    use crate::core::parser::parse_table;
    use pretty_assertions::assert_eq;

    const DOC: &str = r"\begin{tabular}{|l|c|r|} a & b & c \\ \multicolumn{2}{|l|}{d} & e \\ \end{tabular}";

    fn column(index: usize) -> TableSelection {
        TableSelection::new(CellPosition::new(0, index), CellPosition::new(1, index))
    }

    #[test]
    fn test_align_column() {
        let snapshot = parse_table(DOC).unwrap();
        let changes = set_alignment(&snapshot, &column(1), ColumnAlignment::Right);
        let result = changes.apply(DOC).unwrap();
        assert!(result.starts_with(r"\begin{tabular}{|l|r|r|}"));
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_same_alignment_is_noop() {
        let snapshot = parse_table(DOC).unwrap();
        assert!(set_alignment(&snapshot, &column(2), ColumnAlignment::Right).is_empty());
    }

    #[test]
    fn test_partial_column_is_ignored() {
        let snapshot = parse_table(DOC).unwrap();
        let changes = set_alignment(&snapshot, &TableSelection::cell(0, 1), ColumnAlignment::Left);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_align_merged_cell() {
        let snapshot = parse_table(DOC).unwrap();
        let merged = TableSelection::new(CellPosition::new(1, 0), CellPosition::new(1, 1));
        let result = set_alignment(&snapshot, &merged, ColumnAlignment::Center)
            .apply(DOC)
            .unwrap();
        assert!(result.contains(r"\multicolumn{2}{|c|}{d}"));
        assert!(result.starts_with(r"\begin{tabular}{|l|c|r|}"));
    }

    #[test]
    fn test_align_clicked_merged_cell() {
        let snapshot = parse_table(DOC).unwrap();
        let changes = set_alignment(&snapshot, &TableSelection::cell(1, 0), ColumnAlignment::Right);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes.apply(DOC).unwrap(),
            r"\begin{tabular}{|l|c|r|} a & b & c \\ \multicolumn{2}{|r|}{d} & e \\ \end{tabular}"
        );
    }
}
