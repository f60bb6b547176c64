//! Merging and unmerging cells

use tracing::debug;

use crate::core::colspec::{
    generate_column_specification, parse_column_specifications, ColumnDefinition,
};
use crate::core::model::{Range, TableSelection, TableSnapshot};
use crate::core::options::EditOptions;
use crate::utils::changes::{ChangeSet, ChangeSpec};

/// Collapse a single-row selection into one `\multicolumn` cell
///
/// Merged cells already inside the selection are absorbed whole, so the
/// result never nests `\multicolumn`. Cell contents are joined with spaces.
pub fn merge_cells(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    options: &EditOptions,
) -> ChangeSet {
    let table = &snapshot.table;
    let n = selection.normalized();
    if n.min_y != n.max_y || n.min_x == n.max_x {
        debug!("merge needs a single row and at least two columns");
        return ChangeSet::new();
    }
    let row = n.min_y;

    let (Some(first), Some(last)) = (
        table.get_cell_index(row, n.min_x),
        table.get_cell_index(row, n.max_x),
    ) else {
        return ChangeSet::new();
    };
    if first == last {
        debug!("selection lies inside one merged cell");
        return ChangeSet::new();
    }
    let (Some(start), Some(end)) = (
        table.get_cell_boundaries(row, n.min_x),
        table.get_cell_boundaries(row, n.max_x),
    ) else {
        return ChangeSet::new();
    };

    let cells = &table.rows[row].cells[first..=last];
    let content = cells
        .iter()
        .map(|cell| cell.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let content = content.trim();

    let mut column = ColumnDefinition::new(options.merge_alignment);
    if options.merge_inherits_borders {
        let declared = parse_column_specifications(snapshot.column_specification());
        column.border_left = declared.get(start.from).map_or(0, |c| c.border_left);
        column.border_right = declared.get(end.to).map_or(0, |c| c.border_right);
    }

    let span = end.to - start.from + 1;
    let merged = format!(
        "\\multicolumn{{{}}}{{{}}}{{{}}}",
        span,
        generate_column_specification(std::slice::from_ref(&column)),
        content
    );
    let range = Range::new(cells[0].outer().from, cells[cells.len() - 1].outer().to);

    std::iter::once(ChangeSpec::replace(range, merged)).collect()
}

/// Split the merged cell at the selection origin back into plain cells
pub fn unmerge_cells(
    snapshot: &TableSnapshot<'_>,
    selection: &TableSelection,
    options: &EditOptions,
) -> ChangeSet {
    let Some(multi_column) = snapshot
        .table
        .get_cell(selection.from.row, selection.from.cell)
        .and_then(|cell| cell.multi_column.as_ref())
    else {
        debug!("selected cell is not merged");
        return ChangeSet::new();
    };

    let separators = options
        .bare_separator()
        .repeat(multi_column.column_span.saturating_sub(1));
    [
        ChangeSpec::delete(multi_column.preamble),
        ChangeSpec::replace(multi_column.postamble, separators),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CellPosition;
    use crate::core::parser::parse_table;
    use pretty_assertions::assert_eq;

    fn row_selection(row: usize, from: usize, to: usize) -> TableSelection {
        TableSelection::new(CellPosition::new(row, from), CellPosition::new(row, to))
    }

    #[test]
    fn test_merge_plain_cells() {
        let doc = r"\begin{tabular}{llll} a & b & c & d \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();
        let result = merge_cells(&snapshot, &row_selection(0, 1, 3), &EditOptions::default())
            .apply(doc)
            .unwrap();
        assert_eq!(
            result,
            r"\begin{tabular}{llll} a & \multicolumn{3}{c}{b c d} \\ \end{tabular}"
        );
    }

    #[test]
    fn test_merge_inherits_outer_borders() {
        let doc = r"\begin{tabular}{|l|l|l|} a & b & c \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();

        let inherited = merge_cells(&snapshot, &row_selection(0, 0, 1), &EditOptions::default())
            .apply(doc)
            .unwrap();
        assert!(inherited.contains(r"\multicolumn{2}{|c|}{a b} & c"));

        let legacy = merge_cells(&snapshot, &row_selection(0, 1, 2), &EditOptions::legacy())
            .apply(doc)
            .unwrap();
        assert!(legacy.contains(r"a & \multicolumn{2}{c}{b c}"));
    }

    #[test]
    fn test_merge_absorbs_merged_cell() {
        let doc = r"\begin{tabular}{lll} \multicolumn{2}{c}{ab} & c \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();
        let result = merge_cells(&snapshot, &row_selection(0, 1, 2), &EditOptions::legacy())
            .apply(doc)
            .unwrap();
        assert_eq!(
            result,
            r"\begin{tabular}{lll} \multicolumn{3}{c}{ab c} \\ \end{tabular}"
        );
    }

    #[test]
    fn test_merge_preconditions() {
        let doc = r"\begin{tabular}{lll} a & b & c \\ d & e & f \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();
        let options = EditOptions::default();

        assert!(merge_cells(&snapshot, &TableSelection::cell(0, 1), &options).is_empty());
        let two_rows = TableSelection::new(CellPosition::new(0, 0), CellPosition::new(1, 1));
        assert!(merge_cells(&snapshot, &two_rows, &options).is_empty());
    }

    #[test]
    fn test_unmerge() {
        let doc = r"\begin{tabular}{llll} a & \multicolumn{3}{c}{b c d} \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();
        let result = unmerge_cells(&snapshot, &TableSelection::cell(0, 2), &EditOptions::default())
            .apply(doc)
            .unwrap();
        assert_eq!(result, r"\begin{tabular}{llll} a & b c d&& \\ \end{tabular}");
    }

    #[test]
    fn test_unmerge_plain_cell_is_noop() {
        let doc = r"\begin{tabular}{ll} a & b \\ \end{tabular}";
        let snapshot = parse_table(doc).unwrap();
        let changes = unmerge_cells(&snapshot, &TableSelection::cell(0, 1), &EditOptions::default());
        assert!(changes.is_empty());
    }
}
