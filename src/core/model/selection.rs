//! Rectangular cell selection

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TableData;
use crate::utils::error::{TableError, TableResult};

/// A corner of a selection; `cell` is the logical column index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellPosition {
    pub row: usize,
    pub cell: usize,
}

impl CellPosition {
    pub fn new(row: usize, cell: usize) -> Self {
        CellPosition { row, cell }
    }
}

/// `(row, cell)`
impl From<(usize, usize)> for CellPosition {
    fn from((row, cell): (usize, usize)) -> Self {
        CellPosition::new(row, cell)
    }
}

/// Selection bounds regardless of drag direction (all inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSelection {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

/// A rectangle of cells spanned by two corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableSelection {
    pub from: CellPosition,
    pub to: CellPosition,
}

impl TableSelection {
    pub fn new(from: CellPosition, to: CellPosition) -> Self {
        TableSelection { from, to }
    }

    /// A selection of a single cell
    pub fn cell(row: usize, cell: usize) -> Self {
        let position = CellPosition::new(row, cell);
        TableSelection::new(position, position)
    }

    pub fn normalized(&self) -> NormalizedSelection {
        NormalizedSelection {
            min_x: self.from.cell.min(self.to.cell),
            max_x: self.from.cell.max(self.to.cell),
            min_y: self.from.row.min(self.to.row),
            max_y: self.from.row.max(self.to.row),
        }
    }

    pub fn width(&self) -> usize {
        let n = self.normalized();
        n.max_x - n.min_x + 1
    }

    pub fn height(&self) -> usize {
        let n = self.normalized();
        n.max_y - n.min_y + 1
    }

    fn covers_all_columns(&self, table: &TableData) -> bool {
        let n = self.normalized();
        n.min_x == 0 && n.max_x + 1 >= table.column_count()
    }

    fn covers_all_rows(&self, table: &TableData) -> bool {
        let n = self.normalized();
        n.min_y == 0 && n.max_y + 1 >= table.row_count()
    }

    pub fn spans_entire_table(&self, table: &TableData) -> bool {
        self.covers_all_rows(table) && self.covers_all_columns(table)
    }

    /// Whether `row` is selected across its full width
    pub fn is_row_selected(&self, row: usize, table: &TableData) -> bool {
        let n = self.normalized();
        (n.min_y..=n.max_y).contains(&row) && self.covers_all_columns(table)
    }

    /// Whether `column` is selected across its full height
    pub fn is_column_selected(&self, column: usize, table: &TableData) -> bool {
        let n = self.normalized();
        (n.min_x..=n.max_x).contains(&column) && self.covers_all_rows(table)
    }

    /// Whether the selection lies within a single merged cell
    pub fn is_merged_cell_selected(&self, table: &TableData) -> bool {
        let n = self.normalized();
        if n.min_y != n.max_y {
            return false;
        }
        let (Some(first), Some(last)) = (
            table.get_cell_index(n.min_y, n.min_x),
            table.get_cell_index(n.min_y, n.max_x),
        ) else {
            return false;
        };
        first == last && table.rows[n.min_y].cells[first].multi_column.is_some()
    }

    /// Widen the selection until it fully covers every merged cell it touches
    pub fn explode(&self, table: &TableData) -> TableSelection {
        let mut n = self.normalized();
        loop {
            let mut changed = false;
            for row in n.min_y..=n.max_y {
                for column in [n.min_x, n.max_x] {
                    if let Some(b) = table.get_cell_boundaries(row, column) {
                        if b.from < n.min_x {
                            n.min_x = b.from;
                            changed = true;
                        }
                        if b.to > n.max_x {
                            n.max_x = b.to;
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
        TableSelection::new(
            CellPosition::new(n.min_y, n.min_x),
            CellPosition::new(n.max_y, n.max_x),
        )
    }

    /// Check both corners address the table
    pub fn validate(&self, table: &TableData) -> TableResult<()> {
        let n = self.normalized();
        if n.max_y >= table.row_count() {
            return Err(TableError::selection(format!(
                "row {} outside table of {} rows",
                n.max_y,
                table.row_count()
            )));
        }
        if n.max_x >= table.column_count() {
            return Err(TableError::selection(format!(
                "column {} outside table of {} columns",
                n.max_x,
                table.column_count()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CellData, ColumnAlignment, ColumnDefinition, MultiColumn, RowData};
    use crate::utils::changes::Range;

    fn cell(span: usize) -> CellData {
        CellData {
            content: String::new(),
            from: 0,
            to: 0,
            multi_column: (span > 1).then(|| MultiColumn {
                from: 0,
                to: 0,
                column_span: span,
                span: Range::default(),
                columns: Range::default(),
                preamble: Range::default(),
                postamble: Range::default(),
            }),
        }
    }

    /// 3 rows x 4 columns, row 1 merges columns 1..=2
    fn table() -> TableData {
        TableData {
            rows: vec![
                RowData {
                    cells: vec![cell(1), cell(1), cell(1), cell(1)],
                },
                RowData {
                    cells: vec![cell(1), cell(2), cell(1)],
                },
                RowData {
                    cells: vec![cell(1), cell(1), cell(1), cell(1)],
                },
            ],
            columns: vec![ColumnDefinition::new(ColumnAlignment::Left); 4],
        }
    }

    #[test]
    fn test_normalized() {
        let selection = TableSelection::new(CellPosition::new(2, 3), CellPosition::new(0, 1));
        let n = selection.normalized();
        assert_eq!((n.min_x, n.max_x, n.min_y, n.max_y), (1, 3, 0, 2));
        assert_eq!(selection.width(), 3);
        assert_eq!(selection.height(), 3);
    }

    #[test]
    fn test_row_and_column_selection() {
        let table = table();
        let row = TableSelection::new(CellPosition::new(1, 0), CellPosition::new(1, 3));
        assert!(row.is_row_selected(1, &table));
        assert!(!row.is_row_selected(0, &table));
        assert!(!row.is_column_selected(0, &table));

        let column = TableSelection::new(CellPosition::new(0, 2), CellPosition::new(2, 2));
        assert!(column.is_column_selected(2, &table));
        assert!(!column.is_column_selected(1, &table));
        assert!(!column.spans_entire_table(&table));

        let all = TableSelection::new(CellPosition::new(2, 3), CellPosition::new(0, 0));
        assert!(all.spans_entire_table(&table));
    }

    #[test]
    fn test_merged_cell_selected() {
        let table = table();
        let merged = TableSelection::new(CellPosition::new(1, 1), CellPosition::new(1, 2));
        assert!(merged.is_merged_cell_selected(&table));
        assert!(TableSelection::cell(1, 1).is_merged_cell_selected(&table));
        assert!(TableSelection::cell(1, 2).is_merged_cell_selected(&table));
        assert!(!TableSelection::cell(0, 1).is_merged_cell_selected(&table));
        assert!(!TableSelection::cell(1, 3).is_merged_cell_selected(&table));

        let beyond = TableSelection::new(CellPosition::new(1, 1), CellPosition::new(1, 3));
        assert!(!beyond.is_merged_cell_selected(&table));
    }

    #[test]
    fn test_explode() {
        let table = table();
        let selection = TableSelection::new(CellPosition::new(0, 2), CellPosition::new(1, 2));
        let exploded = selection.explode(&table).normalized();
        assert_eq!((exploded.min_x, exploded.max_x), (1, 2));

        let untouched = TableSelection::cell(0, 3).explode(&table);
        assert_eq!(untouched, TableSelection::cell(0, 3));
    }

    #[test]
    fn test_validate() {
        let table = table();
        assert!(TableSelection::cell(2, 3).validate(&table).is_ok());
        assert!(TableSelection::cell(3, 0).validate(&table).is_err());
        assert!(TableSelection::cell(0, 4).validate(&table).is_err());
    }
}
