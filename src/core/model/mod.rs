//! Structural model of a tabular
//!
//! A [`TableSnapshot`] is the read-only input of every planner. All ranges are
//! byte offsets into `snapshot.doc` and become stale as soon as any change is
//! applied, so a new snapshot must be taken after each edit.

mod selection;

#[cfg(feature = "serde")]
use serde::Serialize;

pub use crate::core::colspec::{ColumnAlignment, ColumnDefinition};
pub use crate::utils::changes::Range;
pub use selection::{CellPosition, NormalizedSelection, TableSelection};

/// Separator token between two cells of a row (`&`)
pub type CellSeparator = Range;

/// Row terminator token (`\\`)
pub type RowSeparator = Range;

/// A `\multicolumn{n}{spec}{content}` wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MultiColumn {
    /// Start of `\multicolumn`
    pub from: usize,
    /// End of the closing brace of the content argument
    pub to: usize,
    /// Number of logical columns covered
    pub column_span: usize,
    /// The span number text inside the first argument
    pub span: Range,
    /// The embedded column specifier inside the second argument
    pub columns: Range,
    /// `\multicolumn{n}{spec}{`
    pub preamble: Range,
    /// The closing `}` of the content argument
    pub postamble: Range,
}

impl MultiColumn {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// A single cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CellData {
    /// Trimmed text of the cell (inner content for merged cells)
    pub content: String,
    pub from: usize,
    pub to: usize,
    pub multi_column: Option<MultiColumn>,
}

impl CellData {
    /// Number of logical columns this cell occupies
    pub fn column_span(&self) -> usize {
        self.multi_column
            .as_ref()
            .map(|m| m.column_span.max(1))
            .unwrap_or(1)
    }

    /// The merge wrapper if there is one, otherwise the content
    pub fn outer(&self) -> Range {
        self.multi_column
            .as_ref()
            .map(MultiColumn::range)
            .unwrap_or(Range::new(self.from, self.to))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RowData {
    pub cells: Vec<CellData>,
}

/// First and last logical column covered by a cell (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBoundaries {
    pub from: usize,
    pub to: usize,
}

/// Rows, cells and the parsed table-level column specifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableData {
    pub rows: Vec<RowData>,
    pub columns: Vec<ColumnDefinition>,
}

impl TableData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of real columns; merged cells do not add any
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the cell covering logical `column` in `row`
    pub fn get_cell_index(&self, row: usize, column: usize) -> Option<usize> {
        let cells = &self.rows.get(row)?.cells;
        let mut end = 0;
        for (index, cell) in cells.iter().enumerate() {
            end += cell.column_span();
            if column < end {
                return Some(index);
            }
        }
        None
    }

    /// The cell covering logical `column` in `row`
    pub fn get_cell(&self, row: usize, column: usize) -> Option<&CellData> {
        let index = self.get_cell_index(row, column)?;
        self.rows[row].cells.get(index)
    }

    /// Logical column range of the cell covering `column` in `row`
    pub fn get_cell_boundaries(&self, row: usize, column: usize) -> Option<CellBoundaries> {
        let cells = &self.rows.get(row)?.cells;
        let mut from = 0;
        for cell in cells {
            let to = from + cell.column_span() - 1;
            if column <= to {
                return Some(CellBoundaries { from, to });
            }
            from = to + 1;
        }
        None
    }
}

/// Text position of one row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RowPosition {
    /// End of the previous row terminator, or the start of the body
    pub from: usize,
    /// End of this row's terminator, or of its last cell
    pub to: usize,
    /// Rule commands (`\hline`, `\cline`, ...) belonging to this row
    pub hlines: Vec<Range>,
}

impl RowPosition {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// Text positions of the table structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Positions {
    /// Full span of each cell, indexed by `[row][cell index]`
    pub cells: Vec<Vec<Range>>,
    /// Text inside the braces of `\begin{tabular}{...}`
    pub column_declarations: Range,
    pub row_positions: Vec<RowPosition>,
    /// `\begin{tabular}` through `\end{tabular}`
    pub tabular: Range,
}

/// Caption and label of the float around the tabular
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableEnvironmentData {
    pub caption: Option<Range>,
    pub label: Option<Range>,
}

/// Everything a planner needs to know about one table
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableSnapshot<'a> {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub doc: &'a str,
    pub table: TableData,
    pub positions: Positions,
    /// Cell separators per row
    pub cell_separators: Vec<Vec<CellSeparator>>,
    pub row_separators: Vec<RowSeparator>,
    pub environment: Option<TableEnvironmentData>,
}

impl<'a> TableSnapshot<'a> {
    /// Current text of the column declaration
    pub fn column_specification(&self) -> &'a str {
        self.positions.column_declarations.slice(self.doc)
    }

    pub fn slice(&self, range: Range) -> &'a str {
        range.slice(self.doc)
    }

    pub fn caption(&self) -> Option<Range> {
        self.environment.and_then(|env| env.caption)
    }

    pub fn label(&self) -> Option<Range> {
        self.environment.and_then(|env| env.label)
    }
}
