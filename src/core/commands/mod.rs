//! Structural edit planners
//!
//! Every planner is a pure function of a [`TableSnapshot`] (plus a selection
//! and parameters) returning a [`ChangeSet`] addressed in offsets of the
//! snapshot's document. All offsets are computed up front from the untouched
//! snapshot; nothing is applied between two edits of one batch.
//!
//! An empty change set means the command declined to edit.
//!
//! # Example
//!
//! ```rust
//! use tabedit::{apply_command, EditOptions, TableCommand, TableSelection};
//! use tabedit::core::commands::BorderTheme;
//!
//! let doc = r"\begin{tabular}{lc} a & b \\ \end{tabular}";
//! let result = apply_command(
//!     doc,
//!     0,
//!     Some(TableSelection::cell(0, 0)),
//!     &TableCommand::SetBorders { theme: BorderTheme::FullyBordered },
//!     &EditOptions::default(),
//! )
//! .unwrap();
//! assert!(result.document.starts_with(r"\begin{tabular}{|l|c|}"));
//! ```

mod alignment;
mod borders;
mod caption;
mod insert;
mod merge;
mod remove;


#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::colspec::ColumnAlignment;
use crate::core::model::{Range, TableSelection, TableSnapshot};
use crate::core::options::EditOptions;
use crate::core::parser::parse_table_at;
use crate::utils::changes::{ChangeSet, ChangeSpec};
use crate::utils::error::TableResult;
use crate::utils::lines::Direction;

pub use alignment::set_alignment;
pub use borders::{set_borders, BorderTheme};
pub use caption::{move_caption, remove_caption};
pub use insert::{insert_column, insert_row};
pub use merge::{merge_cells, unmerge_cells};
pub use remove::remove_row_or_columns;

/// Edits of one command plus the selection to show afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CommandOutcome {
    pub changes: ChangeSet,
    /// `None` keeps the caller's current selection
    pub selection: Option<TableSelection>,
}

impl CommandOutcome {
    pub fn with_selection(changes: ChangeSet, selection: TableSelection) -> Self {
        CommandOutcome {
            changes,
            selection: Some(selection),
        }
    }
}

impl From<ChangeSet> for CommandOutcome {
    fn from(changes: ChangeSet) -> Self {
        CommandOutcome {
            changes,
            selection: None,
        }
    }
}

/// A toolbar command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "command", rename_all = "snake_case")
)]
pub enum TableCommand {
    SetBorders { theme: BorderTheme },
    SetAlignment { alignment: ColumnAlignment },
    InsertRow { below: bool },
    InsertColumn { after: bool },
    RemoveRowsOrColumns,
    MergeCells,
    UnmergeCells,
    MoveCaption { target: Direction },
    RemoveCaption,
}

impl TableCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TableCommand::SetBorders { .. } => "set_borders",
            TableCommand::SetAlignment { .. } => "set_alignment",
            TableCommand::InsertRow { .. } => "insert_row",
            TableCommand::InsertColumn { .. } => "insert_column",
            TableCommand::RemoveRowsOrColumns => "remove_rows_or_columns",
            TableCommand::MergeCells => "merge_cells",
            TableCommand::UnmergeCells => "unmerge_cells",
            TableCommand::MoveCaption { .. } => "move_caption",
            TableCommand::RemoveCaption => "remove_caption",
        }
    }

    /// Whether the command reads the selection
    pub fn uses_selection(&self) -> bool {
        !matches!(
            self,
            TableCommand::SetBorders { .. }
                | TableCommand::MoveCaption { .. }
                | TableCommand::RemoveCaption
        )
    }

    /// Plan the edits for this command
    pub fn plan(
        &self,
        snapshot: &TableSnapshot<'_>,
        selection: &TableSelection,
        options: &EditOptions,
    ) -> CommandOutcome {
        let outcome = match *self {
            TableCommand::SetBorders { theme } => set_borders(snapshot, theme, options).into(),
            TableCommand::SetAlignment { alignment } => {
                set_alignment(snapshot, selection, alignment).into()
            }
            TableCommand::InsertRow { below } => insert_row(snapshot, selection, below, options),
            TableCommand::InsertColumn { after } => {
                insert_column(snapshot, selection, after, options)
            }
            TableCommand::RemoveRowsOrColumns => {
                remove_row_or_columns(snapshot, selection, options)
            }
            TableCommand::MergeCells => merge_cells(snapshot, selection, options).into(),
            TableCommand::UnmergeCells => unmerge_cells(snapshot, selection, options).into(),
            TableCommand::MoveCaption { target } => move_caption(snapshot, target, options).into(),
            TableCommand::RemoveCaption => remove_caption(snapshot).into(),
        };
        trace!(
            command = self.name(),
            changes = outcome.changes.len(),
            "planned table edit"
        );
        outcome
    }
}

/// Result of [`apply_command`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EditResult {
    /// The edited document
    pub document: String,
    /// The batch that produced it, in offsets of the original document
    pub changes: ChangeSet,
    pub selection: Option<TableSelection>,
}

/// Scan the table at `offset`, plan `command` and apply it
///
/// Without a selection the first cell is assumed.
pub fn apply_command(
    doc: &str,
    offset: usize,
    selection: Option<TableSelection>,
    command: &TableCommand,
    options: &EditOptions,
) -> TableResult<EditResult> {
    let snapshot = parse_table_at(doc, offset)?;
    let selection = selection.unwrap_or_default();
    if command.uses_selection() {
        selection.validate(&snapshot.table)?;
    }

    let CommandOutcome { changes, selection } = command.plan(&snapshot, &selection, options);
    let document = changes.apply(doc)?;
    Ok(EditResult {
        document,
        changes,
        selection,
    })
}

/// Push a replacement of `range` unless it would not change the text
fn replace_if_changed(changes: &mut ChangeSet, range: Range, current: &str, updated: String) {
    if current != updated {
        changes.push(ChangeSpec::replace(range, updated));
    }
}
