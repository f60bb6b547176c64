//! WASM bindings for tabedit
//!
//! JavaScript editors address text in UTF-16 code units while the planners
//! work in UTF-8 byte offsets, so every offset crossing this boundary is
//! converted here.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::core::commands::CommandOutcome;
use crate::core::model::TableSelection;
use crate::core::{parse_table_at, EditOptions, TableCommand};
use crate::utils::changes::ChangeSet;
use crate::utils::error::{TableError, TableResult};

/// A change in UTF-16 offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsChange {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

/// Planning result with additional metadata
#[derive(Serialize, Deserialize)]
pub struct PlanResult {
    /// Changes to dispatch, in UTF-16 offsets of the input document
    pub changes: Vec<JsChange>,
    /// Selection to show afterwards, if the table shape changed
    pub selection: Option<TableSelection>,
    /// The edited document (only filled by `applyTableCommand`)
    pub document: Option<String>,
    /// Whether planning was successful
    pub success: bool,
    /// Error message if planning failed
    pub error: Option<String>,
}

impl PlanResult {
    fn failure(message: String) -> Self {
        PlanResult {
            changes: Vec::new(),
            selection: None,
            document: None,
            success: false,
            error: Some(message),
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Byte offset of the UTF-16 position `offset` (clamped to the document)
pub fn utf16_to_byte(doc: &str, offset: usize) -> usize {
    let mut units = 0;
    for (index, c) in doc.char_indices() {
        if units >= offset {
            return index;
        }
        units += c.len_utf16();
    }
    doc.len()
}

/// UTF-16 position of the byte offset `offset`
pub fn byte_to_utf16(doc: &str, offset: usize) -> usize {
    doc.get(..offset)
        .unwrap_or(doc)
        .chars()
        .map(char::len_utf16)
        .sum()
}

fn to_js_changes(doc: &str, changes: &ChangeSet) -> Vec<JsChange> {
    changes
        .iter()
        .map(|change| JsChange {
            from: byte_to_utf16(doc, change.from),
            to: byte_to_utf16(doc, change.to),
            insert: change.insert.clone(),
        })
        .collect()
}

/// Decode `value`, treating `undefined` and `null` as the default
fn from_optional_value<T>(value: JsValue, what: &str) -> TableResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| TableError::parse(format!("invalid {}: {}", what, e)))
}

fn plan(
    doc: &str,
    offset: usize,
    selection: JsValue,
    command: JsValue,
    options: JsValue,
) -> TableResult<CommandOutcome> {
    let command: TableCommand = serde_wasm_bindgen::from_value(command)
        .map_err(|e| TableError::parse(format!("invalid command: {}", e)))?;
    let selection: TableSelection = from_optional_value(selection, "selection")?;
    let options: EditOptions = from_optional_value(options, "options")?;

    let snapshot = parse_table_at(doc, utf16_to_byte(doc, offset))?;
    if command.uses_selection() {
        selection.validate(&snapshot.table)?;
    }
    Ok(command.plan(&snapshot, &selection, &options))
}

/// Plan a table command without applying it
///
/// # Arguments
/// * `doc` - Full LaTeX source
/// * `offset` - UTF-16 offset inside the table
/// * `selection` - `{ from: { row, cell }, to: { row, cell } }`, or `null` for the first cell
/// * `command` - e.g. `{ command: "insert_row", below: true }`
/// * `options` - Partial `EditOptions` (missing fields use defaults), or `null`
///
/// A malformed selection or options object fails the call without planning.
#[wasm_bindgen(js_name = "planTableCommand")]
pub fn plan_table_command(
    doc: &str,
    offset: usize,
    selection: JsValue,
    command: JsValue,
    options: JsValue,
) -> JsValue {
    let result = match plan(doc, offset, selection, command, options) {
        Ok(outcome) => PlanResult {
            changes: to_js_changes(doc, &outcome.changes),
            selection: outcome.selection,
            document: None,
            success: true,
            error: None,
        },
        Err(e) => PlanResult::failure(e.to_string()),
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Plan a table command and return the edited document along with the changes
#[wasm_bindgen(js_name = "applyTableCommand")]
pub fn apply_table_command(
    doc: &str,
    offset: usize,
    selection: JsValue,
    command: JsValue,
    options: JsValue,
) -> JsValue {
    let result = plan(doc, offset, selection, command, options).and_then(|outcome| {
        let document = outcome.changes.apply(doc)?;
        Ok(PlanResult {
            changes: to_js_changes(doc, &outcome.changes),
            selection: outcome.selection,
            document: Some(document),
            success: true,
            error: None,
        })
    });
    let result = result.unwrap_or_else(|e| PlanResult::failure(e.to_string()));
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Get the version of tabedit
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_offsets() {
        let doc = "é𝄞a";
        assert_eq!(utf16_to_byte(doc, 0), 0);
        assert_eq!(utf16_to_byte(doc, 1), 2);
        assert_eq!(utf16_to_byte(doc, 3), 6);
        assert_eq!(utf16_to_byte(doc, 99), doc.len());
        assert_eq!(byte_to_utf16(doc, 2), 1);
        assert_eq!(byte_to_utf16(doc, 6), 3);
        assert_eq!(byte_to_utf16(doc, doc.len()), 4);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    const DOC: &str = r"\begin{tabular}{l} a \\ b \\ \end{tabular}";

    fn remove() -> JsValue {
        serde_wasm_bindgen::to_value(&TableCommand::RemoveRowsOrColumns).unwrap()
    }

    fn decode(value: JsValue) -> PlanResult {
        serde_wasm_bindgen::from_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_malformed_selection_is_rejected() {
        let result = decode(plan_table_command(
            DOC,
            0,
            JsValue::from_str("1,0"),
            remove(),
            JsValue::NULL,
        ));
        assert!(!result.success);
        assert!(result.changes.is_empty());
        assert!(result.error.unwrap().contains("invalid selection"));
    }

    #[wasm_bindgen_test]
    fn test_malformed_options_are_rejected() {
        let result = decode(apply_table_command(
            DOC,
            0,
            JsValue::NULL,
            remove(),
            JsValue::from_f64(2.0),
        ));
        assert!(!result.success);
        assert!(result.document.is_none());
        assert!(result.error.unwrap().contains("invalid options"));
    }

    #[wasm_bindgen_test]
    fn test_missing_selection_uses_first_cell() {
        let result = decode(apply_table_command(
            DOC,
            0,
            JsValue::UNDEFINED,
            remove(),
            JsValue::UNDEFINED,
        ));
        assert!(result.success);
        assert_eq!(
            result.document.as_deref(),
            Some(r"\begin{tabular}{l} b \\ \end{tabular}")
        );
        assert_eq!(result.selection, Some(TableSelection::cell(0, 0)));
    }
}
