//! Reference scanner for `tabular` environments
//!
//! Builds the [`TableSnapshot`] the planners consume directly from LaTeX
//! source. The scan is a single pass over the body that tracks brace depth:
//!
//! ```text
//! \begin{tabular}[pos]{spec}  ->  column declaration
//! body                        ->  rows (`\\`), cells (`&`), rules, \multicolumn
//! enclosing table float       ->  \caption / \label
//! ```
//!
//! # Example
//!
//! ```rust
//! use tabedit::parse_table;
//!
//! let doc = r"\begin{tabular}{lc} a & b \\ c & d \\ \end{tabular}";
//! let snapshot = parse_table(doc).unwrap();
//! assert_eq!(snapshot.table.row_count(), 2);
//! assert_eq!(snapshot.table.column_count(), 2);
//! ```

mod scanner;

#[cfg(test)]
mod tests;

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::core::colspec::parse_column_specifications;
use crate::core::model::{
    CellData, MultiColumn, Positions, Range, RowData, RowPosition, TableData,
    TableEnvironmentData, TableSnapshot,
};
use crate::utils::error::{TableError, TableResult};
use scanner::{
    char_width, command_end, command_name_end, find_group_end, is_commented, line_end,
    optional_group_end, skip_whitespace, trimmed_range, FLOAT_ENVIRONMENTS,
};

pub use scanner::RULE_COMMANDS;

lazy_static! {
    // \begin{name} / \end{name}
    static ref ENVIRONMENT_DELIMITER: Regex =
        Regex::new(r"\\(begin|end)\s*\{([A-Za-z]+\*?)\}").unwrap();

    // \caption / \label inside a float
    static ref FLOAT_COMMAND: Regex = Regex::new(r"\\(caption|label)\b").unwrap();
}

/// A matched `\begin{..}` / `\end{..}` pair
#[derive(Debug, Clone)]
struct Environment {
    name: String,
    begin: Range,
    end: Range,
}

impl Environment {
    fn range(&self) -> Range {
        Range::new(self.begin.from, self.end.to)
    }
}

/// Match every environment in the document, ignoring commented-out delimiters
fn environments(doc: &str) -> Vec<Environment> {
    let mut open: Vec<(String, Range)> = Vec::new();
    let mut found = Vec::new();

    for caps in ENVIRONMENT_DELIMITER.captures_iter(doc) {
        let Some(whole) = caps.get(0) else { continue };
        if is_commented(doc, whole.start()) {
            continue;
        }
        let name = caps[2].to_string();
        let range = Range::new(whole.start(), whole.end());
        if &caps[1] == "begin" {
            open.push((name, range));
        } else if let Some(index) = open.iter().rposition(|(n, _)| *n == name) {
            // Unclosed environments nested inside are dropped
            open.truncate(index + 1);
            if let Some((name, begin)) = open.pop() {
                found.push(Environment {
                    name,
                    begin,
                    end: range,
                });
            }
        }
    }

    found.sort_by_key(|env| env.begin.from);
    found
}

/// Scan every tabular in the document, outermost first
pub fn parse_tables(doc: &str) -> TableResult<Vec<TableSnapshot<'_>>> {
    let envs = environments(doc);
    envs.iter()
        .filter(|env| env.name == "tabular")
        .map(|env| parse_tabular(doc, env, &envs))
        .collect()
}

/// Scan the first tabular in the document
pub fn parse_table(doc: &str) -> TableResult<TableSnapshot<'_>> {
    let envs = environments(doc);
    let env = envs
        .iter()
        .find(|env| env.name == "tabular")
        .ok_or_else(|| TableError::parse("no tabular environment found"))?;
    parse_tabular(doc, env, &envs)
}

/// Scan the innermost tabular containing `offset`
pub fn parse_table_at(doc: &str, offset: usize) -> TableResult<TableSnapshot<'_>> {
    let envs = environments(doc);
    let env = envs
        .iter()
        .filter(|env| {
            let range = env.range();
            env.name == "tabular" && range.from <= offset && offset <= range.to
        })
        .max_by_key(|env| env.begin.from)
        .ok_or_else(|| TableError::parse_at("no tabular environment at offset", offset))?;
    parse_tabular(doc, env, &envs)
}

fn parse_tabular<'a>(
    doc: &'a str,
    env: &Environment,
    envs: &[Environment],
) -> TableResult<TableSnapshot<'a>> {
    let bytes = doc.as_bytes();
    let limit = env.end.from;

    let mut open = skip_whitespace(bytes, env.begin.to, limit);
    if bytes.get(open) == Some(&b'[') {
        let after = optional_group_end(bytes, open, limit)
            .ok_or_else(|| TableError::parse_at("unterminated position argument", open))?;
        open = skip_whitespace(bytes, after, limit);
    }
    if open >= limit || bytes[open] != b'{' {
        return Err(TableError::parse_at("missing column specification", open));
    }
    let close = find_group_end(bytes, open, limit)
        .ok_or_else(|| TableError::parse_at("unterminated column specification", open))?;
    let column_declarations = Range::new(open + 1, close);
    let columns = parse_column_specifications(column_declarations.slice(doc));

    // Environments nested in cells are opaque to the row scan
    let nested: FxHashMap<usize, usize> = envs
        .iter()
        .filter(|inner| inner.begin.from > close && inner.end.to <= limit)
        .map(|inner| (inner.begin.from, inner.end.to))
        .collect();
    let body = scan_body(doc, close + 1, limit, &nested);
    let tabular = env.range();

    let environment = envs
        .iter()
        .filter(|float| {
            FLOAT_ENVIRONMENTS.contains(float.name.as_str())
                && float.range().contains(&tabular)
                && float.begin.from < tabular.from
        })
        .max_by_key(|float| float.begin.from)
        .map(|float| find_caption_and_label(doc, float, tabular));

    let mut table = TableData {
        rows: Vec::with_capacity(body.rows.len()),
        columns,
    };
    let mut positions = Positions {
        cells: Vec::with_capacity(body.rows.len()),
        column_declarations,
        row_positions: Vec::with_capacity(body.rows.len()),
        tabular,
    };
    let mut cell_separators = Vec::with_capacity(body.rows.len());

    for (index, mut row) in body.rows.into_iter().enumerate() {
        let width: usize = row.cells.iter().map(CellData::column_span).sum();
        if width < table.column_count() {
            let at = row
                .cell_positions
                .last()
                .map(|r| r.to)
                .unwrap_or(row.position.from);
            debug!(
                row = index,
                missing = table.column_count() - width,
                "padding short row with empty cells"
            );
            for _ in width..table.column_count() {
                row.cells.push(CellData {
                    content: String::new(),
                    from: at,
                    to: at,
                    multi_column: None,
                });
                row.cell_positions.push(Range::cursor(at));
            }
        }
        table.rows.push(RowData { cells: row.cells });
        positions.cells.push(row.cell_positions);
        positions.row_positions.push(row.position);
        cell_separators.push(row.separators);
    }

    Ok(TableSnapshot {
        doc,
        table,
        positions,
        cell_separators,
        row_separators: body.row_separators,
        environment,
    })
}

fn find_caption_and_label(doc: &str, float: &Environment, tabular: Range) -> TableEnvironmentData {
    let bytes = doc.as_bytes();
    let search = Range::new(float.begin.to, float.end.from);
    let mut data = TableEnvironmentData::default();

    for caps in FLOAT_COMMAND.captures_iter(search.slice(doc)) {
        let Some(whole) = caps.get(0) else { continue };
        let start = search.from + whole.start();
        if (tabular.from..tabular.to).contains(&start) || is_commented(doc, start) {
            continue;
        }
        let command = Range::new(start, command_end(bytes, search.from + whole.end(), search.to, 1));
        match &caps[1] {
            "caption" if data.caption.is_none() => data.caption = Some(command),
            "label" if data.label.is_none() => data.label = Some(command),
            _ => {}
        }
    }
    data
}

/// Scan state of the cell being read
struct CellScan {
    /// Where an empty cell is reported
    anchor: usize,
    /// First to last non-blank token
    content: Option<Range>,
    multi_column: Option<(MultiColumn, Range)>,
}

impl CellScan {
    fn new(anchor: usize) -> Self {
        CellScan {
            anchor,
            content: None,
            multi_column: None,
        }
    }

    fn is_blank(&self) -> bool {
        self.content.is_none()
    }

    fn mark(&mut self, from: usize, to: usize) {
        self.content = Some(match self.content {
            Some(range) => Range::new(range.from, to),
            None => Range::new(from, to),
        });
    }

    fn finish(self, doc: &str) -> (CellData, Range) {
        let outer = self.content.unwrap_or(Range::cursor(self.anchor));
        let cell = match self.multi_column {
            Some((multi_column, inner)) => CellData {
                content: inner.slice(doc).to_string(),
                from: inner.from,
                to: inner.to,
                multi_column: Some(multi_column),
            },
            None => CellData {
                content: outer.slice(doc).to_string(),
                from: outer.from,
                to: outer.to,
                multi_column: None,
            },
        };
        (cell, outer)
    }
}

struct ScannedRow {
    position: RowPosition,
    cells: Vec<CellData>,
    cell_positions: Vec<Range>,
    separators: Vec<Range>,
}

/// Scan state of the row being read
struct RowScan {
    from: usize,
    hlines: Vec<Range>,
    cells: Vec<CellData>,
    cell_positions: Vec<Range>,
    separators: Vec<Range>,
    current: CellScan,
}

impl RowScan {
    fn new(from: usize) -> Self {
        RowScan {
            from,
            hlines: Vec::new(),
            cells: Vec::new(),
            cell_positions: Vec::new(),
            separators: Vec::new(),
            current: CellScan::new(from),
        }
    }

    fn has_content(&self) -> bool {
        !self.separators.is_empty() || !self.current.is_blank()
    }

    fn end_cell(&mut self, doc: &str, next_anchor: usize) {
        let scan = std::mem::replace(&mut self.current, CellScan::new(next_anchor));
        let (cell, outer) = scan.finish(doc);
        self.cells.push(cell);
        self.cell_positions.push(outer);
    }

    /// Close the row; `to` is the end of its terminator if it has one
    fn finish(mut self, doc: &str, to: Option<usize>) -> ScannedRow {
        self.end_cell(doc, 0);
        let to = to.unwrap_or_else(|| {
            let cell_end = self.cell_positions.last().map(|r| r.to).unwrap_or(self.from);
            let separator_end = self.separators.last().map(|r| r.to).unwrap_or(self.from);
            cell_end.max(separator_end)
        });
        ScannedRow {
            position: RowPosition {
                from: self.from,
                to,
                hlines: self.hlines,
            },
            cells: self.cells,
            cell_positions: self.cell_positions,
            separators: self.separators,
        }
    }
}

struct ScannedBody {
    rows: Vec<ScannedRow>,
    row_separators: Vec<Range>,
}

fn scan_body(doc: &str, start: usize, end: usize, nested: &FxHashMap<usize, usize>) -> ScannedBody {
    let bytes = doc.as_bytes();
    let mut rows = Vec::new();
    let mut row_separators = Vec::new();
    let mut row = RowScan::new(start);
    let mut depth = 0usize;
    let mut i = start;

    while i < end {
        match bytes[i] {
            b'%' => {
                i = line_end(bytes, i, end);
                continue;
            }
            b'\\' => {
                if let Some(&env_end) = nested.get(&i) {
                    row.current.mark(i, env_end);
                    i = env_end;
                    continue;
                }
                let name_end = command_name_end(bytes, i, end);
                let name = &doc[i + 1..name_end];

                if depth == 0 && name == "\\" {
                    let separator_end = optional_group_end(bytes, name_end, end).unwrap_or(name_end);
                    let separator = Range::new(i, separator_end);
                    row_separators.push(separator);
                    let finished = std::mem::replace(&mut row, RowScan::new(separator.to));
                    rows.push(finished.finish(doc, Some(separator.to)));
                    i = separator_end;
                    continue;
                }

                if depth == 0 {
                    if let Some(&required) = RULE_COMMANDS.get(name) {
                        let rule_end = command_end(bytes, name_end, end, required);
                        row.hlines.push(Range::new(i, rule_end));
                        if row.current.is_blank() {
                            row.current.anchor = rule_end;
                        }
                        i = rule_end;
                        continue;
                    }
                    if name == "multicolumn" && row.current.is_blank() {
                        if let Some((multi_column, inner)) = scan_multicolumn(doc, i, name_end, end) {
                            let to = multi_column.to;
                            row.current.mark(i, to);
                            row.current.multi_column = Some((multi_column, inner));
                            i = to;
                            continue;
                        }
                    }
                }

                row.current.mark(i, name_end);
                i = name_end;
                continue;
            }
            b'{' => {
                depth += 1;
                row.current.mark(i, i + 1);
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                row.current.mark(i, i + 1);
            }
            b'&' if depth == 0 => {
                row.separators.push(Range::new(i, i + 1));
                row.end_cell(doc, i + 1);
            }
            b if b.is_ascii_whitespace() => {}
            b => {
                let width = char_width(b);
                row.current.mark(i, (i + width).min(end));
                i += width;
                continue;
            }
        }
        i += 1;
    }

    if row.has_content() {
        rows.push(row.finish(doc, None));
    } else if let Some(last) = rows.last_mut() {
        // Rules after the final terminator close the table
        last.position.hlines.extend(row.hlines);
    }

    ScannedBody {
        rows,
        row_separators,
    }
}

/// Read `\multicolumn{n}{spec}{content}` starting at the backslash at `start`
fn scan_multicolumn(
    doc: &str,
    start: usize,
    name_end: usize,
    end: usize,
) -> Option<(MultiColumn, Range)> {
    let bytes = doc.as_bytes();
    let mut groups = [(0usize, 0usize); 3];
    let mut pos = name_end;
    for group in groups.iter_mut() {
        let open = skip_whitespace(bytes, pos, end);
        if open >= end || bytes[open] != b'{' {
            return None;
        }
        let close = find_group_end(bytes, open, end)?;
        *group = (open, close);
        pos = close + 1;
    }
    let [(span_open, span_close), (spec_open, spec_close), (content_open, content_close)] = groups;

    let column_span: usize = doc[span_open + 1..span_close].trim().parse().ok()?;
    let multi_column = MultiColumn {
        from: start,
        to: content_close + 1,
        column_span,
        span: trimmed_range(doc, span_open + 1, span_close),
        columns: Range::new(spec_open + 1, spec_close),
        preamble: Range::new(start, content_open + 1),
        postamble: Range::new(content_close, content_close + 1),
    };
    let inner = trimmed_range(doc, content_open + 1, content_close);
    Some((multi_column, inner))
}
