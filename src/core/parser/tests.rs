//! Regression tests for the tabular scanner

use super::*;
use pretty_assertions::assert_eq;

fn cell_texts<'a>(snapshot: &TableSnapshot<'a>, row: usize) -> Vec<&'a str> {
    snapshot.positions.cells[row]
        .iter()
        .map(|range| snapshot.slice(*range))
        .collect()
}

fn contents(snapshot: &TableSnapshot<'_>, row: usize) -> Vec<String> {
    snapshot.table.rows[row]
        .cells
        .iter()
        .map(|cell| cell.content.clone())
        .collect()
}

#[test]
fn test_basic_table() {
    let doc = r"\begin{tabular}{lc} a & b \\ c & d \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(snapshot.column_specification(), "lc");
    assert_eq!(snapshot.table.row_count(), 2);
    assert_eq!(snapshot.table.column_count(), 2);
    assert_eq!(contents(&snapshot, 0), vec!["a", "b"]);
    assert_eq!(cell_texts(&snapshot, 1), vec!["c", "d"]);
    assert_eq!(snapshot.row_separators.len(), 2);
    assert!(snapshot
        .row_separators
        .iter()
        .all(|sep| snapshot.slice(*sep) == r"\\"));
    assert_eq!(snapshot.slice(snapshot.cell_separators[1][0]), "&");
    assert_eq!(snapshot.slice(snapshot.positions.tabular), doc);
    assert!(snapshot.environment.is_none());
}

#[test]
fn test_row_positions_are_contiguous() {
    let doc = r"\begin{tabular}{cc} a & b \\ c & d \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let rows = &snapshot.positions.row_positions;

    assert_eq!(rows[0].from, doc.find("{cc}").unwrap() + 4);
    assert_eq!(rows[0].to, snapshot.row_separators[0].to);
    assert_eq!(rows[1].from, rows[0].to);
    assert_eq!(snapshot.slice(rows[1].range()), r" c & d \\");
}

#[test]
fn test_hlines_belong_to_rows() {
    let doc = "\\begin{tabular}{|c|c|}\n\\hline\na & b \\\\\n\\hline\nc & d \\\\\n\\hline\n\\end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let rows = &snapshot.positions.row_positions;

    assert_eq!(snapshot.table.row_count(), 2);
    assert_eq!(rows[0].hlines.len(), 1);
    assert_eq!(rows[1].hlines.len(), 2);
    assert!(rows
        .iter()
        .flat_map(|row| row.hlines.iter())
        .all(|rule| snapshot.slice(*rule) == r"\hline"));
    assert_eq!(contents(&snapshot, 0), vec!["a", "b"]);
}

#[test]
fn test_booktabs_rules() {
    let doc = r"\begin{tabular}{ll} \toprule x & y \\ \cmidrule(lr){1-2} z & w \\ \bottomrule \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let rows = &snapshot.positions.row_positions;

    assert_eq!(snapshot.slice(rows[0].hlines[0]), r"\toprule");
    assert_eq!(snapshot.slice(rows[1].hlines[0]), r"\cmidrule(lr){1-2}");
    assert_eq!(snapshot.slice(rows[1].hlines[1]), r"\bottomrule");
    assert_eq!(contents(&snapshot, 1), vec!["z", "w"]);
}

#[test]
fn test_multicolumn_cell() {
    let doc = r"\begin{tabular}{lll} \multicolumn{2}{|c|}{ Wide } & x \\ a & b & c \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let cell = &snapshot.table.rows[0].cells[0];
    let multi = cell.multi_column.as_ref().unwrap();

    assert_eq!(snapshot.table.rows[0].cells.len(), 2);
    assert_eq!(cell.content, "Wide");
    assert_eq!(cell.column_span(), 2);
    assert_eq!(snapshot.slice(multi.span), "2");
    assert_eq!(snapshot.slice(multi.columns), "|c|");
    assert_eq!(snapshot.slice(multi.preamble), r"\multicolumn{2}{|c|}{");
    assert_eq!(snapshot.slice(multi.postamble), "}");
    assert_eq!(
        cell_texts(&snapshot, 0),
        vec![r"\multicolumn{2}{|c|}{ Wide }", "x"]
    );
    assert_eq!(
        snapshot.table.get_cell_boundaries(0, 1),
        Some(crate::core::model::CellBoundaries { from: 0, to: 1 })
    );
}

#[test]
fn test_short_rows_are_padded() {
    let doc = r"\begin{tabular}{ccc} a & b \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let cells = &snapshot.table.rows[0].cells;

    assert_eq!(cells.len(), 3);
    assert_eq!(cells[2].content, "");
    assert_eq!(cells[2].from, cells[2].to);
    assert_eq!(cells[2].from, cells[1].to);
}

#[test]
fn test_blank_cell_is_cursor_after_separator() {
    let doc = r"\begin{tabular}{ccc} a & & c \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let blank = snapshot.positions.cells[0][1];

    assert!(blank.is_empty());
    assert_eq!(blank.from, snapshot.cell_separators[0][0].to);
    assert_eq!(contents(&snapshot, 0), vec!["a", "", "c"]);
}

#[test]
fn test_braces_protect_separators() {
    let doc = r"\begin{tabular}{cc} {a & b} & \textbf{c \\ d} \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(snapshot.table.row_count(), 1);
    assert_eq!(contents(&snapshot, 0), vec!["{a & b}", r"\textbf{c \\ d}"]);
}

#[test]
fn test_escaped_and_commented_separators() {
    let doc = "\\begin{tabular}{cc} a \\& b & c % & d \\\\\n\\\\ \\end{tabular}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(snapshot.table.row_count(), 1);
    assert_eq!(contents(&snapshot, 0), vec![r"a \& b", "c"]);
}

#[test]
fn test_row_terminator_with_spacing() {
    let doc = r"\begin{tabular}{c} a \\[2pt] b \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(snapshot.slice(snapshot.row_separators[0]), r"\\[2pt]");
    assert_eq!(contents(&snapshot, 1), vec!["b"]);
}

#[test]
fn test_last_row_without_terminator() {
    let doc = r"\begin{tabular}{cc} a & b \\ c & d \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    let last = &snapshot.positions.row_positions[1];

    assert_eq!(snapshot.table.row_count(), 2);
    assert_eq!(snapshot.row_separators.len(), 1);
    assert_eq!(last.to, doc.find(" \\end").unwrap());
}

#[test]
fn test_position_argument() {
    let doc = r"\begin{tabular}[t]{lr} a & b \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    assert_eq!(snapshot.column_specification(), "lr");
}

#[test]
fn test_missing_specification_is_an_error() {
    let err = parse_table(r"\begin{tabular} a \\ \end{tabular}").unwrap_err();
    assert!(matches!(err, TableError::ParseError { .. }));
    assert!(parse_table("no table here").is_err());
}

#[test]
fn test_commented_environment_is_ignored() {
    let doc = "% \\begin{tabular}{c}\n\\begin{tabular}{cc} a & b \\\\ \\end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    assert_eq!(snapshot.column_specification(), "cc");
}

#[test]
fn test_caption_and_label() {
    let doc = "\\begin{table}\n\\centering\n\\caption{Results}\n\\label{tab:results}\n\\begin{tabular}{c}\na \\\\\n\\end{tabular}\n\\end{table}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(
        snapshot.caption().map(|r| snapshot.slice(r)),
        Some(r"\caption{Results}")
    );
    assert_eq!(
        snapshot.label().map(|r| snapshot.slice(r)),
        Some(r"\label{tab:results}")
    );
}

#[test]
fn test_label_inside_caption() {
    let doc = "\\begin{table}\n\\begin{tabular}{c}\na \\\\\n\\end{tabular}\n\\caption{Sizes \\label{tab:sizes}}\n\\end{table}";
    let snapshot = parse_table(doc).unwrap();
    let caption = snapshot.caption().unwrap();
    let label = snapshot.label().unwrap();

    assert_eq!(snapshot.slice(caption), r"\caption{Sizes \label{tab:sizes}}");
    assert!(caption.contains(&label));
}

#[test]
fn test_float_without_caption() {
    let doc = "\\begin{table}\n\\begin{tabular}{c}\na \\\\\n\\end{tabular}\n\\end{table}";
    let snapshot = parse_table(doc).unwrap();

    assert_eq!(
        snapshot.environment,
        Some(TableEnvironmentData {
            caption: None,
            label: None
        })
    );
}

#[test]
fn test_parse_table_at_picks_enclosing_table() {
    let doc = "\\begin{tabular}{c} a \\\\ \\end{tabular}\n\n\\begin{tabular}{ll} b & c \\\\ \\end{tabular}";
    let second = doc.find(" b &").unwrap();

    assert_eq!(parse_table_at(doc, second).unwrap().column_specification(), "ll");
    assert_eq!(parse_table_at(doc, 3).unwrap().column_specification(), "c");
    assert!(parse_table_at(doc, doc.find("\n\n").unwrap() + 1).is_err());
    assert_eq!(parse_tables(doc).unwrap().len(), 2);
}

#[test]
fn test_nested_tabular_is_one_cell() {
    let doc = r"\begin{tabular}{cc} x & \begin{tabular}{l} y \\ z \\ \end{tabular} \\ \end{tabular}";
    let outer = parse_table(doc).unwrap();

    assert_eq!(outer.table.row_count(), 1);
    assert_eq!(outer.row_separators.len(), 1);
    assert_eq!(
        contents(&outer, 0),
        vec!["x", r"\begin{tabular}{l} y \\ z \\ \end{tabular}"]
    );

    let inner = parse_table_at(doc, doc.find(" y").unwrap()).unwrap();
    assert_eq!(inner.column_specification(), "l");
    assert_eq!(inner.table.row_count(), 2);
}

#[test]
fn test_utf8_content() {
    let doc = r"\begin{tabular}{cc} größe & 日本 \\ \end{tabular}";
    let snapshot = parse_table(doc).unwrap();
    assert_eq!(contents(&snapshot, 0), vec!["größe", "日本"]);
}
