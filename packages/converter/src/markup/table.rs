//! Reader for the HTML tables embedded in converted policies.
//!
//! Only `tr`, `td` and `th` carry structure. Any other closing tag inside a
//! cell separates words, so `<p>May 1,</p><p>2020</p>` reads as
//! `May 1, 2020`. Broken markup never fails: a row that is never closed is
//! simply not emitted.

use super::html::{tokenize, Event};
use super::text::collapse_whitespace;

/// How a single line relates to an embedded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableBoundary {
    /// The line opens a table.
    Open,
    /// The line closes a table.
    Close,
    /// The line holds a complete table.
    OpenAndClose,
}

/// Detect whether a line opens and/or closes a table.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::{table_boundary, TableBoundary};
///
/// assert_eq!(table_boundary("<table class=\"grid\">"), Some(TableBoundary::Open));
/// assert_eq!(table_boundary("</table>"), Some(TableBoundary::Close));
/// assert_eq!(table_boundary("<tr><td>x</td></tr>"), None);
/// ```
pub fn table_boundary(line: &str) -> Option<TableBoundary> {
    let opens = line.contains("<table");
    let closes = line.contains("</table");
    match (opens, closes) {
        (true, true) => Some(TableBoundary::OpenAndClose),
        (true, false) => Some(TableBoundary::Open),
        (false, true) => Some(TableBoundary::Close),
        (false, false) => None,
    }
}

/// Position of the reader within the table structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Outside,
    InRow,
    InCell,
}

/// Table reader state machine; one per extraction.
struct TableReader {
    state: ReadState,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl TableReader {
    fn new() -> Self {
        Self {
            state: ReadState::Outside,
            rows: Vec::new(),
            row: Vec::new(),
            cell: String::new(),
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => match tag.as_str() {
                "tr" => {
                    self.row.clear();
                    self.cell.clear();
                    self.state = ReadState::InRow;
                }
                "td" | "th" if self.state != ReadState::Outside => {
                    self.cell.clear();
                    self.state = ReadState::InCell;
                }
                _ => {}
            },
            Event::End(tag) => match tag.as_str() {
                "tr" => {
                    if self.state != ReadState::Outside {
                        self.rows.push(std::mem::take(&mut self.row));
                    }
                    self.state = ReadState::Outside;
                }
                "td" | "th" => {
                    if self.state == ReadState::InCell {
                        let cell = std::mem::take(&mut self.cell);
                        self.row.push(collapse_whitespace(&cell));
                        self.state = ReadState::InRow;
                    }
                }
                _ => {
                    if self.state == ReadState::InCell {
                        self.cell.push(' ');
                    }
                }
            },
            Event::Text(data) => {
                if self.state == ReadState::InCell {
                    self.cell.push_str(&data);
                }
            }
        }
    }

    fn finish(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// Read the rows of the table(s) contained in `lines`.
///
/// Each row is the ordered list of its cell texts. Text outside cells is
/// discarded.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::extract_table;
///
/// let lines = [
///     "<table>",
///     "<tr><th>Version</th><th>Date</th></tr>",
///     "<tr><td>1.0</td><td><p>May 1,</p><p>2020</p></td></tr>",
///     "</table>",
/// ];
/// let rows = extract_table(&lines);
/// assert_eq!(rows, vec![vec!["Version", "Date"], vec!["1.0", "May 1, 2020"]]);
/// ```
pub fn extract_table<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<String>> {
    let joined = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = TableReader::new();
    for event in tokenize(&joined) {
        reader.handle(event);
    }
    let rows = reader.finish();

    tracing::debug!(rows = rows.len(), "Extracted table rows");
    rows
}

/// Render rows as one line: cells joined by `" | "`, rows by a space.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::flatten_rows;
///
/// let rows = vec![
///     vec!["Role".to_string(), "Duty".to_string()],
///     vec!["CA".to_string(), "SHALL sign".to_string()],
/// ];
/// assert_eq!(flatten_rows(&rows), "Role | Duty CA | SHALL sign");
/// ```
pub fn flatten_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .filter(|row| !row.is_empty())
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_simple_table() {
        let lines = [
            "<table>",
            "<tr>",
            "<td>RFC 3647</td>",
            "<td>Framework http://example.com</td>",
            "</tr>",
            "</table>",
        ];
        let rows = extract_table(&lines);
        assert_eq!(
            rows,
            vec![vec![
                "RFC 3647".to_string(),
                "Framework http://example.com".to_string()
            ]]
        );
    }

    #[test]
    fn test_style_tags_get_separating_space() {
        let lines = ["<table><tr><td><strong>Bold</strong><em>Italic</em></td></tr></table>"];
        let rows = extract_table(&lines);
        assert_eq!(rows, vec![vec!["Bold Italic".to_string()]]);
    }

    #[test]
    fn test_uppercase_tags() {
        let lines = ["<TABLE><TR><TD>a</TD><TD>b</TD></TR></TABLE>"];
        assert_eq!(
            extract_table(&lines),
            vec![vec!["a".to_string(), "b".to_string()]]
        );
    }

    #[test]
    fn test_text_outside_cells_is_discarded() {
        let lines = ["<table>caption<tr>stray<td>kept</td>stray</tr>after</table>"];
        assert_eq!(extract_table(&lines), vec![vec!["kept".to_string()]]);
    }

    #[test]
    fn test_unclosed_row_is_dropped() {
        let lines = [
            "<table>",
            "<tr><td>complete</td></tr>",
            "<tr><td>never closed</td>",
            "</table>",
        ];
        assert_eq!(extract_table(&lines), vec![vec!["complete".to_string()]]);
    }

    #[test]
    fn test_unclosed_cell_is_not_appended() {
        let lines = ["<table><tr><td>a</td><td>b</tr></table>"];
        assert_eq!(extract_table(&lines), vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_cell_outside_row_ignored() {
        let lines = ["<td>orphan</td><tr><td>x</td></tr>"];
        assert_eq!(extract_table(&lines), vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_entities_and_comments() {
        let lines = ["<table><tr><td>AT&amp;T<!-- note --></td></tr></table>"];
        assert_eq!(extract_table(&lines), vec![vec!["AT&T".to_string()]]);
    }

    #[test]
    fn test_named_references_in_cells() {
        let lines = [
            "<table><tr><td>Relying Party&rsquo;s duty &mdash; &sect;4.9 &eacute;</td></tr></table>",
        ];
        assert_eq!(
            extract_table(&lines),
            vec![vec!["Relying Party\u{2019}s duty \u{2014} \u{a7}4.9 \u{e9}".to_string()]]
        );
    }

    #[test]
    fn test_garbage_input_does_not_panic() {
        let lines = ["</td></tr><td><<<>>>", "<tr", "</table"];
        assert!(extract_table(&lines).is_empty());
    }

    #[test]
    fn test_cells_spanning_lines_are_joined() {
        let lines = ["<table><tr><td>The CA", "SHALL publish</td></tr></table>"];
        assert_eq!(
            extract_table(&lines),
            vec![vec!["The CA SHALL publish".to_string()]]
        );
    }

    #[test]
    fn test_table_boundary_both() {
        assert_eq!(
            table_boundary("<table><tr><td>x</td></tr></table>"),
            Some(TableBoundary::OpenAndClose)
        );
    }

    #[test]
    fn test_flatten_rows_skips_empty_rows() {
        let rows = vec![vec![], vec!["only".to_string()]];
        assert_eq!(flatten_rows(&rows), "only");
    }
}
