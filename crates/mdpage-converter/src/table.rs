//! Table grouping.
//!
//! A run of pipe-delimited rows becomes one `<table>`. When the first row is
//! followed by an alignment separator (`|---|:--:|`), it is emitted as the
//! `<thead>` and the remaining rows go into `<tbody>`. Without a separator
//! every row is a body row and no `<thead>` is produced.
//!
//! Separator rows are never rendered. Column alignment is not carried into
//! the output.

use std::fmt::Write;

/// Whether a line is a table row: trimmed, it starts and ends with `|`.
pub(crate) fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Split a row into trimmed cells, dropping the segments outside the
/// bounding pipes.
fn split_cells(line: &str) -> Vec<&str> {
    let segments: Vec<&str> = line.trim().split('|').collect();
    let inner = segments
        .get(1..segments.len().saturating_sub(1))
        .unwrap_or(&[]);
    inner.iter().map(|cell| cell.trim()).collect()
}

/// Whether every cell consists only of hyphens and optional colons.
fn is_separator(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}

fn render_row(cells: &[&str], tag: &str) -> String {
    let mut row = String::from("<tr>");
    for cell in cells {
        let _ = write!(row, "<{tag}>{cell}</{tag}>");
    }
    row.push_str("</tr>");
    row
}

/// Progress through the table currently being emitted.
#[derive(Debug)]
enum TableState<'a> {
    /// Not inside a table.
    Outside,
    /// Table opened; the first data row (if any yet) is held back until the
    /// next line shows whether it is a header.
    AwaitingHeader(Option<Vec<&'a str>>),
    /// Header resolved (or ruled out). `body_open` tracks `<tbody>`.
    Rows { body_open: bool },
}

impl<'a> TableState<'a> {
    /// Consume one table row, emitting whatever it resolves.
    fn row(self, cells: Vec<&'a str>, out: &mut Vec<String>) -> Self {
        let separator = is_separator(&cells);
        match self {
            Self::Outside => {
                out.push("<table>".to_owned());
                Self::AwaitingHeader((!separator).then_some(cells))
            }
            Self::AwaitingHeader(None) => Self::AwaitingHeader((!separator).then_some(cells)),
            Self::AwaitingHeader(Some(header)) if separator => {
                out.push("<thead>".to_owned());
                out.push(render_row(&header, "th"));
                out.push("</thead>".to_owned());
                Self::Rows { body_open: false }
            }
            Self::AwaitingHeader(Some(first)) => {
                out.push("<tbody>".to_owned());
                out.push(render_row(&first, "td"));
                out.push(render_row(&cells, "td"));
                Self::Rows { body_open: true }
            }
            Self::Rows { body_open } if separator => Self::Rows { body_open },
            Self::Rows { body_open } => {
                if !body_open {
                    out.push("<tbody>".to_owned());
                }
                out.push(render_row(&cells, "td"));
                Self::Rows { body_open: true }
            }
        }
    }

    /// Close whatever sections are open.
    fn close(self, out: &mut Vec<String>) {
        match self {
            Self::Outside => return,
            Self::AwaitingHeader(None) | Self::Rows { body_open: false } => {}
            Self::AwaitingHeader(Some(only)) => {
                out.push("<tbody>".to_owned());
                out.push(render_row(&only, "td"));
                out.push("</tbody>".to_owned());
            }
            Self::Rows { body_open: true } => out.push("</tbody>".to_owned()),
        }
        out.push("</table>".to_owned());
    }
}

/// Assemble each run of table rows into a table.
pub(crate) fn group_tables(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut state = TableState::Outside;

    for line in text.split('\n') {
        if is_table_row(line) {
            state = state.row(split_cells(line), &mut out);
        } else {
            state.close(&mut out);
            state = TableState::Outside;
            out.push(line.to_owned());
        }
    }
    state.close(&mut out);

    out.join("\n")
}
