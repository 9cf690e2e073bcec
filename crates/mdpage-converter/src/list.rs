//! List grouping.
//!
//! Contiguous list-item lines become one `<ul>` or `<ol>` with an `<li>` per
//! line. Lists are flat: leading indentation is accepted but stripped, so an
//! indented item continues the surrounding list instead of nesting.
//!
//! The list kind is fixed by the line that opens the group. A run such as
//! `- a` followed by `1. b` is a single `<ul>`. This is kept for
//! compatibility with existing content and is a known limitation.

use std::sync::LazyLock;

use regex::Regex;

/// Optional indent, then `-`, `*` or `+` (unordered) or digits and a dot
/// (ordered), then at least one space and the item text.
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:([-*+])|\d+\.)[ \t]+(.*)$").unwrap());

/// Container kind of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// A line recognised as a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListItem<'a> {
    kind: ListKind,
    content: &'a str,
}

/// Match a list-item line, returning its marker kind and stripped content.
fn list_item(line: &str) -> Option<ListItem<'_>> {
    let caps = LIST_ITEM_RE.captures(line)?;
    let kind = if caps.get(1).is_some() {
        ListKind::Unordered
    } else {
        ListKind::Ordered
    };
    Some(ListItem {
        kind,
        content: caps.get(2).map_or("", |m| m.as_str()),
    })
}

/// Wrap each run of list-item lines in a list container.
pub(crate) fn group_lists(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    // Kind of the list currently open, if any.
    let mut open: Option<ListKind> = None;

    for line in text.split('\n') {
        if let Some(item) = list_item(line) {
            if open.is_none() {
                out.push(format!("<{}>", item.kind.tag()));
                open = Some(item.kind);
            }
            out.push(format!("<li>{}</li>", item.content));
        } else {
            if let Some(kind) = open.take() {
                out.push(format!("</{}>", kind.tag()));
            }
            out.push(line.to_owned());
        }
    }

    if let Some(kind) = open {
        out.push(format!("</{}>", kind.tag()));
    }

    out.join("\n")
}
