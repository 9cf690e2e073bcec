//! Paragraph grouping.
//!
//! Runs after every block-producing pass except tables. Contiguous plain
//! lines are wrapped in one `<p>` … `</p>` pair. Blank lines and any line
//! starting with `<` count as already tagged: they close the paragraph and
//! pass through. This includes lines opening with inline markup such as
//! `<strong>` or `<a>`. Table rows are never paragraph text.

use crate::table::is_table_row;

/// Whether a line belongs inside a paragraph.
fn is_plain(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !trimmed.starts_with('#')
        && !trimmed.starts_with('<')
        && !is_table_row(trimmed)
}

/// Wrap each run of plain lines in a single paragraph.
pub(crate) fn group_paragraphs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_paragraph = false;

    for line in text.split('\n') {
        if is_plain(line) {
            if !in_paragraph {
                out.push("<p>");
                in_paragraph = true;
            }
        } else if in_paragraph {
            out.push("</p>");
            in_paragraph = false;
        }
        out.push(line);
    }

    if in_paragraph {
        out.push("</p>");
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_consecutive_lines_share_one_paragraph() {
        assert_eq!(
            group_paragraphs("first line\nsecond line"),
            "<p>\nfirst line\nsecond line\n</p>"
        );
    }

    #[test]
    fn test_blank_line_separates_paragraphs() {
        assert_eq!(
            group_paragraphs("one\n\ntwo"),
            "<p>\none\n</p>\n\n<p>\ntwo\n</p>"
        );
    }

    #[test]
    fn test_block_markup_passes_through() {
        assert_eq!(
            group_paragraphs("<h1>Title</h1>\ntext\n<hr>"),
            "<h1>Title</h1>\n<p>\ntext\n</p>\n<hr>"
        );
    }

    #[test]
    fn test_line_opening_with_inline_markup_is_tagged() {
        assert_eq!(
            group_paragraphs("<strong>Bold</strong> line\nplain"),
            "<strong>Bold</strong> line\n<p>\nplain\n</p>"
        );
        assert_eq!(
            group_paragraphs(r#"<a href="x">link</a>"#),
            r#"<a href="x">link</a>"#
        );
    }

    #[test]
    fn test_unconverted_hash_line_is_not_wrapped() {
        assert_eq!(group_paragraphs("####### Deep"), "####### Deep");
    }

    #[test]
    fn test_any_leading_less_than_is_tagged() {
        assert_eq!(group_paragraphs("< 3 items"), "< 3 items");
        assert_eq!(group_paragraphs("  <div>"), "  <div>");
    }

    #[test]
    fn test_table_rows_are_not_paragraph_text() {
        assert_eq!(
            group_paragraphs("intro\n| a | b |"),
            "<p>\nintro\n</p>\n| a | b |"
        );
    }

    #[test]
    fn test_whitespace_only_line_closes_paragraph() {
        assert_eq!(group_paragraphs("a\n   \nb"), "<p>\na\n</p>\n   \n<p>\nb\n</p>");
    }

    #[test]
    fn test_block_placeholder_is_markup() {
        let placeholder = "<mdpage-block data-index=\"0\">\u{E002}</mdpage-block>";
        assert_eq!(group_paragraphs(placeholder), placeholder);
    }

    #[test]
    fn test_closes_at_end_of_input() {
        assert_eq!(group_paragraphs("<ul>\n</ul>\ntail"), "<ul>\n</ul>\n<p>\ntail\n</p>");
    }
}
