//! The conversion pipeline.

use crate::block::convert_block_lines;
use crate::fence::convert_code_blocks;
use crate::inline::convert_inline;
use crate::list::group_lists;
use crate::paragraph::group_paragraphs;
use crate::special;
use crate::stash::{self, Stash};
use crate::table::group_tables;

/// Convert markdown text to an HTML fragment.
///
/// The passes run in a fixed order; each one sees the output of the
/// previous:
///
/// 1. diagram and math fences
/// 2. generic code fences
/// 3. inline spans
/// 4. headings, horizontal rules, blockquotes
/// 5. lists
/// 6. paragraphs
/// 7. tables
///
/// Fenced blocks from passes 1 and 2 are held back as placeholders and put
/// back only after pass 7, so nothing inside them is rewritten.
///
/// The function is pure: the same input always yields the same output, and
/// it may be called from any number of threads at once.
///
/// # Examples
///
/// ```
/// use mdpage_converter::convert;
///
/// let html = convert("# Hello\n\nSome **bold** text");
/// assert_eq!(html, "<h1>Hello</h1>\n\n<p>\nSome <strong>bold</strong> text\n</p>");
/// ```
#[must_use]
pub fn convert(markdown: &str) -> String {
    let text = markdown.replace("\r\n", "\n");
    let text = stash::protect(&text);
    let mut blocks = Stash::block();

    let text = special::extract(&text, &mut blocks);
    let text = convert_code_blocks(&text, &mut blocks);
    let text = convert_inline(&text);
    let text = convert_block_lines(&text);
    let text = group_lists(&text);
    let text = group_paragraphs(&text);
    let text = group_tables(&text);

    stash::unprotect(&blocks.restore(&text)).into_owned()
}
