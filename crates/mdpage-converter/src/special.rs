//! Diagram and math fenced blocks.
//!
//! Fences tagged with [`DIAGRAM_LANGUAGE`] or [`MATH_LANGUAGE`] are turned
//! into containers that external renderers pick up after the page is
//! displayed:
//!
//! - ` ```mermaid ` → `<pre class="mermaid">…</pre>`
//! - ` ```math ` → `<div class="math">…</div>`
//!
//! This pass runs before generic code fences so these blocks never become
//! `<pre><code class="language-mermaid">`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_text;
use crate::stash::{self, Stash};

/// Fence info string that marks a diagram block.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Fence info string that marks a math block.
pub const MATH_LANGUAGE: &str = "math";

/// Opening fence with a reserved keyword, lazily matched content, then the
/// closing fence line or end of input.
static SPECIAL_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```(mermaid|math)[ \t]*\n(.*?)(?:^```[ \t]*$|\z)").unwrap()
});

/// Kind of special block, determined by the fence keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialBlock {
    Diagram,
    Math,
}

impl SpecialBlock {
    fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            DIAGRAM_LANGUAGE => Some(Self::Diagram),
            MATH_LANGUAGE => Some(Self::Math),
            _ => None,
        }
    }

    fn render(self, content: &str) -> String {
        let content = escape_text(content);
        match self {
            Self::Diagram => format!(r#"<pre class="mermaid">{content}</pre>"#),
            Self::Math => format!(r#"<div class="math">{content}</div>"#),
        }
    }
}

/// Replace every special block in `text` with a stash placeholder.
pub(crate) fn extract(text: &str, stash: &mut Stash) -> String {
    SPECIAL_FENCE_RE
        .replace_all(text, |caps: &Captures| {
            let Some(block) = SpecialBlock::parse(&caps[1]) else {
                return caps[0].to_owned();
            };
            let content = caps[2].strip_suffix('\n').unwrap_or(&caps[2]);
            stash.push(block.render(content))
        })
        .into_owned()
}

/// Convert diagram and math fences to their final markup.
///
/// Running this on its own output changes nothing: the converted containers
/// hold no fences to match again.
///
/// # Examples
///
/// ```
/// use mdpage_converter::extract_special_blocks;
///
/// let once = extract_special_blocks("```mermaid\ngraph TD\n  A --> B\n```");
/// assert_eq!(once, "<pre class=\"mermaid\">graph TD\n  A --&gt; B</pre>");
/// assert_eq!(extract_special_blocks(&once), once);
/// ```
#[must_use]
pub fn extract_special_blocks(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = stash::protect(&text);
    let mut blocks = Stash::block();
    let extracted = extract(&text, &mut blocks);
    stash::unprotect(&blocks.restore(&extracted)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_block() {
        let input = "intro\n```mermaid\nsequenceDiagram\n  A->>B: hi\n```\noutro";
        assert_eq!(
            extract_special_blocks(input),
            "intro\n<pre class=\"mermaid\">sequenceDiagram\n  A-&gt;&gt;B: hi</pre>\noutro"
        );
    }

    #[test]
    fn test_math_block() {
        let input = "```math\nE = mc^2\n```";
        assert_eq!(
            extract_special_blocks(input),
            r#"<div class="math">E = mc^2</div>"#
        );
    }

    #[test]
    fn test_content_with_blank_lines_and_markdown() {
        let input = "```math\n# not a heading\n\n**not bold**\n```";
        assert_eq!(
            extract_special_blocks(input),
            "<div class=\"math\"># not a heading\n\n**not bold**</div>"
        );
    }

    #[test]
    fn test_non_greedy_between_blocks() {
        let input = "```math\na\n```\nbetween\n```mermaid\nb\n```";
        assert_eq!(
            extract_special_blocks(input),
            "<div class=\"math\">a</div>\nbetween\n<pre class=\"mermaid\">b</pre>"
        );
    }

    #[test]
    fn test_idempotent() {
        let input = "```mermaid\ngraph LR\n```\n\n```math\nx^2\n```";
        let once = extract_special_blocks(input);
        let twice = extract_special_blocks(&once);
        assert_eq!(once, twice);
        assert_eq!(once.matches("<pre class=\"mermaid\">").count(), 1);
    }

    #[test]
    fn test_ordinary_code_fence_untouched() {
        let input = "```rust\nfn main() {}\n```";
        assert_eq!(extract_special_blocks(input), input);
    }

    #[test]
    fn test_keyword_prefix_is_not_special() {
        let input = "```mermaidjs\ngraph\n```";
        assert_eq!(extract_special_blocks(input), input);
    }

    #[test]
    fn test_unterminated_block_runs_to_end() {
        let input = "```mermaid\ngraph TD\nA --> B\n";
        assert_eq!(
            extract_special_blocks(input),
            "<pre class=\"mermaid\">graph TD\nA --&gt; B</pre>"
        );
    }

    #[test]
    fn test_crlf_input() {
        let input = "```math\r\nx\r\n```\r\n";
        assert_eq!(extract_special_blocks(input), "<div class=\"math\">x</div>\n");
    }

    #[test]
    fn test_extract_leaves_placeholder_line() {
        let mut stash = Stash::block();
        let out = extract("a\n```math\nx\n```\nb", &mut stash);
        assert_eq!(
            out,
            "a\n<mdpage-block data-index=\"0\">\u{E002}</mdpage-block>\nb"
        );
    }
}
