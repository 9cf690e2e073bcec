//! Generic fenced code blocks.
//!
//! Runs after the special-block pass so diagram and math fences are
//! already gone. The language tag becomes a `language-*` class for an
//! external highlighter.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::{escape_html, escape_text};
use crate::stash::Stash;

/// Opening fence with an optional language glued to the backticks, lazily
/// matched content, then the closing fence line or end of input.
static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```([^\s`]*)[^\n]*\n(.*?)(?:^```[ \t]*$|\z)").unwrap()
});

/// Render a code block container.
///
/// Content is text-escaped exactly once here; highlighters read the text
/// nodes and must not see entities twice.
fn code_block(lang: Option<&str>, content: &str) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_text(content)
        ),
        None => format!("<pre><code>{}</code></pre>", escape_text(content)),
    }
}

/// Replace every remaining code fence in `text` with a stash placeholder.
pub(crate) fn convert_code_blocks(text: &str, stash: &mut Stash) -> String {
    CODE_FENCE_RE
        .replace_all(text, |caps: &Captures| {
            let lang = Some(&caps[1]).filter(|lang| !lang.is_empty());
            let content = caps[2].strip_suffix('\n').unwrap_or(&caps[2]);
            stash.push(code_block(lang, content))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(text: &str) -> String {
        let mut stash = Stash::block();
        let out = convert_code_blocks(text, &mut stash);
        stash.restore(&out)
    }

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            convert("```rust\nfn main() {}\n```"),
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(
            convert("```\nplain code\n```"),
            "<pre><code>plain code</code></pre>"
        );
    }

    #[test]
    fn test_language_after_space_is_ignored() {
        assert_eq!(
            convert("``` rust\nx\n```"),
            "<pre><code>x</code></pre>"
        );
    }

    #[test]
    fn test_content_is_escaped_once() {
        assert_eq!(
            convert("```html\n<a href=\"x\">&amp;</a>\n```"),
            "<pre><code class=\"language-html\">&lt;a href=\"x\"&gt;&amp;amp;&lt;/a&gt;</code></pre>"
        );
    }

    #[test]
    fn test_markdown_inside_code_is_preserved() {
        assert_eq!(
            convert("```\n# heading\n- item\n| a |\n```"),
            "<pre><code># heading\n- item\n| a |</code></pre>"
        );
    }

    #[test]
    fn test_blank_lines_inside_code() {
        assert_eq!(
            convert("```py\na = 1\n\nb = 2\n```"),
            "<pre><code class=\"language-py\">a = 1\n\nb = 2</code></pre>"
        );
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(convert("```\n```"), "<pre><code></code></pre>");
    }

    #[test]
    fn test_two_blocks_not_merged() {
        assert_eq!(
            convert("```a\n1\n```\ntext\n```b\n2\n```"),
            "<pre><code class=\"language-a\">1</code></pre>\ntext\n<pre><code class=\"language-b\">2</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_fence_closes_at_end() {
        assert_eq!(
            convert("before\n```js\nlet x = 1;\n"),
            "before\n<pre><code class=\"language-js\">let x = 1;</code></pre>"
        );
    }

    #[test]
    fn test_language_class_is_escaped() {
        assert_eq!(
            convert("```c\"x\nint\n```"),
            "<pre><code class=\"language-c&quot;x\">int</code></pre>"
        );
    }

    #[test]
    fn test_placeholder_replaces_block() {
        let mut stash = Stash::block();
        let out = convert_code_blocks("```\nx\n```", &mut stash);
        assert_eq!(out, "<mdpage-block data-index=\"0\">\u{E002}</mdpage-block>");
    }
}
