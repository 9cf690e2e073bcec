//! Page rendering: markdown conversion plus site-level post-processing.

use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use mdpage_converter::{convert, escape_html, escape_text};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::{Captures, Regex};

/// Characters escaped when a document key is used as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// `href` pointing at a markdown document. Group 1 is the target without
/// extension, group 2 an optional fragment.
static MD_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"href="([^"#]*)\.md(#[^"]*)?""##).unwrap());

/// A line holding a single link, optionally wrapped in emphasis.
static LINK_ONLY_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:<(?:strong|em)>)*<a href="[^"]*"[^>]*>(.*?)</a>(?:</(?:strong|em)>)*$"#)
        .unwrap()
});

/// Sidebar and `<title>` text for a document key.
pub fn display_title(key: &str) -> String {
    key.replace('_', " ")
}

/// Full `<title>` of a page.
pub fn page_title(key: &str, site_title: &str) -> String {
    format!("{} - {site_title}", display_title(key))
}

/// Relative URL of the rendered page for `key`.
pub fn page_href(key: &str) -> String {
    format!("{}.html", utf8_percent_encode(key, PATH_SEGMENT))
}

/// Options applied to every converted page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Replacement for the `Images` prefix of image sources.
    pub images_dir: String,
    /// Text identifying "back to contents" links to hide. Empty disables hiding.
    pub return_link_text: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            images_dir: "Images".to_owned(),
            return_link_text: String::new(),
        }
    }
}

/// Content of one rendered page, before it is placed in the site template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// HTML fragment for the content area.
    pub html: String,
    /// Whether conversion failed and `html` shows the raw markdown instead.
    pub raw_fallback: bool,
}

/// Render a document's markdown into the content fragment for its page.
pub fn render_markdown(key: &str, markdown: &str, options: &PageOptions) -> RenderedPage {
    let Some(html) = convert_or_log(key, markdown) else {
        return RenderedPage {
            html: raw_markdown_html(markdown),
            raw_fallback: true,
        };
    };

    let html = rewrite_image_paths(&html, &options.images_dir);
    let html = hide_return_links(&html, &options.return_link_text);
    let html = rewrite_markdown_links(&html);

    RenderedPage {
        html,
        raw_fallback: false,
    }
}

/// Run the converter, catching any internal fault.
fn convert_or_log(key: &str, markdown: &str) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| convert(markdown))) {
        Ok(html) => Some(html),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown fault".to_owned());
            tracing::error!(key, %reason, "Markdown conversion failed, showing raw text");
            None
        }
    }
}

/// Fallback content: the unconverted text, escaped.
pub fn raw_markdown_html(markdown: &str) -> String {
    format!(r#"<pre class="raw-markdown">{}</pre>"#, escape_text(markdown))
}

/// Content of the page shown for a navigation target with no document.
pub fn missing_page_html(key: &str, contents_key: &str) -> String {
    format!(
        "<div class=\"error-message\">\n\
         <h3>Page not found</h3>\n\
         <p>The page \"{}\" could not be found.</p>\n\
         <p><a href=\"{}\" class=\"back-link\">Back to {}</a></p>\n\
         </div>",
        escape_html(key),
        page_href(contents_key),
        escape_html(&display_title(contents_key))
    )
}

/// Point `src="Images/…"` at the configured images directory.
fn rewrite_image_paths(html: &str, images_dir: &str) -> String {
    if images_dir == "Images" {
        return html.to_owned();
    }
    html.replace(r#"src="Images/"#, &format!(r#"src="{images_dir}/"#))
}

/// Remove "back to contents" links.
///
/// A line holding only such a link, or a paragraph left empty once they are
/// removed, is dropped together with an `<hr>` directly above it (blank
/// lines between them are allowed).
fn hide_return_links(html: &str, link_text: &str) -> String {
    if link_text.is_empty() || !html.contains(link_text) {
        return html.to_owned();
    }

    let is_return_link = |line: &str| {
        LINK_ONLY_LINE_RE
            .captures(line.trim())
            .is_some_and(|caps| caps[1].contains(link_text))
    };

    let lines: Vec<&str> = html.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let close = (lines[i] == "<p>")
            .then(|| lines[i + 1..].iter().position(|l| *l == "</p>"))
            .flatten()
            .map(|offset| i + 1 + offset);

        let Some(close) = close else {
            if is_return_link(lines[i]) {
                drop_preceding_rule(&mut out);
            } else {
                out.push(lines[i]);
            }
            i += 1;
            continue;
        };

        let body = &lines[i + 1..close];
        let kept: Vec<&str> = body.iter().copied().filter(|l| !is_return_link(l)).collect();

        if kept.is_empty() && !body.is_empty() {
            drop_preceding_rule(&mut out);
        } else {
            out.push("<p>");
            out.extend(kept);
            out.push("</p>");
        }
        i = close + 1;
    }

    out.join("\n")
}

/// Remove the last `<hr>` in `out` if only blank lines follow it.
fn drop_preceding_rule(out: &mut Vec<&str>) {
    if let Some(pos) = out.iter().rposition(|l| !l.trim().is_empty())
        && out[pos] == "<hr>"
    {
        out.remove(pos);
    }
}

/// Turn relative `*.md` hrefs into the matching `*.html` pages.
fn rewrite_markdown_links(html: &str) -> String {
    MD_HREF_RE
        .replace_all(html, |caps: &Captures| {
            let target = &caps[1];
            let fragment = caps.get(2).map_or("", |m| m.as_str());
            if target.is_empty() || target.contains("://") {
                return caps[0].to_owned();
            }
            format!(r#"href="{target}.html{fragment}""#)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> PageOptions {
        PageOptions {
            images_dir: "../MarkDown/Images".to_owned(),
            return_link_text: "← 目次に戻る".to_owned(),
        }
    }

    #[test]
    fn test_display_and_page_title() {
        assert_eq!(display_title("第1章_設計の基本"), "第1章 設計の基本");
        assert_eq!(page_title("getting_started", "Guide"), "getting started - Guide");
    }

    #[test]
    fn test_page_href_encodes_key() {
        assert_eq!(page_href("intro"), "intro.html");
        assert_eq!(
            page_href("第0章 はじめに"),
            "%E7%AC%AC0%E7%AB%A0%20%E3%81%AF%E3%81%98%E3%82%81%E3%81%AB.html"
        );
        assert_eq!(page_href("a#b"), "a%23b.html");
    }

    #[test]
    fn test_render_rewrites_images() {
        let page = render_markdown("p", "![fig](Images/a.png)", &options());
        assert!(page.html.contains(r#"<img src="../MarkDown/Images/a.png" alt="fig">"#));
        assert!(!page.raw_fallback);
    }

    #[test]
    fn test_default_images_dir_leaves_paths() {
        let page = render_markdown("p", "![fig](Images/a.png)", &PageOptions::default());
        assert!(page.html.contains(r#"src="Images/a.png""#));
    }

    #[test]
    fn test_render_hides_return_link_footer() {
        let markdown = "# Chapter\n\nBody text.\n\n---\n\n**[← 目次に戻る](目次.md)**";
        let page = render_markdown("p", markdown, &options());
        assert_eq!(page.html, "<h1>Chapter</h1>\n\n<p>\nBody text.\n</p>\n\n");
    }

    #[test]
    fn test_return_link_removed_from_mixed_paragraph() {
        let html = "<p>\nSee also.\n<a href=\"toc.md\">← 目次に戻る</a>\n</p>";
        assert_eq!(
            hide_return_links(html, "← 目次に戻る"),
            "<p>\nSee also.\n</p>"
        );
    }

    #[test]
    fn test_standalone_return_link_line_removed_with_rule() {
        let html = "<p>\ntext\n</p>\n<hr>\n\n<strong><a href=\"toc.md\">← 目次に戻る</a></strong>\n";
        assert_eq!(
            hide_return_links(html, "← 目次に戻る"),
            "<p>\ntext\n</p>\n\n"
        );
    }

    #[test]
    fn test_other_links_not_hidden() {
        let html = "<hr>\n<p>\n<a href=\"next.md\">Next chapter</a>\n</p>";
        assert_eq!(hide_return_links(html, "← 目次に戻る"), html);
    }

    #[test]
    fn test_rule_not_directly_above_is_kept() {
        let html = "<hr>\n<p>\ntext\n</p>\n<p>\n<a href=\"t.md\">back</a>\n</p>";
        assert_eq!(hide_return_links(html, "back"), "<hr>\n<p>\ntext\n</p>");
    }

    #[test]
    fn test_rewrite_markdown_links() {
        assert_eq!(
            rewrite_markdown_links(r#"<a href="第2章.md">x</a> <a href="b.md#sec">y</a>"#),
            r#"<a href="第2章.html">x</a> <a href="b.html#sec">y</a>"#
        );
        assert_eq!(
            rewrite_markdown_links(r#"<a href="https://host/readme.md">x</a>"#),
            r#"<a href="https://host/readme.md">x</a>"#
        );
        assert_eq!(
            rewrite_markdown_links(r#"<a href="notes.mdx">x</a>"#),
            r#"<a href="notes.mdx">x</a>"#
        );
    }

    #[test]
    fn test_raw_markdown_fallback_escapes() {
        assert_eq!(
            raw_markdown_html("# <T> & co"),
            r#"<pre class="raw-markdown"># &lt;T&gt; &amp; co</pre>"#
        );
    }

    #[test]
    fn test_missing_page_links_back_to_contents() {
        let html = missing_page_html("chapter_9", "table_of_contents");
        assert!(html.contains("\"chapter_9\""));
        assert!(html.contains(
            r#"<a href="table_of_contents.html" class="back-link">Back to table of contents</a>"#
        ));
    }
}
