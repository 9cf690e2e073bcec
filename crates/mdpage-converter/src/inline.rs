//! Inline spans: code, images, links, bold and italic.
//!
//! Spans never cross a line boundary. Within a line the rules run in a fixed
//! order, and the output of a rule that must not be rewritten again (code
//! spans, image tags, link targets) is held in an inline [`Stash`] until the
//! line is finished:
//!
//! 1. `` `code` ``: before any emphasis so markers inside code survive
//! 2. `![alt](src)`: before links so the leading `!` is never left behind
//! 3. `[text](url)`: the target is stashed, the text stays visible to emphasis
//! 4. `**bold**` / `__bold__`: before italic so `**x**` is not read as
//!    nested italics
//! 5. `*italic*` / `_italic_`

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::{escape_html, escape_text};
use crate::stash::Stash;

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#).unwrap()
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]]+)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#).unwrap()
});

static BOLD_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\s](?:[^*]*[^*\s])?)\*\*").unwrap());

static BOLD_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\s](?:[^_]*[^_\s])?)__").unwrap());

static ITALIC_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());

static ITALIC_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_\s](?:[^_]*[^_\s])?)_").unwrap());

/// Apply every inline rule to each line of `text`.
pub(crate) fn convert_inline(text: &str) -> String {
    text.split('\n')
        .map(convert_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply every inline rule to a single line.
pub(crate) fn convert_line(line: &str) -> String {
    let mut stash = Stash::inline();

    let line = CODE_SPAN_RE.replace_all(line, |caps: &Captures| {
        stash.push(format!("<code>{}</code>", escape_text(&caps[1])))
    });

    let line = IMAGE_RE.replace_all(&line, |caps: &Captures| {
        let title = title_attr(caps.get(3).map(|m| m.as_str()));
        stash.push(format!(
            r#"<img src="{}"{title} alt="{}">"#,
            escape_html(&caps[2]),
            escape_html(&caps[1])
        ))
    });

    let line = LINK_RE.replace_all(&line, |caps: &Captures| {
        let title = title_attr(caps.get(3).map(|m| m.as_str()));
        let open = stash.push(format!(r#"<a href="{}"{title}>"#, escape_html(&caps[2])));
        format!("{open}{}</a>", &caps[1])
    });

    let line = BOLD_STAR_RE.replace_all(&line, "<strong>$1</strong>");
    let line = replace_flanked(&line, &BOLD_UNDERSCORE_RE, "strong");
    let line = ITALIC_STAR_RE.replace_all(&line, "<em>$1</em>");
    let line = replace_flanked(&line, &ITALIC_UNDERSCORE_RE, "em");

    stash.restore(&line)
}

/// Build a ` title="…"` attribute, or nothing when no title was given.
fn title_attr(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!(r#" title="{}""#, escape_html(title)),
        _ => String::new(),
    }
}

/// Wrap underscore-delimited spans in `tag`, skipping intraword matches.
///
/// `snake_case_name` keeps its underscores: a delimiter run touching an
/// alphanumeric character on its outer side does not open or close a span.
fn replace_flanked(text: &str, re: &Regex, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
        {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        let _ = write!(out, "<{tag}>{}</{tag}>", inner.as_str());
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}
