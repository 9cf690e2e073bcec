//! Sidebar navigation built from the contents page.
//!
//! The contents page is ordinary markdown. Each `## ` heading opens a
//! section, and each link to a document (`[Title](page.md)` or
//! `[Title](page)` for an existing key) becomes an entry in the current
//! section. The contents page itself and the optional cover page are always
//! pinned at the top.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::LazyLock;

use mdpage_converter::escape_html;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::corpus::Corpus;
use crate::page::{display_title, page_href};

/// Markdown link; group 1 is `!` for images.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)\s]+)(?:\s+[^)]*)?\)").unwrap());

/// Emphasis and code markers stripped from link text.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*`]+").unwrap());

/// A link in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Document key the entry points at.
    pub key: String,
    /// Text shown in the sidebar.
    pub title: String,
}

/// A titled group of entries, opened by a `## ` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    pub title: String,
    pub entries: Vec<NavEntry>,
}

/// Sidebar structure for the whole site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    /// Contents page and cover page.
    pub pinned: Vec<NavEntry>,
    /// Entries listed before the first section heading.
    pub entries: Vec<NavEntry>,
    pub sections: Vec<NavSection>,
}

impl Navigation {
    /// Build navigation from the contents page markdown.
    ///
    /// Each document appears at most once; later links to an already listed
    /// key are ignored.
    pub fn from_contents(
        contents_key: &str,
        contents_markdown: &str,
        cover_key: Option<&str>,
        corpus: &Corpus,
    ) -> Self {
        let mut nav = Self::default();
        let mut seen: HashSet<String> = HashSet::new();

        for key in std::iter::once(contents_key).chain(cover_key) {
            if seen.insert(key.to_owned()) {
                nav.pinned.push(NavEntry {
                    key: key.to_owned(),
                    title: display_title(key),
                });
            }
        }

        let mut in_fence = false;
        for line in contents_markdown.lines() {
            let line = line.trim();
            if line.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            if let Some(heading) = line.strip_prefix("## ") {
                nav.sections.push(NavSection {
                    title: strip_markers(heading),
                    entries: Vec::new(),
                });
                continue;
            }

            for caps in LINK_RE.captures_iter(line) {
                if !caps[1].is_empty() {
                    continue;
                }
                let Some(key) = link_target_key(&caps[3], corpus) else {
                    continue;
                };
                if !seen.insert(key.clone()) {
                    continue;
                }
                let entry = NavEntry {
                    key,
                    title: strip_markers(&caps[2]),
                };
                match nav.sections.last_mut() {
                    Some(section) => section.entries.push(entry),
                    None => nav.entries.push(entry),
                }
            }
        }

        nav
    }

    /// Every entry in sidebar order.
    pub fn iter(&self) -> impl Iterator<Item = &NavEntry> {
        self.pinned
            .iter()
            .chain(&self.entries)
            .chain(self.sections.iter().flat_map(|s| &s.entries))
    }

    /// Keys of entries that have no document in `corpus`.
    pub fn missing_keys<'a>(&'a self, corpus: &Corpus) -> Vec<&'a str> {
        self.iter()
            .map(|entry| entry.key.as_str())
            .filter(|key| !corpus.contains(key))
            .collect()
    }

    /// Render the sidebar list, marking the entry for `active_key`.
    pub fn render(&self, active_key: &str) -> String {
        let mut html = String::with_capacity(1024);
        html.push_str("<ul>\n");
        for entry in self.pinned.iter().chain(&self.entries) {
            render_entry(&mut html, entry, active_key);
        }
        for section in &self.sections {
            let _ = writeln!(html, "<li><strong>{}</strong>", escape_html(&section.title));
            html.push_str("<ul class=\"chapter-nav\">\n");
            for entry in &section.entries {
                render_entry(&mut html, entry, active_key);
            }
            html.push_str("</ul>\n</li>\n");
        }
        html.push_str("</ul>");
        html
    }
}

fn render_entry(html: &mut String, entry: &NavEntry, active_key: &str) {
    let class = if entry.key == active_key {
        "nav-link active"
    } else {
        "nav-link"
    };
    let _ = writeln!(
        html,
        r#"<li><a href="{}" class="{class}" data-page="{}">{}</a></li>"#,
        page_href(&entry.key),
        escape_html(&entry.key),
        escape_html(&entry.title)
    );
}

/// Resolve a link target to a document key.
///
/// Relative `.md` targets always resolve, whether or not the document
/// exists. Bare targets resolve only when the key is in `corpus`. External
/// links and targets outside the flat source directory never resolve.
fn link_target_key(target: &str, corpus: &Corpus) -> Option<String> {
    if target.contains("://") || target.starts_with('/') || target.starts_with("mailto:") {
        return None;
    }
    let target = target.split('#').next().unwrap_or_default();
    let target = target.strip_prefix("./").unwrap_or(target);
    let decoded = percent_decode_str(target).decode_utf8_lossy();

    if decoded.contains('/') {
        return None;
    }
    if let Some(key) = decoded.strip_suffix(".md") {
        return (!key.is_empty()).then(|| key.to_owned());
    }
    corpus.contains(&decoded).then(|| decoded.into_owned())
}

fn strip_markers(text: &str) -> String {
    MARKER_RE.replace_all(text, "").trim().to_owned()
}
