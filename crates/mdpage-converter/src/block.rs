//! Single-line block constructs: headings, horizontal rules, blockquotes.
//!
//! Each line is matched against the rules in order and the first match
//! wins. A line matching none of them is returned unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// One to six `#` markers, a space, then the heading text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) (.*)$").unwrap());

/// `>` and a space, then the quoted text.
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^> (.*)$").unwrap());

/// A block construct recognised on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockLine<'a> {
    Heading { level: usize, content: &'a str },
    HorizontalRule,
    Blockquote(&'a str),
}

impl<'a> BlockLine<'a> {
    /// Match `line` against heading, horizontal rule and blockquote rules.
    fn parse(line: &'a str) -> Option<Self> {
        if let Some(caps) = HEADING_RE.captures(line) {
            let (Some(marks), Some(content)) = (caps.get(1), caps.get(2)) else {
                return None;
            };
            return Some(Self::Heading {
                level: marks.as_str().len(),
                content: content.as_str(),
            });
        }
        if line == "---" {
            return Some(Self::HorizontalRule);
        }
        BLOCKQUOTE_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|content| Self::Blockquote(content.as_str()))
    }

    fn render(self) -> String {
        match self {
            Self::Heading { level, content } => format!("<h{level}>{content}</h{level}>"),
            Self::HorizontalRule => "<hr>".to_owned(),
            Self::Blockquote(content) => format!("<blockquote>{content}</blockquote>"),
        }
    }
}

/// Convert heading, horizontal rule and blockquote lines.
pub(crate) fn convert_block_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| BlockLine::parse(line).map_or_else(|| line.to_owned(), BlockLine::render))
        .collect::<Vec<_>>()
        .join("\n")
}
