//! Placeholders for fragments that later passes must not rewrite.
//!
//! Converted code, diagram and math blocks are replaced by an intermediate
//! `<mdpage-block>` element on a line of its own. The element begins with
//! `<`, so the list, paragraph and table passes treat it as already-tagged
//! markup and leave it alone. Inline fragments (code spans, link targets,
//! images) use private-use characters instead so that they never change how
//! a line is classified.
//!
//! Both placeholder forms contain a reserved private-use character. Input
//! text goes through [`protect`] first, which tags every reserved character
//! it holds, so no input can spell a placeholder. [`unprotect`] reverses
//! this once every placeholder has been restored.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Opens an inline placeholder.
const INLINE_OPEN: char = '\u{E000}';
/// Closes an inline placeholder.
const INLINE_CLOSE: char = '\u{E001}';
/// Content of a block placeholder element.
const BLOCK_MARK: char = '\u{E002}';
/// Follows every reserved character that came from the input.
const INPUT_TAG: char = '\u{E003}';

static BLOCK_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("<mdpage-block data-index=\"(\\d+)\">\u{E002}</mdpage-block>").unwrap()
});

static INLINE_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

fn is_reserved(c: char) -> bool {
    matches!(c, INLINE_OPEN | INLINE_CLOSE | BLOCK_MARK | INPUT_TAG)
}

/// Tag every reserved character in `text` so it cannot form a placeholder.
pub(crate) fn protect(text: &str) -> Cow<'_, str> {
    if !text.contains(is_reserved) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        out.push(c);
        if is_reserved(c) {
            out.push(INPUT_TAG);
        }
    }
    Cow::Owned(out)
}

/// Undo [`protect`].
pub(crate) fn unprotect(text: &str) -> Cow<'_, str> {
    if !text.contains(is_reserved) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if is_reserved(c) && chars.peek() == Some(&INPUT_TAG) {
            chars.next();
        }
    }
    Cow::Owned(out)
}

/// Which placeholder syntax a stash emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StashKind {
    Block,
    Inline,
}

/// Converted fragments held aside until the end of a pass sequence.
#[derive(Debug)]
pub(crate) struct Stash {
    kind: StashKind,
    fragments: Vec<String>,
}

impl Stash {
    /// Stash for whole blocks (placeholder occupies its own line).
    pub(crate) fn block() -> Self {
        Self {
            kind: StashKind::Block,
            fragments: Vec::new(),
        }
    }

    /// Stash for spans within a single line.
    pub(crate) fn inline() -> Self {
        Self {
            kind: StashKind::Inline,
            fragments: Vec::new(),
        }
    }

    /// Store a fragment and return the placeholder that stands in for it.
    pub(crate) fn push(&mut self, html: String) -> String {
        let index = self.fragments.len();
        self.fragments.push(html);
        match self.kind {
            StashKind::Block => {
                format!(r#"<mdpage-block data-index="{index}">{BLOCK_MARK}</mdpage-block>"#)
            }
            StashKind::Inline => format!("{INLINE_OPEN}{index}{INLINE_CLOSE}"),
        }
    }

    /// Replace every placeholder in `text` with its stored fragment.
    ///
    /// Fragments may themselves contain earlier placeholders (an image whose
    /// alt text held a code span). A fragment is only searched for indices
    /// below its own, so restoration always terminates. Unknown indices are
    /// left as they are.
    pub(crate) fn restore(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_owned();
        }
        self.restore_below(text, self.fragments.len())
    }

    fn restore_below(&self, text: &str, limit: usize) -> String {
        let re = match self.kind {
            StashKind::Block => &*BLOCK_PLACEHOLDER_RE,
            StashKind::Inline => &*INLINE_PLACEHOLDER_RE,
        };
        re.replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .filter(|&index| index < limit)
                .map_or_else(
                    || caps[0].to_owned(),
                    |index| self.restore_below(&self.fragments[index], index),
                )
        })
        .into_owned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
