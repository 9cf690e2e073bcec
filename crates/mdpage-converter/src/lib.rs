//! Line-oriented markdown to HTML converter.
//!
//! This crate provides [`convert`], a pure function from markdown text to an
//! HTML fragment. It is not a `CommonMark` implementation: the document is
//! rewritten by a fixed sequence of line-based passes using regular
//! expressions, without building a syntax tree.
//!
//! # Architecture
//!
//! The passes, in order:
//! - `special`: ` ```mermaid ` and ` ```math ` fences become containers for
//!   external diagram and math renderers
//! - `fence`: remaining fences become `<pre><code class="language-*">`
//! - `inline`: code spans, images, links, bold, italic
//! - `block`: headings, horizontal rules, blockquotes
//! - `list`: contiguous list items grouped into `<ul>` / `<ol>`
//! - `paragraph`: contiguous plain lines grouped into `<p>`
//! - `table`: contiguous pipe rows grouped into `<table>`
//!
//! Each grouping pass is a single forward scan holding its state in a local
//! value. Nothing is shared between calls.
//!
//! Highlighting, diagram rendering and math typesetting are left to scripts
//! that decorate the fragment after it is inserted into a page.
//!
//! # Example
//!
//! ```
//! use mdpage_converter::convert;
//!
//! let html = convert("- one\n- two");
//! assert_eq!(html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>");
//! ```

mod block;
mod converter;
mod escape;
mod fence;
mod inline;
mod list;
mod paragraph;
mod special;
mod stash;
mod table;

pub use converter::convert;
pub use escape::{escape_html, escape_text};
pub use special::{DIAGRAM_LANGUAGE, MATH_LANGUAGE, extract_special_blocks};
