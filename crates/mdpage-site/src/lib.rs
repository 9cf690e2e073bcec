//! Static documentation site generation for mdpage.
//!
//! Turns a flat directory of markdown documents into a browsable HTML site:
//! one page per document, a sidebar built from the contents page, and a
//! JSON bundle of the raw markdown.
//!
//! # Example
//!
//! ```no_run
//! use mdpage_config::Config;
//! use mdpage_site::{BuildConfig, StaticSiteBuilder};
//!
//! let config = Config::load(None, None)?;
//! let report = StaticSiteBuilder::new(BuildConfig::from(&config)).build()?;
//! println!("{} pages", report.pages_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod corpus;
mod navigation;
mod page;
mod template;

pub use builder::{BUNDLE_FILENAME, BuildConfig, BuildError, BuildReport, StaticSiteBuilder};
pub use corpus::{Corpus, CorpusError};
pub use navigation::{NavEntry, NavSection, Navigation};
pub use page::{
    PageOptions, RenderedPage, display_title, missing_page_html, page_href, page_title,
    raw_markdown_html, render_markdown,
};
