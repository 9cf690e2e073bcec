//! Static site builder.
//!
//! Loads the corpus, builds navigation from the contents page, renders every
//! document in parallel and writes the HTML pages plus the JSON content
//! bundle to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use mdpage_config::{AssetsConfig, Config};
use rayon::prelude::*;

use crate::corpus::{Corpus, CorpusError};
use crate::navigation::Navigation;
use crate::page::{self, PageOptions, RenderedPage, page_href, page_title};
use crate::template::{PageData, render_page};

/// File name of the content bundle written next to the pages.
pub const BUNDLE_FILENAME: &str = "content.json";

/// Configuration for static site building.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the markdown documents.
    pub source_dir: PathBuf,
    /// Directory the site is written to.
    pub output_dir: PathBuf,
    pub site_title: String,
    /// Key of the contents page.
    pub contents_page: String,
    /// Key of the optional cover page.
    pub cover_page: Option<String>,
    pub page_options: PageOptions,
    pub assets: AssetsConfig,
}

impl From<&Config> for BuildConfig {
    fn from(config: &Config) -> Self {
        Self {
            source_dir: config.docs_resolved.source_dir.clone(),
            output_dir: config.docs_resolved.output_dir.clone(),
            site_title: config.site.title.clone(),
            contents_page: config.site.contents_page.clone(),
            cover_page: config.site.cover_page.clone(),
            page_options: PageOptions {
                images_dir: config.docs_resolved.images_dir.clone(),
                return_link_text: config.site.return_link_text.clone(),
            },
            assets: config.assets.clone(),
        }
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Loading the corpus or writing the bundle failed.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    /// Writing a page failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a finished build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of HTML files written, `index.html` included.
    pub pages_written: usize,
    /// Problems that did not stop the build.
    pub warnings: Vec<String>,
}

/// Builds a static documentation site from a directory of markdown files.
pub struct StaticSiteBuilder {
    config: BuildConfig,
}

impl StaticSiteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the site.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Corpus` if the source directory cannot be read or
    /// the bundle cannot be written, and `BuildError::Io` if a page cannot be
    /// written.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let corpus = Corpus::load(&self.config.source_dir)?;
        self.build_from_corpus(&corpus)
    }

    /// Build the site from an already loaded corpus.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), minus corpus loading.
    pub fn build_from_corpus(&self, corpus: &Corpus) -> Result<BuildReport, BuildError> {
        let config = &self.config;
        let output_dir = &config.output_dir;
        let mut report = BuildReport::default();

        let contents_markdown = corpus.get(&config.contents_page).unwrap_or_else(|| {
            report.warnings.push(format!(
                "Contents page '{}' not found; navigation has no entries",
                config.contents_page
            ));
            ""
        });
        let navigation = Navigation::from_contents(
            &config.contents_page,
            contents_markdown,
            config.cover_page.as_deref(),
            corpus,
        );
        let missing = navigation.missing_keys(corpus);
        for key in &missing {
            tracing::warn!(key, "Navigation links to a missing page");
            report.warnings.push(format!("Navigation links to missing page '{key}'"));
        }

        fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

        let documents: Vec<(&str, &str)> = corpus.iter().collect();
        let fallbacks = documents
            .par_iter()
            .map(|&(key, markdown)| {
                let rendered = page::render_markdown(key, markdown, &config.page_options);
                self.write_page(key, &rendered.html, &navigation)?;
                if key == config.contents_page {
                    self.write_index(&rendered, &navigation)?;
                }
                Ok(rendered.raw_fallback.then_some(key))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        for key in fallbacks.into_iter().flatten() {
            report
                .warnings
                .push(format!("Page '{key}' could not be converted; showing raw markdown"));
        }

        report.pages_written = documents.len();
        if corpus.contains(&config.contents_page) {
            report.pages_written += 1;
        }

        for key in &missing {
            let html = page::missing_page_html(key, &config.contents_page);
            self.write_page(key, &html, &navigation)?;
            report.pages_written += 1;
        }

        if !corpus.contains(&config.contents_page) {
            let html = page::missing_page_html(&config.contents_page, &config.contents_page);
            let document = self.document(&config.contents_page, &html, &navigation);
            write_file(&output_dir.join("index.html"), &document)?;
            report.pages_written += 1;
        }

        corpus.write_bundle(&output_dir.join(BUNDLE_FILENAME))?;

        tracing::info!(
            output_dir = %output_dir.display(),
            pages = report.pages_written,
            warnings = report.warnings.len(),
            "Site built"
        );
        Ok(report)
    }

    /// Wrap `content` in the page template for `key`.
    fn document(&self, key: &str, content: &str, navigation: &Navigation) -> String {
        let config = &self.config;
        let title = page_title(key, &config.site_title);
        let nav_html = navigation.render(key);
        let home_href = page_href(&config.contents_page);
        render_page(&PageData {
            title: &title,
            site_title: &config.site_title,
            home_href: &home_href,
            navigation: &nav_html,
            content,
            assets: &config.assets,
        })
    }

    fn write_page(
        &self,
        key: &str,
        content: &str,
        navigation: &Navigation,
    ) -> Result<(), BuildError> {
        let path = self.config.output_dir.join(format!("{key}.html"));
        write_file(&path, &self.document(key, content, navigation))?;
        tracing::debug!(key, path = %path.display(), "Page written");
        Ok(())
    }

    fn write_index(
        &self,
        contents: &RenderedPage,
        navigation: &Navigation,
    ) -> Result<(), BuildError> {
        let document = self.document(&self.config.contents_page, &contents.html, navigation);
        write_file(&self.config.output_dir.join("index.html"), &document)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    fs::write(path, content).map_err(io_error(path))
}
