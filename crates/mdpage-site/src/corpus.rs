//! The document corpus.
//!
//! Every `*.md` file directly inside the source directory is one document,
//! keyed by its file stem. Subdirectories and hidden files are not scanned.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Error returned when the corpus cannot be loaded or written.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// Source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceDirNotFound(PathBuf),
    /// Reading or writing a file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Serializing the content bundle failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CorpusError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Markdown documents keyed by name, in key order.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    documents: BTreeMap<String, String>,
}

impl Corpus {
    /// Load every markdown file directly inside `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::SourceDirNotFound` if `source_dir` is not a
    /// directory, and `CorpusError::Io` if a file cannot be read as UTF-8.
    pub fn load(source_dir: &Path) -> Result<Self, CorpusError> {
        if !source_dir.is_dir() {
            return Err(CorpusError::SourceDirNotFound(source_dir.to_path_buf()));
        }

        let mut documents = BTreeMap::new();
        for entry in fs::read_dir(source_dir).map_err(CorpusError::io(source_dir))? {
            let entry = entry.map_err(CorpusError::io(source_dir))?;
            let path = entry.path();

            let Some(key) = document_key(&path) else {
                continue;
            };
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }

            let markdown = fs::read_to_string(&path).map_err(CorpusError::io(&path))?;
            tracing::debug!(key, path = %path.display(), "Loaded document");
            documents.insert(key.to_owned(), markdown);
        }

        tracing::info!(
            source_dir = %source_dir.display(),
            documents = documents.len(),
            "Corpus loaded"
        );
        Ok(Self { documents })
    }

    /// Build a corpus from in-memory documents.
    pub fn from_documents<K, V>(documents: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(key, markdown)| (key.into(), markdown.into()))
                .collect(),
        }
    }

    /// Markdown text of the document named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }

    /// Whether a document named `key` exists.
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Document names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// `(key, markdown)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(key, markdown)| (key.as_str(), markdown.as_str()))
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The whole corpus as a pretty-printed JSON object `{ key: markdown }`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, CorpusError> {
        Ok(serde_json::to_string_pretty(&self.documents)?)
    }

    /// Write the content bundle to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Io` if the file cannot be written.
    pub fn write_bundle(&self, path: &Path) -> Result<(), CorpusError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(CorpusError::io(parent))?;
        }
        fs::write(path, self.to_json()?).map_err(CorpusError::io(path))?;
        tracing::info!(path = %path.display(), documents = self.len(), "Content bundle written");
        Ok(())
    }
}

/// Key of a markdown file: its UTF-8 stem, unless hidden or not `.md`.
fn document_key(path: &Path) -> Option<&str> {
    if !path.extension().is_some_and(|ext| ext == "md") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    (!stem.is_empty() && !stem.starts_with('.')).then_some(stem)
}
