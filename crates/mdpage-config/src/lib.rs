//! Configuration management for mdpage.
//!
//! Parses `mdpage.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.title`
//! - `assets.highlight_script`
//! - `assets.highlight_stylesheet`
//! - `assets.diagram_script`
//! - `assets.math_script`
//!
//! ## Example
//!
//! ```toml
//! [site]
//! title = "Team Handbook"
//! contents_page = "contents"
//! cover_page = "cover"
//!
//! [docs]
//! source_dir = "docs"
//! output_dir = "site"
//!
//! [assets]
//! math_script = "${MATH_CDN:-https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js}"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override site title.
    pub title: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpage.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Browser-side script and stylesheet URLs.
    pub assets: AssetsConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, appended to every page title.
    pub title: String,
    /// Key of the document that drives navigation and becomes `index.html`.
    pub contents_page: String,
    /// Key of an optional cover document pinned below the contents page.
    pub cover_page: Option<String>,
    /// Link text of the "back to contents" footer links hidden on rendered pages.
    pub return_link_text: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            contents_page: "contents".to_owned(),
            cover_page: None,
            return_link_text: "← Back to contents".to_owned(),
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    images_dir: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Directory the HTML site is written to.
    pub output_dir: PathBuf,
    /// URL prefix, relative to the output pages, replacing `Images/` in
    /// image sources.
    pub images_dir: String,
}

/// URLs of the browser-side renderers loaded by every page.
///
/// An empty string leaves the corresponding tag out of the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Syntax highlighter script.
    pub highlight_script: String,
    /// Syntax highlighter theme stylesheet.
    pub highlight_stylesheet: String,
    /// Diagram renderer script (decorates `<pre class="mermaid">`).
    pub diagram_script: String,
    /// Math typesetting script (decorates `<div class="math">`).
    pub math_script: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            highlight_script: "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11/highlight.min.js"
                .to_owned(),
            highlight_stylesheet:
                "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11/styles/github.min.css"
                    .to_owned(),
            diagram_script: "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"
                .to_owned(),
            math_script: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js".to_owned(),
        }
    }
}

impl AssetsConfig {
    /// Fields as `(name, value)` pairs for expansion and validation.
    fn fields_mut(&mut self) -> [(&'static str, &mut String); 4] {
        [
            ("assets.highlight_script", &mut self.highlight_script),
            ("assets.highlight_stylesheet", &mut self.highlight_stylesheet),
            ("assets.diagram_script", &mut self.diagram_script),
            ("assets.math_script", &mut self.math_script),
        ]
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("assets.highlight_script", &self.highlight_script),
            ("assets.highlight_stylesheet", &self.highlight_stylesheet),
            ("assets.diagram_script", &self.diagram_script),
            ("assets.math_script", &self.math_script),
        ]
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.title`").
        field: String,
        /// Error message (e.g., "${`SITE_TITLE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an asset URL to be absolute http(s), root-relative or relative,
/// and free of whitespace and quotes. Empty means "not loaded".
fn require_asset_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Ok(());
    }
    if url.chars().any(|c| c.is_whitespace() || c == '"' || c == '<' || c == '>') {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain whitespace, quotes or angle brackets"
        )));
    }
    if let Some((scheme, _)) = url.split_once("://")
        && scheme != "http"
        && scheme != "https"
    {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https:// when absolute"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpage.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment reference cannot be expanded, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(title) = &settings.title {
            self.site.title.clone_from(title);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its ancestors.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            assets: AssetsConfig::default(),
            docs_resolved: DocsConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        for (field, url) in self.assets.fields() {
            require_asset_url(url, field)?;
        }
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.contents_page, "site.contents_page")?;
        if let Some(cover) = &self.site.cover_page {
            require_non_empty(cover, "site.cover_page")?;
        }
        if self.docs_resolved.images_dir.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "docs.images_dir must not contain whitespace".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in_place(&mut self.site.title, "site.title")?;
        for (field, value) in self.assets.fields_mut() {
            expand::expand_in_place(value, field)?;
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "site"),
            images_dir: self
                .docs
                .images_dir
                .as_deref()
                .unwrap_or("Images")
                .trim_end_matches('/')
                .to_owned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.contents_page, "contents");
        assert_eq!(config.site.cover_page, None);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/site"));
        assert_eq!(config.docs_resolved.images_dir, "Images");
        assert!(config.assets.diagram_script.contains("mermaid"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.return_link_text, "← Back to contents");
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
title = "目次サイト"
contents_page = "目次"
cover_page = "表紙"
return_link_text = "← 目次に戻る"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "目次サイト");
        assert_eq!(config.site.contents_page, "目次");
        assert_eq!(config.site.cover_page.as_deref(), Some("表紙"));
        assert_eq!(config.site.return_link_text, "← 目次に戻る");
    }

    #[test]
    fn test_parse_assets_config_keeps_unset_defaults() {
        let toml = r#"
[assets]
math_script = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.assets.math_script, "");
        assert!(config.assets.highlight_script.starts_with("https://"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "MarkDown"
output_dir = "public/html"
images_dir = "../MarkDown/Images/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/MarkDown")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/public/html")
        );
        assert_eq!(config.docs_resolved.images_dir, "../MarkDown/Images");
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let toml = r#"
[docs]
source_dir = "/srv/docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/site")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/out")),
            title: Some("Override".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/out"));
        assert_eq!(config.site.title, "Override");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site.title, config_before.site.title);
        assert_eq!(
            config.docs_resolved.source_dir,
            config_before.docs_resolved.source_dir
        );
    }

    #[test]
    fn test_expand_env_vars_title_and_assets() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDPAGE_TEST_TITLE", "Handbook");
            std::env::set_var("MDPAGE_TEST_CDN", "https://cdn.internal");
        }

        let toml = r#"
[site]
title = "${MDPAGE_TEST_TITLE}"

[assets]
diagram_script = "${MDPAGE_TEST_CDN}/mermaid.js"
math_script = "${MDPAGE_TEST_NO_MATH:-/static/math.js}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.site.title, "Handbook");
        assert_eq!(config.assets.diagram_script, "https://cdn.internal/mermaid.js");
        assert_eq!(config.assets.math_script, "/static/math.js");

        unsafe {
            std::env::remove_var("MDPAGE_TEST_TITLE");
            std::env::remove_var("MDPAGE_TEST_CDN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_MDPAGE_CONFIG_TEST");
        }

        let toml = r#"
[assets]
highlight_script = "${MISSING_VAR_MDPAGE_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_MDPAGE_CONFIG_TEST"));
        assert!(err.to_string().contains("assets.highlight_script"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = "   ".to_owned();
        assert_validation_error(&config, &["site.title", "empty"]);
    }

    #[test]
    fn test_validate_empty_contents_page() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.contents_page = String::new();
        assert_validation_error(&config, &["site.contents_page"]);
    }

    #[test]
    fn test_validate_empty_cover_page() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.cover_page = Some(String::new());
        assert_validation_error(&config, &["site.cover_page"]);
    }

    #[test]
    fn test_validate_asset_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.assets.diagram_script = "ftp://cdn.test/mermaid.js".to_owned();
        assert_validation_error(&config, &["assets.diagram_script", "http"]);
    }

    #[test]
    fn test_validate_asset_url_whitespace() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.assets.highlight_stylesheet = "styles/a b.css".to_owned();
        assert_validation_error(&config, &["assets.highlight_stylesheet", "whitespace"]);
    }

    #[test]
    fn test_validate_asset_url_relative_and_empty_pass() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.assets.highlight_script = "js/highlight.js".to_owned();
        config.assets.highlight_stylesheet = "/css/theme.css".to_owned();
        config.assets.math_script = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/mdpage.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[site]\ntitle = \"Guide\"\n\n[docs]\nsource_dir = \"md\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Guide");
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("md"));
        assert_eq!(config.docs_resolved.output_dir, dir.path().join("site"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site]\ntitle = \"File\"\n").unwrap();

        let settings = CliSettings {
            title: Some("Cli".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.site.title, "Cli");
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site\ntitle = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_from_walks_up_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
