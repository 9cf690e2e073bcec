//! HTML page template for static site generation.
//!
//! Produces a complete document: head with the renderer scripts, a sidebar
//! with the navigation list, and the content container. Highlighting,
//! diagrams and math are decorated in the browser by the configured scripts.

use std::fmt::Write;

use mdpage_config::AssetsConfig;
use mdpage_converter::{DIAGRAM_LANGUAGE, escape_html};

/// All data needed to render a static page.
pub struct PageData<'a> {
    /// Full `<title>` text.
    pub title: &'a str,
    /// Site title shown above the sidebar.
    pub site_title: &'a str,
    /// Relative URL of the contents page.
    pub home_href: &'a str,
    /// Rendered sidebar list.
    pub navigation: &'a str,
    /// Content fragment.
    pub content: &'a str,
    pub assets: &'a AssetsConfig,
}

const STYLE: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; line-height: 1.6; color: #222; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 280px; flex-shrink: 0; border-right: 1px solid #e5e7eb; padding: 1.5rem 1rem; box-sizing: border-box; }
.sidebar ul { list-style: none; padding-left: 0; margin: 0; }
.sidebar .chapter-nav { padding-left: 0.75rem; }
.nav-link { display: block; padding: 0.25rem 0.5rem; border-radius: 4px; color: #374151; text-decoration: none; }
.nav-link.active { background: #eef2ff; color: #4338ca; font-weight: 600; }
.content { flex: 1; min-width: 0; max-width: 56rem; padding: 1.5rem 2rem 3rem; }
.toggle-sidebar { display: none; }
.raw-markdown { white-space: pre-wrap; }
.error-message { background: #ffebee; border: 1px solid #f44336; border-radius: 8px; padding: 1rem; color: #c62828; text-align: center; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 0.25rem 0.75rem; }
@media (max-width: 768px) {
  .layout { flex-direction: column; }
  .sidebar { display: none; width: 100%; }
  .sidebar.open { display: block; }
  .toggle-sidebar { display: block; }
}
";

/// Wraps `div.math` content in display delimiters before `MathJax` typesets.
const MATH_CONFIG: &str = "\
window.MathJax = { startup: { pageReady() {
  document.querySelectorAll('div.math').forEach(el => { el.textContent = '\\\\[' + el.textContent + '\\\\]'; });
  return MathJax.startup.defaultPageReady();
} } };";

/// Render a complete static HTML page.
pub fn render_page(page: &PageData) -> String {
    let mut html = String::with_capacity(page.content.len() + page.navigation.len() + 4096);

    // DOCTYPE and head
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(page.title));
    render_head_assets(&mut html, page.assets);
    let _ = writeln!(html, "<style>\n{STYLE}</style>");
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"layout\">\n");
    html.push_str("<button class=\"toggle-sidebar\" id=\"toggleSidebar\">☰</button>\n");

    // Navigation sidebar
    html.push_str("<aside class=\"sidebar\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"site-title\"><a href=\"{}\">{}</a></h1>",
        escape_html(page.home_href),
        escape_html(page.site_title)
    );
    html.push_str("<nav id=\"navContent\">\n");
    html.push_str(page.navigation);
    html.push_str("\n</nav>\n</aside>\n");

    // Main content
    html.push_str("<main class=\"content\" id=\"content\">\n");
    html.push_str(page.content);
    html.push_str("\n</main>\n</div>\n");

    render_body_scripts(&mut html, page.assets);
    html.push_str("</body>\n</html>\n");
    html
}

/// Stylesheet and renderer scripts. Empty URLs are skipped.
fn render_head_assets(html: &mut String, assets: &AssetsConfig) {
    if !assets.highlight_stylesheet.is_empty() {
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_html(&assets.highlight_stylesheet)
        );
    }
    if !assets.math_script.is_empty() {
        let _ = writeln!(html, "<script>\n{MATH_CONFIG}\n</script>");
    }
    for src in [
        &assets.highlight_script,
        &assets.diagram_script,
        &assets.math_script,
    ] {
        if !src.is_empty() {
            let _ = writeln!(html, "<script defer src=\"{}\"></script>", escape_html(src));
        }
    }
}

/// Initialization for the highlighter and diagram renderer, plus the mobile
/// sidebar toggle.
fn render_body_scripts(html: &mut String, assets: &AssetsConfig) {
    html.push_str("<script>\n");
    html.push_str("window.addEventListener('DOMContentLoaded', function () {\n");
    if !assets.highlight_script.is_empty() {
        html.push_str("  if (window.hljs) { hljs.highlightAll(); }\n");
    }
    if !assets.diagram_script.is_empty() {
        let _ = writeln!(
            html,
            "  if (window.mermaid) {{ mermaid.initialize({{ startOnLoad: false }}); \
             mermaid.run({{ querySelector: 'pre.{DIAGRAM_LANGUAGE}' }}); }}"
        );
    }
    html.push_str(
        "  var toggle = document.getElementById('toggleSidebar');\n\
         \x20 var sidebar = document.querySelector('.sidebar');\n\
         \x20 toggle.addEventListener('click', function () { sidebar.classList.toggle('open'); });\n",
    );
    html.push_str("});\n</script>\n");
}
