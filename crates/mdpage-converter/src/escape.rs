//! HTML escaping.
//!
//! Two policies are used by the converter:
//! - [`escape_html`] for attribute values (`src`, `alt`, `href`, class names)
//! - [`escape_text`] for raw content placed between tags (code, diagram and
//!   math bodies), which must stay readable by external highlighters and
//!   typesetters without being escaped twice

/// Escape a string for use inside an HTML attribute value.
///
/// # Examples
///
/// ```
/// use mdpage_converter::escape_html;
///
/// assert_eq!(escape_html(r#"a "b" & <c>"#), "a &quot;b&quot; &amp; &lt;c&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape raw text placed between tags.
///
/// Only `&`, `<` and `>` are replaced. Quotes are left alone so that code
/// shown in `<pre><code>` keeps its original characters.
///
/// # Examples
///
/// ```
/// use mdpage_converter::escape_text;
///
/// assert_eq!(escape_text(r#"if a < b && c > "d""#), r#"if a &lt; b &amp;&amp; c &gt; "d""#);
/// ```
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
