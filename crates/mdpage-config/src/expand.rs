//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use std::env::VarError;

use crate::ConfigError;

/// Expand braced environment references in `value`.
///
/// `field` names the configuration key for error messages. Strings without
/// `${` are returned as-is, so a lone `$` in a URL needs no escaping.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| std::env::var(name).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|err: shellexpand::LookupError<VarError>| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}

/// Expand `value` in place.
pub(crate) fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    *value = expand_env(value, field)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDPAGE_TEST_EXPAND_SET", "Handbook");
        }
        assert_eq!(
            expand_env("${MDPAGE_TEST_EXPAND_SET} v2", "site.title").unwrap(),
            "Handbook v2"
        );
        unsafe {
            std::env::remove_var("MDPAGE_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDPAGE_TEST_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${MDPAGE_TEST_EXPAND_UNSET:-https://cdn.test}/x.js", "assets.math_script")
                .unwrap(),
            "https://cdn.test/x.js"
        );
    }

    #[test]
    fn test_unset_without_default_names_field_and_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDPAGE_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${MDPAGE_TEST_EXPAND_MISSING}", "site.title").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("site.title"));
        assert!(msg.contains("${MDPAGE_TEST_EXPAND_MISSING} not set"));
    }

    #[test]
    fn test_literal_and_bare_dollar_untouched() {
        assert_eq!(expand_env("Plain title", "site.title").unwrap(), "Plain title");
        assert_eq!(
            expand_env("https://cdn.test/$version/x.js", "assets.diagram_script").unwrap(),
            "https://cdn.test/$version/x.js"
        );
    }

    #[test]
    fn test_expand_in_place() {
        let mut value = "${MDPAGE_TEST_EXPAND_IN_PLACE:-fallback}".to_owned();
        expand_in_place(&mut value, "site.title").unwrap();
        assert_eq!(value, "fallback");
    }
}
