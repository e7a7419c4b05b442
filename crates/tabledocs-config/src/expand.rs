//! Environment variable expansion for configuration strings.

use crate::ConfigError;
use std::borrow::Cow;

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration string.
///
/// `field` names the config field being expanded and appears in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] if a referenced variable without a default
/// is unset.
pub fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let context = |name: &str| -> Result<Option<Cow<'static, str>>, String> {
        // shellexpand hands us the raw text between the braces, so the
        // ${VAR:-default} form arrives as "VAR:-default".
        let (var, default) = match name.split_once(":-") {
            Some((var, default)) => (var, Some(default)),
            None => (name, None),
        };
        match std::env::var(var) {
            Ok(val) => Ok(Some(Cow::Owned(val))),
            Err(std::env::VarError::NotPresent) => match default {
                Some(default) => Ok(Some(Cow::Owned(default.to_owned()))),
                None => Err(format!("${{{var}}} not set")),
            },
            Err(e) => Err(e.to_string()),
        }
    };

    shellexpand::env_with_context(value, context)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.cause,
        })
}

/// Expand a leading tilde in a path-valued configuration string.
pub fn expand_tilde(value: &str) -> String {
    shellexpand::tilde(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_string_unchanged() {
        assert_eq!(expand_env("127.0.0.1", "server.host").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TABLEDOCS_EXPAND_TEST", "0.0.0.0");
        }
        assert_eq!(
            expand_env("${TABLEDOCS_EXPAND_TEST}", "server.host").unwrap(),
            "0.0.0.0"
        );
        unsafe {
            std::env::remove_var("TABLEDOCS_EXPAND_TEST");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TABLEDOCS_EXPAND_MISSING");
        }
        assert_eq!(
            expand_env("${TABLEDOCS_EXPAND_MISSING:-fallback}", "server.host").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_missing_without_default_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TABLEDOCS_EXPAND_MISSING");
        }
        let err = expand_env("${TABLEDOCS_EXPAND_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("TABLEDOCS_EXPAND_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("content"), "content");
        assert_eq!(expand_tilde("/abs/content"), "/abs/content");
    }
}
