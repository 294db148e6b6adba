//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_or_default(var, std::env::var(var).ok().as_deref(), default)
}

/// Read a non-empty string variable. Blank values count as unset.
pub fn env_string(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub(crate) fn parse_or_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_value() {
        let result: usize = parse_or_default("JOURNAL_TRACKER_BATCH_SIZE", Some("42"), 10);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let result: u32 = parse_or_default("JOURNAL_TRACKER_LIBRARY_ID", Some(" 3820 "), 1);
        assert_eq!(result, 3820);
    }

    #[test]
    fn test_parse_invalid_value() {
        let result: usize = parse_or_default("JOURNAL_TRACKER_CHUNK_SIZE", Some("banana"), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_missing_var() {
        let result: u64 = parse_or_default("JOURNAL_TRACKER_REFRESH_INTERVAL_SECS", None, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_empty_value() {
        let result: usize = parse_or_default("JOURNAL_TRACKER_BATCH_SIZE", Some(""), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_string_missing() {
        assert!(env_string("JOURNAL_TRACKER_TEST_SURELY_UNSET_51123").is_none());
    }
}
