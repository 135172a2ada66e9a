//! Small shared helpers
//!
//! Slug derivation for service ids, field-name normalization and
//! char-boundary-safe truncation used by the presentation layer.

use regex::Regex;

/// Derive a slug id from a human-readable service name.
///
/// Lower-cased, runs of non-alphanumeric characters collapsed to a single
/// hyphen, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    // Unwrap is fine: the pattern is a compile-time constant.
    let re = Regex::new(r"[^a-z0-9]+").unwrap();
    let lowered = name.to_lowercase();
    re.replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Normalize a field name: lower-cased, whitespace replaced by underscores.
pub fn normalize_field_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        input.to_string()
    } else {
        input.chars().take(max).collect()
    }
}

/// Split a comma-separated options list, trimming entries and dropping
/// empty ones.
pub fn split_options(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Netflix Premium"), "netflix-premium");
        assert_eq!(slugify("  VPN -- 1 Month!  "), "vpn-1-month");
        assert_eq!(slugify("ABC"), "abc");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("Account Email"), "account_email");
        assert_eq!(normalize_field_name("  Target   URL "), "target_url");
        assert_eq!(normalize_field_name("username"), "username");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello");
        // Multi-byte input must not panic mid-char
        assert_eq!(truncate_chars("héllo wörld", 6), "héllo ");
    }

    #[test]
    fn test_split_options() {
        assert_eq!(
            split_options("red, green ,blue"),
            vec!["red", "green", "blue"]
        );
        assert_eq!(split_options("one,,  ,two"), vec!["one", "two"]);
        assert!(split_options("   ").is_empty());
    }
}
