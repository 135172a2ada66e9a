//! Phone identity normalization
//!
//! Inbound sender ids and outbound recipients are normalized to a canonical
//! digits-only form carrying a country prefix. Schemes are tried in
//! configuration order; input that matches none passes through as bare
//! digits.

use crate::config::PhoneScheme;

/// Normalize a raw phone identity against the configured numbering schemes
pub fn normalize_phone(raw: &str, schemes: &[PhoneScheme]) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    for scheme in schemes {
        let full_len = scheme.country_code.len() + scheme.local_len;

        // Already carries the country prefix
        if digits.len() == full_len && digits.starts_with(&scheme.country_code) {
            return digits;
        }

        // Local form with trunk digit, e.g. 01712345678 -> 8801712345678
        if digits.len() == scheme.local_len + 1
            && digits.starts_with(scheme.trunk_digit)
        {
            return format!("{}{}", scheme.country_code, &digits[1..]);
        }

        // Bare subscriber number
        if digits.len() == scheme.local_len && !digits.starts_with(scheme.trunk_digit) {
            return format!("{}{}", scheme.country_code, digits);
        }
    }

    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemes() -> Vec<PhoneScheme> {
        vec![
            PhoneScheme {
                country_code: "880".to_string(),
                local_len: 10,
                trunk_digit: '0',
            },
            PhoneScheme {
                country_code: "91".to_string(),
                local_len: 10,
                trunk_digit: '0',
            },
        ]
    }

    #[test]
    fn test_already_prefixed_passes_through() {
        assert_eq!(normalize_phone("8801712345678", &schemes()), "8801712345678");
        assert_eq!(normalize_phone("919812345678", &schemes()), "919812345678");
    }

    #[test]
    fn test_trunk_digit_replaced() {
        assert_eq!(normalize_phone("01712345678", &schemes()), "8801712345678");
    }

    #[test]
    fn test_bare_local_number_prefixed() {
        assert_eq!(normalize_phone("1712345678", &schemes()), "8801712345678");
    }

    #[test]
    fn test_formatting_stripped() {
        assert_eq!(normalize_phone("+880 1712-345678", &schemes()), "8801712345678");
    }

    #[test]
    fn test_unmatched_input_passes_digits() {
        assert_eq!(normalize_phone("12025550123", &schemes()), "12025550123");
    }
}
