//! Bind channels and canonical bind values.
//!
//! A bind associates a staff member's contact channel with an external
//! authentication account. Lookups must agree on one canonical spelling
//! per channel, so each variant has a pure canonicalization function.

use serde::{Deserialize, Serialize};

/// Contact channel a bind is keyed by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindType {
    Phone,
    Email,
}

impl BindType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindType::Phone => "phone",
            BindType::Email => "email",
        }
    }
}

impl core::fmt::Display for BindType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical bind value for the given channel.
///
/// `iso` is an ISO-3166 alpha-2 country code; only phone canonicalization
/// consults it.
pub fn canonical_bind_value(bind_type: BindType, iso: &str, value: &str) -> String {
    match bind_type {
        BindType::Email => canonical_email(value),
        BindType::Phone => canonical_phone(iso, value),
    }
}

fn canonical_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// International-format phone number: digits only, `+` country prefix.
/// Numbers without a recognizable country are left as bare digits.
fn canonical_phone(iso: &str, value: &str) -> String {
    let trimmed = value.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if trimmed.starts_with('+') {
        return format!("+{digits}");
    }
    match dial_code(iso) {
        Some(code) => {
            // Drop the national trunk prefix before prepending the code.
            let national = digits.trim_start_matches('0');
            format!("+{code}{national}")
        }
        None => digits,
    }
}

fn dial_code(iso: &str) -> Option<&'static str> {
    match iso.to_ascii_uppercase().as_str() {
        "US" | "CA" => Some("1"),
        "GB" => Some("44"),
        "DE" => Some("49"),
        "FR" => Some("33"),
        "CN" => Some("86"),
        "JP" => Some("81"),
        "SG" => Some("65"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            canonical_bind_value(BindType::Email, "US", "  Ada@Example.COM "),
            "ada@example.com"
        );
    }

    #[test]
    fn phone_gets_country_prefix() {
        assert_eq!(
            canonical_bind_value(BindType::Phone, "GB", "020 7946 0958"),
            "+442079460958"
        );
    }

    #[test]
    fn international_phone_keeps_its_prefix() {
        assert_eq!(
            canonical_bind_value(BindType::Phone, "US", "+44 20 7946 0958"),
            "+442079460958"
        );
    }

    #[test]
    fn unknown_iso_leaves_bare_digits() {
        assert_eq!(canonical_bind_value(BindType::Phone, "ZZ", "123-456"), "123456");
    }

    proptest! {
        /// Canonicalization is idempotent for both channels.
        #[test]
        fn canonicalization_is_idempotent(
            value in "[ +0-9a-zA-Z@.()-]{0,24}",
            iso in prop::sample::select(vec!["US", "GB", "CN", "ZZ"]),
        ) {
            for bind_type in [BindType::Email, BindType::Phone] {
                let once = canonical_bind_value(bind_type, iso, &value);
                let twice = canonical_bind_value(bind_type, iso, &once);
                prop_assert_eq!(&once, &twice);
            }
        }
    }
}
