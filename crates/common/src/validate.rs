//! Format validation helpers for request fields.
//!
//! Request structs use `validator` derive for lengths and email format;
//! these predicates cover the fields with a domain-specific shape (phone
//! numbers and "District-Thana" addresses).

use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    // Bangladeshi mobile numbers: 11 digits starting with 01, third digit 3-9
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^01[3-9]\d{8}$").unwrap()
});

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    // "District-Thana" convention: two non-empty segments joined by a hyphen
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z][A-Za-z .']*-[A-Za-z][A-Za-z .']*$").unwrap()
});

/// Returns whether `phone` is a valid mobile number.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Returns whether `address` follows the "District-Thana" convention.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address.trim())
}

/// Splits a "District-Thana" string into its components.
///
/// Returns `None` if the string does not contain a recognizable district
/// token (no hyphen, or an empty segment).
#[must_use]
pub fn split_district_thana(address: &str) -> Option<(&str, &str)> {
    let (district, thana) = address.trim().split_once('-')?;
    let district = district.trim();
    let thana = thana.trim();
    if district.is_empty() || thana.is_empty() {
        return None;
    }
    Some((district, thana))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("01712345678"));
        assert!(is_valid_phone("01987654321"));
        assert!(!is_valid_phone("01212345678")); // invalid operator digit
        assert!(!is_valid_phone("0171234567")); // too short
        assert!(!is_valid_phone("+8801712345678")); // no country prefix
    }

    #[test]
    fn test_address_format() {
        assert!(is_valid_address("Dhaka-Mirpur"));
        assert!(is_valid_address("Cox's Bazar-Teknaf"));
        assert!(is_valid_address(" Chittagong-Agrabad "));
        assert!(!is_valid_address("Dhaka"));
        assert!(!is_valid_address("-Mirpur"));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_split_district_thana() {
        assert_eq!(
            split_district_thana("Dhaka-Mirpur"),
            Some(("Dhaka", "Mirpur"))
        );
        assert_eq!(
            split_district_thana("Dhaka - Mirpur"),
            Some(("Dhaka", "Mirpur"))
        );
        assert_eq!(split_district_thana("Dhaka"), None);
        assert_eq!(split_district_thana("Dhaka-"), None);
    }
}
