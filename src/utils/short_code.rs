use nanoid::nanoid;
use url::Url;
use validator::ValidationError;

/// Length of an auto-generated short code.
pub const GENERATED_CODE_LENGTH: usize = 6;
pub const MIN_CUSTOM_CODE_LENGTH: usize = 4;
pub const MAX_CUSTOM_CODE_LENGTH: usize = 10;

/// URL-safe alphabet for generated codes (`A-Za-z0-9_-`).
const ALPHABET: [char; 64] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j',
    'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1',
    '2', '3', '4', '5', '6', '7', '8', '9', '-', '_',
];

/// Generate a random 6-character short code.
///
/// Codes are uniform over the alphabet and independent across calls. Uniqueness
/// is not checked here; the store rejects duplicates on insert.
pub fn generate_code() -> String {
    nanoid!(GENERATED_CODE_LENGTH, &ALPHABET)
}

/// Accepts only absolute URLs that carry both a scheme and a host.
pub fn validate_url(input: &str) -> Result<(), ValidationError> {
    match Url::parse(input) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(ValidationError::new("invalid_url")),
    }
}

/// Serialized form of a stored URL, safe for a `Location` header.
///
/// Parsing drops tabs and newlines and percent-encodes non-ASCII characters.
pub fn redirect_location(original_url: &str) -> Option<String> {
    Url::parse(original_url).ok().map(String::from)
}

/// Custom codes must be 4 to 10 characters long (inclusive).
pub fn validate_custom_code(code: &str) -> Result<(), ValidationError> {
    let len = code.chars().count();
    if (MIN_CUSTOM_CODE_LENGTH..=MAX_CUSTOM_CODE_LENGTH).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_length"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_codes_have_fixed_length_and_alphabet() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.chars().count(), GENERATED_CODE_LENGTH);
            assert!(code.chars().all(|c| ALPHABET.contains(&c)));
        }
    }

    #[test]
    fn generated_codes_do_not_repeat() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn alphabet_is_url_safe_and_unique() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), ALPHABET.len());
        assert!(ALPHABET
            .iter()
            .all(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_'));
    }

    #[test]
    fn accepts_absolute_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path?q=1#frag").is_ok());
        assert!(validate_url("ftp://files.example.org/a.txt").is_ok());
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("/relative/path").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
        assert!(validate_url("http://").is_err());
    }

    #[test]
    fn redirect_location_is_header_safe() {
        assert_eq!(
            redirect_location("https://example.com/a\nb").as_deref(),
            Some("https://example.com/ab")
        );
        assert_eq!(
            redirect_location("https://example.com/\tü?q=ä").as_deref(),
            Some("https://example.com/%C3%BC?q=%C3%A4")
        );
        assert_eq!(
            redirect_location("https://example.com/path").as_deref(),
            Some("https://example.com/path")
        );
        assert!(redirect_location("not-a-url").is_none());
    }

    #[test]
    fn custom_code_length_bounds() {
        assert!(validate_custom_code("abcd").is_ok());
        assert!(validate_custom_code("abcdefghij").is_ok());
        assert!(validate_custom_code("abc").is_err());
        assert!(validate_custom_code("abcdefghijk").is_err());
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn custom_code_length_counts_characters() {
        assert!(validate_custom_code("ñandú").is_ok());
    }
}
