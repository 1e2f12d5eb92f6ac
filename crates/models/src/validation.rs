//! Field validation helpers shared by the entity modules.

use crate::errors::ModelError;

/// Check that `value` (trimmed) has between `min` and `max` characters.
pub fn validate_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let n = value.trim().chars().count();
    if n < min {
        return Err(if min == 1 {
            ModelError::Validation(format!("{field} required"))
        } else {
            ModelError::Validation(format!("{field} must be at least {min} characters"))
        });
    }
    if n > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub fn validate_optional_len(field: &str, value: Option<&str>, max: usize) -> Result<(), ModelError> {
    match value {
        Some(v) => validate_len(field, v, 0, max),
        None => Ok(()),
    }
}

pub fn validate_http_url(field: &str, url: &str) -> Result<(), ModelError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ModelError::Validation(format!("{field} must start with http(s)")));
    }
    if url.len() > 1024 || url.contains(char::is_whitespace) {
        return Err(ModelError::Validation(format!("{field} is not a valid url")));
    }
    Ok(())
}

/// Upper bound for any single rate or price: 10 million in major units.
pub const MAX_CENTS: i64 = 1_000_000_000;

pub fn validate_cents(field: &str, cents: i64) -> Result<(), ModelError> {
    if cents < 0 {
        return Err(ModelError::Validation(format!("{field} must not be negative")));
    }
    if cents > MAX_CENTS {
        return Err(ModelError::Validation(format!("{field} must not exceed {MAX_CENTS}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_bounds_are_inclusive() {
        assert!(validate_len("title", "ab", 2, 3).is_ok());
        assert!(validate_len("title", "abc", 2, 3).is_ok());
        assert!(validate_len("title", "a", 2, 3).is_err());
        assert!(validate_len("title", "abcd", 2, 3).is_err());
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = validate_len("content", "   ", 1, 10).unwrap_err();
        assert_eq!(err.to_string(), "validation error: content required");
    }

    #[test]
    fn urls_need_http_scheme() {
        assert!(validate_http_url("url", "https://cdn.example.com/a.jpg").is_ok());
        assert!(validate_http_url("url", "ftp://cdn.example.com/a.jpg").is_err());
        assert!(validate_http_url("url", "https://cdn.example.com/a b.jpg").is_err());
    }

    #[test]
    fn cents_are_bounded() {
        assert!(validate_cents("rate", 0).is_ok());
        assert!(validate_cents("rate", MAX_CENTS).is_ok());
        assert!(validate_cents("rate", -1).is_err());
        let err = validate_cents("rate", i64::MAX / 2).unwrap_err();
        assert_eq!(err.to_string(), format!("validation error: rate must not exceed {MAX_CENTS}"));
    }
}
