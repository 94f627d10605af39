//! Validation errors and field checks shared by all content types

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose address check: one `@`, no whitespace, dotted domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex")
});

/// Maximum length for an email address
const MAX_EMAIL_LEN: usize = 254;

/// Maximum length for a URL field
const MAX_URL_LEN: usize = 2048;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., slug, email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside the accepted range
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a non-blank string no longer than `max` characters.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    max_len(field, value, max)
}

/// Check an optional string against `max` characters. Blank is accepted.
pub fn optional(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Require a plausible email address.
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value, MAX_EMAIL_LEN)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

/// Require an absolute http(s) URL or a site-relative path.
pub fn url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value, MAX_URL_LEN)?;
    let v = value.trim();
    let ok = v.starts_with("https://")
        || v.starts_with("http://")
        || (v.starts_with('/') && !v.starts_with("//"))
        || v.starts_with("mailto:");
    if !ok || v.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be an http(s) URL or a path starting with '/'",
        });
    }
    Ok(())
}

/// `url` for optional fields. `None` and blank strings pass.
pub fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => url(field, v),
        _ => Ok(()),
    }
}

/// Every entry non-blank and within `max_each`; at most `max_items` entries.
pub fn string_list(
    field: &'static str,
    values: &[String],
    max_items: usize,
    max_each: usize,
) -> Result<(), ValidationError> {
    if values.len() > max_items {
        return Err(ValidationError::OutOfRange {
            field,
            min: 0,
            max: max_items as i64,
        });
    }
    values.iter().try_for_each(|v| required(field, v, max_each))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 256 characters"
        );

        let err = ValidationError::OutOfRange {
            field: "rating",
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "rating must be between 1 and 5");
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(
            required("title", "   ", 10),
            Err(ValidationError::Empty { field: "title" })
        );
        assert!(required("title", "hello", 10).is_ok());
        assert!(matches!(
            required("title", "hello world", 5),
            Err(ValidationError::TooLong { max: 5, .. })
        ));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert!(required("name", "ééééé", 5).is_ok());
    }

    #[test]
    fn email_format() {
        assert!(email("email", "ada@example.com").is_ok());
        assert!(email("email", "ada@example").is_err());
        assert!(email("email", "ada example@x.io").is_err());
        assert!(matches!(
            email("email", ""),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn url_format() {
        assert!(url("link", "https://example.com/a").is_ok());
        assert!(url("link", "/blog/hello").is_ok());
        assert!(url("link", "mailto:me@example.com").is_ok());
        assert!(url("link", "//evil.example").is_err());
        assert!(url("link", "javascript:alert(1)").is_err());
        assert!(optional_url("link", Some("")).is_ok());
        assert!(optional_url("link", None).is_ok());
    }

    #[test]
    fn list_limits() {
        let tags = vec!["rust".to_string(), "web".to_string()];
        assert!(string_list("tags", &tags, 2, 10).is_ok());
        assert!(string_list("tags", &tags, 1, 10).is_err());
        assert!(string_list("tags", &[String::new()], 5, 10).is_err());
    }
}
