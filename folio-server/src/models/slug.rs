//! Blog post slugs: the path segment in `/api/blogs/slug/{slug}`

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

const MAX_SLUG_LEN: usize = 128;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("invalid slug regex"));

/// Lowercase ASCII words joined by hyphens, at most 128 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Accept a slug exactly as given.
    ///
    /// ```
    /// use folio_server::models::Slug;
    ///
    /// assert!(Slug::parse("hello-world-2024").is_ok());
    /// assert!(Slug::parse("Hello").is_err());
    /// assert!(Slug::parse("-dash-start").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.len() {
            0 => Err(ValidationError::Empty { field: "slug" }),
            n if n > MAX_SLUG_LEN => Err(ValidationError::TooLong {
                field: "slug",
                max: MAX_SLUG_LEN,
            }),
            _ if !SLUG_RE.is_match(raw) => Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "must be lowercase alphanumeric with hyphens, starting with alphanumeric",
            }),
            _ => Ok(Self(raw.to_owned())),
        }
    }

    /// Build a slug from a post title.
    ///
    /// ASCII letters and digits are kept (lowercased); every other run of
    /// characters becomes a single hyphen. Returns `None` when the title
    /// has nothing usable, e.g. only punctuation or non-Latin script.
    pub fn from_title(title: &str) -> Option<Self> {
        let mut out = String::with_capacity(title.len().min(MAX_SLUG_LEN));
        let mut pending_hyphen = false;

        for ch in title.chars() {
            if !ch.is_ascii_alphanumeric() {
                pending_hyphen = !out.is_empty();
                continue;
            }
            if pending_hyphen {
                if out.len() + 2 > MAX_SLUG_LEN {
                    break;
                }
                out.push('-');
                pending_hyphen = false;
            }
            if out.len() == MAX_SLUG_LEN {
                break;
            }
            out.push(ch.to_ascii_lowercase());
        }

        (!out.is_empty()).then_some(Self(out))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hyphenated_words() {
        for ok in ["my-post", "post123", "a", "2024-recap"] {
            assert_eq!(Slug::parse(ok).unwrap().as_str(), ok);
        }
    }

    #[test]
    fn parse_rejects_bad_input() {
        for bad in ["MyPost", "my post", "-post", "my_post"] {
            let err = Slug::parse(bad).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat { .. }), "{bad}");
        }
        assert!(matches!(Slug::parse(""), Err(ValidationError::Empty { .. })));
        assert!(Slug::parse(&"a".repeat(128)).is_ok());
        assert!(matches!(
            Slug::parse(&"a".repeat(129)),
            Err(ValidationError::TooLong { max: 128, .. })
        ));
    }

    #[test]
    fn title_becomes_slug() {
        let slug = Slug::from_title("  Hello, World! Notes on Rust 2024  ").unwrap();
        assert_eq!(slug.as_str(), "hello-world-notes-on-rust-2024");
    }

    #[test]
    fn title_drops_non_ascii_and_collapses_separators() {
        let slug = Slug::from_title("Café -- über___alles").unwrap();
        assert_eq!(slug.as_str(), "caf-ber-alles");
        assert!(Slug::from_title("!!! ---").is_none());
        assert!(Slug::from_title("日本語").is_none());
    }

    #[test]
    fn derived_slug_fits_and_parses() {
        let long = "word ".repeat(60);
        let slug = Slug::from_title(&long).unwrap();
        assert!(slug.as_str().len() <= MAX_SLUG_LEN);
        assert!(!slug.as_str().ends_with('-'));
        assert!(Slug::parse(slug.as_str()).is_ok());
    }
}
