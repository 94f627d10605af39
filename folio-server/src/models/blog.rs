//! Blog posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{optional, optional_url, required, string_list};
use super::{Collection, Content, Slug, ValidationError};

/// Maximum body length (markdown/HTML)
const MAX_CONTENT_LEN: usize = 200_000;

/// Blog post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Content for Blog {
    const COLLECTION: Collection = Collection::Blogs;
    const RESOURCE: &'static str = "blog";

    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title, 200)?;
        Slug::parse(&self.slug)?;
        optional("excerpt", self.excerpt.as_deref(), 500)?;
        required("content", &self.content, MAX_CONTENT_LEN)?;
        optional_url("cover_image_url", self.cover_image_url.as_deref())?;
        string_list("tags", &self.tags, 20, 40)
    }

    fn normalize(&mut self) {
        self.slug = self.slug.trim().to_owned();
        if self.slug.is_empty() {
            if let Some(slug) = Slug::from_title(&self.title) {
                self.slug = slug.into_string();
            }
        }
        if self.published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("slug", self.slug.clone()))
    }

    fn is_public(&self) -> bool {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> Blog {
        serde_json::from_value(json!({
            "title": "Hello",
            "slug": "hello-world",
            "content": "First post"
        }))
        .unwrap()
    }

    #[test]
    fn drafts_are_hidden() {
        let blog = post();
        assert!(blog.validate().is_ok());
        assert!(!blog.is_public());
    }

    #[test]
    fn publishing_stamps_date() {
        let mut blog = post();
        blog.published = true;
        blog.normalize();
        assert!(blog.published_at.is_some());
        assert!(blog.is_public());
    }

    #[test]
    fn keeps_explicit_publish_date() {
        let mut blog = post();
        let date = "2024-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap();
        blog.published = true;
        blog.published_at = Some(date);
        blog.normalize();
        assert_eq!(blog.published_at, Some(date));
    }

    #[test]
    fn slug_is_validated() {
        let mut blog = post();
        blog.slug = "Hello World".into();
        assert!(matches!(
            blog.validate(),
            Err(ValidationError::InvalidFormat { field: "slug", .. })
        ));
    }

    #[test]
    fn slug_is_the_unique_key() {
        assert_eq!(post().unique_key(), Some(("slug", "hello-world".to_string())));
    }

    #[test]
    fn missing_slug_comes_from_title() {
        let mut blog = post();
        blog.title = "Shipping the New Site".into();
        blog.slug = "   ".into();
        blog.normalize();
        assert_eq!(blog.slug, "shipping-the-new-site");
        assert!(blog.validate().is_ok());
    }

    #[test]
    fn explicit_slug_wins_over_title() {
        let mut blog = post();
        blog.normalize();
        assert_eq!(blog.slug, "hello-world");
    }
}
