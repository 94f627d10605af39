//! Services, portfolio wall, quotes and testimonials

use serde::{Deserialize, Serialize};

use super::validation::{optional, optional_url, required, string_list, url};
use super::{Collection, Content, ValidationError};

/// Service offered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub features: Vec<String>,
    pub order: Option<i32>,
}

impl Content for Service {
    const COLLECTION: Collection = Collection::Services;
    const RESOURCE: &'static str = "service";

    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title, 120)?;
        required("description", &self.description, 2000)?;
        optional("icon", self.icon.as_deref(), 100)?;
        string_list("features", &self.features, 30, 200)
    }

    fn position(&self) -> Option<i32> {
        self.order
    }
}

/// Portfolio wall entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallItem {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub order: Option<i32>,
}

impl Content for WallItem {
    const COLLECTION: Collection = Collection::Wall;
    const RESOURCE: &'static str = "wall item";

    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title, 200)?;
        optional("description", self.description.as_deref(), 2000)?;
        url("image_url", &self.image_url)?;
        optional_url("link_url", self.link_url.as_deref())?;
        optional("category", self.category.as_deref(), 60)?;
        string_list("tags", &self.tags, 20, 40)
    }

    fn position(&self) -> Option<i32> {
        self.order
    }
}

/// Quote displayed on the site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub source: Option<String>,
}

impl Content for Quote {
    const COLLECTION: Collection = Collection::Quotes;
    const RESOURCE: &'static str = "quote";

    fn validate(&self) -> Result<(), ValidationError> {
        required("text", &self.text, 2000)?;
        required("author", &self.author, 120)?;
        optional("source", self.source.as_deref(), 200)
    }
}

/// Client testimonial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: Option<i32>,
    pub featured: bool,
}

impl Content for Testimonial {
    const COLLECTION: Collection = Collection::Testimonials;
    const RESOURCE: &'static str = "testimonial";

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)?;
        optional("role", self.role.as_deref(), 120)?;
        optional("company", self.company.as_deref(), 120)?;
        required("content", &self.content, 3000)?;
        optional_url("avatar_url", self.avatar_url.as_deref())?;

        match self.rating {
            Some(r) if !(1..=5).contains(&r) => Err(ValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_orders_by_position() {
        let s: Service = serde_json::from_value(json!({
            "title": "Web apps",
            "description": "Full-stack builds",
            "order": 3
        }))
        .unwrap();
        assert!(s.validate().is_ok());
        assert_eq!(s.position(), Some(3));
    }

    #[test]
    fn wall_item_needs_image() {
        let item: WallItem = serde_json::from_value(json!({"title": "Site"})).unwrap();
        assert_eq!(
            item.validate(),
            Err(ValidationError::Empty { field: "image_url" })
        );
    }

    #[test]
    fn quote_requires_author() {
        let q: Quote = serde_json::from_value(json!({"text": "Ship it"})).unwrap();
        assert_eq!(q.validate(), Err(ValidationError::Empty { field: "author" }));
    }

    #[test]
    fn testimonial_rating_range() {
        let mut t = Testimonial {
            name: "Grace".into(),
            content: "Great work".into(),
            rating: Some(5),
            ..Default::default()
        };
        assert!(t.validate().is_ok());

        t.rating = Some(0);
        assert!(matches!(
            t.validate(),
            Err(ValidationError::OutOfRange { field: "rating", .. })
        ));

        t.rating = None;
        assert!(t.validate().is_ok());
    }
}
