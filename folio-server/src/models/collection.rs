//! Document collections, one per content type

use std::fmt;

use serde::{Deserialize, Serialize};

/// Collection a document lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Hero,
    About,
    Services,
    Blogs,
    Quotes,
    Testimonials,
    Wall,
    Footer,
    Navigation,
    Contacts,
    Subscribers,
    Settings,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Services => "services",
            Self::Blogs => "blogs",
            Self::Quotes => "quotes",
            Self::Testimonials => "testimonials",
            Self::Wall => "wall",
            Self::Footer => "footer",
            Self::Navigation => "navigation",
            Self::Contacts => "contacts",
            Self::Subscribers => "subscribers",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_table_name() {
        for c in [Collection::Hero, Collection::Blogs, Collection::Settings] {
            let json = serde_json::to_value(c).unwrap();
            assert_eq!(json, c.as_str());
            assert_eq!(c.to_string(), c.as_str());
        }
    }
}
