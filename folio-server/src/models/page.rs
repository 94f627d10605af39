//! Site chrome: hero, about, footer and navigation

use serde::{Deserialize, Serialize};

use super::validation::{optional, optional_url, required, string_list, url};
use super::{Collection, Content, ValidationError};

/// Landing section at the top of the home page (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub image_url: Option<String>,
}

impl Content for Hero {
    const COLLECTION: Collection = Collection::Hero;
    const RESOURCE: &'static str = "hero";

    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title, 200)?;
        optional("subtitle", self.subtitle.as_deref(), 300)?;
        optional("description", self.description.as_deref(), 2000)?;
        optional("cta_label", self.cta_label.as_deref(), 60)?;
        optional_url("cta_url", self.cta_url.as_deref())?;
        optional_url("image_url", self.image_url.as_deref())
    }
}

/// About-me section (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub heading: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub resume_url: Option<String>,
    pub skills: Vec<String>,
}

impl Content for About {
    const COLLECTION: Collection = Collection::About;
    const RESOURCE: &'static str = "about";

    fn validate(&self) -> Result<(), ValidationError> {
        required("heading", &self.heading, 200)?;
        required("bio", &self.bio, 10_000)?;
        optional_url("image_url", self.image_url.as_deref())?;
        optional_url("resume_url", self.resume_url.as_deref())?;
        string_list("skills", &self.skills, 100, 64)
    }
}

/// Link shown in a footer column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

/// Social profile link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Site footer (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub tagline: Option<String>,
    pub copyright: Option<String>,
    pub links: Vec<FooterLink>,
    pub socials: Vec<SocialLink>,
}

/// Upper bound on footer links and socials
const MAX_FOOTER_LINKS: usize = 50;

impl Content for Footer {
    const COLLECTION: Collection = Collection::Footer;
    const RESOURCE: &'static str = "footer";

    fn validate(&self) -> Result<(), ValidationError> {
        optional("tagline", self.tagline.as_deref(), 300)?;
        optional("copyright", self.copyright.as_deref(), 200)?;

        if self.links.len() > MAX_FOOTER_LINKS || self.socials.len() > MAX_FOOTER_LINKS {
            return Err(ValidationError::OutOfRange {
                field: "links",
                min: 0,
                max: MAX_FOOTER_LINKS as i64,
            });
        }
        for link in &self.links {
            required("links.label", &link.label, 80)?;
            url("links.url", &link.url)?;
        }
        for social in &self.socials {
            required("socials.platform", &social.platform, 40)?;
            url("socials.url", &social.url)?;
        }
        Ok(())
    }
}

/// Entry in the top navigation bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    pub order: Option<i32>,
    pub visible: bool,
    pub external: bool,
}

impl Default for NavItem {
    fn default() -> Self {
        Self {
            label: String::new(),
            href: String::new(),
            order: None,
            visible: true,
            external: false,
        }
    }
}

impl Content for NavItem {
    const COLLECTION: Collection = Collection::Navigation;
    const RESOURCE: &'static str = "navigation item";

    fn validate(&self) -> Result<(), ValidationError> {
        required("label", &self.label, 60)?;
        url("href", &self.href)
    }

    fn is_public(&self) -> bool {
        self.visible
    }

    fn position(&self) -> Option<i32> {
        self.order
    }
}
