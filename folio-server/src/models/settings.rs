//! Site-wide settings document

use serde::{Deserialize, Serialize};

use super::{Collection, Content, ValidationError};

/// Site settings (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub maintenance_mode: bool,
}

impl Content for SiteSettings {
    const COLLECTION: Collection = Collection::Settings;
    const RESOURCE: &'static str = "settings";

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
