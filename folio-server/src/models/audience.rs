//! Visitor-submitted documents: contact enquiries and newsletter subscribers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{email, optional, required};
use super::{Collection, Content, ValidationError};

/// Contact form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enquiry {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
}

impl Content for Enquiry {
    const COLLECTION: Collection = Collection::Contacts;
    const RESOURCE: &'static str = "enquiry";

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)?;
        email("email", &self.email)?;
        optional("subject", self.subject.as_deref(), 200)?;
        required("message", &self.message, 5000)
    }

    fn normalize(&mut self) {
        self.name = self.name.trim().to_owned();
        self.email = self.email.trim().to_owned();
        self.message = self.message.trim().to_owned();
        self.subject = self
            .subject
            .take()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
    }
}

/// Newsletter subscriber
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// New subscriber stamped with the current time.
    pub fn new(address: &str) -> Self {
        let mut subscriber = Self {
            email: address.to_owned(),
            subscribed_at: Some(Utc::now()),
        };
        subscriber.normalize();
        subscriber
    }
}

/// Lowercased, trimmed form used for storage and lookups.
pub fn normalize_email(address: &str) -> String {
    address.trim().to_lowercase()
}

impl Content for Subscriber {
    const COLLECTION: Collection = Collection::Subscribers;
    const RESOURCE: &'static str = "subscriber";

    fn validate(&self) -> Result<(), ValidationError> {
        email("email", &self.email)
    }

    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("email", self.email.clone()))
    }
}
