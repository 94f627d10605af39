//! Domain models with validation
//!
//! Content types deserialize leniently (missing fields default) and are
//! checked with `Content::validate`, so bad input becomes a 400 with a
//! field-level message instead of a decode failure.

pub mod validation;
pub mod slug;
pub mod pagination;
pub mod collection;
pub mod content;
pub mod page;
pub mod blog;
pub mod showcase;
pub mod audience;
pub mod settings;

pub use validation::ValidationError;
pub use slug::Slug;
pub use pagination::{Pagination, Paginated, PaginationParams};
pub use collection::Collection;
pub use content::{merge_patch, sort_records, strip_envelope, Content, Record};
pub use page::{About, Footer, FooterLink, Hero, NavItem, SocialLink};
pub use blog::Blog;
pub use showcase::{Quote, Service, Testimonial, WallItem};
pub use audience::{normalize_email, Enquiry, Subscriber};
pub use settings::SiteSettings;
