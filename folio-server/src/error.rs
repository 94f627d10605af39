//! Startup and wiring errors for folio-server

use thiserror::Error;

use crate::auth::AuthError;
use crate::mail::MailError;
use crate::media::MediaError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Identity provider setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Mail relay setup failed: {0}")]
    Mail(#[from] MailError),

    #[error("Media host setup failed: {0}")]
    Media(#[from] MediaError),
}
