//! Environment loading for the folio CLI
//!
//! Server settings come from environment variables (see
//! `folio_server::AppConfig`); this module only decides which `.env`
//! files feed them.

use std::path::PathBuf;

use tracing::{debug, info};

/// Which `.env` files were read, kept until tracing is up to report them.
#[derive(Debug, Default)]
pub struct DotenvSources {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

impl DotenvSources {
    pub fn log(&self) {
        for failure in &self.failed {
            debug!("Failed to load ~/.folio/.env: {}", failure);
        }
        if self.loaded.is_empty() {
            debug!("No .env files found (current dir or ~/.folio)");
        } else {
            info!("Loaded configuration from: {}", self.loaded.join(", "));
        }
    }
}

/// Load `.env` files: current directory first, then `~/.folio/.env`.
///
/// Variables already present in the environment are never overwritten,
/// so the shell wins over `./.env`, which wins over `~/.folio/.env`.
/// Runs before the subscriber exists, so nothing is logged here.
pub fn load_dotenv() -> DotenvSources {
    let mut sources = DotenvSources::default();

    if let Ok(path) = dotenvy::dotenv() {
        sources
            .loaded
            .push(format!("current directory ({})", path.display()));
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => sources
                    .loaded
                    .push(format!("~/.folio/.env ({})", env_file.display())),
                Err(e) => sources.failed.push(e.to_string()),
            }
        }
    }

    sources
}

/// The folio config directory (`~/.folio`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".folio"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_under_home() {
        if let Some(dir) = config_dir() {
            assert!(dir.ends_with(".folio"));
        }
    }
}
