use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::annotation::Markers;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub markers: Markers,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mention = parse_marker("MENTION_MARKER", lookup("MENTION_MARKER"), '@')?;
        let tag = parse_marker("TAG_MARKER", lookup("TAG_MARKER"), '#')?;
        let markers = Markers::new(mention, tag).context("Invalid marker configuration")?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            markers,
        })
    }
}

fn parse_marker(key: &str, value: Option<String>, default: char) -> Result<char> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(marker), None) => Ok(marker),
        _ => bail!("{} must be a single character, got {:?}", key, value),
    }
}
