use anyhow::{Context, Result};
use std::env;
use tracing::info;

use crate::utils::canonical_url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_NAME: &str = "Cinedex";
pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Public origin, scheme-qualified, without a trailing slash.
    pub site_url: String,
    pub site_name: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let required = ["TMDB_API_KEY", "SITE_URL"];
        for key in required {
            if env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true) {
                anyhow::bail!("Missing required environment variable: {}", key);
            }
        }
        info!("All required environment variables are set");

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let site_name = env::var("SITE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());
        let tmdb_base_url = env::var("TMDB_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());

        Ok(Self::new(
            port,
            &env::var("SITE_URL").context("SITE_URL not set")?,
            site_name,
            env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?,
            tmdb_base_url,
        ))
    }

    pub fn new(
        port: u16,
        site_url: &str,
        site_name: impl Into<String>,
        tmdb_api_key: impl Into<String>,
        tmdb_base_url: impl Into<String>,
    ) -> Self {
        Self {
            port,
            site_url: site_url.trim().trim_end_matches('/').to_string(),
            site_name: site_name.into(),
            tmdb_api_key: tmdb_api_key.into(),
            tmdb_base_url: tmdb_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn canonical(&self, path: &str) -> String {
        canonical_url(&self.site_url, path)
    }
}
