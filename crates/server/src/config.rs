use std::{collections::HashMap, fs};

use anyhow::Context;
use url::Url;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub cache_path: String,
    pub remote_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            cache_path: "chipotle_local.tsv".into(),
            remote_url:
                "https://raw.githubusercontent.com/justmarkham/DAT8/refs/heads/master/data/chipotle.tsv"
                    .into(),
        }
    }
}

/// Defaults, overridden by an optional `server.toml` key/value file, then by
/// environment variables. Unknown keys and malformed files are ignored.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.bind_addr = v.clone();
            }
            if let Some(v) = file_cfg.get("cache_path") {
                settings.cache_path = v.clone();
            }
            if let Some(v) = file_cfg.get("remote_url") {
                settings.remote_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Ok(v) = std::env::var("CACHE_PATH") {
        settings.cache_path = v;
    }
    if let Ok(v) = std::env::var("REMOTE_URL") {
        settings.remote_url = v;
    }

    settings
}

pub fn parse_remote_url(raw: &str) -> anyhow::Result<Url> {
    Url::parse(raw).with_context(|| format!("invalid remote dataset url '{raw}'"))
}
