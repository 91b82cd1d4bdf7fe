use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::net::SocketAddr;

use crate::error::{Error, Result};

pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_EXA_BASE_URL: &str = "https://api.exa.ai";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

#[derive(Clone)]
pub struct Config {
    pub notion_api_key: String,
    pub notion_base_url: String,
    pub notion_version: String,
    pub exa_api_key: String,
    pub exa_base_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = get_or_default(&lookup, "GLEAN_BIND_ADDR", DEFAULT_BIND_ADDR);
        Ok(Config {
            notion_api_key: get_required(&lookup, "NOTION_API_KEY")?,
            notion_base_url: get_or_default(&lookup, "NOTION_BASE_URL", DEFAULT_NOTION_BASE_URL),
            notion_version: get_or_default(&lookup, "NOTION_VERSION", DEFAULT_NOTION_VERSION),
            exa_api_key: get_required(&lookup, "EXA_API_KEY")?,
            exa_base_url: get_or_default(&lookup, "EXA_BASE_URL", DEFAULT_EXA_BASE_URL),
            bind_addr: parse_addr(&bind)?,
        })
    }

    pub fn with_bind_addr(mut self, addr: &str) -> Result<Config> {
        self.bind_addr = parse_addr(addr)?;
        Ok(self)
    }
}

// Keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("notion_api_key", &"<redacted>")
            .field("notion_base_url", &self.notion_base_url)
            .field("notion_version", &self.notion_version)
            .field("exa_api_key", &"<redacted>")
            .field("exa_base_url", &self.exa_base_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn get_required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::MissingEnv(key.to_string()))
}

fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_addr(addr: &str) -> Result<SocketAddr> {
    addr.parse()
        .map_err(|_| Error::InvalidAddr(addr.to_string()))
}
