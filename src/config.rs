use config::{Config as ConfigLoader, Environment};
use dotenvy::dotenv;
use secrecy::SecretString;
use serde::Deserialize;

/// Process-wide configuration, read once at startup from the environment
/// (with `.env` support).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Podimo account e-mail address
    #[serde(alias = "PODIMO_USERNAME")]
    pub podimo_username: String,

    /// Podimo account password (sensitive)
    #[serde(alias = "PODIMO_PASSWORD")]
    pub podimo_password: SecretString,

    #[serde(default = "default_graphql_url", alias = "GRAPHQL_URL")]
    pub graphql_url: String,

    /// Auth token lifetime in seconds
    #[serde(default = "default_token_ttl", alias = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: u64,

    /// Rendered feed lifetime in seconds
    #[serde(default = "default_feed_ttl", alias = "FEED_TTL_SECS")]
    pub feed_ttl_secs: u64,

    /// Episodes requested per upstream page
    #[serde(default = "default_page_size", alias = "PAGE_SIZE")]
    pub page_size: usize,

    #[serde(default = "default_host", alias = "SERVER_HOST")]
    pub server_host: String,

    #[serde(default = "default_port", alias = "SERVER_PORT")]
    pub server_port: u16,

    #[serde(default = "default_log", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables, preferring `.env`
    /// entries only where the variable is not already set.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let loader =
            ConfigLoader::builder().add_source(Environment::default().try_parsing(true));

        Ok(loader.build()?.try_deserialize()?)
    }
}

fn default_graphql_url() -> String {
    "https://graphql.pdm-gateway.com/graphql".to_string()
}

fn default_token_ttl() -> u64 {
    60 * 60 * 24
}

fn default_feed_ttl() -> u64 {
    60 * 15
}

fn default_page_size() -> usize {
    100
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log() -> String {
    "info".to_string()
}
