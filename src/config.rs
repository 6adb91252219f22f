//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PORT` (optional): HTTP server port, defaults to 5000
/// - `KEYS_FILE` (optional): path of the JSON keys file, defaults to `keys.json`
/// - `BIND_ADDR` (optional): listen address, defaults to `0.0.0.0`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_keys_file")]
    pub keys_file: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

fn default_keys_file() -> String {
    "keys.json".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into the expected type (e.g. a non-numeric `PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // Field names are automatically converted: keys_file -> KEYS_FILE
        envy::from_iter::<_, Config>(vars)
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
