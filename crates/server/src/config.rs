//! # Application Configuration
//!
//! This module defines the configuration structure for `synopdf-server` and the
//! logic for loading it from a `config.yml` file and environment variables. The
//! configuration is read once at startup and never changes afterwards.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use synopdf::providers::factory::ProviderKind;
use tracing::info;

/// Environment variable that points at the configuration file.
pub const CONFIG_PATH_ENV: &str = "SYNOPDF_CONFIG";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate or an invalid value.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The credential for the completion API.
    pub token: SecretString,
    /// The interface to bind. Overridden by `SYNOPDF_HOST`.
    #[serde(default = "default_host")]
    pub host: String,
    /// The port for the server to listen on. Overridden by `SYNOPDF_PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Which completion API family to call.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Overrides the provider's public endpoint.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Deadline for one completion request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Deadline for a whole HTTP request.
    #[serde(default = "default_server_timeout_secs")]
    pub server_timeout_secs: u64,
    /// Where uploads are kept while a request is being processed.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// The file name offered to the browser for the generated PDF.
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Extracted text beyond this many characters is cut off before prompting.
    #[serde(default)]
    pub max_input_chars: Option<usize>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_server_timeout_secs() -> u64 {
    180
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_output_filename() -> String {
    "fließText.pdf".to_string()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// The file is taken from `config_path_override`, then `SYNOPDF_CONFIG`, then
/// `config.yml` in the working directory. `${VAR}` references in the file are
/// replaced from the environment before parsing, and `SYNOPDF_...` variables
/// override individual keys (e.g. `SYNOPDF_PORT`, `SYNOPDF_MODEL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yml".to_string()),
    };

    let content = read_and_substitute(&config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Config file not found at '{config_path}'. Create it with at least a 'token' key."
        ))
    })?;
    info!("Loading configuration from '{config_path}'.");

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&content, FileFormat::Yaml))
        .add_source(
            Environment::with_prefix("SYNOPDF")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.token.expose_secret().trim().is_empty() {
        return Err(ConfigError::General(
            "'token' must not be empty. Set it in the config file or via SYNOPDF_TOKEN."
                .to_string(),
        ));
    }

    Ok(config)
}
