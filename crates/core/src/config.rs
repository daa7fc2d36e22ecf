//! OFREP endpoint configuration.
//!
//! Configuration is merged per call from three layers, highest precedence
//! first:
//!
//! 1. explicit call arguments ([`ConfigOverrides`])
//! 2. environment variables, primary name then legacy alias
//! 3. an optional JSON config file (`$OPENFEATURE_MCP_CONFIG_PATH`, else
//!    `~/.openfeature-mcp.json`) shaped as
//!    `{ "OFREP": { "baseUrl": "...", "bearerToken": "...", "apiKey": "..." } }`
//!
//! The file is best effort: a missing, unreadable or malformed file is the
//! same as no file. Validation happens once, after the merge.

use crate::error::ConfigurationError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Base URL variables, primary name first.
pub const BASE_URL_ENV: [&str; 2] = ["OPENFEATURE_OFREP_BASE_URL", "OFREP_BASE_URL"];
/// Bearer token variables, primary name first.
pub const BEARER_TOKEN_ENV: [&str; 2] = ["OPENFEATURE_OFREP_BEARER_TOKEN", "OFREP_BEARER_TOKEN"];
/// API key variables, primary name first.
pub const API_KEY_ENV: [&str; 2] = ["OPENFEATURE_OFREP_API_KEY", "OFREP_API_KEY"];
/// Explicit config file location.
pub const CONFIG_PATH_ENV: &str = "OPENFEATURE_MCP_CONFIG_PATH";
/// Config file name under the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".openfeature-mcp.json";

/// Source of environment variables and the home directory.
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// The real process environment. Read on every lookup, never cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// In-memory variables, with no home directory.
impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Values passed explicitly with a tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub bearer_token: Option<String>,
    pub api_key: Option<String>,
}

/// How requests to the OFREP endpoint authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

/// A validated OFREP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    base_url: String,
    credential: Credential,
}

impl EndpointConfig {
    /// Validate merged values. The base URL must be an absolute http(s) URL
    /// and at least one non-empty credential must be present; a bearer token
    /// wins over an API key.
    pub fn new(
        base_url: Option<String>,
        bearer_token: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let base_url = base_url.ok_or(ConfigurationError::MissingBaseUrl)?;
        validate_base_url(&base_url)?;

        let credential = match (
            bearer_token.filter(|token| !token.is_empty()),
            api_key.filter(|key| !key.is_empty()),
        ) {
            (Some(token), _) => Credential::Bearer(token),
            (None, Some(key)) => Credential::ApiKey(key),
            (None, None) => return Err(ConfigurationError::MissingCredentials),
        };

        Ok(Self {
            base_url,
            credential,
        })
    }

    /// The base URL exactly as configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "OFREP")]
    ofrep: FileOfrepConfig,
}

/// The `OFREP` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOfrepConfig {
    pub base_url: String,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Where the config file is looked for: the explicit override when set and
/// non-empty, otherwise the default file in the home directory.
pub fn config_file_path(env: &dyn Environment) -> Option<PathBuf> {
    match env.var(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => env.home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE)),
    }
}

/// Read the `OFREP` section of the config file.
///
/// Any failure (no path, missing file, invalid JSON, wrong shape, empty base
/// URL) yields `None`.
pub fn read_config_file(env: &dyn Environment) -> Option<FileOfrepConfig> {
    let path = config_file_path(env)?;

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "OFREP config file not readable, ignoring");
            return None;
        }
    };

    match serde_json::from_str::<ConfigFile>(&content) {
        Ok(file) if !file.ofrep.base_url.is_empty() => Some(file.ofrep),
        Ok(_) => {
            debug!(path = %path.display(), "OFREP config file has an empty baseUrl, ignoring");
            None
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "OFREP config file is malformed, ignoring");
            None
        }
    }
}

fn first_env(env: &dyn Environment, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env.var(name))
}

/// Merge all configuration layers and validate the result.
pub fn resolve(
    overrides: &ConfigOverrides,
    env: &dyn Environment,
) -> Result<EndpointConfig, ConfigurationError> {
    let mut base_url = overrides
        .base_url
        .clone()
        .or_else(|| first_env(env, &BASE_URL_ENV));
    let mut bearer_token = overrides
        .bearer_token
        .clone()
        .or_else(|| first_env(env, &BEARER_TOKEN_ENV));
    let mut api_key = overrides
        .api_key
        .clone()
        .or_else(|| first_env(env, &API_KEY_ENV));

    // The file is only consulted when a higher layer left a gap.
    if base_url.is_none() || bearer_token.is_none() || api_key.is_none() {
        if let Some(file) = read_config_file(env) {
            base_url = base_url.or(Some(file.base_url));
            bearer_token = bearer_token.or(file.bearer_token);
            api_key = api_key.or(file.api_key);
        }
    }

    EndpointConfig::new(base_url, bearer_token, api_key)
}
