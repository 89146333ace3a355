//! Configuration structures for Director clients.
//!
//! This module parses the API key and install path a client is created with,
//! and derives the request base path from them.

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Front controller that local installs route API requests through.
pub const LOCAL_FRONT_CONTROLLER: &str = "index.php?";

/// Deployment mode of a Director install, taken from the API key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// Self-hosted install behind an `index.php` front controller
    Local,
    /// Install hosted by the vendor
    Hosted,
}

impl InstallType {
    /// Returns the key prefix for this install type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Hosted => "hosted",
        }
    }
}

impl FromStr for InstallType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Self::Local),
            "hosted" => Ok(Self::Hosted),
            _ => Err(Error::ConfigError("API key is invalid".to_string())),
        }
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API key of the form `{local|hosted}-{token}`.
#[derive(Debug, Clone)]
pub struct ApiKey {
    install: InstallType,
    token: SecretString,
}

impl ApiKey {
    /// Parses an API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the trimmed key splits on `-` into
    /// exactly two non-empty parts and the prefix is `local` or `hosted`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.trim().split('-');
        let (Some(service), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::ConfigError("API key is invalid".to_string()));
        };

        if service.is_empty() || token.is_empty() {
            return Err(Error::ConfigError("API key is invalid".to_string()));
        }

        Ok(Self {
            install: service.parse()?,
            token: SecretString::from(token.to_string()),
        })
    }

    /// Returns the install type encoded in the key prefix.
    #[must_use]
    pub const fn install(&self) -> InstallType {
        self.install
    }

    /// Returns the secret part of the key.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl FromStr for ApiKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Host (and optional path prefix) of a Director install, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath(String);

impl ApiPath {
    /// Normalizes an install path: surrounding whitespace, a leading
    /// `http://` or `https://` and trailing slashes are stripped.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if nothing is left after normalization.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        if host.is_empty() {
            return Err(Error::ConfigError("API path is empty".to_string()));
        }

        Ok(Self(host.to_string()))
    }

    /// Returns the normalized host/path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the base path requests are appended to.
    #[must_use]
    pub fn base_path(&self, install: InstallType) -> String {
        match install {
            InstallType::Local => format!("http://{}/{LOCAL_FRONT_CONTROLLER}/api/", self.0),
            InstallType::Hosted => format!("http://{}/api/", self.0),
        }
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for a Director client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DirectorConfig {
    /// API key, `{local|hosted}-{token}`
    #[validate(length(min = 1))]
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Host (and optional path prefix) of the install
    #[validate(length(min = 1))]
    pub api_path: String,
}

impl DirectorConfig {
    /// Create a new configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is empty, the key is malformed, or the
    /// path normalizes to nothing.
    pub fn new(api_key: impl Into<String>, api_path: impl Into<String>) -> Result<Self> {
        let config = Self {
            api_key: api_key.into(),
            api_path: api_path.into(),
        };

        config.validate()?;
        config.parse_api_key()?;
        config.parse_api_path()?;

        Ok(config)
    }

    /// Parse the configured API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is malformed.
    pub fn parse_api_key(&self) -> Result<ApiKey> {
        ApiKey::parse(&self.api_key)
    }

    /// Parse and normalize the configured API path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the path is empty.
    pub fn parse_api_path(&self) -> Result<ApiPath> {
        ApiPath::parse(&self.api_path)
    }

    /// Build the request base path for this install.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key or path is invalid.
    pub fn base_path(&self) -> Result<String> {
        let key = self.parse_api_key()?;
        Ok(self.parse_api_path()?.base_path(key.install()))
    }
}
