//! Client for the Ideal Postcodes lookup API.

use crate::error::{Error, Result};
use crate::source::AddressSource;
use crate::types::{Address, AddressResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "IDEAL_POSTCODES_API_KEY";

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.ideal-postcodes.co.uk/v1";

/// Configuration for the remote lookup source.
#[derive(Clone)]
pub struct RemoteConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Base URL of the API, without trailing `/postcodes`
    pub base_url: String,
    /// Request timeout
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl RemoteConfig {
    /// Create a configuration with default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }

    /// Read the API key from `IDEAL_POSTCODES_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(Error::config_error(format!("{API_KEY_ENV} is not set"))),
        }
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// URL of the lookup for `postcode`, without the API key.
    pub fn lookup_url(&self, postcode: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::config_error(format!("Invalid base URL {}: {e}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|()| Error::config_error(format!("Base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push("postcodes")
            .push(postcode.trim());

        Ok(url)
    }
}

/// Source backed by the Ideal Postcodes HTTP API.
#[derive(Debug, Clone)]
pub struct IdealPostcodesSource {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl IdealPostcodesSource {
    /// Create a source for the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(RemoteConfig::new(api_key))
    }

    /// Create a source with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn with_config(config: RemoteConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::config_error("API key must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

impl AddressSource for IdealPostcodesSource {
    async fn get_candidates(&self, postcode: &str) -> Result<Vec<Address>> {
        let url = self.config.lookup_url(postcode)?;
        debug!("Looking up postcode {postcode} at {url}");

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::network_error(format!("Lookup request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::network_error(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            warn!("Lookup for postcode {postcode} failed with status {status}");
            return Err(match serde_json::from_slice::<AddressResult>(&body) {
                Ok(envelope) if !envelope.message.is_empty() => {
                    Error::lookup_failed(envelope.code, envelope.message)
                }
                _ => Error::lookup_failed(
                    i64::from(status.as_u16()),
                    status.canonical_reason().unwrap_or("Unexpected status"),
                ),
            });
        }

        let envelope: AddressResult = serde_json::from_slice(&body)?;
        debug!(
            "Lookup for postcode {postcode} returned {} candidates ({}: {})",
            envelope.result.len(),
            envelope.code,
            envelope.message
        );
        Ok(envelope.result)
    }
}
