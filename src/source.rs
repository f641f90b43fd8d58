//! Address sources: where candidate addresses for a postcode come from.
//!
//! A source is anything implementing [`AddressSource`]. The crate ships a
//! flat-file source over pre-fetched lookups, an in-memory source, and (with
//! the `remote` feature) a client for the Ideal Postcodes API in
//! [`crate::remote`].

use crate::error::{Error, Result};
use crate::types::{Address, AddressResult};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the flat-file data directory.
pub const DATA_DIR_ENV: &str = "POSTCODE_DATA_DIR";

/// Capability to list every known address for a postcode.
pub trait AddressSource {
    /// Fetch the candidate addresses registered under `postcode`.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup itself fails: missing data, an
    /// undecodable envelope, a transport failure or a rejected request.
    fn get_candidates(&self, postcode: &str) -> impl Future<Output = Result<Vec<Address>>> + Send;
}

/// Normalize a postcode for use as a lookup key.
///
/// Lowercases and removes every space: "PO5 2HX" becomes "po52hx".
pub fn normalize_postcode(postcode: &str) -> String {
    postcode.to_lowercase().replace(' ', "")
}

/// Get the default data directory for stored lookups.
pub fn default_data_dir() -> PathBuf {
    // Check for environment variable first
    if let Ok(env_data_dir) = std::env::var(DATA_DIR_ENV) {
        let path = PathBuf::from(env_data_dir);
        if path.exists() {
            return path;
        }
    }

    let project_data_dir = PathBuf::from("data");
    if project_data_dir.exists() {
        return project_data_dir;
    }

    if let Some(cache_dir) = dirs::cache_dir() {
        cache_dir.join("postcode-resolver")
    } else {
        PathBuf::from(".postcode-resolver")
    }
}

/// Configuration for the flat-file source.
#[derive(Debug, Clone)]
pub struct FlatFileConfig {
    /// Directory holding one `<postcode>.json` envelope per postcode
    pub data_dir: PathBuf,
}

impl Default for FlatFileConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl FlatFileConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FlatFileConfigBuilder {
        FlatFileConfigBuilder::new()
    }
}

/// Builder for FlatFileConfig.
#[derive(Debug, Clone, Default)]
pub struct FlatFileConfigBuilder {
    data_dir: Option<PathBuf>,
}

impl FlatFileConfigBuilder {
    /// Create a new builder; unset values fall back to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom data directory.
    pub fn data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FlatFileConfig {
        FlatFileConfig {
            data_dir: self.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

/// Source reading pre-fetched lookup envelopes from disk.
///
/// The lookup for "PO5 2HX" lives in `<data_dir>/po52hx.json` and has the
/// same `{result, code, message}` shape the remote API returns.
#[derive(Debug, Clone)]
pub struct FlatFileSource {
    config: FlatFileConfig,
}

impl FlatFileSource {
    /// Create a source over the default data directory.
    pub fn new() -> Self {
        Self::with_config(FlatFileConfig::default())
    }

    /// Create a source over a custom data directory.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::with_config(FlatFileConfig::builder().data_dir(data_dir.as_ref()).build())
    }

    /// Create a source with custom configuration.
    pub fn with_config(config: FlatFileConfig) -> Self {
        Self { config }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// File expected to hold the lookup for `postcode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPostcode`] unless the normalized postcode is a
    /// non-empty run of ASCII letters and digits, so a lookup can never name
    /// a file outside the data directory.
    pub fn path_for(&self, postcode: &str) -> Result<PathBuf> {
        let key = normalize_postcode(postcode);
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid_postcode(postcode));
        }
        Ok(self.config.data_dir.join(format!("{key}.json")))
    }
}

impl Default for FlatFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSource for FlatFileSource {
    async fn get_candidates(&self, postcode: &str) -> Result<Vec<Address>> {
        let path = self.path_for(postcode)?;
        debug!("Reading stored lookup from {}", path.display());

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No stored lookup for postcode {postcode}");
                return Err(Error::data_not_found(postcode, path));
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: AddressResult = serde_json::from_slice(&contents)?;
        debug!(
            "Loaded {} candidates for postcode {postcode}",
            envelope.result.len()
        );
        Ok(envelope.result)
    }
}

/// Source serving addresses held in memory.
///
/// Unknown postcodes yield an empty candidate list rather than an error.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    addresses: HashMap<String, Vec<Address>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register addresses under their own postcodes.
    pub fn with_addresses(mut self, addresses: impl IntoIterator<Item = Address>) -> Self {
        for address in addresses {
            self.insert(address);
        }
        self
    }

    /// Register one address under its postcode.
    pub fn insert(&mut self, address: Address) {
        self.addresses
            .entry(normalize_postcode(&address.postcode))
            .or_default()
            .push(address);
    }

    /// Number of postcodes with at least one address.
    pub fn postcode_count(&self) -> usize {
        self.addresses.len()
    }
}

impl AddressSource for InMemorySource {
    async fn get_candidates(&self, postcode: &str) -> Result<Vec<Address>> {
        Ok(self
            .addresses
            .get(&normalize_postcode(postcode))
            .cloned()
            .unwrap_or_default())
    }
}
