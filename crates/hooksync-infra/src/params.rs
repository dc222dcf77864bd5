//! Parameter sources backing the [`NodeParameters`] port.
//!
//! `FileParameters` reads a TOML file on every call, so edits made while
//! the process is running are picked up by the very next request.
//! `StaticParameters` serves fixed values for hosts that resolve their
//! configuration up front.

use std::path::PathBuf;

use serde::Deserialize;

use hooksync_core::params::{DEFAULT_API_ENDPOINT, NodeParameters};
use hooksync_types::credentials::CredentialSet;
use hooksync_types::error::SubscriptionError;

/// On-disk parameter schema.
///
/// Every field is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParameterFile {
    /// Base URL of the automation API.
    pub api_endpoint: String,
    /// Authentication scheme name, looked up in the scheme registry.
    pub auth_scheme: String,
    /// Value of the `sharedSecret` credential field.
    pub shared_secret: Option<String>,
}

impl Default for ParameterFile {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_owned(),
            auth_scheme: "apiKey".to_owned(),
            shared_secret: None,
        }
    }
}

impl ParameterFile {
    /// Configured endpoint, with an empty string treated as unset.
    pub fn endpoint(&self) -> &str {
        if self.api_endpoint.is_empty() {
            DEFAULT_API_ENDPOINT
        } else {
            &self.api_endpoint
        }
    }

    /// Credential set described by this file.
    pub fn credential_set(&self) -> CredentialSet {
        let mut creds = CredentialSet::new(self.auth_scheme.as_str());
        if let Some(secret) = &self.shared_secret {
            creds = creds.with_field("sharedSecret", secret.as_str());
        }
        creds
    }
}

/// [`NodeParameters`] backed by a TOML file that is re-read per call.
#[derive(Clone)]
pub struct FileParameters {
    path: PathBuf,
}

impl FileParameters {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<ParameterFile, SubscriptionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no parameter file at {}, using defaults", self.path.display());
                return Ok(ParameterFile::default());
            }
            Err(err) => {
                return Err(SubscriptionError::Configuration(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };

        toml::from_str(&content).map_err(|err| {
            SubscriptionError::Configuration(format!(
                "failed to parse {}: {err}",
                self.path.display()
            ))
        })
    }
}

impl NodeParameters for FileParameters {
    async fn api_endpoint(&self) -> Result<String, SubscriptionError> {
        Ok(self.read().await?.endpoint().to_owned())
    }

    async fn credentials(&self) -> Result<CredentialSet, SubscriptionError> {
        Ok(self.read().await?.credential_set())
    }
}

/// [`NodeParameters`] serving fixed in-process values.
#[derive(Clone)]
pub struct StaticParameters {
    endpoint: String,
    credentials: CredentialSet,
}

impl StaticParameters {
    pub fn new(endpoint: impl Into<String>, credentials: CredentialSet) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
        }
    }
}

impl NodeParameters for StaticParameters {
    async fn api_endpoint(&self) -> Result<String, SubscriptionError> {
        Ok(self.endpoint.clone())
    }

    async fn credentials(&self) -> Result<CredentialSet, SubscriptionError> {
        Ok(self.credentials.clone())
    }
}
