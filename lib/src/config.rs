//! Defines the configuration structures for a repository client.
//! This includes the main `Config` struct and `ProtocolPaths`, which captures the
//! path conventions a particular repository backend uses for content, metadata and
//! transactions.

use crate::options::AccessMode;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Path and media-type conventions of the remote repository. The defaults match a
/// Fedora 4 style server; a different backend substitutes its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProtocolPaths {
    /// Sub-resource holding a datastream's bytes.
    pub content_suffix: String,
    /// Sub-resource holding a datastream's technical metadata.
    pub metadata_suffix: String,
    pub fixity_suffix: String,
    pub versions_suffix: String,
    /// Path the client POSTs to in order to open a transaction.
    pub transaction_endpoint: String,
    pub commit_suffix: String,
    pub rollback_suffix: String,
    /// Substring that marks a path as already scoped to a transaction.
    pub transaction_marker: String,
    /// Media type requested when loading resource properties.
    pub rdf_accept: String,
}

impl Default for ProtocolPaths {
    fn default() -> Self {
        Self {
            content_suffix: "/fcr:content".to_string(),
            metadata_suffix: "/fcr:metadata".to_string(),
            fixity_suffix: "/fcr:fixity".to_string(),
            versions_suffix: "/fcr:versions".to_string(),
            transaction_endpoint: "/fcr:tx".to_string(),
            commit_suffix: "/fcr:commit".to_string(),
            rollback_suffix: "/fcr:rollback".to_string(),
            transaction_marker: "tx:".to_string(),
            rdf_accept: "text/turtle".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Config {
    /// Base URL every repository path is resolved against.
    #[builder(setter(into))]
    pub repository_url: String,
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub username: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub password: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub access: AccessMode,
    // applied by the default transport; the client itself never times out
    #[builder(setter(strip_option), default = "Some(Duration::from_secs(30))")]
    #[serde(default = "default_timeout")]
    pub timeout: Option<Duration>,
    #[builder(default)]
    #[serde(default)]
    pub paths: ProtocolPaths,
}

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.repository_url {
            Url::parse(url).map_err(|e| format!("invalid repository url {url}: {e}"))?;
        }
        // credentials only make sense as a pair
        let username = self.username.clone().flatten();
        let password = self.password.clone().flatten();
        if username.is_some() != password.is_some() {
            return Err("username and password must be supplied together".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// A read-write configuration with default conventions.
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            username: None,
            password: None,
            access: AccessMode::ReadWrite,
            timeout: default_timeout(),
            paths: ProtocolPaths::default(),
        }
    }

    /// The repository URL without a trailing slash, the form paths are appended to.
    pub fn base_url(&self) -> &str {
        self.repository_url.trim_end_matches('/')
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.trim().is_empty() => {
                Some((user.as_str(), pass.as_str()))
            }
            _ => None,
        }
    }
}
