use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::layer::{ARCHIVE_PATH, LAYER_OBJECT_KEY, LAYER_PACKAGES, STAGING_DIR};

pub const USERNAME_ENV: &str = "USERNAME";
pub const PASSWORD_ENV: &str = "PASSWORD";
pub const CLUSTER_ENV: &str = "CLUSTER";
pub const BUCKET_ENV: &str = "BUCKET";
pub const PACKAGE_INSTALLER_ENV: &str = "PACKAGE_INSTALLER";

pub const DOCUMENT_DB_PORT: u16 = 27017;
pub const DOCUMENT_DB_REPLICA_SET: &str = "rs0";
pub const DATABASE_NAME: &str = "tip";
pub const COLLECTION_NAME: &str = "tip_collection";

pub const TRUST_BUNDLE_URL: &str =
    "https://truststore.pki.rds.amazonaws.com/global/global-bundle.pem";
pub const TRUST_BUNDLE_PATH: &str = "/tmp/global-bundle.pem";

pub const DEFAULT_PACKAGE_INSTALLER: &str = "pip";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Credentials and host of the document store cluster.
///
/// Built once per invocation and dropped after the session is opened.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub username: String,
    pub password: String,
    pub cluster: String,
}

impl ConnectionConfig {
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            username: required(&lookup, USERNAME_ENV)?,
            password: required(&lookup, PASSWORD_ENV)?,
            cluster: required(&lookup, CLUSTER_ENV)?.trim().to_string(),
        })
    }

    /// Connection string with TLS against `ca_file`, replica set `rs0`,
    /// secondary-preferred reads and retryable writes.
    pub fn connection_string(&self, ca_file: &str) -> String {
        let username = utf8_percent_encode(&self.username, NON_ALPHANUMERIC);
        let password = utf8_percent_encode(&self.password, NON_ALPHANUMERIC);
        format!(
            "mongodb://{username}:{password}@{cluster}:{DOCUMENT_DB_PORT}/?tls=true&tlsCAFile={ca_file}&replicaSet={DOCUMENT_DB_REPLICA_SET}&readPreference=secondaryPreferred&retryWrites=true",
            cluster = self.cluster,
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("cluster", &self.cluster)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub connection: ConnectionConfig,
    pub database: String,
    pub collection: String,
    pub trust_bundle_url: String,
    pub trust_bundle_path: PathBuf,
}

impl IngestConfig {
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            connection: ConnectionConfig::from_env(lookup)?,
            database: DATABASE_NAME.to_string(),
            collection: COLLECTION_NAME.to_string(),
            trust_bundle_url: TRUST_BUNDLE_URL.to_string(),
            trust_bundle_path: PathBuf::from(TRUST_BUNDLE_PATH),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub bucket: String,
    pub object_key: String,
    pub installer: String,
    pub packages: Vec<String>,
    pub staging_dir: PathBuf,
    pub archive_path: PathBuf,
}

impl LayerConfig {
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bucket = required(&lookup, BUCKET_ENV)?.trim().to_string();
        let installer = lookup(PACKAGE_INSTALLER_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PACKAGE_INSTALLER.to_string());
        Ok(Self {
            bucket,
            object_key: LAYER_OBJECT_KEY.to_string(),
            installer,
            packages: LAYER_PACKAGES.iter().map(|name| name.to_string()).collect(),
            staging_dir: PathBuf::from(STAGING_DIR),
            archive_path: PathBuf::from(ARCHIVE_PATH),
        })
    }
}
