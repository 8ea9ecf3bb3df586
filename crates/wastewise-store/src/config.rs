//! Store connection parameters
//!
//! All values come from the environment at startup. A blank value counts
//! as missing, and every missing key is reported at once.

use crate::error::ConfigError;
use std::fmt;

/// API key variable
pub const API_KEY: &str = "WASTEWISE_API_KEY";
/// Auth domain variable
pub const AUTH_DOMAIN: &str = "WASTEWISE_AUTH_DOMAIN";
/// Project id variable
pub const PROJECT_ID: &str = "WASTEWISE_PROJECT_ID";
/// Storage bucket variable
pub const STORAGE_BUCKET: &str = "WASTEWISE_STORAGE_BUCKET";
/// Messaging sender id variable
pub const MESSAGING_SENDER_ID: &str = "WASTEWISE_MESSAGING_SENDER_ID";
/// App id variable
pub const APP_ID: &str = "WASTEWISE_APP_ID";

/// Every variable the store needs, in report order
pub const REQUIRED_VARS: [&str; 6] = [
    API_KEY,
    AUTH_DOMAIN,
    PROJECT_ID,
    STORAGE_BUCKET,
    MESSAGING_SENDER_ID,
    APP_ID,
];

/// Hosted store connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// API key
    pub api_key: String,
    /// Auth domain
    pub auth_domain: String,
    /// Project id
    pub project_id: String,
    /// Storage bucket
    pub storage_bucket: String,
    /// Messaging sender id
    pub messaging_sender_id: String,
    /// App id
    pub app_id: String,
}

impl StoreConfig {
    /// Read configuration from process environment
    ///
    /// # Errors
    /// `ConfigError::Missing` naming every absent or blank variable
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup
    ///
    /// # Errors
    /// `ConfigError::Missing` naming every absent or blank variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|key| read(**key).is_none())
            .map(|key| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let value = |key: &str| read(key).unwrap_or_default();
        Ok(Self {
            api_key: value(API_KEY),
            auth_domain: value(AUTH_DOMAIN),
            project_id: value(PROJECT_ID),
            storage_bucket: value(STORAGE_BUCKET),
            messaging_sender_id: value(MESSAGING_SENDER_ID),
            app_id: value(APP_ID),
        })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_key", &"<redacted>")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .finish()
    }
}
