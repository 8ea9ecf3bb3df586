//! Application configuration

use crate::error::CoreError;
use std::time::Duration;
use wastewise_live::{ViewConfig, DEFAULT_DEBOUNCE_MS};
use wastewise_store::StoreConfig;

/// Optional override of the search debounce, in milliseconds
pub const SEARCH_DEBOUNCE_VAR: &str = "WASTEWISE_SEARCH_DEBOUNCE_MS";

/// Everything read from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Store connection parameters
    pub store: StoreConfig,
    /// Live view settings
    pub view: ViewConfig,
}

impl AppConfig {
    /// Read from process environment
    ///
    /// # Errors
    /// `CoreError::Config` naming every missing store variable
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup
    ///
    /// # Errors
    /// `CoreError::Config` naming every missing store variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig::from_lookup(&lookup)?;
        let view = ViewConfig::with_debounce(debounce_from(lookup(SEARCH_DEBOUNCE_VAR).as_deref()));
        Ok(Self { store, view })
    }
}

/// Live view settings alone, for tools that need no store connection
#[must_use]
pub fn view_config_from_env() -> ViewConfig {
    ViewConfig::with_debounce(debounce_from(std::env::var(SEARCH_DEBOUNCE_VAR).ok().as_deref()))
}

fn debounce_from(raw: Option<&str>) -> Duration {
    let fallback = Duration::from_millis(DEFAULT_DEBOUNCE_MS);
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => fallback,
        Some(value) => match value.parse::<u64>() {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => {
                tracing::warn!(var = SEARCH_DEBOUNCE_VAR, value, "invalid debounce; using default");
                fallback
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wastewise_store::config::REQUIRED_VARS;
    use wastewise_store::ConfigError;

    fn env_with(extra: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        let mut env: HashMap<&'static str, String> =
            REQUIRED_VARS.iter().map(|k| (*k, "x".to_string())).collect();
        for (key, value) in extra {
            env.insert(*key, (*value).to_string());
        }
        env
    }

    #[test]
    fn default_debounce() {
        let env = env_with(&[]);
        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.view.debounce, Duration::from_millis(250));
    }

    #[test]
    fn custom_and_invalid_debounce() {
        let env = env_with(&[(SEARCH_DEBOUNCE_VAR, "300")]);
        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.view.debounce, Duration::from_millis(300));

        let env = env_with(&[(SEARCH_DEBOUNCE_VAR, "soon")]);
        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.view.debounce, Duration::from_millis(250));
    }

    #[test]
    fn missing_store_values_fail() {
        let env: HashMap<&str, String> = HashMap::new();
        let err = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        match err {
            CoreError::Config(ConfigError::Missing(keys)) => assert_eq!(keys.len(), 6),
            other => panic!("unexpected error: {other}"),
        }
    }
}
