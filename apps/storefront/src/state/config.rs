//! # Configuration State
//!
//! Stores storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BAZAR_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock needed.

use serde::{Deserialize, Serialize};

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Base URL of the REST API checkout code posts orders to.
    pub api_base_url: String,

    /// Store name (shown in the navigation bar)
    pub store_name: String,

    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for StorefrontConfig {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        StorefrontConfig {
            api_base_url: "http://localhost:8080".to_string(),
            store_name: "Bazar Pepe".to_string(),
            log_filter: "info,bazar=debug".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BAZAR_API_URL`: Override API base URL
    /// - `BAZAR_STORE_NAME`: Override store name
    /// - `BAZAR_LOG`: Override default log filter
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`StorefrontConfig::from_env`] with a custom variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StorefrontConfig::default();

        if let Some(url) = lookup("BAZAR_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(name) = lookup("BAZAR_STORE_NAME").filter(|v| !v.trim().is_empty()) {
            config.store_name = name;
        }

        if let Some(filter) = lookup("BAZAR_LOG").filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }

        config
    }

    /// Joins an API path onto the base URL with exactly one slash.
    ///
    /// ## Example
    /// ```rust
    /// use bazar_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.endpoint("/order/create"), "http://localhost:8080/order/create");
    /// ```
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = StorefrontConfig::from_vars(lookup(&[]));
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = StorefrontConfig::from_vars(lookup(&[
            ("BAZAR_API_URL", "https://api.bazar.test/"),
            ("BAZAR_STORE_NAME", "Bazar Test"),
            ("BAZAR_LOG", "warn"),
        ]));

        assert_eq!(config.api_base_url, "https://api.bazar.test/");
        assert_eq!(config.store_name, "Bazar Test");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = StorefrontConfig::from_vars(lookup(&[("BAZAR_API_URL", "  ")]));
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_endpoint_joins_with_one_slash() {
        let mut config = StorefrontConfig::default();
        assert_eq!(config.endpoint("product/get-all"), "http://localhost:8080/product/get-all");

        config.api_base_url = "https://api.bazar.test/".to_string();
        assert_eq!(config.endpoint("/order/create"), "https://api.bazar.test/order/create");
    }
}
