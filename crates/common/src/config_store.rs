//! Read-only configuration accessor consulted by adapters at call time.
//!
//! Adapters never hold configuration of their own. Every call that depends on
//! runtime configuration looks the value up by its namespaced key through a
//! [`ConfigStore`], so the host decides where values live and tests can hand
//! in a fixed snapshot.
//!
//! # Keys
//!
//! - `freakout.endpoint_url` - Endpoint override for the FreakOut adapter
//! - `currency.adServerCurrency` - Currency the ad server works in

use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::{AD_SERVER_CURRENCY_KEY, ENDPOINT_URL_KEY};
use crate::error::AdapterError;
use crate::settings::Settings;

/// Platform-agnostic configuration store trait.
pub trait ConfigStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(Some(value))` if the key exists,
    /// `Ok(None)` if the key doesn't exist,
    /// or `Err` if there was an error accessing the store.
    fn get(&self, key: &str) -> Result<Option<String>, AdapterError>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        (**self).get(key)
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        (**self).get(key)
    }
}

/// Map-backed store holding a fixed snapshot of configuration values.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    values: HashMap<String, String>,
}

impl MemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        Ok(self.values.get(key).cloned())
    }
}

impl ConfigStore for Settings {
    fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        let value = match key {
            ENDPOINT_URL_KEY => self.freakout.endpoint_url.clone(),
            AD_SERVER_CURRENCY_KEY => self.currency.ad_server_currency.clone(),
            _ => None,
        };
        Ok(value)
    }
}

/// Look up a key, treating read failures and empty values as unset.
pub(crate) fn get_non_empty<S: ConfigStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            log::warn!("Failed to read config key '{}': {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl ConfigStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, AdapterError> {
            Err(AdapterError::ConfigStore {
                message: "store offline".to_string(),
            })
        }
    }

    #[test]
    fn test_memory_store_lookup() {
        let store = MemoryConfigStore::new().with(ENDPOINT_URL_KEY, "https://a.example/ad");
        assert_eq!(
            store.get(ENDPOINT_URL_KEY).expect("should read"),
            Some("https://a.example/ad".to_string())
        );
        assert_eq!(store.get(AD_SERVER_CURRENCY_KEY).expect("should read"), None);
    }

    #[test]
    fn test_settings_store_maps_namespaced_keys() {
        let settings = Settings::from_toml(
            r#"
            [freakout]
            endpoint_url = "https://b.example/ad"

            [currency]
            ad_server_currency = "USD"
            "#,
        )
        .expect("should parse");

        assert_eq!(
            settings.get(ENDPOINT_URL_KEY).expect("should read"),
            Some("https://b.example/ad".to_string())
        );
        assert_eq!(
            settings.get(AD_SERVER_CURRENCY_KEY).expect("should read"),
            Some("USD".to_string())
        );
        assert_eq!(settings.get("unknown.key").expect("should read"), None);
    }

    #[test]
    fn test_get_non_empty_swallows_errors_and_blanks() {
        assert_eq!(get_non_empty(&FailingStore, ENDPOINT_URL_KEY), None);

        let store = MemoryConfigStore::new().with(ENDPOINT_URL_KEY, "");
        assert_eq!(get_non_empty(&store, ENDPOINT_URL_KEY), None);
    }

    #[test]
    fn test_arc_store_delegates() {
        let store: Arc<dyn ConfigStore> =
            Arc::new(MemoryConfigStore::new().with(AD_SERVER_CURRENCY_KEY, "usd"));
        assert_eq!(
            store.get(AD_SERVER_CURRENCY_KEY).expect("should read"),
            Some("usd".to_string())
        );
    }
}
