use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::DEFAULT_HOST_VERSION;
use crate::error::AdapterError;

pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "FREAKOUT_BIDDER";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";

/// Facts about the host framework the adapter runs in.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Host {
    /// Host framework version, reported to the endpoint as `pb_ver`.
    #[serde(default = "default_host_version")]
    #[validate(length(min = 1))]
    pub version: String,
}

fn default_host_version() -> String {
    DEFAULT_HOST_VERSION.to_string()
}

impl Default for Host {
    fn default() -> Self {
        Self {
            version: default_host_version(),
        }
    }
}

/// Bidder-namespaced settings (`freakout.*`).
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Freakout {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Overrides the default ad endpoint for every request when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub endpoint_url: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Freakout {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint_url: None,
        }
    }
}

/// Global currency settings shared with other adapters.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct Currency {
    /// ISO 4217 code the ad server works in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 3))]
    pub ad_server_currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub host: Host,
    #[serde(default)]
    #[validate(nested)]
    pub freakout: Freakout,
    #[serde(default)]
    #[validate(nested)]
    pub currency: Currency,
}

impl Settings {
    /// Load the settings bundled with the crate, layered with environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] when the bundled TOML or an
    /// environment override cannot be parsed.
    pub fn new() -> Result<Self, Report<AdapterError>> {
        let toml_str = include_str!("../../../freakout-bidder.toml");
        Self::from_toml(toml_str)
    }

    /// Parse settings from TOML, then apply `FREAKOUT_BIDDER__*` environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] when the TOML is malformed or
    /// a value has the wrong type.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<AdapterError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(AdapterError::Configuration {
                message: "Failed to build configuration".to_string(),
            })?;

        config
            .try_deserialize()
            .change_context(AdapterError::Configuration {
                message: "Failed to deserialize configuration".to_string(),
            })
    }

    /// Serialize the effective settings back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Serialization`] if TOML serialization fails.
    pub fn to_canonical_toml(&self) -> Result<String, Report<AdapterError>> {
        toml::to_string(self).change_context(AdapterError::Serialization {
            message: "Failed to serialize settings to TOML".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_new() {
        let settings = Settings::new().expect("bundled settings should load");
        assert!(!settings.host.version.is_empty());
        assert!(settings.freakout.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_from_valid_toml() {
        let toml_str = r#"
            [host]
            version = "8.52.0"

            [freakout]
            endpoint_url = "https://staging.ad.example.com/ad"

            [currency]
            ad_server_currency = "USD"
            "#;

        let settings = Settings::from_toml(toml_str).expect("should parse");
        assert_eq!(settings.host.version, "8.52.0");
        assert_eq!(
            settings.freakout.endpoint_url.as_deref(),
            Some("https://staging.ad.example.com/ad")
        );
        assert_eq!(settings.currency.ad_server_currency.as_deref(), Some("USD"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_empty_toml_uses_defaults() {
        let settings = Settings::from_toml("").expect("should parse");
        assert_eq!(settings.host.version, DEFAULT_HOST_VERSION);
        assert!(settings.freakout.enabled);
        assert_eq!(settings.freakout.endpoint_url, None);
        assert_eq!(settings.currency.ad_server_currency, None);
    }

    #[test]
    fn test_settings_invalid_toml_syntax() {
        let toml_str = r#"
            [freakout
            endpoint_url = "https://staging.ad.example.com/ad"
            "#;

        let settings = Settings::from_toml(toml_str);
        assert!(settings.is_err(), "Should fail with invalid TOML syntax");
    }

    #[test]
    fn test_settings_validation_rejects_bad_values() {
        let toml_str = r#"
            [freakout]
            endpoint_url = "not a url"

            [currency]
            ad_server_currency = "DOLLARS"
            "#;

        let settings = Settings::from_toml(toml_str).expect("should parse");
        let errors = settings.validate().expect_err("should fail validation");
        let errors = errors.to_string();
        assert!(errors.contains("endpoint_url"), "{errors}");
        assert!(errors.contains("ad_server_currency"), "{errors}");
    }

    #[test]
    fn test_settings_validation_rejects_empty_host_version() {
        let toml_str = r#"
            [host]
            version = ""
            "#;

        let settings = Settings::from_toml(toml_str).expect("should parse");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_set_env() {
        let toml_str = r#"
            [host]
            version = "8.52.0"
            "#;

        temp_env::with_var(
            "FREAKOUT_BIDDER__FREAKOUT__ENDPOINT_URL",
            Some("https://override.example.com/ad"),
            || {
                let settings = Settings::from_toml(toml_str).expect("should parse");
                assert_eq!(
                    settings.freakout.endpoint_url.as_deref(),
                    Some("https://override.example.com/ad")
                );
            },
        );
    }

    #[test]
    fn test_override_env() {
        let toml_str = r#"
            [currency]
            ad_server_currency = "JPY"
            "#;

        temp_env::with_var(
            "FREAKOUT_BIDDER__CURRENCY__AD_SERVER_CURRENCY",
            Some("USD"),
            || {
                let settings = Settings::from_toml(toml_str).expect("should parse");
                assert_eq!(settings.currency.ad_server_currency.as_deref(), Some("USD"));
            },
        );
    }

    #[test]
    fn test_canonical_toml_round_trips() {
        let toml_str = r#"
            [host]
            version = "8.52.0"

            [currency]
            ad_server_currency = "usd"
            "#;

        let settings = Settings::from_toml(toml_str).expect("should parse");
        let canonical = settings.to_canonical_toml().expect("should serialize");
        assert!(canonical.contains("version = \"8.52.0\""));
        assert!(!canonical.contains("endpoint_url"));

        let reparsed = Settings::from_toml(&canonical).expect("should reparse");
        assert_eq!(reparsed.currency.ad_server_currency.as_deref(), Some("usd"));
    }
}
