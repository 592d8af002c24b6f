//! Settings loading and validation.
//!
//! Settings are loaded from a TOML file (or the bundled defaults) and merged
//! with environment variables prefixed with `FREAKOUT_BIDDER__`. For example,
//! `FREAKOUT_BIDDER__FREAKOUT__ENDPOINT_URL` overrides `freakout.endpoint_url`.

use std::fs;
use std::path::Path;

use freakout_bidder_common::settings::Settings;
use validator::Validate;

use crate::error::CliError;

/// Load, merge and validate settings.
///
/// Without a file the settings bundled with the library are used.
pub(crate) fn load_settings(file: Option<&Path>) -> Result<Settings, CliError> {
    let settings = match file {
        Some(path) => {
            log::debug!("Loading config from: {}", path.display());
            let content = fs::read_to_string(path)?;
            Settings::from_toml(&content)?
        }
        None => {
            log::debug!("Loading bundled config");
            Settings::new()?
        }
    };

    settings
        .validate()
        .map_err(|e| CliError::Config(format!("Settings validation failed: {e}")))?;

    Ok(settings)
}

/// Validate settings and render the effective configuration as TOML.
pub fn validate(file: Option<&Path>) -> Result<String, CliError> {
    let settings = load_settings(file)?;
    let merged_toml = settings.to_canonical_toml()?;

    log::info!(
        "Configuration is valid (host version {}, FreakOut {})",
        settings.host.version,
        if settings.freakout.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    Ok(merged_toml)
}
