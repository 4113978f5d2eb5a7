//! Configuration resolution for amr-enrich
//!
//! Turns the bootstrap [`TomlConfig`] into client settings and the country
//! code table. Credentials resolve with ENV → TOML priority.

use crate::musicbrainz_client::{ClientSettings, Credentials};
use crate::query_builder::CountryCodeTable;
use amr_common::config::{is_valid_value, MusicBrainzConfig, TomlConfig};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable for the MusicBrainz account name
pub const USERNAME_ENV_VAR: &str = "AMR_MB_USERNAME";

/// Environment variable for the MusicBrainz account password
pub const PASSWORD_ENV_VAR: &str = "AMR_MB_PASSWORD";

/// Resolve MusicBrainz credentials
///
/// **Priority:** ENV → TOML. A source only counts when it supplies both a
/// valid username and a valid password.
pub fn resolve_credentials(config: &MusicBrainzConfig) -> Option<Credentials> {
    let env_creds = credentials_from(
        std::env::var(USERNAME_ENV_VAR).ok(),
        std::env::var(PASSWORD_ENV_VAR).ok(),
    );
    let toml_creds = credentials_from(config.username.clone(), config.password.clone());

    if env_creds.is_some() && toml_creds.is_some() {
        warn!("MusicBrainz credentials found in environment and TOML. Using environment.");
    }

    if let Some(creds) = env_creds {
        info!("MusicBrainz credentials loaded from environment");
        return Some(creds);
    }

    if let Some(creds) = toml_creds {
        info!("MusicBrainz credentials loaded from TOML config");
        return Some(creds);
    }

    None
}

fn credentials_from(username: Option<String>, password: Option<String>) -> Option<Credentials> {
    match (username, password) {
        (Some(username), Some(password)) if is_valid_value(&username) && is_valid_value(&password) => {
            Some(Credentials { username, password })
        }
        _ => None,
    }
}

/// Client settings from configuration
pub fn client_settings(config: &TomlConfig) -> ClientSettings {
    let mb = &config.musicbrainz;
    ClientSettings {
        base_url: mb.base_url.clone(),
        app_name: mb.app_name.clone(),
        credentials: resolve_credentials(mb),
        timeout: Duration::from_secs(mb.timeout_secs),
    }
}

/// Country code table from configuration
pub fn country_table(config: &TomlConfig) -> CountryCodeTable {
    CountryCodeTable::from_config(&config.countries)
}
