//! Clients and session shared by every command.

use std::path::Path;

use water_map_app::login::restore_session;
use water_map_app::services::AddressGeocoder;
use water_map_auth::{AuthGate, FileStore, Session};
use water_map_cli_utils::MultiProgress;
use water_map_config::{Config, ConfigError};
use water_map_geocoder::opencage::GeocoderClient;
use water_map_water_manager::WaterManagerClient;

use crate::notifier::ConsoleNotifier;

/// Everything a command needs, built once at startup.
pub struct Context {
    /// Resolved configuration.
    pub config: Config,
    /// Spinner container shared with the logger.
    pub multi: MultiProgress,
    /// Where flow notifications are printed.
    pub notifier: ConsoleNotifier,
    /// Login client backed by the on-disk token store.
    pub gate: AuthGate<FileStore>,
    /// Current session; replaced on login and logout.
    pub session: Session,
    /// Data service client.
    pub points: WaterManagerClient,
    /// `None` when no geocoder API key is configured.
    geocoder: Option<GeocoderClient>,
}

impl Context {
    /// Loads configuration and restores the persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded.
    pub fn load(config_path: Option<&Path>, multi: MultiProgress) -> Result<Self, ConfigError> {
        let config = Config::load(config_path)?;

        let gate = AuthGate::new(&config.auth, FileStore::new(config.storage_path()));
        let session = restore_session(&gate);

        let geocoder = match GeocoderClient::new(&config.geocoder) {
            Ok(client) => Some(client),
            Err(e) => {
                log::debug!("Address lookup disabled: {e}");
                None
            }
        };

        log::debug!(
            "Using data service {} and login service {}",
            config.water_manager.base_url,
            config.auth.base_url
        );

        Ok(Self {
            points: WaterManagerClient::new(&config.water_manager),
            notifier: ConsoleNotifier::new(multi.clone()),
            config,
            multi,
            gate,
            session,
            geocoder,
        })
    }

    /// The address geocoder, if one is configured.
    pub fn geocoder(&self) -> Option<&dyn AddressGeocoder> {
        self.geocoder.as_ref().map(|g| g as &dyn AddressGeocoder)
    }
}
