//! OpenTrack settings stored in the `otconfig` YAML configuration
//!
//! ```yaml
//! opentrack:
//!   base_url: https://ot.dms.dealertrack.com
//!   username: service-writer
//!   password: encrypted:...
//!   timeout_secs: 120
//!   transfer_mode: buffered
//! ```

use std::time::Duration;

use anyhow::{Result, anyhow};
use otconfig::Config;
use otconfig::encryption;
use tracing::warn;

use crate::api::{DEFAULT_TIMEOUT, OpenTrackApi};
use crate::error::Result as OpenTrackResult;
use crate::transport::TransferMode;

const SECTION: &str = "opentrack";

/// Extension trait adding the OpenTrack settings to [`otconfig::Config`]
///
/// # Exemple
///
/// ```rust,ignore
/// use opentrack::OpenTrackConfigExt;
///
/// let config = otconfig::get_config()?;
/// let (username, password) = config.get_opentrack_credentials()?;
/// ```
pub trait OpenTrackConfigExt {
    /// Deployment root URL
    ///
    /// # Errors
    ///
    /// Fails when no URL is configured
    fn get_opentrack_base_url(&self) -> Result<String>;

    fn set_opentrack_base_url(&self, url: &str) -> Result<()>;

    /// `(username, password)`, the password decrypted when stored encrypted
    fn get_opentrack_credentials(&self) -> Result<(String, String)>;

    /// Stores the credentials; the password is written encrypted
    fn set_opentrack_credentials(&self, username: &str, password: &str) -> Result<()>;

    /// Send timeout, 120 seconds when not configured
    fn get_opentrack_timeout(&self) -> Duration;

    fn set_opentrack_timeout(&self, timeout: Duration) -> Result<()>;

    /// `buffered` unless configured otherwise
    fn get_opentrack_transfer_mode(&self) -> TransferMode;

    fn set_opentrack_transfer_mode(&self, mode: TransferMode) -> Result<()>;
}

impl OpenTrackConfigExt for Config {
    fn get_opentrack_base_url(&self) -> Result<String> {
        self.get_string(&[SECTION, "base_url"])
            .ok_or_else(|| anyhow!("OpenTrack base URL not configured"))
    }

    fn set_opentrack_base_url(&self, url: &str) -> Result<()> {
        self.set_string(&[SECTION, "base_url"], url)
    }

    fn get_opentrack_credentials(&self) -> Result<(String, String)> {
        let username = self
            .get_string(&[SECTION, "username"])
            .ok_or_else(|| anyhow!("OpenTrack username not configured"))?;
        let stored = self
            .get_string(&[SECTION, "password"])
            .ok_or_else(|| anyhow!("OpenTrack password not configured"))?;

        // Déchiffrement automatique si le mot de passe est chiffré
        let password = encryption::get_password(&stored)
            .map_err(|e| anyhow!("Failed to decrypt OpenTrack password: {}", e))?;
        Ok((username, password))
    }

    fn set_opentrack_credentials(&self, username: &str, password: &str) -> Result<()> {
        let encrypted = encryption::encrypt_password(password)?;
        self.set_string(&[SECTION, "username"], username)?;
        self.set_string(&[SECTION, "password"], &encrypted)
    }

    fn get_opentrack_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64(&[SECTION, "timeout_secs"], DEFAULT_TIMEOUT.as_secs()))
    }

    fn set_opentrack_timeout(&self, timeout: Duration) -> Result<()> {
        self.set_u64(&[SECTION, "timeout_secs"], timeout.as_secs())
    }

    fn get_opentrack_transfer_mode(&self) -> TransferMode {
        match self.get_string(&[SECTION, "transfer_mode"]) {
            Some(mode) => mode.parse().unwrap_or_else(|_| {
                warn!(transfer_mode = %mode, "Unknown transfer mode, using buffered");
                TransferMode::Buffered
            }),
            None => TransferMode::default(),
        }
    }

    fn set_opentrack_transfer_mode(&self, mode: TransferMode) -> Result<()> {
        self.set_string(&[SECTION, "transfer_mode"], &mode.to_string())
    }
}

impl OpenTrackApi {
    /// Builds a session from the `opentrack` configuration section
    pub fn from_config(config: &Config) -> OpenTrackResult<Self> {
        let base_url = config.get_opentrack_base_url()?;
        let (username, password) = config.get_opentrack_credentials()?;

        let mut api = OpenTrackApi::new(&base_url, &username, &password)?;
        api.set_timeout(config.get_opentrack_timeout());
        api.set_transfer_mode(config.get_opentrack_transfer_mode());
        Ok(api)
    }
}
