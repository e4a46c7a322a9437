use anyhow::{bail, Result};
use std::net::IpAddr;

use super::settings::Settings;

/// Sanity-checks resolved settings before the server starts.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.application.host.parse::<IpAddr>().is_err() {
        bail!(
            "application.host is not a valid IP address: {:?}",
            settings.application.host
        );
    }
    if settings.application.port == 0 {
        bail!("application.port must be nonzero");
    }
    if settings.site.app_version.is_empty() {
        bail!("site.app_version must not be empty");
    }
    Ok(())
}
