use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,
    #[serde(default = "default_cors_methods")]
    pub cors_allow_methods: String,
    #[serde(default = "default_cors_headers")]
    pub cors_allow_headers: String,
}

// Default functions for CORS settings
fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_cors_methods() -> String {
    "GET, OPTIONS".to_string()
}

fn default_cors_headers() -> String {
    "Content-Type".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteSettings {
    #[serde(default = "default_app_version")]
    pub app_version: String,
}

fn default_app_version() -> String {
    "1.0".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(Environment::default().separator("__"))
            // Add default values for critical settings
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("site.app_version", "1.0")?
            // APP_VERSION wins over the file and the default
            .set_override_option("site.app_version", app_version_from_env())?
            .build()?;

        config.try_deserialize()
    }
}

/// An empty `APP_VERSION` counts as unset.
fn app_version_from_env() -> Option<String> {
    env::var("APP_VERSION").ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the APP_VERSION manipulation never races a
    // concurrent Settings::new() in another test.
    #[test]
    fn app_version_fallback_and_override() {
        env::remove_var("APP_VERSION");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.site.app_version, "1.0");
        assert_eq!(settings.application.port, 8080);

        env::set_var("APP_VERSION", "");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.site.app_version, "1.0");

        env::set_var("APP_VERSION", "2.3.0");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.site.app_version, "2.3.0");

        env::remove_var("APP_VERSION");
    }
}
