//! API configuration.

use twinveil_core::error::{Result, TwinveilError};
use twinveil_crypto::ViewTagScheme;

/// Environment variable selecting the view tag scheme.
pub const ENV_VIEW_TAG_SCHEME: &str = "TWINVEIL_VIEW_TAG_SCHEME";
/// Environment variable toggling parallel scans.
pub const ENV_PARALLEL_SCAN: &str = "TWINVEIL_PARALLEL_SCAN";
/// Environment variable toggling `r` in send responses.
pub const ENV_EXPOSE_EPHEMERAL: &str = "TWINVEIL_EXPOSE_EPHEMERAL";

/// Settings shared by every operation.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// View tag scheme for sending and scanning
    pub view_tag_scheme: ViewTagScheme,
    /// Whether scans run on the rayon pool
    pub parallel_scan: bool,
    /// Whether send responses include the ephemeral scalar `r`
    pub expose_ephemeral: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            view_tag_scheme: ViewTagScheme::default(),
            parallel_scan: true,
            expose_ephemeral: true,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from the environment, loading `.env` first.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparseable view tag scheme.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let view_tag_scheme = match lookup(ENV_VIEW_TAG_SCHEME) {
            Some(name) => name.parse().map_err(|e: TwinveilError| {
                TwinveilError::ConfigError(format!("{}: {}", ENV_VIEW_TAG_SCHEME, e))
            })?,
            None => defaults.view_tag_scheme,
        };

        Ok(Self {
            view_tag_scheme,
            parallel_scan: flag(lookup(ENV_PARALLEL_SCAN), ENV_PARALLEL_SCAN, defaults.parallel_scan)?,
            expose_ephemeral: flag(
                lookup(ENV_EXPOSE_EPHEMERAL),
                ENV_EXPOSE_EPHEMERAL,
                defaults.expose_ephemeral,
            )?,
        })
    }

    /// Sets the view tag scheme.
    pub fn with_view_tag_scheme(mut self, scheme: ViewTagScheme) -> Self {
        self.view_tag_scheme = scheme;
        self
    }

    /// Enables or disables parallel scans.
    pub fn with_parallel_scan(mut self, parallel: bool) -> Self {
        self.parallel_scan = parallel;
        self
    }

    /// Enables or disables `r` in send responses.
    pub fn with_expose_ephemeral(mut self, expose: bool) -> Self {
        self.expose_ephemeral = expose;
        self
    }
}

fn flag(value: Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TwinveilError::ConfigError(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.view_tag_scheme, ViewTagScheme::default());
        assert!(config.parallel_scan);
        assert!(config.expose_ephemeral);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            (ENV_VIEW_TAG_SCHEME, "v0-2bytes"),
            (ENV_PARALLEL_SCAN, "false"),
            (ENV_EXPOSE_EPHEMERAL, "0"),
        ]))
        .unwrap();
        assert_eq!(config.view_tag_scheme, ViewTagScheme::Sha256 { len: 2 });
        assert!(!config.parallel_scan);
        assert!(!config.expose_ephemeral);
    }

    #[test]
    fn test_invalid_values() {
        assert!(ApiConfig::from_lookup(lookup(&[(ENV_VIEW_TAG_SCHEME, "v9-1byte")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[(ENV_PARALLEL_SCAN, "maybe")])).is_err());

        let err = ApiConfig::from_lookup(lookup(&[(ENV_VIEW_TAG_SCHEME, "v9-1byte")])).unwrap_err();
        assert!(err.to_string().contains(ENV_VIEW_TAG_SCHEME));
    }

    #[test]
    fn test_builder() {
        let config = ApiConfig::default()
            .with_view_tag_scheme(ViewTagScheme::Disabled)
            .with_parallel_scan(false)
            .with_expose_ephemeral(false);
        assert_eq!(config.view_tag_scheme, ViewTagScheme::Disabled);
        assert!(!config.parallel_scan);
        assert!(!config.expose_ephemeral);
    }
}
