//! Layered configuration: defaults, overridden by a YAML file, overridden
//! by `REGISTRY_`-prefixed environment variables.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Master switch: when false every handler short-circuits to
    /// `{"status":"disabled"}`.
    pub enabled: bool,
    pub hostname: String,
    pub machine_guid: String,
    /// URL handed back to clients in every response body under the
    /// `registry` key, and used as the redirect target during cookie
    /// probing.
    pub registry_to_announce: String,
    pub registry_domain: Option<String>,
    pub persons_expiration_secs: u64,
    /// Number of times a client is redirected to verify it accepts
    /// cookies before a real person guid is minted. Zero disables the
    /// probe entirely.
    pub verify_cookies_redirects: u32,
    pub http: HttpConfig,
    pub observability: ObservabilityConfig,
    pub persistence: PersistenceConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hostname: default_hostname(),
            machine_guid: crate::guid::generate(),
            registry_to_announce: "http://localhost:19999".to_string(),
            registry_domain: None,
            persons_expiration_secs: 86400 * 365,
            verify_cookies_redirects: 1,
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration: defaults, then an optional YAML file, then
    /// environment variables prefixed `REGISTRY_` (double underscore for
    /// nesting, e.g. `REGISTRY_HTTP__ADDR`).
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            if std::path::Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
            } else {
                tracing::warn!(path, "config file not found, using defaults");
            }
        }

        figment = figment.merge(Env::prefixed("REGISTRY_").split("__"));

        Ok(figment.extract()?)
    }
}

fn default_hostname() -> String {
    hostname_fallback()
}

fn hostname_fallback() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:19999".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub push_url: Option<String>,
    pub push_interval_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            push_url: None,
            push_interval_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub path: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_with_no_persistence() {
        let cfg = RegistryConfig::default();
        assert!(cfg.enabled);
        assert!(cfg.persistence.path.is_none());
    }

    #[test]
    fn load_without_file_falls_back_to_defaults() {
        let cfg = RegistryConfig::load(None).expect("load should not fail");
        assert_eq!(cfg.http.addr, "0.0.0.0:19999");
    }

    /// `RegistryConfig` round-trips through plain YAML the way an
    /// operator's config file on disk would be hand-edited and reloaded.
    #[test]
    fn round_trips_through_yaml() {
        let cfg = RegistryConfig::default();
        let yaml = serde_yaml::to_string(&cfg).expect("serialize to yaml");
        let back: RegistryConfig = serde_yaml::from_str(&yaml).expect("parse yaml back");
        assert_eq!(back.hostname, cfg.hostname);
        assert_eq!(back.http.addr, cfg.http.addr);
        assert_eq!(back.persons_expiration_secs, cfg.persons_expiration_secs);
    }
}
