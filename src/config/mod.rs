//! Configuration management for orgform

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::Credentials;
use crate::error::{ConfigError, Result};

/// Region used when nothing else is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AWS region; selects the Organizations partition endpoint
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom Organizations endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Static AWS credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    /// Directory holding the state database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            credentials: None,
            state_dir: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".orgform").join("config.yaml"))
    }

    /// Resolve the config file path, preferring an explicit override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    ///
    /// Credentials may come entirely from the environment, so a missing file
    /// is not an error here.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        match Self::load_from(&path) {
            Ok(config) => Ok(config),
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Credentials live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Save configuration to the resolved path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Credentials from the environment replace file credentials only when
    /// both the access key and the secret are present.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")) {
            self.region = region;
        }

        if let Some(endpoint) = non_empty("ORGFORM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let (Some(access_key_id), Some(secret_access_key)) = (
            non_empty("AWS_ACCESS_KEY_ID"),
            non_empty("AWS_SECRET_ACCESS_KEY"),
        ) {
            self.credentials = Some(Credentials {
                access_key_id,
                secret_access_key,
                session_token: non_empty("AWS_SESSION_TOKEN"),
            });
        }
    }

    /// Credentials for signing requests
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials
            .clone()
            .ok_or_else(|| ConfigError::MissingCredentials.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint.is_none());
        assert!(config.credentials.is_none());
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_env_credentials_override_file() {
        let mut config = Config {
            credentials: Some(Credentials {
                access_key_id: "FILEKEY".to_string(),
                secret_access_key: "filesecret".to_string(),
                session_token: None,
            }),
            ..Config::default()
        };

        config.apply_env_with(env(&[
            ("AWS_ACCESS_KEY_ID", "ENVKEY"),
            ("AWS_SECRET_ACCESS_KEY", "envsecret"),
            ("AWS_SESSION_TOKEN", "token"),
            ("AWS_DEFAULT_REGION", "eu-central-1"),
        ]));

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.access_key_id, "ENVKEY");
        assert_eq!(credentials.session_token.as_deref(), Some("token"));
        assert_eq!(config.region, "eu-central-1");
    }

    #[test]
    fn test_partial_env_credentials_are_ignored() {
        let mut config = Config::default();
        config.apply_env_with(env(&[("AWS_ACCESS_KEY_ID", "ENVKEY")]));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_aws_region_wins_over_default_region() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            ("AWS_REGION", "us-gov-west-1"),
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("ORGFORM_ENDPOINT", "http://localhost:4566"),
        ]));
        assert_eq!(config.region, "us-gov-west-1");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_load_at_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let config = Config::load_at(path.to_str()).unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            region: "eu-west-1".to_string(),
            credentials: Some(Credentials {
                access_key_id: "AKIDTEST".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: None,
            }),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.region, "eu-west-1");
        assert_eq!(loaded.credentials, config.credentials);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "region: [unterminated").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(crate::error::Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
