use crate::common::CohoError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::debug;
use validator::Validate;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "COHO_CONFIG";

/// File name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".coho.yml";

/// Config store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Config file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Config file read failed: {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing failed in {path}: {source}")]
    YamlParsingFailed {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Config validation failed: {0}")]
    ValidationFailed(#[from] validator::ValidationErrors),
}

impl From<ConfigStoreError> for CohoError {
    fn from(err: ConfigStoreError) -> Self {
        CohoError::config_error_with_source(err.to_string(), err)
    }
}

/// ユーザー設定（`~/.coho.yml`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CohoConfig {
    /// GitHub APIのトークン（`GITHUB_TOKEN` が優先される）
    #[validate(length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// ライセンス監査から除外するパスのglobパターン（`*`、`**`、`?`、`[...]`）
    pub license_excludes: Vec<String>,
}

impl CohoConfig {
    /// Token from the environment, falling back to the config file.
    pub fn github_token_with_env(&self, env_token: Option<String>) -> Option<String> {
        env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.github_token.clone())
    }
}

/// Loads [`CohoConfig`] from YAML.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    explicit_path: Option<PathBuf>,
    home_dir: Option<PathBuf>,
}

impl ConfigStore {
    /// Store resolving `--config` (or `$COHO_CONFIG`), then `~/.coho.yml`.
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            explicit_path,
            home_dir: dirs::home_dir(),
        }
    }

    /// Override the home directory used for the default location.
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    /// Path of the config file and whether it was requested explicitly.
    pub fn config_path(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.explicit_path {
            return Some((path.clone(), true));
        }
        self.home_dir
            .as_ref()
            .map(|home| (home.join(CONFIG_FILE_NAME), false))
    }

    /// Read the config. A missing default file yields the default config; a
    /// missing explicitly named file is an error.
    pub async fn load(&self) -> Result<CohoConfig, ConfigStoreError> {
        let Some((path, explicit)) = self.config_path() else {
            return Ok(CohoConfig::default());
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigStoreError::ConfigFileNotFound(
                    path.display().to_string(),
                ));
            }
            debug!(path = %path.display(), "no config file");
            return Ok(CohoConfig::default());
        }

        Self::load_from(&path).await
    }

    /// Parse and validate one YAML file.
    pub async fn load_from(path: &Path) -> Result<CohoConfig, ConfigStoreError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|source| ConfigStoreError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;

        // 空ファイルはデフォルト設定として扱う
        if content.trim().is_empty() {
            return Ok(CohoConfig::default());
        }

        let config: CohoConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigStoreError::YamlParsingFailed {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_default_location() {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join(CONFIG_FILE_NAME),
            "github_token: abc123\nlicense_excludes:\n  - \"*.min.js\"\n  - vendor/*\n",
        )
        .unwrap();

        let config = ConfigStore::new(None)
            .with_home_dir(home.path())
            .load()
            .await
            .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("abc123"));
        assert_eq!(config.license_excludes, vec!["*.min.js", "vendor/*"]);
    }

    #[tokio::test]
    async fn test_missing_default_file_is_empty_config() {
        let home = TempDir::new().unwrap();
        let config = ConfigStore::new(None)
            .with_home_dir(home.path())
            .load()
            .await
            .unwrap();
        assert_eq!(config, CohoConfig::default());
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigStore::new(Some(temp_dir.path().join("nope.yml")))
            .load()
            .await;
        assert!(matches!(result, Err(ConfigStoreError::ConfigFileNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coho.yml");

        std::fs::write(&path, "github_token: \"\"\n").unwrap();
        let result = ConfigStore::load_from(&path).await;
        assert!(matches!(result, Err(ConfigStoreError::ValidationFailed(_))));

        std::fs::write(&path, "license_excludes: [unterminated\n").unwrap();
        let result = ConfigStore::load_from(&path).await;
        assert!(matches!(result, Err(ConfigStoreError::YamlParsingFailed { .. })));
    }

    #[tokio::test]
    async fn test_unknown_keys_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coho.yml");
        std::fs::write(&path, "apache_username: someone\nlicense_excludes: [\"*.map\"]\n").unwrap();

        let config = ConfigStore::load_from(&path).await.unwrap();
        assert_eq!(config.license_excludes, vec!["*.map"]);
    }

    #[test]
    fn test_env_token_wins() {
        let config = CohoConfig {
            github_token: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.github_token_with_env(Some("from-env".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(
            config.github_token_with_env(Some("  ".to_string())),
            Some("from-file".to_string())
        );
        assert_eq!(config.github_token_with_env(None), Some("from-file".to_string()));
    }
}
