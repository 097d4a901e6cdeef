//! File-based configuration (YAML)
//!
//! The user-level file lives at `<config_dir>/multimodel/config.yaml`
//! (`~/.config` on Linux, `~/Library/Application Support` on macOS).

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::settings::RouterSettings;

/// A YAML settings file
///
/// # Example
///
/// ```no_run
/// use multimodel_core::config::ConfigFile;
///
/// let settings = ConfigFile::user().read().unwrap_or_default();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The user-level config file
    pub fn user() -> Self {
        Self::new(Self::user_path())
    }

    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("multimodel").join("config.yaml")
    }

    /// Read settings from `path`
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<RouterSettings> {
        Self::new(path).read()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the file; a missing file yields the defaults
    pub fn read(&self) -> ConfigResult<RouterSettings> {
        if !self.path.exists() {
            return Ok(RouterSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RouterSettings::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write settings, creating parent directories as needed
    pub fn save(&self, settings: &RouterSettings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderEndpoints;
    use crate::types::{ProviderId, RequestShape};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = ConfigFile::load(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(settings, RouterSettings::default());
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
request_timeout_secs: 45
endpoints:
  openai: http://127.0.0.1:8080/v1
catalog:
  gemini:
    default: gemini-2.5-flash
    fallback_shape: chat
    models:
      - id: gemini-2.5-flash
        shape: chat
"#,
        )
        .unwrap();

        let settings = ConfigFile::load(&path).unwrap();
        assert_eq!(settings.request_timeout_secs, Some(45));
        assert_eq!(settings.endpoints.openai, "http://127.0.0.1:8080/v1");
        assert_eq!(settings.catalog.default_model(ProviderId::Google), "gemini-2.5-flash");
        assert_eq!(
            settings.catalog.shape_for(ProviderId::OpenAi, "gpt-5.2-pro-2025-12-11"),
            RequestShape::Responses
        );
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "endpoints: [not, a, map").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("nested").join("config.yaml"));
        assert!(!file.exists());

        let settings = RouterSettings::default()
            .with_endpoints(ProviderEndpoints::all("http://localhost:1234"))
            .with_request_timeout_secs(10);
        file.save(&settings).unwrap();

        assert!(file.exists());
        assert_eq!(file.read().unwrap(), settings);
    }

    #[test]
    fn test_user_path() {
        let path = ConfigFile::user_path();
        assert!(path.ends_with("multimodel/config.yaml"));
    }
}
