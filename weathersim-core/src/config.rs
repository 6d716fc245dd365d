use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Backend the Flask demo listens on by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the configured backend URL.
pub const BASE_URL_ENV: &str = "WEATHERSIM_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://127.0.0.1:5000"
/// default_city = "London"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Root URL of the simulation backend.
    pub base_url: Option<String>,

    /// City used when none is given on the command line.
    pub default_city: Option<String>,
}

impl Config {
    /// Backend URL to use: explicit override, then env var, then config, then the default.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> String {
        let env_url = env::var(BASE_URL_ENV).ok();
        self.resolve_base_url_with(override_url, env_url.as_deref())
    }

    fn resolve_base_url_with(&self, override_url: Option<&str>, env_url: Option<&str>) -> String {
        let chosen = [override_url, env_url, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        chosen.trim_end_matches('/').to_string()
    }

    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = Some(url.trim().trim_end_matches('/').to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Like [`Config::load`], but an unreadable or malformed file yields the
    /// default instead of an error, so the file can be rewritten.
    pub fn load_or_default() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(err) => {
                warn!(error = %err, "using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            warn!("ignoring unusable config file: {err:#}");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathersim", "weathersim")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_url() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_base_url_with(None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn override_beats_env_beats_file() {
        let cfg = Config { base_url: Some("http://file:1".into()), default_city: None };

        assert_eq!(
            cfg.resolve_base_url_with(Some("http://flag:3/"), Some("http://env:2")),
            "http://flag:3"
        );
        assert_eq!(cfg.resolve_base_url_with(None, Some("http://env:2")), "http://env:2");
        assert_eq!(cfg.resolve_base_url_with(None, None), "http://file:1");
    }

    #[test]
    fn blank_values_are_skipped() {
        let cfg = Config { base_url: Some("   ".into()), default_city: None };
        assert_eq!(cfg.resolve_base_url_with(Some(""), None), DEFAULT_BASE_URL);
    }

    #[test]
    fn set_base_url_strips_trailing_slash() {
        let mut cfg = Config::default();
        cfg.set_base_url(" http://sim.local:8080/ ");
        assert_eq!(cfg.base_url.as_deref(), Some("http://sim.local:8080"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_base_url("http://sim.local:8080");
        cfg.default_city = Some("Oslo".into());
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_can_be_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();

        let mut cfg = Config::load_or_default_from(&path);
        assert_eq!(cfg, Config::default());

        cfg.set_base_url("http://sim.local:8080");
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
