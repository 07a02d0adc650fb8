// File: ./src/config.rs
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "TODO_DECK_CONFIG";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_prefix: String,
    pub allow_insecure_certs: bool,
    pub request_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            allow_insecure_certs: false,
            request_timeout_secs: 10,
            log_file: None,
        }
    }
}

impl Config {
    /// `$TODO_DECK_CONFIG` wins over the platform config directory.
    pub fn get_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "todo-deck", "todo-deck")
            .map(|proj| proj.config_dir().join("config.toml"))
    }

    /// Missing file means defaults; a file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// First run: leave an editable file with the defaults. Returns whether it wrote one.
    pub fn write_default_if_missing(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Atomic write: write to .tmp file then rename
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Applies the positional `<URL>` argument, if any.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(url) = args.into_iter().find(|a| !a.starts_with('-')) {
            self.base_url = url;
        }
        self
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.log_file {
            return Some(path.clone());
        }
        let proj = ProjectDirs::from("com", "todo-deck", "todo-deck")?;
        let data_dir = proj.data_dir();
        if !data_dir.exists() {
            let _ = fs::create_dir_all(data_dir);
        }
        Some(data_dir.join("todo-deck.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(r#"base_url = "https://todo.example.org""#).unwrap();
        assert_eq!(cfg.base_url, "https://todo.example.org");
        assert_eq!(cfg.api_prefix, "/api");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(!cfg.allow_insecure_certs);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            base_url: "http://10.0.0.2:3001".to_string(),
            allow_insecure_certs: true,
            log_file: Some(PathBuf::from("/tmp/deck.log")),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn default_file_is_written_once_and_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::write_default_if_missing(&path).unwrap());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        fs::write(&path, r#"base_url = "http://other:1""#).unwrap();
        assert!(!Config::write_default_if_missing(&path).unwrap());
        assert_eq!(Config::load_from(&path).unwrap().base_url, "http://other:1");
    }

    #[test]
    fn positional_argument_overrides_base_url() {
        let cfg = Config::default().with_args(vec![
            "--verbose".to_string(),
            "http://lists.local:8080".to_string(),
        ]);
        assert_eq!(cfg.base_url, "http://lists.local:8080");

        let untouched = Config::default().with_args(Vec::new());
        assert_eq!(untouched.base_url, DEFAULT_BASE_URL);
    }
}
