use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Remote backend configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct BackendConfig {
    /// Base URL of the REST backend (e.g., "https://xyz.supabase.co")
    pub url: ConfigValue<Option<String>>,
    /// Access key sent with every request; never printed
    #[serde(skip_serializing)]
    pub api_key: ConfigValue<Option<String>>,
    /// Per-request timeout in seconds
    pub timeout_secs: ConfigValue<u64>,
    /// Upper bound on parallel list-item and pet-record fetches
    pub max_concurrent_fetches: ConfigValue<usize>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: ConfigValue::new(None, ConfigSource::Default),
            api_key: ConfigValue::new(None, ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            max_concurrent_fetches: ConfigValue::new(
                DEFAULT_MAX_CONCURRENT_FETCHES,
                ConfigSource::Default,
            ),
        }
    }
}

impl BackendConfig {
    /// Returns true if both url and api_key are set and non-blank
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.url.value) && present(&self.api_key.value)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.value.max(1))
    }

    /// Overlays the values set in the config file.
    fn apply_file(&mut self, file: BackendFile) {
        if let Some(url) = non_blank(file.url) {
            self.url = ConfigValue::new(Some(url), ConfigSource::File);
        }
        if let Some(key) = non_blank(file.api_key) {
            self.api_key = ConfigValue::new(Some(key), ConfigSource::File);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = ConfigValue::new(secs, ConfigSource::File);
        }
        if let Some(limit) = file.max_concurrent_fetches {
            self.max_concurrent_fetches = ConfigValue::new(limit, ConfigSource::File);
        }
    }

    /// Overlays url and api_key from the environment. Blank variables are
    /// ignored so they cannot unset a value from the file.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = first_set(&URL_VARS, &lookup) {
            self.url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }
        if let Some(key) = first_set(&KEY_VARS, &lookup) {
            self.api_key = ConfigValue::new(Some(key), ConfigSource::Environment);
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the persisted stores
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Backend configuration
    pub backend: BackendConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    backend: Option<BackendFile>,
}

/// Backend section of the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BackendFile {
    url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    max_concurrent_fetches: Option<usize>,
}

/// Environment variables, highest priority first within each group.
const URL_VARS: [&str; 2] = ["FAMAGENDA_BACKEND_URL", "EXPO_PUBLIC_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["FAMAGENDA_BACKEND_KEY", "EXPO_PUBLIC_SUPABASE_KEY"];

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// First variable in `names` that is set to a non-blank value.
fn first_set(names: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    names.iter().find_map(|name| non_blank(lookup(name)))
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut config_file = None;
        let mut backend = BackendConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(backend_file) = file_config.backend {
                backend.apply_file(backend_file);
            }
        }

        if let Some(dir) = non_blank(std::env::var("FAMAGENDA_DATA_DIR").ok()) {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        backend.apply_env(|name| std::env::var(name).ok());

        Ok(Self {
            data_dir,
            config_file,
            backend,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/famagenda/
    /// - macOS: ~/Library/Application Support/famagenda/
    /// - Windows: %APPDATA%/famagenda/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famagenda")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/famagenda/
    /// - macOS: ~/Library/Application Support/famagenda/
    /// - Windows: %APPDATA%/famagenda/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famagenda")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.data_dir.value.ends_with("famagenda"));
        assert!(config.config_file.is_none());
        assert_eq!(config.backend.timeout_secs.value, 15);
        assert_eq!(config.backend.timeout_secs.source, ConfigSource::Default);
        assert_eq!(config.backend.max_concurrent_fetches.value, 4);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /custom/famagenda").unwrap();
        writeln!(file, "backend:").unwrap();
        writeln!(file, "  timeout_secs: 5").unwrap();
        writeln!(file, "  max_concurrent_fetches: 2").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/custom/famagenda"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.backend.timeout_secs.source, ConfigSource::File);
        assert_eq!(config.backend.max_concurrent_fetches.value, 2);
        assert_eq!(config.backend.max_concurrent_fetches.source, ConfigSource::File);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_backend_sources_tracked() {
        let mut backend = BackendConfig::default();
        backend.apply_file(BackendFile {
            url: Some("https://file.example.com".to_string()),
            api_key: Some("file-key".to_string()),
            ..Default::default()
        });
        assert_eq!(backend.url.source, ConfigSource::File);
        assert_eq!(backend.api_key.source, ConfigSource::File);
        assert_eq!(backend.timeout_secs.source, ConfigSource::Default);

        backend.apply_env(|name| match name {
            "EXPO_PUBLIC_SUPABASE_KEY" => Some("env-key".to_string()),
            _ => None,
        });
        assert_eq!(backend.url.value.as_deref(), Some("https://file.example.com"));
        assert_eq!(backend.url.source, ConfigSource::File);
        assert_eq!(backend.api_key.value.as_deref(), Some("env-key"));
        assert_eq!(backend.api_key.source, ConfigSource::Environment);
    }

    #[test]
    fn test_blank_env_does_not_override_file() {
        let mut backend = BackendConfig::default();
        backend.apply_file(BackendFile {
            url: Some("https://file.example.com".to_string()),
            api_key: Some("file-key".to_string()),
            ..Default::default()
        });

        backend.apply_env(|name| match name {
            "FAMAGENDA_BACKEND_URL" => Some(String::new()),
            "FAMAGENDA_BACKEND_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(backend.url.value.as_deref(), Some("https://file.example.com"));
        assert_eq!(backend.api_key.value.as_deref(), Some("file-key"));
        assert!(backend.is_configured());
    }

    #[test]
    fn test_blank_env_falls_through_to_next_variable() {
        let lookup = |name: &str| match name {
            "FAMAGENDA_BACKEND_URL" => Some(" ".to_string()),
            "EXPO_PUBLIC_SUPABASE_URL" => Some("https://expo.example.com".to_string()),
            _ => None,
        };
        assert_eq!(
            first_set(&URL_VARS, lookup).as_deref(),
            Some("https://expo.example.com")
        );
        assert_eq!(first_set(&KEY_VARS, |_| None), None);
    }

    #[test]
    fn test_blank_file_values_are_unset() {
        let mut backend = BackendConfig::default();
        backend.apply_file(BackendFile {
            url: Some("  ".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        });

        assert_eq!(backend.url.value, None);
        assert_eq!(backend.url.source, ConfigSource::Default);
        assert_eq!(backend.api_key.source, ConfigSource::File);
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "data_dir: state\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("state"));
    }

    #[test]
    fn test_backend_is_configured() {
        let mut backend = BackendConfig::default();
        assert!(!backend.is_configured());

        backend.url.value = Some("https://db.example.com".to_string());
        assert!(!backend.is_configured());

        backend.api_key.value = Some("  ".to_string());
        assert!(!backend.is_configured());

        backend.api_key.value = Some("key".to_string());
        assert!(backend.is_configured());
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "backend:\n  url: https://file.example.com\n").unwrap();

        std::env::set_var("EXPO_PUBLIC_SUPABASE_URL", "https://expo.example.com");
        std::env::set_var("FAMAGENDA_BACKEND_URL", "https://env.example.com");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.backend.url.value.as_deref(),
            Some("https://env.example.com")
        );
        assert_eq!(config.backend.url.source, ConfigSource::Environment);

        std::env::remove_var("FAMAGENDA_BACKEND_URL");
        std::env::remove_var("EXPO_PUBLIC_SUPABASE_URL");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
