use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filters::{DEFAULT_MAX_FILTERS, FilterPolicy, OnError};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Filter translation section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FiltersFileConfig {
    pub allowed_keys: Option<Vec<String>>,
    pub strict_operators: Option<bool>,
    pub on_error: Option<OnError>,
    pub max_filters: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub filters: Option<FiltersFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown top-level fields
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str = map.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(filters) = other.filters {
            let current = self.filters.get_or_insert_with(FiltersFileConfig::default);
            if filters.allowed_keys.is_some() {
                tracing::trace!(keys = ?filters.allowed_keys, "Merging filters.allowed_keys");
                current.allowed_keys = filters.allowed_keys;
            }
            if filters.strict_operators.is_some() {
                current.strict_operators = filters.strict_operators;
            }
            if filters.on_error.is_some() {
                current.on_error = filters.on_error;
            }
            if filters.max_filters.is_some() {
                current.max_filters = filters.max_filters;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Filter translation configuration
#[derive(Debug, Clone)]
pub struct FiltersConfig {
    pub allowed_keys: Option<Vec<String>>,
    pub strict_operators: bool,
    pub on_error: OnError,
    pub max_filters: usize,
}

impl FiltersConfig {
    /// Policy applied to every translated filter set
    pub fn policy(&self) -> FilterPolicy {
        FilterPolicy {
            allowed_keys: self.allowed_keys.clone(),
            strict_operators: self.strict_operators,
            on_error: self.on_error,
            max_filters: self.max_filters,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub filters: FiltersConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.qfilter/qfilter.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_server = file_config.server.unwrap_or_default();
        let file_filters = file_config.filters.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // allowed_keys is file-only; an empty list means "no keys allowed"
        let filters = FiltersConfig {
            allowed_keys: file_filters.allowed_keys,
            strict_operators: cli
                .strict_operators
                .or(file_filters.strict_operators)
                .unwrap_or(true),
            on_error: cli.on_error.or(file_filters.on_error).unwrap_or_default(),
            max_filters: cli
                .max_filters
                .or(file_filters.max_filters)
                .unwrap_or(DEFAULT_MAX_FILTERS),
        };

        let config = Self {
            server: ServerConfig { host, port },
            filters,
        };
        config.validate()?;

        if is_all_interfaces(&config.server.host) {
            tracing::warn!(
                host = %config.server.host,
                "Server is listening on all interfaces"
            );
        }

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.filters.max_filters == 0 {
            anyhow::bail!("Configuration error: filters.max_filters must be greater than 0");
        }
        if let Some(keys) = &self.filters.allowed_keys
            && keys.iter().any(|k| k.trim().is_empty())
        {
            anyhow::bail!("Configuration error: filters.allowed_keys must not contain empty keys");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.qfilter/qfilter.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn cli_with(file: &tempfile::NamedTempFile) -> CliConfig {
        CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "filters": {
                "allowed_keys": ["age", "name"],
                "strict_operators": false,
                "on_error": "skip",
                "max_filters": 10
            }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));

        let filters = config.filters.as_ref().unwrap();
        assert_eq!(
            filters.allowed_keys,
            Some(vec!["age".to_string(), "name".to_string()])
        );
        assert_eq!(filters.strict_operators, Some(false));
        assert_eq!(filters.on_error, Some(OnError::Skip));
        assert_eq!(filters.max_filters, Some(10));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.filters.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "port": 1 }, "filtres": {} }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert!(config.extra.get("filtres").is_some());
        assert!(config.filters.is_none());
    }

    #[test]
    fn test_file_config_rejects_bad_on_error() {
        let json = r#"{ "filters": { "on_error": "ignore" } }"#;
        assert!(serde_json::from_str::<FileConfig>(json).is_err());
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            server: Some(ServerFileConfig {
                host: Some("base.host".to_string()),
                port: Some(1000),
            }),
            filters: Some(FiltersFileConfig {
                allowed_keys: Some(vec!["a".to_string()]),
                max_filters: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = FileConfig {
            server: Some(ServerFileConfig {
                host: None,
                port: Some(2000),
            }),
            filters: Some(FiltersFileConfig {
                on_error: Some(OnError::Skip),
                ..Default::default()
            }),
            ..Default::default()
        };
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));

        let filters = base.filters.unwrap();
        assert_eq!(filters.allowed_keys, Some(vec!["a".to_string()]));
        assert_eq!(filters.max_filters, Some(5));
        assert_eq!(filters.on_error, Some(OnError::Skip));
    }

    #[test]
    fn test_app_config_from_file() {
        let file = write_config(
            r#"{
                "server": { "port": 7000 },
                "filters": { "allowed_keys": ["age"], "on_error": "skip", "max_filters": 3 }
            }"#,
        );
        let config = AppConfig::load(&cli_with(&file)).unwrap();

        assert_eq!(config.server.port, 7000);
        let policy = config.filters.policy();
        assert_eq!(policy.allowed_keys, Some(vec!["age".to_string()]));
        assert_eq!(policy.on_error, OnError::Skip);
        assert_eq!(policy.max_filters, 3);
        assert!(policy.strict_operators);
    }

    #[test]
    fn test_app_config_cli_overrides_file() {
        let file = write_config(
            r#"{ "server": { "host": "file.host", "port": 7000 }, "filters": { "max_filters": 3 } }"#,
        );
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            max_filters: Some(9),
            strict_operators: Some(false),
            ..cli_with(&file)
        };
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.filters.max_filters, 9);
        assert!(!config.filters.strict_operators);
    }

    #[test]
    fn test_app_config_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/qfilter.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_app_config_invalid_json() {
        let file = write_config("{ not json");
        let err = AppConfig::load(&cli_with(&file)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_app_config_validation_port_zero() {
        let file = write_config("{}");
        let cli = CliConfig {
            port: Some(0),
            ..cli_with(&file)
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("server.port must be greater than 0"));
    }

    #[test]
    fn test_app_config_validation_empty_host() {
        let file = write_config("{}");
        let cli = CliConfig {
            host: Some(String::new()),
            ..cli_with(&file)
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("server.host must not be empty"));
    }

    #[test]
    fn test_app_config_validation_max_filters_zero() {
        let file = write_config(r#"{ "filters": { "max_filters": 0 } }"#);
        let err = AppConfig::load(&cli_with(&file)).unwrap_err();
        assert!(err.to_string().contains("filters.max_filters"));
    }

    #[test]
    fn test_app_config_validation_empty_allowed_key() {
        let file = write_config(r#"{ "filters": { "allowed_keys": ["age", " "] } }"#);
        let err = AppConfig::load(&cli_with(&file)).unwrap_err();
        assert!(err.to_string().contains("filters.allowed_keys"));
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
