//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file, then applies the
//! `DB_HOST`, `DB_USER`, `DB_PASSWORD` and `DB_NAME` environment overrides.
//! Every field has a default matching the compose deployment this service
//! ships in, so the file itself is optional and the service can run from
//! environment alone.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Message page - the row can change in the database at any time, keep it short
pub const HTTP_CACHE_MESSAGE_MAX_AGE: u32 = 5;

pub const CACHE_CONTROL_MESSAGE: &str =
    formatcp!("public, max-age={}", HTTP_CACHE_MESSAGE_MAX_AGE);

// =============================================================================
// Database Readiness
// =============================================================================

/// Delay in seconds between readiness probe attempts
pub const DB_READY_RETRY_SECS: u64 = 2;

/// Body shown when the `mensajes` table holds no row
pub const FALLBACK_MESSAGE: &str = "Mensaje no encontrado";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "letrero=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }
}

/// Database connection settings.
///
/// Defaults mirror the compose deployment this service ships in: a `db`
/// container with a root account and a `holamundo` schema.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_user")]
    pub user: String,
    #[serde(default = "DatabaseConfig::default_password")]
    pub password: String,
    /// Database (schema) name
    #[serde(default = "DatabaseConfig::default_name")]
    pub name: String,
    /// Maximum pool size (default: 5)
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            user: Self::default_user(),
            password: Self::default_password(),
            name: Self::default_name(),
            max_connections: Self::default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    fn default_host() -> String {
        "db".to_string()
    }

    fn default_user() -> String {
        "root".to_string()
    }

    fn default_password() -> String {
        "root".to_string()
    }

    fn default_name() -> String {
        "holamundo".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }
}

/// Presentation of the message page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    /// Message interpolated into the `index.html` template
    Html,
    /// Raw message text as the response body
    Text,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Site title shown in the page header and title
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    #[serde(default = "UiConfig::default_format")]
    pub format: PageFormat,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            format: Self::default_format(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        "Hola Mundo".to_string()
    }

    fn default_format() -> PageFormat {
        PageFormat::Html
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and apply environment overrides.
    ///
    /// A missing file is not an error: defaults cover every field so a
    /// container can be configured through `DB_*` variables alone.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply the `DB_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = get("DB_HOST") {
            self.database.host = host;
        }
        if let Some(user) = get("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = get("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = get("DB_NAME") {
            self.database.name = name;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_compose_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.password, "root");
        assert_eq!(config.database.name, "holamundo");
        assert_eq!(config.ui.format, PageFormat::Html);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(
            file,
            r#"
            [http]
            port = 80

            [database]
            host = "localhost"
            name = "pruebas"

            [ui]
            site_name = "Tablon"
            format = "text"
            "#
        )
        .expect("write temp file");

        let config = AppConfig::load(file.path()).expect("load config");
        assert_eq!(config.http.port, 80);
        // Unspecified fields keep their defaults
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.name, "pruebas");
        assert_eq!(config.ui.site_name, "Tablon");
        assert_eq!(config.ui.format, PageFormat::Text);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("no/such/file.toml").expect("load config");
        assert_eq!(config.database.name, "holamundo");
    }

    #[test]
    fn test_env_overrides_win_over_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(|name| match name {
            "DB_HOST" => Some("mysql.internal".to_string()),
            "DB_USER" => Some("lector".to_string()),
            "DB_PASSWORD" => Some("secreto".to_string()),
            "DB_NAME" => Some("saludos".to_string()),
            _ => None,
        });

        assert_eq!(config.database.host, "mysql.internal");
        assert_eq!(config.database.user, "lector");
        assert_eq!(config.database.password, "secreto");
        assert_eq!(config.database.name, "saludos");
    }

    #[test]
    fn test_env_overrides_leave_unset_fields_alone() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(|name| match name {
            "DB_HOST" => Some("mysql.internal".to_string()),
            _ => None,
        });

        assert_eq!(config.database.host, "mysql.internal");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.name, "holamundo");
    }

    #[test]
    fn test_version_is_populated_at_runtime() {
        let config = AppConfig::default();
        assert_eq!(config.ui.version, env!("CARGO_PKG_VERSION"));
    }
}
