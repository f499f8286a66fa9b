use std::{fmt, path::Path, str::FromStr};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Environment overrides that were set but shadowed by a config file.
    #[serde(skip)]
    pub ignored_env: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Directory holding the built client; served with an `index.html` fallback.
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 5000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4), static_dir: None }
    }
}

/// Which `Storage` implementation backs the journal.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Json,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "json" | "file" => Ok(Self::Json),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(anyhow!("unknown storage backend `{other}` (expected memory, json or postgres)")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Memory => "memory",
            Self::Json => "json",
            Self::Postgres => "postgres",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String { "data/journal.json".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), path: default_storage_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then overlay environment variables and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let from_file = Path::new(&path).exists();
        let mut cfg = if from_file { load_from_file(&path)? } else { Self::default() };
        cfg.apply_env(from_file, |key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment values. Without a config file every variable
    /// applies; with one, only blanks (database url) are filled and the
    /// shadowed names are recorded in `ignored_env`.
    pub fn apply_env<F>(&mut self, from_file: bool, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        const FILE_SHADOWED: [&str; 8] = [
            "SERVER_HOST",
            "SERVER_PORT",
            "PORT",
            "TOKIO_WORKER_THREADS",
            "STATIC_DIR",
            "STORAGE_BACKEND",
            "STORAGE_PATH",
            "LOG_FORMAT",
        ];
        if from_file {
            self.ignored_env =
                FILE_SHADOWED.iter().filter(|k| lookup(**k).is_some()).map(|k| k.to_string()).collect();
        } else {
            if let Some(host) = lookup("SERVER_HOST") {
                self.server.host = host;
            }
            if let Some(port) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
                self.server.port = port.trim().parse().map_err(|_| anyhow!("SERVER_PORT `{port}` is not a valid port"))?;
            }
            if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
                self.server.worker_threads = Some(w);
            }
            if let Some(dir) = lookup("STATIC_DIR") {
                self.server.static_dir = Some(dir);
            }
            if let Some(backend) = lookup("STORAGE_BACKEND") {
                self.storage.backend = backend.parse()?;
            }
            if let Some(path) = lookup("STORAGE_PATH") {
                self.storage.path = path;
            }
            if let Some(format) = lookup("LOG_FORMAT") {
                self.logging.format = if format.eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact };
            }
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        if self.storage.backend == StorageBackend::Postgres {
            self.database.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if matches!(self.static_dir.as_deref(), Some(d) if d.trim().is_empty()) {
            self.static_dir = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Json && self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is required for the json backend"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            static_dir = "client/dist"

            [storage]
            backend = "json"
            path = "/tmp/journal.json"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.static_dir.as_deref(), Some("client/dist"));
        assert_eq!(cfg.storage.backend, StorageBackend::Json);
        assert_eq!(cfg.storage.path, "/tmp/journal.json");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(parse("[storage]\nbackend = \"redis\"").is_err());
        assert!("redis".parse::<StorageBackend>().is_err());
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
    }

    #[test]
    fn postgres_backend_requires_url() {
        let mut cfg = parse("[storage]\nbackend = \"postgres\"").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.apply_env(true, env(&[("DATABASE_URL", "postgres://u:p@localhost/journal")])).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.database.url, "postgres://u:p@localhost/journal");
    }

    #[test]
    fn env_applies_only_without_file() {
        let lookup = env(&[("SERVER_PORT", "9000"), ("STORAGE_BACKEND", "json")]);

        let mut from_env = AppConfig::default();
        from_env.apply_env(false, &lookup).unwrap();
        assert_eq!(from_env.server.port, 9000);
        assert_eq!(from_env.storage.backend, StorageBackend::Json);

        assert!(from_env.ignored_env.is_empty());

        let mut from_file = AppConfig::default();
        from_file.apply_env(true, &lookup).unwrap();
        assert_eq!(from_file.server.port, 5000);
        assert_eq!(from_file.storage.backend, StorageBackend::Memory);
        assert_eq!(from_file.ignored_env, vec!["SERVER_PORT", "STORAGE_BACKEND"]);
    }

    #[test]
    fn bad_port_from_env_is_an_error() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(false, env(&[("SERVER_PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut cfg = parse("[server]\nport = 0").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let db = DatabaseConfig {
            url: "postgres://localhost/journal".into(),
            max_connections: 1,
            min_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }
}
