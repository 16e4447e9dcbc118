//! CLI command implementations
//!
//! Boot order for `serve`: config → store → schema → dataset load → listener.
//! The listener is only bound once the load has finished.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{QueryService, ResponseLogsView};
use crate::executor::{SharedStore, SqliteStore};
use crate::geo::{GeoClient, GeoConfig};
use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::loader::{initialize_schema, BulkLoader, LoadReport};
use crate::observability::{Event, Logger, MetricsRegistry, UsageAggregator};
use crate::schema::SchemaRegistry;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Environment variable overriding `http.port`
pub const PORT_ENV: &str = "PORT";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (default "./db.db")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory holding `<Table>.csv` sources (default "./rawData")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    /// Reload the business tables before serving (default true)
    #[serde(default = "default_reload_on_start")]
    pub reload_on_start: bool,
}

fn default_database_path() -> String {
    "./db.db".to_string()
}

fn default_data_dir() -> String {
    "./rawData".to_string()
}

fn default_reload_on_start() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            data_dir: default_data_dir(),
            http: HttpServerConfig::default(),
            geo: GeoConfig::default(),
            reload_on_start: default_reload_on_start(),
        }
    }
}

impl Config {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
            Self::from_json(&content)?
        } else {
            Self::default()
        };

        config.apply_port_override(std::env::var(PORT_ENV).ok().as_deref());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Applies a `PORT` value; anything that is not a port is ignored
    pub fn apply_port_override(&mut self, value: Option<&str>) {
        if let Some(port) = value.and_then(|v| v.trim().parse::<u16>().ok()) {
            self.http.port = port;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }
        Ok(())
    }

    pub fn database_path(&self) -> &Path {
        Path::new(&self.database_path)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

/// Run a CLI command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config, reset } => init(&config, reset),
        Command::Load { config } => load(&config).map(|_| ()),
        Command::Serve { config } => serve(&config),
        Command::Stats { config, session } => {
            let view = stats(&config, &session)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
    }
}

/// Create every table; with `reset`, drop them all first
pub fn init(config_path: &Path, reset: bool) -> CliResult<()> {
    let config = boot(config_path)?;
    let store = open_store(&config)?;
    initialize_schema(store.as_ref(), &SchemaRegistry::northwind(), reset)?;
    Ok(())
}

/// Reload the business tables and print the report
pub fn load(config_path: &Path) -> CliResult<LoadReport> {
    let config = boot(config_path)?;
    let store = open_store(&config)?;
    let registry = SchemaRegistry::northwind();
    initialize_schema(store.as_ref(), &registry, false)?;

    let loader = BulkLoader::new(
        store,
        registry,
        config.data_path(),
        Arc::new(MetricsRegistry::new()),
    );
    let report = loader.load_all();
    println!("{}", serde_json::to_string(&report)?);
    Ok(report)
}

/// Boot and serve HTTP until interrupted
pub fn serve(config_path: &Path) -> CliResult<()> {
    init_tracing();
    let config = boot(config_path)?;
    let store = open_store(&config)?;
    let registry = SchemaRegistry::northwind();
    initialize_schema(store.as_ref(), &registry, false)?;

    let metrics = Arc::new(MetricsRegistry::new());
    if config.reload_on_start {
        BulkLoader::new(store.clone(), registry, config.data_path(), metrics.clone()).load_all();
    }

    let geo = GeoClient::new(config.geo.clone())
        .map_err(|e| CliError::config_error(format!("Invalid geo config: {}", e)))?;
    let state = AppState::new(QueryService::new(store, metrics), geo);
    let server = HttpServer::new(config.http.clone(), state);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Usage statistics and history for `session`
pub fn stats(config_path: &Path, session: &str) -> CliResult<ResponseLogsView> {
    let config = boot(config_path)?;
    let store = open_store(&config)?;
    initialize_schema(store.as_ref(), &SchemaRegistry::northwind(), false)?;

    let usage = UsageAggregator::new(store);
    Ok(ResponseLogsView {
        stats: usage.stats(session)?,
        history: usage.history(session)?,
    })
}

fn boot(config_path: &Path) -> CliResult<Config> {
    let path = config_path.display().to_string();
    Logger::info(Event::BootBegin, &[("config", path.as_str())]);

    let config = Config::load(config_path)?;
    let port = config.http.port.to_string();
    Logger::info(
        Event::ConfigLoaded,
        &[
            ("data_dir", config.data_dir.as_str()),
            ("database_path", config.database_path.as_str()),
            ("port", port.as_str()),
        ],
    );
    Ok(config)
}

fn open_store(config: &Config) -> CliResult<SharedStore> {
    let store = SqliteStore::open(config.database_path())?;
    Ok(Arc::new(store))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, extra: &str) -> PathBuf {
        let db = dir.path().join("db.db");
        let data = dir.path().join("rawData");
        fs::create_dir_all(&data).unwrap();
        let path = dir.path().join("northwind.json");
        let json = format!(
            r#"{{"database_path": {:?}, "data_dir": {:?}{}}}"#,
            db.display().to_string(),
            data.display().to_string(),
            extra
        );
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path, "./db.db");
        assert_eq!(config.data_dir, "./rawData");
        assert_eq!(config.http.port, 3000);
        assert!(config.reload_on_start);
        assert!(config.geo.airport_api_key.is_none());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), crate::cli::CliErrorCode::ConfigError);
    }

    #[test]
    fn test_port_override() {
        let mut config = Config::default();
        config.apply_port_override(Some("8081"));
        assert_eq!(config.http.port, 8081);
        config.apply_port_override(Some("not-a-port"));
        assert_eq!(config.http.port, 8081);
        config.apply_port_override(None);
        assert_eq!(config.http.port, 8081);
    }

    #[test]
    fn test_validate_rejects_empty_paths_and_zero_port() {
        let mut config = Config::default();
        config.database_path = " ".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.data_dir = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_init_load_and_stats() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "");
        fs::write(
            dir.path().join("rawData").join("Shippers.csv"),
            "ShipperID;CompanyName;Phone\n1;Speedy Express;(503) 555-9831\n2;United Package;\n",
        )
        .unwrap();

        init(&config, true).unwrap();
        let report = load(&config).unwrap();
        let shippers = report
            .tables
            .iter()
            .find(|t| t.table == "Shippers")
            .unwrap();
        assert_eq!(shippers.rows, Some(2));
        // Only one source file exists
        assert!(!report.is_complete());

        let view = stats(&config, "nobody").unwrap();
        assert_eq!(view.stats.query_count, 0);
        assert!(view.history.is_empty());
    }
}
