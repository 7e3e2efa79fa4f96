use crate::generate::GeneratorConfig;
use crate::sql_script::DEFAULT_BATCH_SIZE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgSettings {
    pub host: String,
    /// Port of the baseline server (SQL script path)
    pub port: u16,
    /// Port of the server receiving the JSON-to-relational load
    pub port_json: u16,
    pub user: String,
    pub password: String,
    /// Baseline database
    pub database: String,
    /// Database for the JSON-to-relational load
    pub json_database: String,
    /// Create missing databases before loading
    pub create_databases: bool,
}

impl Default for PgSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            port_json: 5433,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "commerce".to_string(),
            json_database: "commerce_sql_json".to_string(),
            create_databases: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub catalog_collection: String,
    pub sales_collection: String,
    /// Documents per `insert_many` call for sales
    pub sales_chunk: usize,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "commerce".to_string(),
            catalog_collection: "stores".to_string(),
            sales_collection: "sales".to_string(),
            sales_chunk: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Full DDL + INSERT script
    pub load_sql: PathBuf,
    /// DDL only
    pub schema_sql: PathBuf,
    pub catalog_json: PathBuf,
    pub sales_json: PathBuf,
    pub times_csv: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            load_sql: PathBuf::from("data/sql/commerce_load.sql"),
            schema_sql: PathBuf::from("data/sql/commerce_schema.sql"),
            catalog_json: PathBuf::from("data/json/stores_catalog.json"),
            sales_json: PathBuf::from("data/json/sales_docs.json"),
            times_csv: PathBuf::from("ingest_times.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Rows per INSERT statement and per COPY batch
    pub batch_size: usize,
    pub generator: GeneratorConfig,
    pub postgres: PgSettings,
    pub mongo: MongoSettings,
    pub paths: PathsConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            generator: GeneratorConfig::default(),
            postgres: PgSettings::default(),
            mongo: MongoSettings::default(),
            paths: PathsConfig::default(),
        }
    }
}

/// Connection values taken from CLI flags or environment variables.
/// `None` leaves the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub pg_host: Option<String>,
    pub pg_port: Option<u16>,
    pub pg_port_json: Option<u16>,
    pub pg_user: Option<String>,
    pub pg_password: Option<String>,
    pub pg_database: Option<String>,
    pub mongo_uri: Option<String>,
}

impl BenchConfig {
    pub fn apply_overrides(&mut self, overrides: ConnectionOverrides) {
        let pg = &mut self.postgres;
        if let Some(host) = overrides.pg_host {
            pg.host = host;
        }
        if let Some(port) = overrides.pg_port {
            pg.port = port;
        }
        if let Some(port) = overrides.pg_port_json {
            pg.port_json = port;
        }
        if let Some(user) = overrides.pg_user {
            pg.user = user;
        }
        if let Some(password) = overrides.pg_password {
            pg.password = password;
        }
        if let Some(database) = overrides.pg_database {
            pg.database = database;
        }
        if let Some(uri) = overrides.mongo_uri {
            self.mongo.uri = uri;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".into()));
        }
        if self.mongo.sales_chunk == 0 {
            return Err(Error::Config("mongo.sales_chunk must be > 0".into()));
        }
        self.generator.validate()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("commerce-bench.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<BenchConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BenchConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BenchConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commerce-bench.toml");
        let mut config = BenchConfig::default();
        config.generator.sales = 500;
        config.mongo.sales_chunk = 100;

        write_config(&path, &config, false).unwrap();
        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commerce-bench.toml");
        write_config(&path, &BenchConfig::default(), false).unwrap();
        assert!(write_config(&path, &BenchConfig::default(), false).is_err());
        write_config(&path, &BenchConfig::default(), true).unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[postgres]\nport = 6543\n\n[generator]\nsales = 10\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.postgres.port, 6543);
        assert_eq!(loaded.postgres.host, "localhost");
        assert_eq!(loaded.generator.sales, 10);
        assert_eq!(loaded.generator.products, 100);
        assert_eq!(loaded.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = BenchConfig::default();
        config.apply_overrides(ConnectionOverrides {
            pg_host: Some("db.internal".into()),
            pg_port_json: Some(15433),
            mongo_uri: Some("mongodb://mongo:27017".into()),
            ..Default::default()
        });
        assert_eq!(config.postgres.host, "db.internal");
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.port_json, 15433);
        assert_eq!(config.mongo.uri, "mongodb://mongo:27017");
    }

    #[test]
    fn test_validate() {
        BenchConfig::default().validate().unwrap();
        let config = BenchConfig { batch_size: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ensure_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a/b").is_dir());
        ensure_parent_dir(Path::new("bare.txt")).unwrap();
    }
}
