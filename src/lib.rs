//! # commerce-bench - Retail ingestion benchmark
//!
//! Generates a synthetic retail dataset and times three ways of loading it:
//! - a generated SQL script replayed against PostgreSQL (baseline)
//! - denormalized JSON documents bulk-inserted into MongoDB
//! - the same JSON documents renormalized and COPY-loaded into PostgreSQL
//!
//! The dataset is deterministic for a given seed, and every path reads the
//! artefacts of one `generate` run. The JSON path rebuilds its tables from
//! the documents, so it only holds customers who bought something and drops
//! sale lines whose product no store stocks.

pub mod bench;
pub mod config;
pub mod documents;
pub mod generate;
pub mod mapper;
pub mod model;
pub mod sql_script;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use bench::{BenchReport, BenchRunner, BenchStep};
pub use config::BenchConfig;
pub use generate::GeneratorConfig;
pub use mapper::{MappingStats, RelationalMapper};
pub use model::RetailTables;
pub use storage::{MongoStore, PostgresStore};

/// Result type alias for commerce-bench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for commerce-bench operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
