//! Ingestion benchmark
//!
//! Times the ingestion paths one after another:
//! 1. `postgres_sql`  - replay the generated SQL script (baseline)
//! 2. `postgres_json` - renormalize the JSON documents and COPY them
//! 3. `mongo_catalog` - bulk insert the store documents
//! 4. `mongo_sales`   - bulk insert the sale documents in chunks
//!
//! Each timed region includes reading its input files, as a real loader
//! would.

use crate::config::BenchConfig;
use crate::documents::read_json;
use crate::mapper::RelationalMapper;
use crate::model::{SaleDoc, StoreDoc};
use crate::storage::{to_documents, MongoStore, PostgresStore};
use crate::ui::{self, Icons};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One ingestion path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum BenchStep {
    PostgresSql,
    PostgresJson,
    MongoCatalog,
    MongoSales,
}

impl BenchStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchStep::PostgresSql => "postgres_sql",
            BenchStep::PostgresJson => "postgres_json",
            BenchStep::MongoCatalog => "mongo_catalog",
            BenchStep::MongoSales => "mongo_sales",
        }
    }

    /// All steps in execution order
    pub fn all() -> &'static [BenchStep] {
        &[
            BenchStep::PostgresSql,
            BenchStep::PostgresJson,
            BenchStep::MongoCatalog,
            BenchStep::MongoSales,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            BenchStep::PostgresSql => "PostgreSQL load - SQL script",
            BenchStep::PostgresJson => "PostgreSQL load - JSON",
            BenchStep::MongoCatalog => "MongoDB load - catalog",
            BenchStep::MongoSales => "MongoDB load - sales",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            BenchStep::PostgresSql | BenchStep::PostgresJson => Icons::DATABASE,
            BenchStep::MongoCatalog | BenchStep::MongoSales => Icons::LEAF,
        }
    }
}

impl std::fmt::Display for BenchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep the canonical order; an empty selection means every step.
pub fn select_steps(only: &[BenchStep]) -> Vec<BenchStep> {
    BenchStep::all()
        .iter()
        .copied()
        .filter(|step| only.is_empty() || only.contains(step))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    pub step: BenchStep,
    pub duration: Duration,
    /// Rows or documents written by the step, when known
    pub items: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchReport {
    pub timings: Vec<StepTiming>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    step: &'a str,
    duration_seconds: f64,
}

impl BenchReport {
    pub fn total(&self) -> Duration {
        self.timings.iter().map(|t| t.duration).sum()
    }

    pub fn get(&self, step: BenchStep) -> Option<&StepTiming> {
        self.timings.iter().find(|t| t.step == step)
    }

    /// `step,duration_seconds` with one row per executed step
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        crate::config::ensure_parent_dir(path)?;
        let mut writer = csv::Writer::from_path(path)?;
        if self.timings.is_empty() {
            writer.write_record(["step", "duration_seconds"])?;
        }
        for timing in &self.timings {
            writer.serialize(CsvRow {
                step: timing.step.as_str(),
                duration_seconds: timing.duration.as_secs_f64(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn render_table(&self) -> String {
        let rows: Vec<(&str, Duration, Option<u64>)> =
            self.timings.iter().map(|t| (t.step.as_str(), t.duration, t.items)).collect();
        ui::timing_table(&rows)
    }
}

/// Run `f`, announcing the step and reporting its wall-clock duration
fn timed<T>(step: BenchStep, f: impl FnOnce() -> Result<T>) -> Result<(Duration, T)> {
    ui::phase(step.icon(), step.title());
    let start = Instant::now();
    let result = f()?;
    let elapsed = start.elapsed();
    ui::timing(step.title(), elapsed);
    tracing::info!(step = step.as_str(), seconds = elapsed.as_secs_f64(), "step finished");
    Ok((elapsed, result))
}

/// Runs benchmark steps against the configured servers
pub struct BenchRunner<'a> {
    config: &'a BenchConfig,
}

impl<'a> BenchRunner<'a> {
    pub fn new(config: &'a BenchConfig) -> Self {
        Self { config }
    }

    /// Check that every input file the selected steps read is present
    pub fn check_inputs(&self, steps: &[BenchStep]) -> Result<()> {
        let paths = &self.config.paths;
        for step in steps {
            let needed: Vec<&Path> = match step {
                BenchStep::PostgresSql => vec![&paths.load_sql],
                BenchStep::PostgresJson => vec![&paths.schema_sql, &paths.catalog_json, &paths.sales_json],
                BenchStep::MongoCatalog => vec![&paths.catalog_json],
                BenchStep::MongoSales => vec![&paths.sales_json],
            }
            .into_iter()
            .map(PathBuf::as_path)
            .collect();
            if let Some(missing) = needed.iter().find(|p| !p.exists()) {
                return Err(Error::Config(format!(
                    "{} needs {} (run `commerce-bench generate` first)",
                    step,
                    missing.display()
                )));
            }
        }
        Ok(())
    }

    pub fn run(&self, steps: &[BenchStep]) -> Result<BenchReport> {
        self.check_inputs(steps)?;
        self.prepare_databases(steps)?;

        let mut report = BenchReport::default();
        for &step in steps {
            let (duration, items) = match step {
                BenchStep::PostgresSql => timed(step, || self.load_postgres_sql())?,
                BenchStep::PostgresJson => timed(step, || self.load_postgres_json())?,
                BenchStep::MongoCatalog => timed(step, || self.load_mongo_catalog())?,
                BenchStep::MongoSales => timed(step, || self.load_mongo_sales())?,
            };
            if let Some(rows) = items {
                tracing::info!(step = step.as_str(), rows, "rows written");
            }
            report.timings.push(StepTiming { step, duration, items });
        }
        Ok(report)
    }

    /// Row and document counts in the targets the selected steps wrote to,
    /// labelled `database.table` or `database.collection`
    pub fn verify(&self, steps: &[BenchStep]) -> Result<Vec<(String, u64)>> {
        let pg = &self.config.postgres;
        let mongo = &self.config.mongo;
        let mut counts = Vec::new();

        let targets = [
            (BenchStep::PostgresSql, pg.port, pg.database.as_str()),
            (BenchStep::PostgresJson, pg.port_json, pg.json_database.as_str()),
        ];
        for (step, port, dbname) in targets {
            if !steps.contains(&step) {
                continue;
            }
            let mut store = PostgresStore::connect(pg, port, dbname)?;
            for count in store.table_counts()? {
                counts.push((format!("{}.{}", dbname, count.table), count.rows.max(0) as u64));
            }
        }

        let collections = [
            (BenchStep::MongoCatalog, mongo.catalog_collection.as_str()),
            (BenchStep::MongoSales, mongo.sales_collection.as_str()),
        ];
        if collections.iter().any(|(step, _)| steps.contains(step)) {
            let store = MongoStore::connect(&mongo.uri, &mongo.database)?;
            for (step, name) in collections {
                if steps.contains(&step) {
                    counts.push((format!("{}.{}", mongo.database, name), store.count(name)?));
                }
            }
        }
        Ok(counts)
    }

    /// Create missing PostgreSQL databases outside the timed regions
    fn prepare_databases(&self, steps: &[BenchStep]) -> Result<()> {
        let pg = &self.config.postgres;
        if !pg.create_databases {
            return Ok(());
        }
        if steps.contains(&BenchStep::PostgresSql) {
            PostgresStore::ensure_database(pg, pg.port, &pg.database)?;
        }
        if steps.contains(&BenchStep::PostgresJson) {
            PostgresStore::ensure_database(pg, pg.port_json, &pg.json_database)?;
        }
        Ok(())
    }

    fn load_postgres_sql(&self) -> Result<Option<u64>> {
        let pg = &self.config.postgres;
        let script = std::fs::read_to_string(&self.config.paths.load_sql)?;
        let mut store = PostgresStore::connect(pg, pg.port, &pg.database)?;
        store.run_script(&script)?;
        Ok(None)
    }

    fn load_postgres_json(&self) -> Result<Option<u64>> {
        let pg = &self.config.postgres;
        let paths = &self.config.paths;
        let mut store = PostgresStore::connect(pg, pg.port_json, &pg.json_database)?;
        let schema_sql = std::fs::read_to_string(&paths.schema_sql)?;

        let catalog: Vec<StoreDoc> = read_json(&paths.catalog_json)?;
        let sales: Vec<SaleDoc> = read_json(&paths.sales_json)?;
        let (tables, stats) = RelationalMapper::map(&catalog, &sales)?;
        tracing::debug!("{}", stats);

        let copied = store.load_tables(&tables, &schema_sql, self.config.batch_size)?;
        Ok(Some(copied))
    }

    fn load_mongo_catalog(&self) -> Result<Option<u64>> {
        let mongo = &self.config.mongo;
        let store = MongoStore::connect(&mongo.uri, &mongo.database)?;
        let values: Vec<serde_json::Value> = read_json(&self.config.paths.catalog_json)?;
        let docs = to_documents(values)?;
        let inserted = store.replace_collection(&mongo.catalog_collection, &docs, None)?;
        Ok(Some(inserted as u64))
    }

    fn load_mongo_sales(&self) -> Result<Option<u64>> {
        let mongo = &self.config.mongo;
        let store = MongoStore::connect(&mongo.uri, &mongo.database)?;
        let values: Vec<serde_json::Value> = read_json(&self.config.paths.sales_json)?;
        let docs = to_documents(values)?;
        let inserted = store.replace_collection(&mongo.sales_collection, &docs, Some(mongo.sales_chunk))?;
        Ok(Some(inserted as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;

    fn report() -> BenchReport {
        BenchReport {
            timings: vec![
                StepTiming {
                    step: BenchStep::PostgresSql,
                    duration: Duration::from_millis(1500),
                    items: None,
                },
                StepTiming {
                    step: BenchStep::MongoSales,
                    duration: Duration::from_millis(250),
                    items: Some(20_000),
                },
            ],
        }
    }

    #[test]
    fn test_step_cli_names_and_display() {
        use clap::ValueEnum;
        assert_eq!(BenchStep::from_str("postgres_json", false).unwrap(), BenchStep::PostgresJson);
        assert!(BenchStep::from_str("redis", false).is_err());
        for step in BenchStep::all() {
            let value = step.to_possible_value().unwrap();
            assert_eq!(value.get_name(), step.as_str());
        }
        assert_eq!(BenchStep::MongoCatalog.to_string(), "mongo_catalog");
    }

    #[test]
    fn test_select_steps_keeps_order() {
        assert_eq!(select_steps(&[]), BenchStep::all().to_vec());
        assert_eq!(
            select_steps(&[BenchStep::MongoSales, BenchStep::PostgresSql]),
            vec![BenchStep::PostgresSql, BenchStep::MongoSales]
        );
    }

    #[test]
    fn test_report_total_and_lookup() {
        let report = report();
        assert_eq!(report.total(), Duration::from_millis(1750));
        assert_eq!(report.get(BenchStep::MongoSales).unwrap().items, Some(20_000));
        assert!(report.get(BenchStep::PostgresJson).is_none());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/ingest_times.csv");
        report().write_csv(&path).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["step,duration_seconds", "postgres_sql,1.5", "mongo_sales,0.25"]);
    }

    #[test]
    fn test_write_csv_empty_report_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest_times.csv");
        BenchReport::default().write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "step,duration_seconds\n");
    }

    #[test]
    fn test_render_table() {
        let table = report().render_table();
        assert!(table.contains("postgres_sql"));
        assert!(table.contains("20000"));
        assert!(table.contains("total"));
    }

    #[test]
    fn test_check_inputs_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            paths: PathsConfig {
                load_sql: dir.path().join("commerce_load.sql"),
                schema_sql: dir.path().join("commerce_schema.sql"),
                catalog_json: dir.path().join("stores_catalog.json"),
                sales_json: dir.path().join("sales_docs.json"),
                times_csv: dir.path().join("ingest_times.csv"),
            },
            ..Default::default()
        };
        std::fs::write(&config.paths.catalog_json, "[]").unwrap();

        let runner = BenchRunner::new(&config);
        runner.check_inputs(&[BenchStep::MongoCatalog]).unwrap();
        let err = runner.check_inputs(&[BenchStep::MongoSales]).unwrap_err();
        assert!(err.to_string().contains("sales_docs.json"));
    }
}
