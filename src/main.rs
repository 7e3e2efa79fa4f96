//! commerce-bench CLI - synthetic retail dataset and ingestion benchmark

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use commerce_bench::bench::{select_steps, BenchRunner, BenchStep};
use commerce_bench::config::{default_config_path, load_config, write_config, ConnectionOverrides};
use commerce_bench::ui::{self, Icons, Spinner};
use commerce_bench::{documents, generate, sql_script, BenchConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "commerce-bench")]
#[command(version = "0.1.0")]
#[command(about = "Synthetic retail dataset and PostgreSQL / MongoDB ingestion benchmark")]
#[command(long_about = r#"
commerce-bench generates a synthetic retail dataset and times how long it
takes to ingest it through three paths:
  • PostgreSQL from a generated SQL script (baseline)
  • PostgreSQL from JSON documents, renormalized and loaded with COPY
  • MongoDB from the same JSON documents

Example usage:
  commerce-bench init
  commerce-bench generate
  commerce-bench bench --only postgres_json --only mongo_sales
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./commerce-bench.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Where to write it (defaults to --config or ./commerce-bench.toml)
        path: Option<PathBuf>,
    },

    /// Generate the dataset and write the SQL scripts and JSON documents
    Generate {
        /// Override the generator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of sales
        #[arg(long)]
        sales: Option<usize>,
    },

    /// Run the ingestion benchmark
    Bench {
        /// Run only these steps (repeatable); order is always fixed
        #[arg(long, value_enum)]
        only: Vec<BenchStep>,

        /// Where to write the timings CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print row and document counts after loading
        #[arg(long)]
        verify: bool,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// PostgreSQL host
    #[arg(long, env = "PG_HOST")]
    pg_host: Option<String>,

    /// Port of the baseline PostgreSQL server
    #[arg(long, env = "PG_PORT")]
    pg_port: Option<u16>,

    /// Port of the PostgreSQL server for the JSON load
    #[arg(long, env = "PG_PORT_JSON")]
    pg_port_json: Option<u16>,

    #[arg(long, env = "PG_USER")]
    pg_user: Option<String>,

    #[arg(long, env = "PG_PASSWORD", hide_env_values = true)]
    pg_password: Option<String>,

    /// Baseline database name
    #[arg(long, env = "PG_DB")]
    pg_database: Option<String>,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI")]
    mongo_uri: Option<String>,
}

impl From<ConnectionArgs> for ConnectionOverrides {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            pg_host: args.pg_host,
            pg_port: args.pg_port,
            pg_port_json: args.pg_port_json,
            pg_user: args.pg_user,
            pg_password: args.pg_password,
            pg_database: args.pg_database,
            mongo_uri: args.mongo_uri,
        }
    }
}

fn load(config_path: Option<&PathBuf>) -> anyhow::Result<BenchConfig> {
    let config = match load_config(config_path.map(PathBuf::as_path))? {
        Some(config) => config,
        None => {
            if let Some(path) = config_path {
                ui::warn(&format!("{} not found, using defaults", path.display()));
            } else {
                tracing::debug!("no config file found, using defaults");
            }
            BenchConfig::default()
        }
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { force, path } => {
            let path = path.or(cli.config).unwrap_or_else(default_config_path);
            write_config(&path, &BenchConfig::default(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }

        Commands::Generate { seed, sales } => {
            let mut config = load(cli.config.as_ref())?;
            if let Some(seed) = seed {
                config.generator.seed = seed;
            }
            if let Some(sales) = sales {
                config.generator.sales = sales;
            }
            config.validate()?;

            ui::header("Generating retail dataset");
            ui::status(Icons::GEAR, "Seed", &config.generator.seed.to_string());
            ui::status(Icons::CART, "Sales", &config.generator.sales.to_string());

            let started = Instant::now();
            let tables = generate::generate(&config.generator)?;

            let paths = &config.paths;
            let spinner = Spinner::new("Writing SQL scripts");
            sql_script::write_scripts(&tables, config.batch_size, &paths.load_sql, &paths.schema_sql)?;
            spinner.set_message("Writing JSON documents");
            documents::write_documents(&tables, &paths.catalog_json, &paths.sales_json)?;
            spinner.finish();

            ui::section("Artefacts");
            for path in [&paths.load_sql, &paths.schema_sql, &paths.catalog_json, &paths.sales_json] {
                ui::artefact(path);
            }

            ui::section("Rows");
            println!("{}", ui::row_count_table(&tables.row_counts()));
            ui::timing("generate", started.elapsed());
            ui::success(&format!("Generated {} rows", tables.total_rows()));
        }

        Commands::Bench {
            only,
            csv,
            verify,
            connection,
        } => {
            let mut config = load(cli.config.as_ref())?;
            config.apply_overrides(connection.into());
            config.validate()?;

            let steps = select_steps(&only);
            ui::header("Ingestion benchmark");
            ui::status(
                Icons::DATABASE,
                "PostgreSQL",
                &format!(
                    "{}:{} / {}:{}",
                    config.postgres.host, config.postgres.port, config.postgres.host, config.postgres.port_json
                ),
            );
            ui::status(Icons::LEAF, "MongoDB", &config.mongo.uri);

            let runner = BenchRunner::new(&config);
            let report = runner.run(&steps)?;

            ui::section("Timings");
            println!("{}", report.render_table());

            let csv_path = csv.unwrap_or_else(|| config.paths.times_csv.clone());
            report
                .write_csv(&csv_path)
                .with_context(|| format!("writing {}", csv_path.display()))?;
            ui::artefact(&csv_path);

            if verify {
                ui::section("Loaded rows");
                let counts = runner.verify(&steps)?;
                let rows: Vec<(&str, u64)> = counts.iter().map(|(label, n)| (label.as_str(), *n)).collect();
                println!("{}", ui::row_count_table(&rows));
            }

            ui::success(&format!("Benchmark finished in {:.2} s", report.total().as_secs_f64()));
        }
    }

    Ok(())
}
