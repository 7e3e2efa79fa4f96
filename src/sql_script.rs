//! SQL script rendering
//!
//! Renders the dataset as a self-contained PostgreSQL script: schema DDL
//! followed by batched multi-row INSERT statements, wrapped in a single
//! transaction. This is the baseline ingestion path.

use crate::model::{RetailTables, SqlValue, TableRow, SQL_TIMESTAMP_FORMAT};
use crate::storage::schema;
use crate::{Error, Result};
use std::path::Path;

/// Default rows per INSERT statement
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Render a value as a SQL literal
pub fn render_value(value: &SqlValue<'_>) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Money(m) => format!("{:.2}", m),
        SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        SqlValue::Timestamp(ts) => format!("'{}'", ts.format(SQL_TIMESTAMP_FORMAT)),
    }
}

/// Build a single multi-row INSERT for `rows`
pub fn build_insert<R: TableRow>(rows: &[R]) -> String {
    let values_block = rows
        .iter()
        .map(|row| {
            let literals: Vec<String> = row.values().iter().map(render_value).collect();
            format!("({})", literals.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!(
        "INSERT INTO {} ({})\nVALUES\n    {};\n",
        R::TABLE,
        R::COLUMNS.join(", "),
        values_block
    )
}

fn write_batches<R: TableRow>(out: &mut String, rows: &[R], batch_size: usize) {
    for batch in rows.chunks(batch_size) {
        out.push_str(&build_insert(batch));
    }
}

/// Schema DDL only, as used by the JSON-to-relational path
pub fn render_schema_script() -> String {
    let mut script = String::from("-- ====================== DDL SECTION (PostgreSQL) =====================\n");
    script.push_str(&schema::schema_script());
    script
}

/// Full load script: DDL plus every row, parents first, in one transaction
pub fn render_load_script(tables: &RetailTables, batch_size: usize) -> Result<String> {
    if batch_size == 0 {
        return Err(Error::Config("batch_size must be > 0".into()));
    }

    let mut script = String::from("BEGIN;\n");
    script.push_str(&render_schema_script());
    script.push_str("-- ====================== DATA SECTION =====================\n");
    write_batches(&mut script, &tables.categories, batch_size);
    write_batches(&mut script, &tables.products, batch_size);
    write_batches(&mut script, &tables.stores, batch_size);
    write_batches(&mut script, &tables.employees, batch_size);
    write_batches(&mut script, &tables.customers, batch_size);
    write_batches(&mut script, &tables.inventory, batch_size);
    write_batches(&mut script, &tables.sales, batch_size);
    write_batches(&mut script, &tables.sale_lines, batch_size);
    script.push_str("COMMIT;\n");
    Ok(script)
}

/// Write both SQL artefacts: the full load script and the DDL-only script
pub fn write_scripts(tables: &RetailTables, batch_size: usize, load_path: &Path, schema_path: &Path) -> Result<()> {
    crate::config::ensure_parent_dir(load_path)?;
    crate::config::ensure_parent_dir(schema_path)?;
    std::fs::write(load_path, render_load_script(tables, batch_size)?)?;
    std::fs::write(schema_path, render_schema_script())?;
    tracing::info!("wrote {} and {}", load_path.display(), schema_path.display());
    Ok(())
}
