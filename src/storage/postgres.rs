//! PostgreSQL storage implementation

use super::schema::TABLE_ORDER;
use crate::config::PgSettings;
use crate::model::{RetailTables, SqlValue, TableRow, SQL_TIMESTAMP_FORMAT};
use crate::Result;
use postgres::{Client, Config, NoTls, Transaction};
use std::fmt::Write as _;
use std::io::Write as _;

/// Database used to issue `CREATE DATABASE`
const MAINTENANCE_DB: &str = "postgres";

/// Row count of one table, as reported by `table_counts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// PostgreSQL-backed storage for the relational model
pub struct PostgresStore {
    client: Client,
    dbname: String,
}

fn client_config(settings: &PgSettings, port: u16, dbname: &str) -> Config {
    let mut config = Config::new();
    config
        .host(&settings.host)
        .port(port)
        .user(&settings.user)
        .password(&settings.password)
        .dbname(dbname)
        .application_name("commerce-bench");
    config
}

/// Double-quote an identifier for use in DDL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl PostgresStore {
    /// Connect to `dbname` on the given port
    pub fn connect(settings: &PgSettings, port: u16, dbname: &str) -> Result<Self> {
        tracing::debug!("connecting to postgres {}:{}/{}", settings.host, port, dbname);
        let client = client_config(settings, port, dbname).connect(NoTls)?;
        Ok(Self {
            client,
            dbname: dbname.to_string(),
        })
    }

    /// Create `dbname` if missing. Returns `true` when it was created.
    pub fn ensure_database(settings: &PgSettings, port: u16, dbname: &str) -> Result<bool> {
        let mut admin = client_config(settings, port, MAINTENANCE_DB).connect(NoTls)?;
        let exists = admin
            .query_opt("SELECT 1 FROM pg_database WHERE datname = $1", &[&dbname])?
            .is_some();
        if exists {
            return Ok(false);
        }
        tracing::info!("creating database {} on port {}", dbname, port);
        admin.batch_execute(&format!("CREATE DATABASE {}", quote_ident(dbname)))?;
        Ok(true)
    }

    /// Execute a multi-statement script in one round trip
    pub fn run_script(&mut self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql)?;
        Ok(())
    }

    /// Recreate the schema and COPY every table inside a single transaction.
    ///
    /// Tables are streamed parents first so foreign keys hold at every
    /// statement. Returns the number of rows copied.
    pub fn load_tables(&mut self, tables: &RetailTables, schema_sql: &str, batch_size: usize) -> Result<u64> {
        let mut tx = self.client.transaction()?;
        tx.batch_execute(schema_sql)?;

        let mut copied = 0;
        copied += copy_rows(&mut tx, &tables.categories, batch_size)?;
        copied += copy_rows(&mut tx, &tables.products, batch_size)?;
        copied += copy_rows(&mut tx, &tables.stores, batch_size)?;
        copied += copy_rows(&mut tx, &tables.employees, batch_size)?;
        copied += copy_rows(&mut tx, &tables.customers, batch_size)?;
        copied += copy_rows(&mut tx, &tables.inventory, batch_size)?;
        copied += copy_rows(&mut tx, &tables.sales, batch_size)?;
        copied += copy_rows(&mut tx, &tables.sale_lines, batch_size)?;

        tx.commit()?;
        tracing::debug!("copied {} rows into {}", copied, self.dbname);
        Ok(copied)
    }

    /// Row count per table, in dependency order
    pub fn table_counts(&mut self) -> Result<Vec<TableCount>> {
        let mut counts = Vec::with_capacity(TABLE_ORDER.len());
        for &table in TABLE_ORDER {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let row = self.client.query_one(sql.as_str(), &[])?;
            counts.push(TableCount { table, rows: row.get(0) });
        }
        Ok(counts)
    }
}

/// `COPY table (cols) FROM STDIN` statement for a row type
pub fn copy_statement<R: TableRow>() -> String {
    format!(
        "COPY {} ({}) FROM STDIN WITH (FORMAT text)",
        R::TABLE,
        R::COLUMNS.join(", ")
    )
}

fn copy_rows<R: TableRow>(tx: &mut Transaction<'_>, rows: &[R], batch_size: usize) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let statement = copy_statement::<R>();
    let mut copied = 0;
    let mut buffer = String::new();
    for batch in rows.chunks(batch_size.max(1)) {
        buffer.clear();
        for row in batch {
            encode_copy_row(&row.values(), &mut buffer);
        }
        let mut writer = tx.copy_in(statement.as_str())?;
        writer.write_all(buffer.as_bytes())?;
        copied += writer.finish()?;
    }
    tracing::debug!("COPY {} rows into {}", copied, R::TABLE);
    Ok(copied)
}

/// Append one value in COPY text format
pub fn encode_copy_field(value: &SqlValue<'_>, out: &mut String) {
    match value {
        SqlValue::Null => out.push_str("\\N"),
        SqlValue::Int(n) => {
            let _ = write!(out, "{}", n);
        }
        SqlValue::Money(m) => {
            let _ = write!(out, "{:.2}", m);
        }
        SqlValue::Timestamp(ts) => {
            let _ = write!(out, "{}", ts.format(SQL_TIMESTAMP_FORMAT));
        }
        SqlValue::Text(s) => {
            for c in s.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    c => out.push(c),
                }
            }
        }
    }
}

/// Append one tab-separated, newline-terminated COPY row
pub fn encode_copy_row(values: &[SqlValue<'_>], out: &mut String) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        encode_copy_field(value, out);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Sale, SaleLine};
    use chrono::NaiveDate;

    #[test]
    fn test_copy_statement() {
        assert_eq!(
            copy_statement::<Category>(),
            "COPY category (category_id, name) FROM STDIN WITH (FORMAT text)"
        );
        assert!(copy_statement::<SaleLine>().starts_with("COPY saleline (sale_id, line_number,"));
    }

    #[test]
    fn test_copy_text_escaping() {
        let mut out = String::new();
        encode_copy_field(&SqlValue::Text("a\tb\nc\\d\re"), &mut out);
        assert_eq!(out, "a\\tb\\nc\\\\d\\re");

        out.clear();
        encode_copy_field(&SqlValue::Null, &mut out);
        assert_eq!(out, "\\N");

        out.clear();
        encode_copy_field(&SqlValue::Text("Muñoz, O'Brien"), &mut out);
        assert_eq!(out, "Muñoz, O'Brien");
    }

    #[test]
    fn test_copy_row_layout() {
        let sale = Sale {
            sale_id: 1,
            sale_timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            customer_id: 2,
            store_id: 3,
            employee_id: 4,
            total_amount: 10.5,
        };
        let mut out = String::new();
        encode_copy_row(&sale.values(), &mut out);
        assert_eq!(out, "1\t2024-01-02 03:04:05\t2\t3\t4\t10.50\n");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("commerce_sql_json"), "\"commerce_sql_json\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
