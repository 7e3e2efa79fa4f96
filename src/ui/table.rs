use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TimingRow {
    #[tabled(rename = "Step")]
    pub step: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
    #[tabled(rename = "Seconds")]
    pub seconds: String,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
}

/// Step timings with rows written (when known) and each step's share of
/// the total.
pub fn timing_table(timings: &[(&str, Duration, Option<u64>)]) -> String {
    if timings.is_empty() {
        return String::new();
    }

    let rows_cell = |rows: Option<u64>| rows.map_or_else(|| "-".to_string(), |n| n.to_string());
    let total: f64 = timings.iter().map(|(_, d, _)| d.as_secs_f64()).sum();
    let total_rows = timings.iter().filter_map(|(_, _, n)| *n).reduce(|a, b| a + b);

    let mut rows: Vec<TimingRow> = timings
        .iter()
        .map(|(step, duration, items)| {
            let secs = duration.as_secs_f64();
            let share = if total > 0.0 { secs / total * 100.0 } else { 0.0 };
            TimingRow {
                step: step.to_string(),
                rows: rows_cell(*items),
                seconds: format!("{:.2}", secs),
                share: format!("{:.1}%", share),
            }
        })
        .collect();
    rows.push(TimingRow {
        step: "total".to_string(),
        rows: rows_cell(total_rows),
        seconds: format!("{:.2}", total),
        share: "100.0%".to_string(),
    });

    Table::new(&rows).with(Style::rounded()).to_string()
}

pub fn row_count_table<N: ToString>(counts: &[(&str, N)]) -> String {
    let rows: Vec<CountRow> = counts
        .iter()
        .map(|(table, n)| CountRow {
            table: table.to_string(),
            rows: n.to_string(),
        })
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}
