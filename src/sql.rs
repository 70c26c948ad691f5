// 🧾 SQL Generator - DELETE + multi-row INSERT for one month of stg_member_monthly
// Fallback for when the bulk-import UI is unavailable.

use crate::staging::read_records;
use crate::transforms::{member_monthly, SourceLayout};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::info;

/// Every INSERT tuple carries exactly this many values
pub const COLUMN_COUNT: usize = 13;

const PROGRESS_EVERY: usize = 50;

/// Quote a value for SQL: blank → `NULL`, otherwise single-quoted with `'` doubled
pub fn escape_sql_string(value: &str) -> String {
    if value.trim().is_empty() {
        return "NULL".to_string();
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Pad with `""` or truncate to `COLUMN_COUNT` cells
pub fn fit_row(row: &[String]) -> Vec<String> {
    let mut values: Vec<String> = row.iter().take(COLUMN_COUNT).cloned().collect();
    values.resize(COLUMN_COUNT, String::new());
    values
}

/// `  (v1, v2, ...)`
pub fn values_tuple(row: &[String]) -> String {
    let values: Vec<String> = fit_row(row).iter().map(|v| escape_sql_string(v)).collect();
    format!("  ({})", values.join(", "))
}

/// The SQL script for one month
#[derive(Debug, Clone)]
pub struct InsertScript {
    pub month: String,
    pub rows: Vec<Vec<String>>,
}

impl InsertScript {
    pub fn new(month: &str, rows: Vec<Vec<String>>) -> Self {
        InsertScript {
            month: month.to_string(),
            rows,
        }
    }

    pub fn render(&self, generated_at: NaiveDateTime) -> String {
        let table = SourceLayout::MemberMonthly.table_name();
        let month = escape_sql_string(&self.month);
        let columns = member_monthly::column_names();

        let mut sql = String::new();
        sql.push_str("-- ========================================\n");
        sql.push_str(&format!("-- Import {} rows for month {}\n", table, self.month));
        sql.push_str("-- Run in the database SQL editor\n");
        sql.push_str(&format!("-- Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));
        sql.push_str("-- ========================================\n\n");

        sql.push_str("-- Remove rows already loaded for this month\n");
        sql.push_str(&format!("DELETE FROM {} WHERE month_text = {};\n\n", table, month));

        if self.rows.is_empty() {
            sql.push_str("-- No data rows to insert\n\n");
        } else {
            sql.push_str(&format!("-- Insert {} rows\n", self.rows.len()));
            sql.push_str(&format!("INSERT INTO {} (\n", table));
            for (i, chunk) in columns.chunks(5).enumerate() {
                let sep = if (i + 1) * 5 < columns.len() { "," } else { "" };
                sql.push_str(&format!("  {}{}\n", chunk.join(", "), sep));
            }
            sql.push_str(") VALUES\n");

            let tuples: Vec<String> = self
                .rows
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    if (i + 1) % PROGRESS_EVERY == 0 {
                        info!(line = i + 1, "rendered insert rows");
                    }
                    values_tuple(r)
                })
                .collect();
            sql.push_str(&tuples.join(",\n"));
            sql.push_str(";\n\n");
        }

        sql.push_str("-- Verify inserted rows\n");
        sql.push_str("SELECT\n  month_text,\n  COUNT(*) as count\n");
        sql.push_str(&format!("FROM {}\n", table));
        sql.push_str(&format!("WHERE month_text = {}\n", month));
        sql.push_str("GROUP BY month_text;\n");
        sql
    }
}

/// Read a fixed month slice (header skipped) and write the SQL script.
/// Returns the number of data rows.
pub fn generate_insert_sql(
    input: &Path,
    output: &Path,
    month: &str,
    generated_at: NaiveDateTime,
) -> Result<usize> {
    let rows: Vec<Vec<String>> = read_records(input)?.into_iter().skip(1).collect();

    let script = InsertScript::new(month, rows);
    let sql = script.render(generated_at);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(output, sql).with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(script.rows.len())
}
