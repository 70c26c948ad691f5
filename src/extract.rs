// ✂️ Month Extraction - slice one month out of the merge sheet

use crate::staging::{read_records, write_staging_csv};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

const PROGRESS_EVERY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub header_columns: usize,
    /// Data rows read (header excluded)
    pub total_rows: usize,
    pub extracted: usize,
}

/// Copy the header and every row whose first cell is exactly `month`
pub fn extract_month(input: &Path, output: &Path, month: &str) -> Result<ExtractSummary> {
    let mut records = read_records(input)?.into_iter();
    let header = records
        .next()
        .with_context(|| format!("No header row in {}", input.display()))?;

    let mut kept = Vec::new();
    let mut total_rows = 0;

    for row in records {
        total_rows += 1;
        if row.first().map(String::as_str) == Some(month) {
            kept.push(row);
        }

        if (total_rows + 1) % PROGRESS_EVERY == 0 {
            info!(line = total_rows + 1, extracted = kept.len(), "extracting {}", month);
        }
    }

    write_staging_csv(output, &header, &kept)?;

    Ok(ExtractSummary {
        header_columns: header.len(),
        total_rows,
        extracted: kept.len(),
    })
}
