// 📄 Staging CSV I/O
// Reading spreadsheet exports and writing fixed-header staging tables

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

// ============================================================================
// SOURCE ROWS
// ============================================================================

/// A source record addressed by column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRow {
    fields: HashMap<String, String>,
    /// 1-indexed line in the source file (header = line 1)
    pub line_number: usize,
}

impl KeyedRow {
    /// Pair headers with cells. Missing trailing cells read as `""`,
    /// cells beyond the header are dropped, and a repeated header keeps
    /// its last cell.
    pub fn from_cells(headers: &[String], cells: &[String], line_number: usize) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = cells.get(i).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();

        KeyedRow { fields, line_number }
    }

    /// Raw value for a column, `""` when the column does not exist
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// A source record addressed by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalRow {
    pub cells: Vec<String>,
    pub line_number: usize,
}

impl PositionalRow {
    /// Raw value at `index`, `""` past the end of the row
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// READERS
// ============================================================================

/// Read every record of a CSV file as raw cell vectors (header included)
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", idx + 1, path.display())
        })?;
        let mut cells = record_cells(&record);
        if idx == 0 {
            strip_bom(&mut cells);
        }
        records.push(cells);
    }

    debug!(file = %path.display(), records = records.len(), "read csv");
    Ok(records)
}

/// Read only the header row of a CSV file (empty when the file is empty)
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut record = StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    if !found {
        return Ok(Vec::new());
    }

    let mut header = record_cells(&record);
    strip_bom(&mut header);
    Ok(header)
}

/// Read a header-keyed CSV. Blank records are skipped.
pub fn read_keyed_rows(path: &Path) -> Result<Vec<KeyedRow>> {
    let mut records = read_records(path)?.into_iter();

    let headers = match records.next() {
        Some(headers) => headers,
        None => return Ok(Vec::new()),
    };

    let rows = records
        .enumerate()
        .filter(|(_, cells)| !is_blank(cells))
        .map(|(idx, cells)| KeyedRow::from_cells(&headers, &cells, idx + 2))
        .collect();

    Ok(rows)
}

/// Read a positional CSV, optionally dropping its first record.
/// Blank records are skipped.
pub fn read_positional_rows(path: &Path, skip_header: bool) -> Result<Vec<PositionalRow>> {
    let skip = usize::from(skip_header);

    let rows = read_records(path)?
        .into_iter()
        .enumerate()
        .skip(skip)
        .filter(|(_, cells)| !is_blank(cells))
        .map(|(idx, cells)| PositionalRow {
            cells,
            line_number: idx + 1,
        })
        .collect();

    Ok(rows)
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// A blank line, whether the reader yields no cells or a single empty one
fn is_blank(cells: &[String]) -> bool {
    match cells {
        [] => true,
        [only] => only.is_empty(),
        _ => false,
    }
}

fn strip_bom(cells: &mut [String]) {
    if let Some(first) = cells.first_mut() {
        if first.starts_with(BOM) {
            *first = first.trim_start_matches(BOM).to_string();
        }
    }
}

// ============================================================================
// WRITER
// ============================================================================

/// Write a header row followed by data rows, creating parent directories
pub fn write_staging_csv<H, R>(path: &Path, headers: &[H], rows: &[R]) -> Result<()>
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    writer.write_record(headers.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(row.as_ref())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(file = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

// ============================================================================
// STAGING TABLE
// ============================================================================

/// Output rows accumulated under a fixed header
#[derive(Debug, Clone)]
pub struct StagingTable {
    pub name: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl StagingTable {
    pub fn new(name: &str, headers: &[&'static str]) -> Self {
        StagingTable {
            name: name.to_string(),
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len(), "row width for {}", self.name);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_staging_csv(path, &self.headers, &self.rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_keyed_row_pads_missing_cells() {
        let headers = vec!["ID".to_string(), "氏名".to_string(), "備考".to_string()];
        let cells = vec!["12345678".to_string(), "山田".to_string()];
        let row = KeyedRow::from_cells(&headers, &cells, 2);

        assert_eq!(row.get("ID"), "12345678");
        assert_eq!(row.get("氏名"), "山田");
        assert_eq!(row.get("備考"), "");
        assert_eq!(row.get("unknown"), "");
    }

    #[test]
    fn test_keyed_row_duplicate_header_keeps_last() {
        let headers = vec!["ID".to_string(), "ID".to_string()];
        let cells = vec!["first".to_string(), "second".to_string()];
        let row = KeyedRow::from_cells(&headers, &cells, 2);

        assert_eq!(row.get("ID"), "second");
    }

    #[test]
    fn test_read_keyed_rows_strips_bom_and_handles_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = fixture(
            &dir,
            "contacts.csv",
            "\u{feff}ID,氏名,備考\n12345678,山田\n\n87654321,佐藤,メモ,余分\n",
        );

        let rows = read_keyed_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("ID"), "12345678");
        assert_eq!(rows[0].get("備考"), "");
        assert_eq!(rows[1].get("備考"), "メモ");
    }

    #[test]
    fn test_read_keyed_rows_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "empty.csv", "");

        assert!(read_keyed_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_positional_rows_skip_header() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "sheet.csv", "a,b,c\n1,2,3\n4,5\n");

        let rows = read_positional_rows(&path, true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cell(1), "2");
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1].cell(2), "");

        let all = read_positional_rows(&path, false).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].line_number, 1);
    }

    #[test]
    fn test_read_header() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "h.csv", "\u{feff}年月,,メンバー名\n2026_01,,田中\n");

        let header = read_header(&path).unwrap();
        assert_eq!(header, vec!["年月", "", "メンバー名"]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_records(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.csv"));
    }

    #[test]
    fn test_staging_table_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/stg_test.csv");

        let mut table = StagingTable::new("stg_test", &["candidate_id", "notes"]);
        table.push(vec!["12345678".to_string(), "a, b".to_string()]);
        table.write(&path).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["candidate_id", "notes"]);
        assert_eq!(records[1], vec!["12345678", "a, b"]);
    }
}
