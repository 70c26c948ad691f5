// 📐 Column Structure - checking and trimming month-slice headers
//
// The spreadsheet exports carry stray blank columns and Japanese headers.
// The checker compares a header row with the stg_member_monthly table and
// the header-name mapping; the fixer drops the blank columns.

use crate::staging::{read_header, read_records, write_staging_csv};
use crate::transforms::member_monthly;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Spreadsheet header → stg_member_monthly column
pub const HEADER_MAPPING: [(&str, &str); 13] = [
    ("年月", "month_text"),
    ("メンバー名", "member_name"),
    ("ID", "candidate_id"),
    ("割り振り日", "assigned_date"),
    ("求職者名", "candidate_name"),
    ("リード獲得先", "lead_source"),
    ("カテゴリ", "category"),
    ("ステータス", "status"),
    ("ヨミ金額", "expected_amount"),
    ("ヨミ確度(当月)", "prob_current"),
    ("ヨミ確度(翌月)", "prob_next"),
    ("成約金額", "contract_amount"),
    ("面接フラグ", "interview_flag"),
];

fn is_blank_header(header: &str) -> bool {
    header.trim().is_empty()
}

fn is_mapped(header: &str) -> bool {
    HEADER_MAPPING.iter().any(|(source, _)| *source == header)
}

// ============================================================================
// COLUMN CHECKER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStatus {
    pub source: String,
    pub column: String,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    /// Header row as read, blank columns included
    pub columns: Vec<String>,
    /// Table columns, in order
    pub expected: Vec<String>,
    pub mappings: Vec<MappingStatus>,
    /// Non-blank headers with no entry in the mapping
    pub unmapped: Vec<String>,
}

impl ColumnReport {
    pub fn non_blank_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_blank_header(c))
            .collect()
    }

    pub fn count_matches(&self) -> bool {
        self.non_blank_columns().len() == self.expected.len()
    }

    pub fn is_valid(&self) -> bool {
        self.unmapped.is_empty() && self.count_matches()
    }

    /// Console report, one section per check
    pub fn render(&self) -> String {
        let rule = "=".repeat(70);
        let mut out = String::new();

        out.push_str(&format!("📋 CSV columns ({}):\n", self.columns.len()));
        for (i, col) in self.columns.iter().enumerate() {
            if is_blank_header(col) {
                out.push_str(&format!("   {:2}. (blank column)\n", i + 1));
            } else {
                out.push_str(&format!("   {:2}. {}\n", i + 1, col));
            }
        }
        out.push_str(&format!("\n{}\n", rule));

        out.push_str(&format!("📋 Table definition (stg_member_monthly, {} columns):\n", self.expected.len()));
        for (i, col) in self.expected.iter().enumerate() {
            out.push_str(&format!("   {:2}. {}\n", i + 1, col));
        }
        out.push_str(&format!("\n{}\n", rule));

        out.push_str("📋 Column mapping (CSV header → table column):\n");
        out.push_str(&format!("   {}\n", "-".repeat(50)));
        for m in &self.mappings {
            if m.found {
                out.push_str(&format!("   ✓ {:20} → {}\n", m.source, m.column));
            } else {
                out.push_str(&format!("   ✗ {:20} → {} (not found)\n", m.source, m.column));
            }
        }
        out.push_str(&format!("\n{}\n", rule));

        out.push_str("🔍 Result:\n");
        let non_blank = self.non_blank_columns().len();
        if self.count_matches() {
            out.push_str(&format!("   ✅ Column count matches ({} columns)\n", non_blank));
        } else {
            out.push_str("   ❌ Column count differs\n");
            out.push_str(&format!("      CSV:   {} columns\n", non_blank));
            out.push_str(&format!("      Table: {} columns\n", self.expected.len()));
        }
        for col in &self.unmapped {
            out.push_str(&format!("   ⚠️  Unmapped column: {}\n", col));
        }
        if self.is_valid() {
            out.push_str("   ✅ All columns map correctly\n");
        } else {
            out.push_str("   ❌ Column mapping has problems\n");
        }

        out
    }
}

/// Compare a header row with stg_member_monthly
pub fn check_columns(columns: &[String]) -> ColumnReport {
    let present: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !is_blank_header(c))
        .collect();

    let mappings = HEADER_MAPPING
        .iter()
        .map(|(source, column)| MappingStatus {
            source: source.to_string(),
            column: column.to_string(),
            found: present.contains(source),
        })
        .collect();

    let unmapped = present
        .iter()
        .copied()
        .filter(|c| !is_mapped(c))
        .map(str::to_string)
        .collect();

    ColumnReport {
        columns: columns.to_vec(),
        expected: member_monthly::column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        mappings,
        unmapped,
    }
}

/// Read a CSV header and check it
pub fn check_file(path: &Path) -> Result<ColumnReport> {
    let header = read_header(path)?;
    Ok(check_columns(&header))
}

// ============================================================================
// COLUMN FIXER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSummary {
    pub original_columns: usize,
    pub kept_headers: Vec<String>,
    pub data_rows: usize,
}

/// Positions of non-blank headers
pub fn non_blank_indices(header: &[String]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_blank_header(h))
        .map(|(i, _)| i)
        .collect()
}

/// Keep only `indices`, padding short rows with `""`
pub fn project_row(row: &[String], indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&i| row.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Drop blank-header columns from `input` and write the result to `output`
pub fn fix_columns(input: &Path, output: &Path) -> Result<FixSummary> {
    let mut records = read_records(input)?.into_iter();
    let header = records
        .next()
        .with_context(|| format!("No header row in {}", input.display()))?;

    let indices = non_blank_indices(&header);
    let kept_headers = project_row(&header, &indices);

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        rows.push(project_row(&record, &indices));
        if (idx + 2) % 100 == 0 {
            info!(line = idx + 2, "fixing columns");
        }
    }

    write_staging_csv(output, &kept_headers, &rows)?;

    Ok(FixSummary {
        original_columns: header.len(),
        kept_headers,
        data_rows: rows.len(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn full_header() -> Vec<String> {
        HEADER_MAPPING.iter().map(|(s, _)| s.to_string()).collect()
    }

    #[test]
    fn test_check_columns_all_match() {
        let report = check_columns(&full_header());

        assert!(report.count_matches());
        assert!(report.unmapped.is_empty());
        assert!(report.mappings.iter().all(|m| m.found));
        assert!(report.is_valid());
    }

    #[test]
    fn test_blank_columns_are_ignored_for_count() {
        let mut header = full_header();
        header.push(String::new());
        header.insert(3, "  ".to_string());

        let report = check_columns(&header);
        assert_eq!(report.columns.len(), 15);
        assert_eq!(report.non_blank_columns().len(), 13);
        assert!(report.is_valid());
        assert!(report.render().contains("(blank column)"));
    }

    #[test]
    fn test_missing_and_unmapped_columns() {
        let mut header = full_header();
        header.retain(|h| h != "面接フラグ");
        header.push("備考".to_string());

        let report = check_columns(&header);

        let flag = report.mappings.iter().find(|m| m.source == "面接フラグ").unwrap();
        assert!(!flag.found);
        assert_eq!(report.unmapped, vec!["備考"]);
        // 13 non-blank columns but one is unmapped
        assert!(report.count_matches());
        assert!(!report.is_valid());

        let text = report.render();
        assert!(text.contains("✗ 面接フラグ"));
        assert!(text.contains("Unmapped column: 備考"));
    }

    #[test]
    fn test_render_valid_report_sections() {
        let header = full_header();
        let text = check_columns(&header).render();

        assert!(text.starts_with("📋 CSV columns (13):\n"));
        assert!(text.contains(&format!("    1. {}\n", header[0])));
        assert!(text.contains("📋 Table definition (stg_member_monthly, 13 columns):\n"));
        assert!(text.contains("   ✅ Column count matches (13 columns)\n"));
        assert!(text.ends_with("   ✅ All columns map correctly\n"));
        assert_eq!(text.matches(&"=".repeat(70)).count(), 3);
    }

    #[test]
    fn test_column_count_mismatch() {
        let header: Vec<String> = full_header().into_iter().take(5).collect();
        let report = check_columns(&header);

        assert!(!report.count_matches());
        assert!(report.render().contains("Column count differs"));
    }

    #[test]
    fn test_check_file_reads_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("month.csv");
        fs::write(&path, format!("\u{feff}{},,\n2026_01\n", full_header().join(","))).unwrap();

        let report = check_file(&path).unwrap();
        assert_eq!(report.columns.len(), 15);
        assert!(report.is_valid());
    }

    #[test]
    fn test_project_row_pads() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(project_row(&row, &[0, 3]), vec!["a", ""]);
    }

    #[test]
    fn test_fix_columns_drops_blank_headers() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out/fixed.csv");
        fs::write(
            &input,
            "年月,,メンバー名, ,ID\n2026_01,x,田中,y,12345678\n2026_01,,佐藤\n",
        )
        .unwrap();

        let summary = fix_columns(&input, &output).unwrap();
        assert_eq!(summary.original_columns, 5);
        assert_eq!(summary.kept_headers, vec!["年月", "メンバー名", "ID"]);
        assert_eq!(summary.data_rows, 2);

        let records = read_records(&output).unwrap();
        assert_eq!(records[0], vec!["年月", "メンバー名", "ID"]);
        assert_eq!(records[1], vec!["2026_01", "田中", "12345678"]);
        assert_eq!(records[2], vec!["2026_01", "佐藤", ""]);
    }

    #[test]
    fn test_fix_columns_empty_file_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.csv");
        fs::write(&input, "").unwrap();

        assert!(fix_columns(&input, &dir.path().join("out.csv")).is_err());
    }
}
