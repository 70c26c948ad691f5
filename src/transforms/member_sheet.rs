// 👥 Per-member sheets → stg_member_sheet
// One CSV per consultant, no header row, member name taken from the file name

use super::{apply_positional, expand_patterns, positional, PositionalField, SourceLayout, StagingTransform};
use crate::config::Config;
use crate::normalize::{is_candidate_id, normalize_text, FieldRule};
use crate::staging::{read_positional_rows, PositionalRow, StagingTable};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Columns before the cell mapping: member name (from the file) and the ID cell
const LEADING_COLUMNS: [&str; 2] = ["member_name", "candidate_id"];

pub const MAPPING: [PositionalField; 18] = [
    positional("assigned_date", 1, FieldRule::Date),
    positional("candidate_name", 2, FieldRule::Empty),
    positional("lead_source", 3, FieldRule::Empty),
    positional("category", 4, FieldRule::Empty),
    positional("status_text", 5, FieldRule::Empty),
    positional("expected_amount", 6, FieldRule::Amount),
    positional("prob_current", 7, FieldRule::Empty),
    positional("prob_next", 8, FieldRule::Empty),
    positional("contract_amount", 9, FieldRule::Amount),
    positional("interview_flag", 10, FieldRule::Flag),
    positional("interview_flag_date", 11, FieldRule::Date),
    positional("interview_days", 12, FieldRule::Empty),
    positional("contract_date", 13, FieldRule::Date),
    positional("area", 14, FieldRule::Empty),
    positional("interview_date", 15, FieldRule::Date),
    positional("garden_name", 16, FieldRule::Empty),
    positional("corporation_name", 17, FieldRule::Empty),
    positional("concurrent", 18, FieldRule::Empty),
];

/// `【保育】メンバーシート - 田中` → `田中`
pub fn member_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let last = stem.rsplit(" - ").next().unwrap_or("");
    normalize_text(last)
}

pub struct MemberSheetTransform;

impl MemberSheetTransform {
    pub fn new() -> Self {
        MemberSheetTransform
    }

    /// Map one sheet row; `None` unless cell 0 is an eight-digit candidate ID
    pub fn map_row(&self, member_name: &str, row: &PositionalRow) -> Option<Vec<String>> {
        let candidate_id = normalize_text(row.cell(0));
        if !is_candidate_id(&candidate_id) {
            return None;
        }

        let mut mapped = Vec::with_capacity(LEADING_COLUMNS.len() + MAPPING.len());
        mapped.push(member_name.to_string());
        mapped.push(candidate_id);
        mapped.extend(apply_positional(&MAPPING, row));
        Some(mapped)
    }

    fn append_sheet(&self, table: &mut StagingTable, path: &Path) -> Result<()> {
        let member_name = member_name_from_path(path);
        let rows = read_positional_rows(path, false)?;

        let before = table.len();
        for row in &rows {
            if let Some(mapped) = self.map_row(&member_name, row) {
                table.push(mapped);
            }
        }

        debug!(
            file = %path.display(),
            member = %member_name,
            kept = table.len() - before,
            skipped = rows.len() - (table.len() - before),
            "member sheet read"
        );
        Ok(())
    }
}

impl Default for MemberSheetTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingTransform for MemberSheetTransform {
    fn layout(&self) -> SourceLayout {
        SourceLayout::MemberSheet
    }

    fn headers(&self) -> Vec<&'static str> {
        LEADING_COLUMNS
            .iter()
            .copied()
            .chain(MAPPING.iter().map(|f| f.column))
            .collect()
    }

    fn transform(&self, config: &Config) -> Result<StagingTable> {
        let mut table = StagingTable::new(self.layout().table_name(), &self.headers());

        let sheet_dir = config.member_sheet_dir();
        if !sheet_dir.is_dir() {
            warn!(dir = %sheet_dir.display(), "member sheet directory not found");
            return Ok(table);
        }

        for path in expand_patterns(&[config.member_sheet_pattern()])? {
            self.append_sheet(&mut table, &path)?;
        }

        Ok(table)
    }
}
