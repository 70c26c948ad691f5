// 📅 Monthly merge sheet → stg_member_monthly

use super::{apply_positional, positional, PositionalField, SourceLayout, StagingTransform};
use crate::config::Config;
use crate::normalize::FieldRule;
use crate::staging::{read_positional_rows, PositionalRow, StagingTable};
use anyhow::Result;
use tracing::debug;

/// Rows narrower than the table are partial and dropped
pub const MIN_CELLS: usize = 13;

pub const MAPPING: [PositionalField; 13] = [
    positional("month_text", 0, FieldRule::Empty),
    positional("member_name", 1, FieldRule::Empty),
    positional("candidate_id", 2, FieldRule::Empty),
    positional("assigned_date", 3, FieldRule::Date),
    positional("candidate_name", 4, FieldRule::Empty),
    positional("lead_source", 5, FieldRule::Empty),
    positional("category", 6, FieldRule::Empty),
    positional("status", 7, FieldRule::Empty),
    positional("expected_amount", 8, FieldRule::Amount),
    positional("prob_current", 9, FieldRule::Empty),
    positional("prob_next", 10, FieldRule::Empty),
    positional("contract_amount", 11, FieldRule::Amount),
    positional("interview_flag", 12, FieldRule::Flag),
];

/// Column names of `stg_member_monthly`, in order
pub fn column_names() -> Vec<&'static str> {
    MAPPING.iter().map(|f| f.column).collect()
}

pub struct MemberMonthlyTransform;

impl MemberMonthlyTransform {
    pub fn new() -> Self {
        MemberMonthlyTransform
    }

    pub fn map_row(&self, row: &PositionalRow) -> Option<Vec<String>> {
        if row.len() < MIN_CELLS {
            debug!(line = row.line_number, cells = row.len(), "short monthly row skipped");
            return None;
        }
        Some(apply_positional(&MAPPING, row))
    }
}

impl Default for MemberMonthlyTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingTransform for MemberMonthlyTransform {
    fn layout(&self) -> SourceLayout {
        SourceLayout::MemberMonthly
    }

    fn headers(&self) -> Vec<&'static str> {
        column_names()
    }

    fn transform(&self, config: &Config) -> Result<StagingTable> {
        let rows = read_positional_rows(&config.member_monthly_input(), true)?;

        let mut table = StagingTable::new(self.layout().table_name(), &self.headers());
        for row in &rows {
            if let Some(mapped) = self.map_row(row) {
                table.push(mapped);
            }
        }
        Ok(table)
    }
}
