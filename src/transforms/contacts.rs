// 📇 Contact list → stg_contacts

use super::{apply_keyed, keyed, KeyedField, SourceLayout, StagingTransform};
use crate::config::Config;
use crate::normalize::{normalize_empty, FieldRule};
use crate::staging::{read_keyed_rows, KeyedRow, StagingTable};
use anyhow::Result;
use tracing::debug;

const ID_COLUMN: &str = "ID";

pub const MAPPING: [KeyedField; 16] = [
    keyed("consultant_name", "担当者", FieldRule::Empty),
    keyed("source_name", "媒体", FieldRule::Empty),
    keyed("registered_at", "日付", FieldRule::Date),
    keyed("status_text", "ステータス", FieldRule::Empty),
    keyed("candidate_id", ID_COLUMN, FieldRule::Empty),
    keyed("candidate_name", "氏名", FieldRule::Empty),
    keyed("phone", "電話番号", FieldRule::Phone),
    keyed("email", "メールアドレス", FieldRule::Empty),
    keyed("birth_date", "生年月日", FieldRule::Date),
    keyed("age", "年齢", FieldRule::Empty),
    keyed("prefecture", "都道府県", FieldRule::Empty),
    keyed("address", "市区町村", FieldRule::Empty),
    keyed("employment_type", "正・パ", FieldRule::Empty),
    keyed("qualification", "保有資格", FieldRule::Empty),
    keyed("desired_job_type", "応募職種", FieldRule::Empty),
    keyed("notes", "備考", FieldRule::Empty),
];

pub struct ContactsTransform;

impl ContactsTransform {
    pub fn new() -> Self {
        ContactsTransform
    }

    /// Map one contact row; `None` when the ID cell is empty
    pub fn map_row(&self, row: &KeyedRow) -> Option<Vec<String>> {
        if normalize_empty(row.get(ID_COLUMN)).is_empty() {
            debug!(line = row.line_number, "contact without ID skipped");
            return None;
        }
        Some(apply_keyed(&MAPPING, row))
    }

    pub fn map_rows(&self, rows: &[KeyedRow]) -> StagingTable {
        let mut table = StagingTable::new(self.layout().table_name(), &self.headers());
        for row in rows {
            if let Some(mapped) = self.map_row(row) {
                table.push(mapped);
            }
        }
        table
    }
}

impl Default for ContactsTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingTransform for ContactsTransform {
    fn layout(&self) -> SourceLayout {
        SourceLayout::Contacts
    }

    fn headers(&self) -> Vec<&'static str> {
        MAPPING.iter().map(|f| f.column).collect()
    }

    fn transform(&self, config: &Config) -> Result<StagingTable> {
        let rows = read_keyed_rows(&config.contacts_input())?;
        Ok(self.map_rows(&rows))
    }
}
