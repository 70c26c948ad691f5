// 🤝 Contract exports → stg_contracts
// Several exports overlap, so rows are deduplicated on
// (candidate_id, accepted_date) across every file, first write wins.

use super::{apply_keyed, expand_patterns, keyed, KeyedField, SourceLayout, StagingTransform};
use crate::config::Config;
use crate::deduplication::{ContractKey, DeduplicationEngine};
use crate::normalize::{normalize_date, normalize_empty, FieldRule};
use crate::staging::{read_keyed_rows, KeyedRow, StagingTable};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ID_COLUMN: &str = "ID";
const ACCEPTED_DATE_COLUMN: &str = "承諾日";

pub const MAPPING: [KeyedField; 16] = [
    keyed("candidate_id", ID_COLUMN, FieldRule::Empty),
    keyed("accepted_date", ACCEPTED_DATE_COLUMN, FieldRule::Date),
    keyed("employment_restriction_until", "転職勧奨禁止期間", FieldRule::Date),
    keyed("candidate_name", "氏名", FieldRule::Empty),
    keyed("source_name", "経由", FieldRule::Empty),
    keyed("consultant_name", "担当", FieldRule::Empty),
    keyed("employment_type", "雇用", FieldRule::Empty),
    keyed("job_type", "職種", FieldRule::Empty),
    keyed("registered_at", "登録日", FieldRule::Date),
    keyed("payment_date", "入金", FieldRule::Date),
    keyed("revenue_excluding_tax", "売上(税抜)", FieldRule::Amount),
    keyed("revenue_including_tax", "売上(税込)", FieldRule::Amount),
    keyed("invoice_sent_date", "請求書発送", FieldRule::Date),
    keyed("calculation_basis", "算出根拠", FieldRule::Empty),
    keyed("document_url", "格納先URL", FieldRule::Empty),
    keyed("placement_company", "入職先", FieldRule::Empty),
];

/// Dedup key of a contract row; `None` when the ID cell is empty
pub fn contract_key(row: &KeyedRow) -> Option<ContractKey> {
    let candidate_id = normalize_empty(row.get(ID_COLUMN));
    if candidate_id.is_empty() {
        return None;
    }
    let accepted_date = normalize_date(row.get(ACCEPTED_DATE_COLUMN));
    Some(ContractKey {
        candidate_id,
        accepted_date,
    })
}

/// Accumulates contract rows across files
pub struct ContractCollector {
    table: StagingTable,
    dedup: DeduplicationEngine<ContractKey>,
    /// Rows dropped for an empty ID
    pub missing_id: usize,
}

impl ContractCollector {
    pub fn new(headers: &[&'static str]) -> Self {
        ContractCollector {
            table: StagingTable::new(SourceLayout::Contracts.table_name(), headers),
            dedup: DeduplicationEngine::new(),
            missing_id: 0,
        }
    }

    pub fn push_row(&mut self, row: &KeyedRow) {
        let key = match contract_key(row) {
            Some(key) => key,
            None => {
                self.missing_id += 1;
                return;
            }
        };

        if !self.dedup.admit(key.clone()) {
            debug!(key = %key, line = row.line_number, "duplicate contract skipped");
            return;
        }

        self.table.push(apply_keyed(&MAPPING, row));
    }

    pub fn push_file(&mut self, path: &Path) -> Result<()> {
        let rows = read_keyed_rows(path)?;
        let before = self.table.len();
        for row in &rows {
            self.push_row(row);
        }
        debug!(file = %path.display(), read = rows.len(), kept = self.table.len() - before, "contract file read");
        Ok(())
    }

    pub fn duplicates(&self) -> usize {
        self.dedup.duplicates
    }

    pub fn finish(self) -> StagingTable {
        self.table
    }
}

pub struct ContractsTransform;

impl ContractsTransform {
    pub fn new() -> Self {
        ContractsTransform
    }

    /// Read the given files in order into one deduplicated table
    pub fn collect_files(&self, files: &[PathBuf]) -> Result<StagingTable> {
        let mut collector = ContractCollector::new(&self.headers());
        for path in files {
            collector.push_file(path)?;
        }

        info!(
            files = files.len(),
            duplicates = collector.duplicates(),
            missing_id = collector.missing_id,
            "contracts collected"
        );
        Ok(collector.finish())
    }
}

impl Default for ContractsTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingTransform for ContractsTransform {
    fn layout(&self) -> SourceLayout {
        SourceLayout::Contracts
    }

    fn headers(&self) -> Vec<&'static str> {
        MAPPING.iter().map(|f| f.column).collect()
    }

    fn transform(&self, config: &Config) -> Result<StagingTable> {
        let files = expand_patterns(&config.contract_patterns())?;
        self.collect_files(&files)
    }
}
