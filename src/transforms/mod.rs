// 🏗️ Staging Transforms
// One transform per spreadsheet layout, all behind the same trait

pub mod contacts;
pub mod contracts;
pub mod member_monthly;
pub mod member_sheet;

pub use contacts::ContactsTransform;
pub use contracts::ContractsTransform;
pub use member_monthly::MemberMonthlyTransform;
pub use member_sheet::MemberSheetTransform;

use crate::config::Config;
use crate::normalize::FieldRule;
use crate::staging::{KeyedRow, PositionalRow, StagingTable};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceLayout - which spreadsheet export a file comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLayout {
    Contacts,
    MemberSheet,
    MemberMonthly,
    Contracts,
}

impl SourceLayout {
    /// Build order used by a full run
    pub const ALL: [SourceLayout; 4] = [
        SourceLayout::Contacts,
        SourceLayout::MemberSheet,
        SourceLayout::MemberMonthly,
        SourceLayout::Contracts,
    ];

    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            SourceLayout::Contacts => "Contact list",
            SourceLayout::MemberSheet => "Member sheets",
            SourceLayout::MemberMonthly => "Monthly merge sheet",
            SourceLayout::Contracts => "Contract records",
        }
    }

    /// Short code accepted on the command line
    pub fn code(&self) -> &str {
        match self {
            SourceLayout::Contacts => "contacts",
            SourceLayout::MemberSheet => "member-sheet",
            SourceLayout::MemberMonthly => "member-monthly",
            SourceLayout::Contracts => "contracts",
        }
    }

    /// Staging table the layout feeds
    pub fn table_name(&self) -> &'static str {
        match self {
            SourceLayout::Contacts => "stg_contacts",
            SourceLayout::MemberSheet => "stg_member_sheet",
            SourceLayout::MemberMonthly => "stg_member_monthly",
            SourceLayout::Contracts => "stg_contracts",
        }
    }

    /// Accepts either the short code or the table name
    pub fn from_arg(arg: &str) -> Result<Self> {
        let arg = arg.trim();
        SourceLayout::ALL
            .into_iter()
            .find(|layout| layout.code() == arg || layout.table_name() == arg)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown staging table '{}' (expected one of: {})",
                    arg,
                    SourceLayout::ALL.map(|l| l.code().to_string()).join(", ")
                )
            })
    }
}

/// Guess the layout from a file path
///
/// Member sheets are recognised by their directory, the rest by file name:
/// ```text
/// 元データ/メンバーシート/保育 - 佐藤.csv          → MemberSheet
/// 求職者管理 - 連絡先一覧.csv                      → Contacts
/// 【保育】数値管理シート_最新版 - 全メンバーマージシート.csv → MemberMonthly
/// 【自動更新】成約データ - 2026.csv                → Contracts
/// ```
pub fn detect_layout(path: &Path) -> Result<SourceLayout> {
    let in_member_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(|n| n == "メンバーシート")
        .unwrap_or(false);
    if in_member_dir {
        return Ok(SourceLayout::MemberSheet);
    }

    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if filename.contains("連絡先一覧") {
        return Ok(SourceLayout::Contacts);
    }

    if filename.contains("全メンバーマージシート") {
        return Ok(SourceLayout::MemberMonthly);
    }

    if filename.contains("成約") {
        return Ok(SourceLayout::Contracts);
    }

    Err(anyhow!("Cannot detect layout for file: {}", path.display()))
}

// ============================================================================
// FIELD MAPPINGS
// ============================================================================

/// Output column read from a named source column
#[derive(Debug, Clone, Copy)]
pub struct KeyedField {
    pub column: &'static str,
    pub source: &'static str,
    pub rule: FieldRule,
}

/// Output column read from a source cell position
#[derive(Debug, Clone, Copy)]
pub struct PositionalField {
    pub column: &'static str,
    pub index: usize,
    pub rule: FieldRule,
}

pub(crate) const fn keyed(column: &'static str, source: &'static str, rule: FieldRule) -> KeyedField {
    KeyedField { column, source, rule }
}

pub(crate) const fn positional(column: &'static str, index: usize, rule: FieldRule) -> PositionalField {
    PositionalField { column, index, rule }
}

pub fn apply_keyed(mapping: &[KeyedField], row: &KeyedRow) -> Vec<String> {
    mapping
        .iter()
        .map(|field| field.rule.apply(row.get(field.source)))
        .collect()
}

pub fn apply_positional(mapping: &[PositionalField], row: &PositionalRow) -> Vec<String> {
    mapping
        .iter()
        .map(|field| field.rule.apply(row.cell(field.index)))
        .collect()
}

// ============================================================================
// TRANSFORM TRAIT
// ============================================================================

/// StagingTransform - read one layout, emit one staging table
pub trait StagingTransform {
    /// Layout this transform reads
    fn layout(&self) -> SourceLayout;

    /// Output header, in column order
    fn headers(&self) -> Vec<&'static str>;

    /// Read the inputs named by `config` and map them into a table
    fn transform(&self, config: &Config) -> Result<StagingTable>;

    /// Transform, then write `<output_dir>/<table>.csv`. Returns the row count.
    fn build(&self, config: &Config) -> Result<usize> {
        let layout = self.layout();
        let table = self
            .transform(config)
            .with_context(|| format!("Failed to build {}", layout.table_name()))?;

        let output = config.staging_output(layout.table_name());
        table.write(&output)?;

        info!(
            table = layout.table_name(),
            rows = table.len(),
            output = %output.display(),
            "staging table written"
        );
        Ok(table.len())
    }
}

/// Factory: returns the transform for a layout
pub fn get_transform(layout: SourceLayout) -> Box<dyn StagingTransform> {
    match layout {
        SourceLayout::Contacts => Box::new(ContactsTransform::new()),
        SourceLayout::MemberSheet => Box::new(MemberSheetTransform::new()),
        SourceLayout::MemberMonthly => Box::new(MemberMonthlyTransform::new()),
        SourceLayout::Contracts => Box::new(ContractsTransform::new()),
    }
}

// ============================================================================
// BUILD SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
}

/// Row counts from one build run, in build order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub tables: Vec<TableCount>,
}

impl BuildSummary {
    pub fn record(&mut self, table: &str, rows: usize) {
        self.tables.push(TableCount {
            table: table.to_string(),
            rows,
        });
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// One `<table>: <n> rows` line per table
    pub fn lines(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|t| format!("{}: {} rows", t.table, t.rows))
            .collect()
    }
}

/// Build the given layouts in order
pub fn build_tables(config: &Config, layouts: &[SourceLayout]) -> Result<BuildSummary> {
    let mut summary = BuildSummary::default();
    for layout in layouts {
        let rows = get_transform(*layout).build(config)?;
        summary.record(layout.table_name(), rows);
    }
    Ok(summary)
}

/// Build all four staging tables
pub fn build_all(config: &Config) -> Result<BuildSummary> {
    build_tables(config, &SourceLayout::ALL)
}

/// Expand glob patterns to files: each pattern's matches sorted,
/// patterns in order, files matched twice kept once
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let mut matched = Vec::new();
        for entry in glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
            let path = entry.with_context(|| format!("Failed to read match for {}", pattern))?;
            if path.is_file() {
                matched.push(path);
            }
        }
        matched.sort();

        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

// ============================================================================
// TESTS
// ============================================================================
