// ⚙️ Configuration - where the exports live and where staging files go

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_ROOT_DIR: &str = "STAGING_ROOT_DIR";
pub const ENV_RAW_DIR: &str = "STAGING_RAW_DIR";
pub const ENV_OUTPUT_DIR: &str = "STAGING_OUTPUT_DIR";
pub const ENV_MONTH: &str = "STAGING_MONTH";

/// Month handled by the extract / fix / SQL tools when nothing else is set
pub const DEFAULT_MONTH: &str = "2026_01";

const RAW_DIR_NAME: &str = "元データ";
const OUTPUT_SUBDIR: [&str; 2] = ["hoiku-crm", "supabase"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Workspace holding the spreadsheet exports
    pub root_dir: PathBuf,
    /// Raw exports (contacts, member sheets, contract files)
    pub raw_dir: PathBuf,
    /// Staging CSVs and generated SQL
    pub output_dir: PathBuf,
    /// `YYYY_MM` label used by the month tools
    pub month: String,
}

impl Config {
    /// Build a config with every path derived from `root_dir`
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let raw_dir = root_dir.join(RAW_DIR_NAME);
        let output_dir = OUTPUT_SUBDIR
            .iter()
            .fold(root_dir.clone(), |dir, part| dir.join(part));

        Config {
            root_dir,
            raw_dir,
            output_dir,
            month: DEFAULT_MONTH.to_string(),
        }
    }

    /// Defaults relative to the current directory, overridden by `STAGING_*` variables
    pub fn from_env() -> Result<Self> {
        let root_dir = match env::var_os(ENV_ROOT_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir().context("Failed to resolve current directory")?,
        };

        let mut config = Config::with_root(root_dir);

        if let Some(dir) = env::var_os(ENV_RAW_DIR) {
            config.raw_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(month) = env::var(ENV_MONTH) {
            let month = month.trim();
            if !month.is_empty() {
                config.month = month.to_string();
            }
        }

        Ok(config)
    }

    // ------------------------------------------------------------------------
    // Transform inputs
    // ------------------------------------------------------------------------

    pub fn contacts_input(&self) -> PathBuf {
        self.raw_dir.join("求職者管理 - 連絡先一覧.csv")
    }

    pub fn member_sheet_dir(&self) -> PathBuf {
        self.raw_dir.join("メンバーシート")
    }

    pub fn member_sheet_pattern(&self) -> String {
        pattern_in(&self.member_sheet_dir(), "*.csv")
    }

    pub fn member_monthly_input(&self) -> PathBuf {
        self.root_dir
            .join("【保育】数値管理シート_最新版 - 全メンバーマージシート.csv")
    }

    /// Glob patterns for contract exports, in read order
    pub fn contract_patterns(&self) -> Vec<String> {
        vec![
            pattern_in(&self.raw_dir, "成約*.csv"),
            pattern_in(&self.root_dir, "【自動更新】成約データ - *.csv"),
        ]
    }

    // ------------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------------

    /// `<output_dir>/<table>.csv`
    pub fn staging_output(&self, table: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", table))
    }

    /// Single-month slice written by the extractor and read by the checker
    pub fn month_extract(&self) -> PathBuf {
        self.output_dir
            .join(format!("stg_member_monthly_{}.csv", self.month))
    }

    /// Month slice with blank columns removed
    pub fn month_fixed(&self) -> PathBuf {
        self.output_dir
            .join(format!("stg_member_monthly_{}_fixed.csv", self.month))
    }

    pub fn insert_sql(&self) -> PathBuf {
        self.output_dir.join(format!("insert_{}_data.sql", self.month))
    }
}

fn pattern_in(dir: &Path, file_pattern: &str) -> String {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    format!("{}/{}", escaped.trim_end_matches('/'), file_pattern)
}
