// Staging Builder - Core Library
// Spreadsheet exports → staging CSVs, plus the column and SQL helpers

pub mod columns;
pub mod config;
pub mod deduplication;
pub mod extract;
pub mod logging;
pub mod normalize;
pub mod sql;
pub mod staging;
pub mod transforms;

// Re-export commonly used types
pub use columns::{
    check_columns, check_file, fix_columns, ColumnReport, FixSummary, MappingStatus,
};
pub use config::Config;
pub use deduplication::{ContractKey, DeduplicationEngine};
pub use extract::{extract_month, ExtractSummary};
pub use normalize::{
    is_candidate_id, normalize_amount, normalize_date, normalize_empty, normalize_flag,
    normalize_phone, normalize_text, FieldRule,
};
pub use sql::{escape_sql_string, generate_insert_sql, InsertScript};
pub use staging::{KeyedRow, PositionalRow, StagingTable};
pub use transforms::{
    build_all, build_tables, detect_layout, get_transform, BuildSummary, ContactsTransform,
    ContractsTransform, MemberMonthlyTransform, MemberSheetTransform, SourceLayout,
    StagingTransform,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
