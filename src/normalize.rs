// 🧹 Normalization Primitives
// Field-level rules shared by every staging transform

use std::sync::LazyLock;
use regex::Regex;

// ============================================================================
// PATTERNS
// ============================================================================

/// Literal tokens the spreadsheets use to mean "no value"
pub const SENTINEL_TOKENS: [&str; 4] = ["#N/A", "N/A", "-", "なし"];

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").unwrap());
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d]").unwrap());
static CANDIDATE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8}$").unwrap());

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Trim and replace full-width spaces (U+3000) with ASCII spaces
pub fn normalize_text(value: &str) -> String {
    value.trim().replace('\u{3000}', " ")
}

/// `normalize_text`, then map sentinel "none" tokens to an empty string
pub fn normalize_empty(value: &str) -> String {
    let value = normalize_text(value);
    if value.is_empty() || SENTINEL_TOKENS.contains(&value.as_str()) {
        return String::new();
    }
    value
}

/// Normalize a date cell to `YYYY-MM-DD`
///
/// Accepts:
/// - `2026-01-05` → unchanged
/// - `2026/1/5`   → `2026-01-05`
///
/// Everything else becomes an empty string. The calendar is not checked,
/// so `2026/2/31` passes through as `2026-02-31`.
pub fn normalize_date(value: &str) -> String {
    let value = normalize_empty(value);
    if value.is_empty() {
        return value;
    }

    if ISO_DATE.is_match(&value) {
        return value;
    }

    if let Some(caps) = SLASH_DATE.captures(&value) {
        return format!(
            "{}-{}-{}",
            &caps[1],
            zero_pad(&caps[2]),
            zero_pad(&caps[3])
        );
    }

    String::new()
}

/// Strip every non-digit character: `"¥1,200"` → `"1200"`
pub fn normalize_amount(value: &str) -> String {
    let value = normalize_empty(value);
    if value.is_empty() {
        return value;
    }
    NON_DIGIT.replace_all(&value, "").into_owned()
}

/// Interview flags are stored upper-case (`o` → `O`)
pub fn normalize_flag(value: &str) -> String {
    normalize_empty(value).to_uppercase()
}

/// Phone numbers are stored without hyphens
pub fn normalize_phone(value: &str) -> String {
    normalize_empty(value).replace('-', "")
}

/// A candidate ID is exactly eight digits
pub fn is_candidate_id(value: &str) -> bool {
    CANDIDATE_ID.is_match(&normalize_text(value))
}

fn zero_pad(part: &str) -> String {
    if part.chars().count() < 2 {
        format!("0{}", part)
    } else {
        part.to_string()
    }
}

// ============================================================================
// FIELD RULES
// ============================================================================

/// Which primitive a mapped field goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Empty,
    Date,
    Amount,
    Flag,
    Phone,
}

impl FieldRule {
    pub fn apply(&self, value: &str) -> String {
        match self {
            FieldRule::Empty => normalize_empty(value),
            FieldRule::Date => normalize_date(value),
            FieldRule::Amount => normalize_amount(value),
            FieldRule::Flag => normalize_flag(value),
            FieldRule::Phone => normalize_phone(value),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_trims_and_replaces_fullwidth_space() {
        assert_eq!(normalize_text("  山田\u{3000}太郎  "), "山田 太郎");
        assert_eq!(normalize_text("\u{3000}abc\u{3000}"), "abc");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_empty_sentinels() {
        assert_eq!(normalize_empty("N/A"), "");
        assert_eq!(normalize_empty("#N/A"), "");
        assert_eq!(normalize_empty("-"), "");
        assert_eq!(normalize_empty("なし"), "");
        assert_eq!(normalize_empty("  なし "), "");
        assert_eq!(normalize_empty("   "), "");
    }

    #[test]
    fn test_normalize_empty_keeps_real_values() {
        assert_eq!(normalize_empty("Indeed"), "Indeed");
        assert_eq!(normalize_empty("--"), "--");
        assert_eq!(normalize_empty("n/a"), "n/a");
    }

    #[test]
    fn test_normalize_date_slash_format() {
        assert_eq!(normalize_date("2026/1/5"), "2026-01-05");
        assert_eq!(normalize_date("2026/12/25"), "2026-12-25");
        assert_eq!(normalize_date(" 2025/10/3 "), "2025-10-03");
    }

    #[test]
    fn test_normalize_date_iso_unchanged() {
        assert_eq!(normalize_date("2026-01-05"), "2026-01-05");
    }

    #[test]
    fn test_normalize_date_invalid() {
        assert_eq!(normalize_date("invalid"), "");
        assert_eq!(normalize_date("2026-1-5"), "");
        assert_eq!(normalize_date("1/5/2026"), "");
        assert_eq!(normalize_date("2026/1/5 10:00"), "");
        assert_eq!(normalize_date("-"), "");
    }

    #[test]
    fn test_normalize_date_does_not_check_calendar() {
        assert_eq!(normalize_date("2026/2/31"), "2026-02-31");
    }

    #[test]
    fn test_normalize_amount_strips_non_digits() {
        assert_eq!(normalize_amount("¥1,200"), "1200");
        assert_eq!(normalize_amount("\"450,000\""), "450000");
        assert_eq!(normalize_amount("300000円"), "300000");
        assert_eq!(normalize_amount("N/A"), "");
        assert_eq!(normalize_amount("未定"), "");
    }

    #[test]
    fn test_normalize_flag_uppercases() {
        assert_eq!(normalize_flag("o"), "O");
        assert_eq!(normalize_flag(" x "), "X");
        assert_eq!(normalize_flag("-"), "");
        assert_eq!(normalize_flag("ß"), "SS");
    }

    #[test]
    fn test_normalize_phone_removes_hyphens() {
        assert_eq!(normalize_phone("090-1234-5678"), "09012345678");
        assert_eq!(normalize_phone("-"), "");
    }

    #[test]
    fn test_is_candidate_id() {
        assert!(is_candidate_id("12345678"));
        assert!(is_candidate_id(" 12345678 "));
        assert!(!is_candidate_id("1234567"));
        assert!(!is_candidate_id("123456789"));
        assert!(!is_candidate_id("abcd5678"));
        assert!(!is_candidate_id(""));
        assert!(is_candidate_id("１２３４５６７８"));
    }

    #[test]
    fn test_field_rule_dispatch() {
        assert_eq!(FieldRule::Empty.apply("なし"), "");
        assert_eq!(FieldRule::Date.apply("2026/3/9"), "2026-03-09");
        assert_eq!(FieldRule::Amount.apply("¥80,000"), "80000");
        assert_eq!(FieldRule::Flag.apply("o"), "O");
        assert_eq!(FieldRule::Phone.apply("03-1111-2222"), "0311112222");
    }
}
