use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run a binary with every STAGING_* path pointed into `root`
fn run_tool(bin: &str, root: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(bin)
        .args(args)
        .current_dir(root)
        .env("STAGING_ROOT_DIR", root)
        .env("STAGING_OUTPUT_DIR", root.join("out"))
        .env("STAGING_MONTH", "2026_01")
        .env_remove("STAGING_RAW_DIR")
        .env("RUST_LOG", "warn")
        .output()?;
    Ok(output)
}

fn assert_missing_input(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "stdout: {}", stdout);
    assert!(stdout.contains("❌ Error: Input file not found"), "stdout: {}", stdout);
    assert!(stdout.contains("❌ Failed"), "stdout: {}", stdout);
}

#[test]
fn test_fix_columns_missing_input_exits_with_failure() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = run_tool(env!("CARGO_BIN_EXE_fix-columns"), temp_dir.path(), &[])?;

    assert_missing_input(&output);
    assert!(!temp_dir.path().join("out/stg_member_monthly_2026_01_fixed.csv").exists());
    Ok(())
}

#[test]
fn test_extract_month_missing_input_exits_with_failure() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = run_tool(
        env!("CARGO_BIN_EXE_extract-month"),
        temp_dir.path(),
        &["no_such_sheet.csv"],
    )?;

    assert_missing_input(&output);
    Ok(())
}

#[test]
fn test_generate_insert_sql_missing_input_exits_with_failure() -> Result<()> {
    let temp_dir = tempdir()?;
    let output = run_tool(env!("CARGO_BIN_EXE_generate-insert-sql"), temp_dir.path(), &[])?;

    assert_missing_input(&output);
    assert!(!temp_dir.path().join("out/insert_2026_01_data.sql").exists());
    Ok(())
}

#[test]
fn test_extract_month_success_exits_cleanly() -> Result<()> {
    let temp_dir = tempdir()?;
    let sheet = temp_dir.path().join("merge.csv");
    fs::write(&sheet, "年月,メンバー名\n2026_01,田中\n2025_12,佐藤\n")?;

    let output = run_tool(
        env!("CARGO_BIN_EXE_extract-month"),
        temp_dir.path(),
        &[sheet.to_str().unwrap()],
    )?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("✅ Done"));

    let extracted = fs::read_to_string(temp_dir.path().join("out/stg_member_monthly_2026_01.csv"))?;
    assert!(extracted.contains("田中"));
    assert!(!extracted.contains("佐藤"));
    Ok(())
}
