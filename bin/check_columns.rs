// Column structure check for a month slice of stg_member_monthly
// Reports only; writes nothing.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use staging_builder::logging::{banner_rule, init_logging};
use staging_builder::{check_file, Config};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");

    let config = Config::from_env()?;
    let csv_file = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| config.month_extract());

    let report = check_file(&csv_file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("CSV column structure check");
    println!("{}", rule);
    println!();
    println!("   File: {}", csv_file.display());
    println!();
    print!("{}", report.render());
    println!();
    println!("{}", banner_rule());

    Ok(())
}
