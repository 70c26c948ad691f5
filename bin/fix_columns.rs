// Drop blank columns from a month slice so it lines up with stg_member_monthly

use anyhow::{bail, Result};
use std::process;

use staging_builder::logging::{init_logging, print_banner, print_outcome};
use staging_builder::{fix_columns, Config};

fn run(config: &Config) -> Result<()> {
    let input = config.month_extract();
    let output = config.month_fixed();

    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    println!("📖 Input:  {}", input.display());
    println!("📝 Output: {}", output.display());
    println!();

    let summary = fix_columns(&input, &output)?;

    println!("📋 Original columns: {}", summary.original_columns);
    println!("📋 Kept columns:     {}", summary.kept_headers.len());
    println!();
    println!("📋 Fixed header:");
    for (i, col) in summary.kept_headers.iter().enumerate() {
        println!("   {:2}. {}", i + 1, col);
    }
    println!();
    println!("✅ Wrote {}", output.display());
    println!("   Columns:   {}", summary.kept_headers.len());
    println!("   Data rows: {}", summary.data_rows);
    println!();
    println!("📤 Import this file into stg_member_monthly");

    Ok(())
}

fn main() {
    init_logging();
    print_banner("Fix CSV columns (drop blank columns)");

    let result = Config::from_env().and_then(|config| run(&config));

    match result {
        Ok(()) => print_outcome(true),
        Err(e) => {
            println!("❌ Error: {:#}", e);
            print_outcome(false);
            process::exit(1);
        }
    }
}
