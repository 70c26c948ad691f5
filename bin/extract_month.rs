// Slice one month out of the merge sheet
// Usage: extract-month [merge-sheet.csv]   (month from STAGING_MONTH)

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use std::process;

use staging_builder::logging::{init_logging, print_banner, print_outcome};
use staging_builder::{extract_month, Config};

fn run(config: &Config, input: PathBuf) -> Result<()> {
    let output = config.month_extract();

    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    println!("📖 Input:  {}", input.display());
    println!("📝 Output: {}", output.display());
    println!();

    let summary = extract_month(&input, &output, &config.month)?;

    println!("✅ Extraction complete");
    println!("   Header columns: {}", summary.header_columns);
    println!("   Rows read:      {}", summary.total_rows);
    println!("   {} rows:   {}", config.month, summary.extracted);
    println!();
    println!("📤 Next: fix-columns, then import or generate-insert-sql");

    Ok(())
}

fn main() {
    init_logging();

    let result = Config::from_env().and_then(|config| {
        print_banner(&format!("Extract month {}", config.month));
        let input = env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| config.member_monthly_input());
        run(&config, input)
    });

    match result {
        Ok(()) => print_outcome(true),
        Err(e) => {
            println!("❌ Error: {:#}", e);
            print_outcome(false);
            process::exit(1);
        }
    }
}
