// DELETE + INSERT script for one month of stg_member_monthly

use anyhow::{bail, Result};
use chrono::Local;
use std::process;

use staging_builder::logging::{init_logging, print_banner, print_outcome};
use staging_builder::{generate_insert_sql, Config};

fn run(config: &Config) -> Result<()> {
    let input = config.month_fixed();
    let output = config.insert_sql();

    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    println!("📖 Input:  {}", input.display());
    println!("📝 Output: {}", output.display());
    println!();

    let rows = generate_insert_sql(&input, &output, &config.month, Local::now().naive_local())?;

    println!("✅ Generated INSERT script");
    println!("   File: {}", output.display());
    println!("   Rows: {}", rows);
    println!();
    println!("📤 Run this script in the database SQL editor");

    Ok(())
}

fn main() {
    init_logging();
    print_banner("Generate INSERT SQL");

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
