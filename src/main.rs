use anyhow::Result;
use std::env;

use staging_builder::logging::init_logging;
use staging_builder::{build_tables, Config, SourceLayout, VERSION};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");

    // No table arguments = build all four
    let layouts = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(|a| SourceLayout::from_arg(a))
        .collect::<Result<Vec<_>>>()?;
    let layouts = if layouts.is_empty() {
        SourceLayout::ALL.to_vec()
    } else {
        layouts
    };

    let config = Config::from_env()?;

    if !json {
        println!("🗂️  Building staging CSVs (v{})", VERSION);
        println!("   Source: {}", config.root_dir.display());
        println!("   Output: {}", config.output_dir.display());
        println!();
    }

    let summary = build_tables(&config, &layouts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in summary.lines() {
            println!("{}", line);
        }
    }

    Ok(())
}
