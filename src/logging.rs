use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr so reports on stdout stay clean.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `=` rule used around console banners
pub fn banner_rule() -> String {
    "=".repeat(60)
}

/// Print a titled banner
pub fn print_banner(title: &str) {
    println!("{}", banner_rule());
    println!("{}", title);
    println!("{}", banner_rule());
    println!();
}

/// Closing banner for the maintenance tools
pub fn print_outcome(success: bool) {
    println!("{}", banner_rule());
    if success {
        println!("✅ Done");
    } else {
        println!("❌ Failed");
    }
    println!("{}", banner_rule());
}
