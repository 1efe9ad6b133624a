//! # telepress CLI
//!
//! Command-line interface for the telepress library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use telepress::cli::Args;
use telepress::convert::convert;
use telepress::diagnostics::Diagnostics;
use telepress::ndjson::read_messages;
use telepress::TelepressError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), TelepressError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let config = args.to_config()?;

    // Print header
    println!("📦 telepress v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Archive: {}", args.ndjson);
    println!("💾 Output:  {}", args.out);
    println!("🖼️ Media:   {}", args.static_dir);
    println!("🕒 Zone:    {}", args.tz);
    if config.dry_run {
        println!("🧪 Mode:    Dry run");
    }
    println!();

    let ndjson_path = Path::new(&args.ndjson);
    // Relative media paths resolve against the archive directory.
    let media_base = ndjson_path.parent().unwrap_or_else(|| Path::new("."));

    println!("📖 Reading archive...");
    let messages = read_messages(ndjson_path)?;
    println!("   Found {} messages", messages.len());

    let mut diagnostics = Diagnostics::new();
    let summary = convert(messages, media_base, &config, &mut diagnostics)?;

    for diagnostic in diagnostics.entries() {
        eprintln!("[warn] {}", diagnostic);
    }

    if config.dry_run {
        for report in &summary.reports {
            println!("   would write {} ({} bytes)", report.name, report.bytes);
        }
    }

    println!();
    println!(
        "✅ Done: {} days processed, {} documents written ({:.2}s)",
        summary.buckets,
        summary.written,
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}
