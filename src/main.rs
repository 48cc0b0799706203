//! # chatcorpus CLI
//!
//! Command-line front end of the chatcorpus library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatcorpus::CorpusError;
use chatcorpus::cli::Args;
use chatcorpus::core::{FilterConfig, OutputConfig, apply_filters};
use chatcorpus::corpus::{Aliases, Corpus};
use chatcorpus::format::write_to_format;
use chatcorpus::parser::SkipKind;

const DEFAULT_LOG_FILTER: &str = "warn,chatcorpus=info";

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), CorpusError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = args.output_path();
    let format = args.output_format();
    let config = args.ingest_config();

    println!("📦 chatcorpus v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (platform, path) in config.inputs() {
        println!("📖 {:<10} {}", format!("{}:", platform), path.display());
    }
    println!("💾 Output:   {}", output_path);
    println!("📄 Format:   {}", format);

    let mut filter_config = FilterConfig::new();
    if let Some(ref after) = args.after {
        filter_config = filter_config.with_date_from(after)?;
        println!("📅 After:    {}", after);
    }
    if let Some(ref before) = args.before {
        filter_config = filter_config.with_date_to(before)?;
        println!("📅 Before:   {}", before);
    }
    if !args.from.is_empty() {
        filter_config = filter_config.with_senders(&args.from);
        println!("👤 From:     {}", args.from.join(", "));
    }
    println!();

    println!("⏳ Ingesting sources...");
    let parse_start = Instant::now();
    let mut corpus = Corpus::ingest(&config);
    let parse_time = parse_start.elapsed();

    for report in &corpus.reports {
        match &report.failure {
            None => println!(
                "   {:<10} {} messages, {} skipped",
                report.platform.to_string(),
                report.messages,
                report.skipped.len()
            ),
            Some(e) => println!("   {:<10} failed: {}", report.platform.to_string(), e),
        }
    }
    if corpus.failed_sources().count() == corpus.reports.len() {
        return Err(first_failure(corpus));
    }
    let original_count = corpus.len();
    println!(
        "   Found {} messages ({:.2}s)",
        original_count,
        parse_time.as_secs_f64()
    );

    if let Some(ref path) = args.aliases {
        let aliases = Aliases::load(path)?;
        println!("🏷️  Applying {} aliases...", aliases.len());
        corpus.apply_aliases(&aliases);
    }

    if let Some(ref myself) = args.myself {
        corpus.require_sender(myself)?;
    }

    if filter_config.is_active() {
        println!("🔍 Filtering messages...");
        corpus.messages = apply_filters(std::mem::take(&mut corpus.messages), &filter_config);
        println!("   {} messages after filtering", corpus.len());
    }

    if args.sort {
        println!("🕒 Sorting chronologically...");
        corpus.sort_chronologically();
    }

    let mut output_config = OutputConfig::new();
    if args.raw {
        output_config = output_config.with_raw_content();
    }

    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(&corpus.messages, &output_path, format, &output_config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    println!();
    println!("📊 Summary:");
    println!("   Ingested:  {} messages", original_count);
    if filter_config.is_active() {
        println!("   Filtered:  {} messages", corpus.len());
    }
    println!("   Senders:   {}", corpus.senders().len());
    println!(
        "   Skipped:   {} items, {} dropped, {} files",
        corpus.skipped_of(SkipKind::Item),
        corpus.skipped_of(SkipKind::Dropped),
        corpus.skipped_of(SkipKind::Unit)
    );

    let total_time = total_start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = original_count as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);

    Ok(())
}

fn first_failure(corpus: Corpus) -> CorpusError {
    corpus
        .reports
        .into_iter()
        .find_map(|r| r.failure)
        .unwrap_or_else(|| CorpusError::invalid_format("input", "no sources configured".to_string()))
}
