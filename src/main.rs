//! # chatmerge CLI
//!
//! Command-line interface for the chatmerge library.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use chatmerge::cli::{Args, OutputFormat};
use chatmerge::convert::{Conversion, convert_archive, convert_text};
use chatmerge::core::output::ZipEncoder;
use chatmerge::core::timestamp::format_timestamp;
use chatmerge::{ChatmergeError, Result};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(&args);

    if let Err(e) = run(&args) {
        if args.json_errors {
            match serde_json::to_string(&e.payload()) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("❌ Error: {e}"),
            }
        } else {
            eprintln!("❌ Error: {e}");
        }
        process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let total_start = Instant::now();

    println!("📦 chatmerge v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Inputs:  {} file(s)", args.inputs.len());
    println!("📄 Format:  {}", args.format);
    if args.format == OutputFormat::Zip && !args.password.is_empty() {
        println!("🔒 Password protected");
    }
    println!();

    println!("⏳ Reading inputs...");
    let (documents, unreadable) = read_inputs(&args.inputs, args.strict)?;

    println!("🔀 Merging {} document(s)...", documents.len());
    let merge_start = Instant::now();
    let conversion = convert(args, &documents)?;
    let stats = conversion.transcript.stats;
    for name in &conversion.transcript.skipped {
        println!("⚠️  Skipping {name}: not a readable Telegram HTML export");
    }
    println!(
        "   Kept {} lines ({:.2}s)",
        stats.entries,
        merge_start.elapsed().as_secs_f64()
    );

    println!("💾 Writing {}...", args.format);
    fs::create_dir_all(&args.out_dir)?;
    let output_path = args.out_dir.join(&conversion.filename);
    fs::write(&output_path, &conversion.bytes)?;

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    println!();
    println!("📊 Summary:");
    println!("   Documents: {}", stats.documents_read);
    println!("   Skipped:   {}", stats.documents_skipped + unreadable);
    println!("   Lines:     {}", stats.entries);
    if let Some(earliest) = conversion.transcript.earliest {
        println!("   Earliest:  {}", format_timestamp(&earliest));
    }
    println!("   Time:      {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Reads every input file, returning `(path, contents)` pairs and the number
/// of files that could not be read. In strict mode the first read error is
/// returned.
fn read_inputs(paths: &[PathBuf], strict: bool) -> Result<(Vec<(String, Vec<u8>)>, usize)> {
    let mut documents = Vec::with_capacity(paths.len());
    let mut unreadable = 0;

    for path in paths {
        match fs::read(path) {
            Ok(bytes) => documents.push((path.display().to_string(), bytes)),
            Err(err) if strict => {
                warn!(path = %path.display(), error = %err, "cannot read input");
                return Err(ChatmergeError::from(err));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable input");
                println!("⚠️  Skipping {}: {}", path.display(), err);
                unreadable += 1;
            }
        }
    }

    Ok((documents, unreadable))
}

fn convert(args: &Args, documents: &[(String, Vec<u8>)]) -> Result<Conversion> {
    let config = args.convert_config();
    let requested = Some(args.output.as_str());

    match args.format {
        OutputFormat::Txt => convert_text(documents, requested, &config),
        OutputFormat::Zip => convert_archive(
            documents,
            requested,
            &args.archive_config(),
            &ZipEncoder,
            &config,
        ),
    }
}
