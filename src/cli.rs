//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{ArchiveConfig, ConvertConfig};
use crate::core::output::DEFAULT_TRANSCRIPT_NAME;

/// Merge Telegram HTML chat exports into one chronological,
/// spam-filtered WhatsApp-style transcript.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmerge")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmerge messages.html
    chatmerge messages.html messages2.html -o team_chat
    chatmerge exports/*.html -f zip -p s3cret -d out/
    RUST_LOG=chatmerge=debug chatmerge messages.html")]
pub struct Args {
    /// Telegram HTML export files, merged in the given order
    #[arg(required = true, value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Requested output name (sanitized, `.txt` is appended if missing)
    #[arg(short, long, default_value = DEFAULT_TRANSCRIPT_NAME)]
    pub output: String,

    /// Directory the result is written into
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "txt")]
    pub format: OutputFormat,

    /// Archive password (ZIP only; empty means no encryption)
    #[arg(short, long, default_value = "", hide_default_value = true)]
    pub password: String,

    /// Deflate level for ZIP output (0-9)
    #[arg(long, value_name = "N", default_value_t = 5, value_parser = clap::value_parser!(i64).range(0..=9))]
    pub level: i64,

    /// Longest run of consecutive messages kept per sender
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub max_consecutive: usize,

    /// Fail on the first unreadable or unparsable input instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Print failures as a JSON payload on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the extraction settings from the flags.
    pub fn convert_config(&self) -> ConvertConfig {
        ConvertConfig::new()
            .with_max_consecutive(self.max_consecutive)
            .with_skip_invalid(!self.strict)
    }

    /// Builds the archive settings from the flags.
    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new()
            .with_password(self.password.clone())
            .with_compression_level(self.level)
    }

    /// Log filter directive implied by `-v`, used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Output format options.
///
/// - [`Txt`](OutputFormat::Txt) - plain UTF-8 transcript (default)
/// - [`Zip`](OutputFormat::Zip) - transcript inside a ZIP archive, optionally password-protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain text transcript
    #[default]
    Txt,

    /// ZIP archive
    Zip,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Txt => write!(f, "TXT"),
            OutputFormat::Zip => write!(f, "ZIP"),
        }
    }
}
