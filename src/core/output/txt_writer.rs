//! Plain-text transcript writer.

use std::fs;
use std::path::Path;

use crate::core::models::MergedTranscript;
use crate::error::Result;

/// Writes the transcript to a file as UTF-8 text.
///
/// # Format
/// ```text
/// 01/15/24, 10:30 AM - Alice: hello there
/// 01/15/24, 10:31 AM - Bob: <Media omitted>
/// ```
///
/// Lines are separated by `\n`; there is no trailing newline.
pub fn write_transcript(transcript: &MergedTranscript, output_path: &Path) -> Result<()> {
    fs::write(output_path, transcript.to_text())?;
    Ok(())
}
