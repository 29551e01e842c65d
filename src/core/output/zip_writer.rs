//! ZIP archive writer.
//!
//! The transcript is written to a scoped temporary directory, handed to an
//! [`ArchiveEncoder`], and the resulting archive is read back into memory.
//! The directory is removed when the [`TempDir`] guard drops, on success and
//! on every error path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;
use zip::unstable::write::FileOptionsExt;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::archive_filename;
use crate::config::ArchiveConfig;
use crate::core::normalize::sanitize_filename;
use crate::error::{ChatmergeError, Result};

/// Produces an archive file from a single plaintext file.
///
/// An empty `password` must yield an unprotected archive.
pub trait ArchiveEncoder {
    fn compress(
        &self,
        source: &Path,
        comment: Option<&str>,
        destination: &Path,
        password: &str,
        level: i64,
    ) -> Result<()>;
}

/// [`ArchiveEncoder`] backed by the `zip` crate.
///
/// Writes one Deflate entry named after the source file. A non-empty password
/// enables traditional PKWARE (ZipCrypto) encryption, which every common
/// unzip tool can open.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipEncoder;

impl ArchiveEncoder for ZipEncoder {
    fn compress(
        &self,
        source: &Path,
        comment: Option<&str>,
        destination: &Path,
        password: &str,
        level: i64,
    ) -> Result<()> {
        let entry_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ChatmergeError::invalid_format("archive", "source path has no file name")
                    .with_path(source)
            })?;
        let data = fs::read(source)?;

        let mut writer = ZipWriter::new(BufWriter::new(File::create(destination)?));
        if let Some(comment) = comment {
            writer.set_comment(comment);
        }

        // deflate starts at level 1; 0 means store
        let mut options = if level <= 0 {
            FileOptions::<()>::default().compression_method(CompressionMethod::Stored)
        } else {
            FileOptions::<()>::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(level))
        };
        if !password.is_empty() {
            options = options.with_deprecated_encryption(password.as_bytes());
        }

        writer.start_file(entry_name, options)?;
        writer.write_all(&data)?;
        writer.finish()?.flush()?;
        Ok(())
    }
}

/// Packs `text` into an archive and returns the archive bytes.
///
/// The entry inside the archive is named after the last path component of
/// `transcript_name`, so the plaintext never leaves the scoped work directory.
pub fn write_archive<E>(
    text: &str,
    transcript_name: &str,
    config: &ArchiveConfig,
    encoder: &E,
) -> Result<Vec<u8>>
where
    E: ArchiveEncoder + ?Sized,
{
    let workdir = tempfile::Builder::new().prefix("chatmerge-").tempdir()?;
    let bytes = encode_in(&workdir, text, transcript_name, config, encoder)?;
    debug!(
        archive_bytes = bytes.len(),
        protected = config.is_protected(),
        "archive written"
    );
    Ok(bytes)
}

fn encode_in<E>(
    workdir: &TempDir,
    text: &str,
    transcript_name: &str,
    config: &ArchiveConfig,
    encoder: &E,
) -> Result<Vec<u8>>
where
    E: ArchiveEncoder + ?Sized,
{
    let entry_name = sanitize_filename(transcript_name);
    let source = workdir.path().join(&entry_name);
    let destination = workdir.path().join(archive_filename(&entry_name));

    fs::write(&source, text)?;
    encoder.compress(
        &source,
        config.comment.as_deref(),
        &destination,
        &config.password,
        config.compression_level,
    )?;
    Ok(fs::read(&destination)?)
}
