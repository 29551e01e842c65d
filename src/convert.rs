//! Request-level conversion operations.
//!
//! A conversion takes the raw bytes of one or more Telegram HTML exports and
//! a requested output name, and returns a ready-to-serve [`Conversion`]:
//!
//! - [`convert_text`] - the merged transcript as UTF-8 text
//! - [`convert_archive`] - the transcript packed in a (password-protected) ZIP
//!
//! ```rust,no_run
//! # fn main() -> chatmerge::Result<()> {
//! use chatmerge::config::ConvertConfig;
//! use chatmerge::convert::convert_text;
//!
//! let docs = vec![std::fs::read("messages.html")?, std::fs::read("messages2.html")?];
//! let result = convert_text(&docs, Some("team chat"), &ConvertConfig::default())?;
//!
//! assert_eq!(result.filename, "team chat.txt");
//! std::fs::write(&result.filename, &result.bytes)?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::config::ConvertConfig;
use crate::core::models::MergedTranscript;
use crate::core::output::{DEFAULT_TRANSCRIPT_NAME, TRANSCRIPT_MIME, transcript_filename};
use crate::core::processor::process_and_merge;
use crate::error::Result;
use crate::parser::RawDocument;

#[cfg(feature = "archive")]
use crate::config::ArchiveConfig;
#[cfg(feature = "archive")]
use crate::core::output::{ARCHIVE_MIME, ArchiveEncoder, archive_filename, write_archive};

/// Result of a conversion: a named, typed payload plus the transcript it
/// was built from.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// Suggested download name
    pub filename: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub transcript: MergedTranscript,
}

/// Merges the documents into a plain-text transcript.
///
/// `requested_name` defaults to `converted_whatsapp.txt`.
///
/// # Errors
///
/// [`ChatmergeError::NoDocuments`](crate::ChatmergeError::NoDocuments) for an
/// empty document list; document errors only in strict mode.
pub fn convert_text<D>(
    documents: &[D],
    requested_name: Option<&str>,
    config: &ConvertConfig,
) -> Result<Conversion>
where
    D: RawDocument,
{
    let transcript = process_and_merge(documents, config)?;
    let filename = transcript_filename(requested_name.unwrap_or(DEFAULT_TRANSCRIPT_NAME));

    Ok(Conversion {
        filename,
        mime_type: TRANSCRIPT_MIME,
        bytes: transcript.to_text().into_bytes(),
        transcript,
    })
}

/// Merges the documents and packs the transcript into a ZIP archive.
///
/// The archive holds one entry named like the `.txt` transcript; the returned
/// filename has the `.zip` extension instead.
///
/// # Errors
///
/// Same as [`convert_text`], plus I/O and archive errors from the encoder.
/// The temporary working directory is removed in every case.
#[cfg(feature = "archive")]
pub fn convert_archive<D, E>(
    documents: &[D],
    requested_name: Option<&str>,
    archive: &ArchiveConfig,
    encoder: &E,
    config: &ConvertConfig,
) -> Result<Conversion>
where
    D: RawDocument,
    E: ArchiveEncoder + ?Sized,
{
    let text = convert_text(documents, requested_name, config)?;
    let bytes = write_archive(&text.transcript.to_text(), &text.filename, archive, encoder)?;

    Ok(Conversion {
        filename: archive_filename(&text.filename),
        mime_type: ARCHIVE_MIME,
        bytes,
        transcript: text.transcript,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_A: &str = r#"<html><body>
        <div class="message default">
          <div class="date" title="15.01.2024 11:00:00 UTC+07:00">11:00</div>
          <div class="from_name">Bob</div>
          <div class="text">world peace</div>
        </div>
    </body></html>"#;

    const DOC_B: &str = r#"<html><body>
        <div class="message default">
          <div class="date" title="15.01.2024 09:00:00 UTC+07:00">09:00</div>
          <div class="from_name">Bob</div>
          <div class="text">hello there</div>
        </div>
    </body></html>"#;

    #[test]
    fn test_convert_text() {
        let result = convert_text(&[DOC_A, DOC_B], None, &ConvertConfig::default()).unwrap();

        assert_eq!(result.filename, "converted_whatsapp.txt");
        assert_eq!(result.mime_type, "text/plain; charset=utf-8");
        assert_eq!(
            String::from_utf8(result.bytes).unwrap(),
            "01/15/24, 09:00 AM - Bob: hello there\n01/15/24, 11:00 AM - Bob: world peace"
        );
        assert_eq!(result.transcript.stats.documents_read, 2);
    }

    #[test]
    fn test_convert_text_requested_name() {
        let result =
            convert_text(&[DOC_A], Some("../../etc/passwd"), &ConvertConfig::default()).unwrap();
        assert_eq!(result.filename, "passwd.txt");

        let result = convert_text(&[DOC_A], Some(""), &ConvertConfig::default()).unwrap();
        assert_eq!(result.filename, "converted_chat.txt");
    }

    #[test]
    fn test_convert_text_no_documents() {
        let docs: Vec<Vec<u8>> = Vec::new();
        let err = convert_text(&docs, None, &ConvertConfig::default()).unwrap_err();
        assert!(err.is_no_documents());
    }

    #[cfg(feature = "archive")]
    #[test]
    fn test_convert_archive() {
        use crate::core::output::ZipEncoder;
        use std::io::{Cursor, Read};

        let archive = ArchiveConfig::new().with_password("pw");
        let result = convert_archive(
            &[DOC_A, DOC_B],
            Some("team"),
            &archive,
            &ZipEncoder,
            &ConvertConfig::default(),
        )
        .unwrap();

        assert_eq!(result.filename, "team.zip");
        assert_eq!(result.mime_type, "application/zip");

        let mut zip = zip::ZipArchive::new(Cursor::new(result.bytes)).unwrap();
        let mut entry = zip.by_index_decrypt(0, b"pw").unwrap();
        assert_eq!(entry.name(), "team.txt");
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert!(text.starts_with("01/15/24, 09:00 AM - Bob: hello there"));
    }
}
