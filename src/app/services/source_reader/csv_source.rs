//! Streaming reader for the static CSV exports

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::models::{RawRecord, RecordOutcome, SkipReason};
use crate::app::services::record_normalizer::ColumnMapping;
use crate::{Error, Result};

/// A CSV file opened for streaming
///
/// The header row is read on open. Data rows are produced lazily through the
/// [`Iterator`] implementation, so memory use does not grow with file size.
/// Field counts are not enforced here; the normalizer decides what to do with
/// short or long rows.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    reader: csv::Reader<File>,
    mapping: ColumnMapping,
    file_len: u64,
    finished: bool,
}

impl CsvSource {
    /// Open a CSV file and read its header row
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file exists but cannot be opened, and
    /// [`Error::CsvParsing`] when it has no header row.
    pub fn open(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Source file not found: {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to open {}", path.display()),
                    e,
                ));
            }
        };

        let file_len = file.metadata().map(|metadata| metadata.len()).unwrap_or(0);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| {
            Error::csv_parsing(
                path.display().to_string(),
                "Failed to read header row",
                Some(e),
            )
        })?;

        if headers.is_empty() {
            return Err(Error::csv_parsing(
                path.display().to_string(),
                "File is empty, expected a header row",
                None,
            ));
        }

        let mapping = ColumnMapping::analyze(headers.iter());
        info!(
            "Opened {} ({} columns, {} bytes)",
            path.display(),
            mapping.len(),
            file_len
        );

        Ok(Some(Self {
            path: path.to_path_buf(),
            reader,
            mapping,
            file_len,
            finished: false,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header of the file
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Size of the file in bytes when it was opened
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Bytes consumed so far, for progress reporting
    pub fn bytes_read(&self) -> u64 {
        self.reader.position().byte()
    }

    fn read_next(&mut self) -> Option<Result<RecordOutcome<RawRecord>>> {
        let mut record = csv::StringRecord::new();

        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                let line = record.position().map(|position| position.line()).unwrap_or(0);
                let fields = record.iter().map(str::to_string).collect();
                Some(Ok(RecordOutcome::Accepted(RawRecord::new(line, fields))))
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                self.finished = true;
                Some(Err(Error::csv_parsing(
                    self.path.display().to_string(),
                    "Read failed",
                    Some(e),
                )))
            }
            Err(e) => {
                let line = e.position().map(|position| position.line()).unwrap_or(0);
                debug!("Unreadable row at line {} of {}: {}", line, self.path.display(), e);
                Some(Ok(RecordOutcome::Skipped(SkipReason::Unreadable {
                    message: e.to_string(),
                })))
            }
        }
    }
}

impl Iterator for CsvSource {
    type Item = Result<RecordOutcome<RawRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.read_next();
        if item.is_none() {
            self.finished = true;
        }
        item
    }
}
