//! Record Log
//!
//! Append-only, offset-addressed log of length-prefixed records.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{FdictError, Result};
use crate::Offset;

use super::varint::{self, MAX_VARINT_BYTES};

/// Append-only log over a single file handle
///
/// Every record is `[varint len][len bytes]`. A record is readable given
/// only its offset; nothing is ever rewritten or truncated after open.
pub struct RecordLog {
    /// Backing file handle (read + write)
    file: File,
    /// Path of the backing file, for diagnostics
    path: PathBuf,
}

impl RecordLog {
    /// Wrap an already opened read/write handle
    pub fn new(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
        }
    }

    /// Open an existing log read/write, without creating or truncating it
    pub fn open_existing(path: &Path) -> Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| FdictError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file, path))
    }

    /// Append one record, returning the offset of its first byte
    ///
    /// Always seeks to end of file first, so a cursor left anywhere by a
    /// previous read cannot land the write inside existing records.
    pub fn append(&mut self, payload: &[u8]) -> Result<Offset> {
        let offset = self.file.seek(SeekFrom::End(0))?;

        let mut record = Vec::with_capacity(MAX_VARINT_BYTES + payload.len());
        varint::encode(payload.len() as u64, &mut record);
        record.extend_from_slice(payload);

        self.file.write_all(&record)?;

        tracing::trace!(offset, len = payload.len(), "appended record");
        Ok(offset)
    }

    /// Read the payload of the record starting at `offset`
    pub fn read_at(&mut self, offset: Offset) -> Result<Vec<u8>> {
        let (payload, _) = self.read_record(offset)?;
        Ok(payload)
    }

    /// Read the record at `offset` as UTF-8 text
    pub fn read_text_at(&mut self, offset: Offset) -> Result<String> {
        let payload = self.read_at(offset)?;
        String::from_utf8(payload).map_err(|e| FdictError::CorruptRecord {
            offset,
            reason: format!("payload is not valid UTF-8: {}", e),
        })
    }

    /// Walk every record front to back
    ///
    /// The key index is never persisted; this is how a caller rebuilds
    /// one for a reopened file.
    pub fn scan(&mut self) -> Result<RecordScan<'_>> {
        let end = self.len()?;
        Ok(RecordScan {
            log: self,
            next: 0,
            end,
            failed: false,
        })
    }

    /// Current length of the log in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the log, handing back the file handle
    pub fn into_file(self) -> File {
        self.file
    }

    /// Read one record, returning its payload and the offset just past it
    fn read_record(&mut self, offset: Offset) -> Result<(Vec<u8>, Offset)> {
        let len = self.len()?;
        if offset >= len {
            return Err(FdictError::OffsetOutOfRange { offset, len });
        }

        self.file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(&self.file);

        let (payload_len, prefix_len) =
            varint::read_from(&mut reader).map_err(|e| corrupt_or_io(offset, e))?;

        // Reject prefixes pointing past end of file before allocating
        let available = len - offset - prefix_len as u64;
        if payload_len > available {
            return Err(FdictError::CorruptRecord {
                offset,
                reason: format!(
                    "length prefix {} exceeds the {} bytes remaining",
                    payload_len, available
                ),
            });
        }

        let mut payload = vec![0u8; payload_len as usize];
        reader
            .read_exact(&mut payload)
            .map_err(|e| corrupt_or_io(offset, e))?;

        tracing::trace!(offset, len = payload_len, "read record");

        let next = offset + prefix_len as u64 + payload_len;
        Ok((payload, next))
    }
}

/// Framing problems become CorruptRecord, anything else stays an I/O error
fn corrupt_or_io(offset: Offset, e: io::Error) -> FdictError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData => FdictError::CorruptRecord {
            offset,
            reason: e.to_string(),
        },
        _ => FdictError::Io(e),
    }
}

/// Iterator over `(offset, payload)` of every record in a log
///
/// Stops after the first error.
pub struct RecordScan<'a> {
    log: &'a mut RecordLog,
    next: Offset,
    end: u64,
    failed: bool,
}

impl Iterator for RecordScan<'_> {
    type Item = Result<(Offset, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.end {
            return None;
        }

        let offset = self.next;
        match self.log.read_record(offset) {
            Ok((payload, next)) => {
                self.next = next;
                Some(Ok((offset, payload)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
