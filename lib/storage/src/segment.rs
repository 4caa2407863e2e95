//! Sorted segment files as produced by a bulk load and installed into a table.
//!
//! ```text
//! magic "HXSEG\x01"
//! records   [u32 row len][row][u32 qualifier len][qualifier][u64 timestamp][u8 kind] ...
//! footer    [u64 record count][u32 first row len][first row][u32 last row len][last row]
//! trailer   [u64 footer offset]
//! ```
//!
//! All integers are big-endian. Records are sorted in [IndexRecord] order.

use hexaplex_encoding::{IndexRecord, RecordKind};
use hexaplex_model::{CorruptionError, StorageError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const SEGMENT_MAGIC: &[u8; 6] = b"HXSEG\x01";

/// The file name extension of segment files.
pub const SEGMENT_EXTENSION: &str = "seg";

/// Summary of a finished segment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    pub path: PathBuf,
    pub record_count: u64,
    /// The row of the first record. Empty for empty segments.
    pub first_row: Vec<u8>,
    /// The row of the last record. Empty for empty segments.
    pub last_row: Vec<u8>,
}

/// Buffered writer that appends sorted [IndexRecord]s to a segment file.
pub struct SegmentWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    offset: u64,
    record_count: u64,
    first_row: Option<Vec<u8>>,
    last: Option<IndexRecord>,
}

impl SegmentWriter {
    /// Creates a new segment file at `path`. The file must not exist yet.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::options().write(true).create_new(true).open(&path)?;
        let mut writer = BufWriter::with_capacity(256 * 1024, file);
        writer.write_all(SEGMENT_MAGIC)?;
        Ok(Self {
            writer,
            path,
            offset: SEGMENT_MAGIC.len() as u64,
            record_count: 0,
            first_row: None,
            last: None,
        })
    }

    /// Appends a record. Records must be pushed in sorted order.
    pub fn push(&mut self, record: &IndexRecord) -> Result<(), StorageError> {
        if let Some(last) = &self.last {
            if record < last {
                return Err(StorageError::msg(format!(
                    "Records pushed to segment {} out of order",
                    self.path.display()
                )));
            }
        }

        self.offset += write_bytes(&mut self.writer, &record.row)?;
        self.offset += write_bytes(&mut self.writer, &record.qualifier)?;
        self.writer.write_all(&record.timestamp.to_be_bytes())?;
        self.writer.write_all(&[record.kind.to_byte()])?;
        self.offset += 9;

        if self.first_row.is_none() {
            self.first_row = Some(record.row.clone());
        }
        self.last = Some(record.clone());
        self.record_count += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Writes the footer and flushes the file.
    pub fn finish(mut self) -> Result<SegmentInfo, StorageError> {
        let footer_offset = self.offset;
        let first_row = self.first_row.unwrap_or_default();
        let last_row = self.last.map(|record| record.row).unwrap_or_default();

        self.writer.write_all(&self.record_count.to_be_bytes())?;
        write_bytes(&mut self.writer, &first_row)?;
        write_bytes(&mut self.writer, &last_row)?;
        self.writer.write_all(&footer_offset.to_be_bytes())?;

        let file = self.writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        Ok(SegmentInfo {
            path: self.path,
            record_count: self.record_count,
            first_row,
            last_row,
        })
    }
}

/// Reads the records of a segment file in order.
pub struct SegmentReader {
    reader: BufReader<File>,
    info: SegmentInfo,
    remaining: u64,
}

impl SegmentReader {
    /// Opens a segment file and reads its footer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let mut magic = [0; SEGMENT_MAGIC.len()];
        read_exact(&mut reader, &mut magic, path)?;
        if &magic != SEGMENT_MAGIC {
            return Err(corrupt(path, "invalid magic bytes").into());
        }

        reader.seek(SeekFrom::End(-8))?;
        let footer_offset = read_u64(&mut reader, path)?;
        reader.seek(SeekFrom::Start(footer_offset))?;
        let record_count = read_u64(&mut reader, path)?;
        let first_row = read_bytes(&mut reader, path)?;
        let last_row = read_bytes(&mut reader, path)?;
        reader.seek(SeekFrom::Start(SEGMENT_MAGIC.len() as u64))?;

        Ok(Self {
            reader,
            info: SegmentInfo {
                path: path.to_path_buf(),
                record_count,
                first_row,
                last_row,
            },
            remaining: record_count,
        })
    }

    pub fn info(&self) -> &SegmentInfo {
        &self.info
    }

    fn read_record(&mut self) -> Result<IndexRecord, StorageError> {
        let path = self.info.path.as_path();
        let row = read_bytes(&mut self.reader, path)?;
        let qualifier = read_bytes(&mut self.reader, path)?;
        let timestamp = read_u64(&mut self.reader, path)?;
        let mut kind = [0];
        read_exact(&mut self.reader, &mut kind, path)?;
        let kind = RecordKind::from_byte(kind[0])
            .ok_or_else(|| corrupt(path, format!("unknown record kind {}", kind[0])))?;
        Ok(IndexRecord {
            row,
            qualifier,
            timestamp,
            kind,
        })
    }
}

impl Iterator for SegmentReader {
    type Item = Result<IndexRecord, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = self.read_record();
        if result.is_err() {
            self.remaining = 0;
        }
        Some(result)
    }
}

fn write_bytes(writer: &mut impl Write, bytes: &[u8]) -> Result<u64, StorageError> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| StorageError::msg(format!("Key of {} bytes is too large", bytes.len())))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(bytes)?;
    Ok(4 + u64::from(len))
}

/// Reads a length-prefixed byte string. The buffer only grows with the bytes actually present, so
/// a corrupted length cannot trigger a huge allocation.
fn read_bytes(reader: &mut impl Read, path: &Path) -> Result<Vec<u8>, StorageError> {
    let mut len = [0; 4];
    read_exact(reader, &mut len, path)?;
    let len = u64::from(u32::from_be_bytes(len));
    let mut bytes = Vec::new();
    let read = reader.by_ref().take(len).read_to_end(&mut bytes)?;
    if read as u64 != len {
        return Err(corrupt(path, format!("length {len} exceeds the end of file")).into());
    }
    Ok(bytes)
}

fn read_u64(reader: &mut impl Read, path: &Path) -> Result<u64, StorageError> {
    let mut bytes = [0; 8];
    read_exact(reader, &mut bytes, path)?;
    Ok(u64::from_be_bytes(bytes))
}

fn read_exact(reader: &mut impl Read, buffer: &mut [u8], path: &Path) -> Result<(), StorageError> {
    reader.read_exact(buffer).map_err(|error| {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            corrupt(path, "unexpected end of file").into()
        } else {
            StorageError::Io(error)
        }
    })
}

fn corrupt(path: &Path, msg: impl AsRef<str>) -> CorruptionError {
    CorruptionError::msg(format!("Segment {}: {}", path.display(), msg.as_ref()))
}
