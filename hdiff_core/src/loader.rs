//! Brings file contents into memory for the diff pipeline: small files are
//! read, large ones memory-mapped, and `.gz`/`.bz2` files are decompressed
//! up front. Load failures become report messages, never panics.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use hdiff_common::HdiffError;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Scan at most this many leading bytes for a NUL when testing for a
/// binary file.
pub const BINARY_CHECK_SIZE: usize = 65536;

/// Files above this size are memory-mapped instead of read.
pub const MMAP_THRESHOLD: u64 = 8 * 1024;

/// Hard cap on accepted file size.
pub const MAX_FILE_SIZE: u64 = 100_000_000;

/// Lines shown when previewing a file whose counterpart is missing.
pub const NUM_PREVIEW_LINES: usize = 10;

enum FileBytes {
    Heap(Vec<u8>),
    Mapped(Mmap),
}

impl FileBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            FileBytes::Heap(v) => v,
            FileBytes::Mapped(m) => m,
        }
    }
}

/// One side of a comparison, fully loaded. An unreadable file still yields
/// a `FileData` whose `error` is set, so the pair can be reported.
pub struct FileData {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    bytes: Option<FileBytes>,
    pub error: Option<HdiffError>,
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.extension().is_some_and(|e| e == suffix)
}

impl FileData {
    /// Read, map or decompress the whole file. Never fails; failures are
    /// recorded on the returned value.
    pub fn open(path: &Path) -> FileData {
        let mut file_data = FileData {
            path: path.to_path_buf(),
            size: 0,
            modified: None,
            bytes: None,
            error: None,
        };

        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                file_data.error = Some(err.into());
                return file_data;
            }
        };
        file_data.size = meta.len();
        file_data.modified = meta.modified().ok();

        if meta.len() >= MAX_FILE_SIZE {
            file_data.error = Some(HdiffError::FileTooBig);
            return file_data;
        }
        if meta.len() == 0 {
            return file_data;
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                file_data.error = Some(err.into());
                return file_data;
            }
        };

        if has_suffix(path, "gz") {
            debug!(path = %path.display(), "decompressing gzip file");
            let mut data = Vec::new();
            match GzDecoder::new(file).read_to_end(&mut data) {
                Ok(_) => file_data.bytes = Some(FileBytes::Heap(data)),
                Err(err) => file_data.error = Some(err.into()),
            }
        } else if has_suffix(path, "bz2") {
            debug!(path = %path.display(), "decompressing bzip2 file");
            let mut data = Vec::new();
            match BzDecoder::new(file).read_to_end(&mut data) {
                Ok(_) => file_data.bytes = Some(FileBytes::Heap(data)),
                Err(err) => file_data.error = Some(err.into()),
            }
        } else if meta.len() > MMAP_THRESHOLD {
            // Safety: the mapping is dropped before the pair report returns
            // and the file is never truncated by this process.
            match unsafe { Mmap::map(&file) } {
                Ok(map) => file_data.bytes = Some(FileBytes::Mapped(map)),
                Err(err) => file_data.error = Some(err.into()),
            }
        } else {
            let mut file = file;
            let mut data = Vec::with_capacity(meta.len() as usize);
            match file.read_to_end(&mut data) {
                Ok(_) => file_data.bytes = Some(FileBytes::Heap(data)),
                Err(err) => file_data.error = Some(err.into()),
            }
        }

        file_data
    }

    pub fn data(&self) -> &[u8] {
        self.bytes.as_ref().map_or(&[], |b| b.as_slice())
    }

    /// Classify the loaded bytes for the preview path: empty or binary
    /// content turns into an error message and the data is dropped.
    pub fn check_binary(&mut self) {
        let Some(bytes) = &self.bytes else {
            return;
        };
        let data = bytes.as_slice();
        if data.is_empty() {
            self.bytes = None;
            self.error = Some(HdiffError::ZeroSize);
            return;
        }
        let head = &data[..data.len().min(BINARY_CHECK_SIZE)];
        if head.contains(&0) {
            self.bytes = None;
            self.error = Some(HdiffError::IsBinary);
        }
    }

    /// Split the content into terminator-free lines. `\n`, `\r` and `\r\n`
    /// all end a line; a trailing unterminated line is kept. A NUL within
    /// the leading scan window marks the file binary instead.
    pub fn split_lines(&self) -> Result<Vec<&[u8]>, HdiffError> {
        let data = self.data();
        let mut lines: Vec<&[u8]> = Vec::with_capacity((data.len() / 32).min(500));

        let mut prev = 0usize;
        let mut last = 0u8;
        for (i, &b) in data.iter().enumerate() {
            if b == b'\n' && last == b'\r' {
                prev = i + 1;
            } else if b == b'\n' || b == b'\r' {
                lines.push(&data[prev..i]);
                prev = i + 1;
            } else if b == 0 && i < BINARY_CHECK_SIZE {
                return Err(HdiffError::IsBinary);
            }
            last = b;
        }

        if data.len() > prev {
            lines.push(&data[prev..]);
        }

        Ok(lines)
    }
}
