//! Type-safe wrapper for file length and the routine that materializes
//! generated files on disk.

use core::fmt;
use std::cmp::min;
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io;
use std::io::{ErrorKind, Write};
use std::ops::{Add, AddAssign, Mul};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use byte_unit::Byte;
use bytesize::ByteSize;

use crate::error::Error;

/// Represents length of data, in bytes.
/// Provides more type safety and nicer formatting over using a raw u64.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct FileLen(pub u64);

impl From<u64> for FileLen {
    fn from(l: u64) -> Self {
        FileLen(l)
    }
}

impl From<FileLen> for u64 {
    fn from(l: FileLen) -> Self {
        l.0
    }
}

impl Add for FileLen {
    type Output = FileLen;
    fn add(self, rhs: Self) -> Self::Output {
        FileLen(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for FileLen {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0)
    }
}

impl Mul<u64> for FileLen {
    type Output = FileLen;
    fn mul(self, rhs: u64) -> Self::Output {
        FileLen(self.0.saturating_mul(rhs))
    }
}

/// Parses human-readable sizes, e.g. `100`, `4 kB`, `10MiB`.
/// Decimal prefixes are powers of 1000, binary (`Ki`, `Mi`, ...) are powers of 1024.
impl FromStr for FileLen {
    type Err = byte_unit::ByteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = Byte::from_str(s)?;
        Ok(FileLen(b.get_bytes() as u64))
    }
}

impl Display for FileLen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(format!("{}", ByteSize(self.0)).as_str())
    }
}

/// A zero-filled buffer used as the source of data for all written files.
///
/// The buffer is never modified after construction, so it is shared between
/// worker threads without any locking. Its length is the smaller of the file size and
/// the write chunk limit, so large files are written in several chunks.
/// For empty files no buffer is allocated at all.
#[derive(Clone, Debug, Default)]
pub struct ZeroBuffer(Option<Arc<[u8]>>);

impl ZeroBuffer {
    pub fn new(file_len: FileLen, buffer_size: usize) -> ZeroBuffer {
        if file_len.0 == 0 || buffer_size == 0 {
            return ZeroBuffer(None);
        }
        let len = min(file_len.0, buffer_size as u64) as usize;
        ZeroBuffer(Some(vec![0u8; len].into()))
    }

    pub fn as_slice(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates (or truncates) the file at `path` and fills it with exactly `len` zero bytes.
///
/// Data are written in chunks no larger than the buffer. A short write is not an error,
/// the remaining bytes are written by the next iteration. The file handle is closed
/// before returning. On error, the message contains the path and the OS error.
pub fn create_file(path: &Path, buffer: &ZeroBuffer, len: FileLen) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io("Failed to create file", path, e))?;

    if len.0 == 0 {
        return Ok(());
    }
    let buf = match buffer.as_slice() {
        Some(buf) => buf,
        None => {
            return Err(Error::new(format!(
                "Failed to write file {}: no write buffer for {} of data",
                path.display(),
                len
            )))
        }
    };

    let mut remaining = len.0;
    while remaining > 0 {
        let chunk = min(buf.len() as u64, remaining) as usize;
        match file.write(&buf[..chunk]) {
            Ok(0) => {
                let cause = io::Error::from(ErrorKind::WriteZero);
                return Err(Error::io("Failed to write file", path, cause));
            }
            Ok(written) => remaining -= written as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io("Failed to write file", path, e)),
        }
    }
    drop(file);
    Ok(())
}
