use std::fs::File;
use std::io;
use std::path::Path;

use crate::common::io::{FileData, open_noatime};
use crate::engine::core::CountError;

/// A finite, re-readable byte source with a known length.
///
/// `Sync` is required because every chunk task reads its own subrange
/// concurrently. Implementations must support independent positioned reads:
/// `read_at` takes `&self` and never moves a shared cursor, so tasks need no
/// synchronization against each other.
pub trait ByteSource: Sync {
    /// Total length in bytes.
    fn len(&self) -> u64;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` from `offset`. The caller only asks for ranges inside
    /// `[0, len)`; anything short of `buf.len()` bytes is a `ReadFailure`.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), CountError>;

    /// Zero-copy view when the whole source is already in memory. Scan tasks
    /// use this to borrow their subrange instead of copying through
    /// `read_at`.
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        None
    }
}

impl ByteSource for [u8] {
    #[inline]
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), CountError> {
        let start = offset as usize;
        match self.get(start..start + buf.len()) {
            Some(src) => {
                buf.copy_from_slice(src);
                Ok(())
            }
            None => Err(CountError::ReadFailure {
                offset,
                len: buf.len(),
                source: io::ErrorKind::UnexpectedEof.into(),
            }),
        }
    }

    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl ByteSource for FileData {
    #[inline]
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), CountError> {
        <[u8] as ByteSource>::read_at(self, offset, buf)
    }

    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(self)
    }
}

/// A file read through positioned I/O (pread) instead of being mapped or
/// buffered. Every chunk task reads its own range through the one shared
/// handle with no seek and no lock — the replacement for serializing a
/// single stream cursor behind a mutex.
pub struct PositionedFile {
    file: File,
    len: u64,
}

impl PositionedFile {
    /// Open a file for positioned reads. Open and stat failures are
    /// `SourceUnavailable`: without a length there is nothing to plan.
    pub fn open(path: &Path) -> Result<Self, CountError> {
        let file = open_noatime(path).map_err(CountError::SourceUnavailable)?;
        let metadata = file.metadata().map_err(CountError::SourceUnavailable)?;
        if !metadata.file_type().is_file() {
            return Err(CountError::SourceUnavailable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        Ok(PositionedFile {
            file,
            len: metadata.len(),
        })
    }
}

impl ByteSource for PositionedFile {
    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), CountError> {
        let len = buf.len();
        let map_err = move |source: io::Error| CountError::ReadFailure {
            offset,
            len,
            source,
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_exact_at(buf, offset).map_err(map_err)
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::FileExt;
            let mut pos = 0usize;
            while pos < buf.len() {
                match self.file.seek_read(&mut buf[pos..], offset + pos as u64) {
                    Ok(0) => return Err(map_err(io::ErrorKind::UnexpectedEof.into())),
                    Ok(n) => pos += n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(map_err(e)),
                }
            }
            Ok(())
        }
    }
}
