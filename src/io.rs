//! Where bytes come from and where they go.
//!
//! The parser wants the whole file up front and the writer hands over the whole
//! output at once, so both sides are a single call.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, info};

use crate::prelude::*;

// Files above this size are memory mapped instead of read into a buffer
const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

pub trait ByteSource {
    type Bytes: AsRef<[u8]>;

    /// Produce the complete contents.
    fn fetch(&mut self) -> WavResult<Self::Bytes>;
}

pub trait ByteSink {
    /// Accept the complete serialized output.
    fn store(&mut self, bytes: &[u8]) -> WavResult<()>;
}

impl<'a> ByteSource for &'a [u8] {
    type Bytes = &'a [u8];

    fn fetch(&mut self) -> WavResult<Self::Bytes> {
        Ok(*self)
    }
}

impl ByteSink for Vec<u8> {
    fn store(&mut self, bytes: &[u8]) -> WavResult<()> {
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn store(&mut self, bytes: &[u8]) -> WavResult<()> {
        (**self).store(bytes)
    }
}

/// File contents, either owned or mapped.
#[derive(Debug)]
pub enum FileBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl AsRef<[u8]> for FileBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            FileBytes::Owned(bytes) => bytes,
            FileBytes::Mapped(map) => map,
        }
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ByteSource for FileSource {
    type Bytes = FileBytes;

    fn fetch(&mut self) -> WavResult<FileBytes> {
        let mut file = File::open(&self.path)?;
        let file_size = file.metadata()?.len();
        info!("Opening file {} ({} bytes)", self.path.display(), file_size);

        // The handle closes when `file` drops; a mapping stays valid without it.
        if file_size > MMAP_THRESHOLD {
            let map = unsafe { Mmap::map(&file)? };
            debug!("mapped {} bytes", map.len());
            Ok(FileBytes::Mapped(map))
        } else {
            let mut data = Vec::with_capacity(file_size as usize);
            file.read_to_end(&mut data)?;
            Ok(FileBytes::Owned(data))
        }
    }
}

/// Writes through a temporary sibling and renames it into place, so the target is
/// either fully replaced or left alone.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl ByteSink for FileSink {
    fn store(&mut self, bytes: &[u8]) -> WavResult<()> {
        let temp_path = self.temp_path();
        info!("Writing to file {}", self.path.display());

        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| std::fs::rename(&temp_path, &self.path)) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!("Bytes Written: {}", bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dwav-io-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_file_round_trip() {
        let path = scratch("round_trip.wav");
        FileSink::new(&path).store(b"RIFF1234").unwrap();

        let bytes = FileSource::new(&path).fetch().unwrap();
        assert_eq!(bytes.as_ref(), b"RIFF1234");
        assert!(!FileSink::new(&path).temp_path().exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileSource::new(scratch("does_not_exist.wav")).fetch().unwrap_err();
        assert!(matches!(err, WavError::Io(_)));
    }

    #[test]
    fn test_sink_into_missing_directory_fails_cleanly() {
        let path = scratch("no_such_dir").join("out.wav");
        assert!(FileSink::new(&path).store(b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_memory_source_and_sink() {
        let mut source: &[u8] = b"abc";
        assert_eq!(source.fetch().unwrap(), b"abc");

        let mut sink = vec![9, 9, 9, 9];
        sink.store(b"xy").unwrap();
        assert_eq!(sink, b"xy");
    }
}
