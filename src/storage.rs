//! Filesystem collaborator.
//!
//! A thin, path-based file API with an explicit availability window: the
//! Application initializes it exactly once before the `on_begin` hook runs
//! and tears it down last. The core treats every error as opaque and never
//! retries; callers branch on [`StorageError`] as they see fit.

use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not initialized")]
    NotInitialized,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// How a file is opened for access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

/// What to do about existing/missing files on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail unless the file exists.
    OpenExisting,
    /// Open the file, creating it when missing.
    OpenAlways,
    /// Open at end of file, creating it when missing.
    OpenAppend,
    /// Create or truncate.
    CreateAlways,
    /// Create, failing when the file exists.
    CreateNew,
}

/// Metadata for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    pub is_dir: bool,
}

/// One directory entry from [`Storage::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub info: FileInfo,
}

/// An open file. Closed on drop; use [`File::sync`] when durability matters
/// before that.
pub struct File {
    inner: fs::File,
}

impl File {
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError> {
        Ok(self.inner.read(buffer)?)
    }

    /// Read everything from the current position to end of file.
    pub fn read_to_end(&mut self, buffer: &mut Vec<u8>) -> Result<usize, StorageError> {
        Ok(self.inner.read_to_end(buffer)?)
    }

    pub fn write(&mut self, buffer: &[u8]) -> Result<usize, StorageError> {
        Ok(self.inner.write(buffer)?)
    }

    /// Seek to `offset`, from the start when `from_start`, otherwise
    /// relative to the current position.
    pub fn seek(&mut self, offset: i64, from_start: bool) -> Result<u64, StorageError> {
        let position = if from_start {
            SeekFrom::Start(offset.max(0) as u64)
        } else {
            SeekFrom::Current(offset)
        };
        Ok(self.inner.seek(position)?)
    }

    pub fn tell(&mut self) -> Result<u64, StorageError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn size(&self) -> Result<u64, StorageError> {
        Ok(self.inner.metadata()?.len())
    }

    /// Truncate at the current position.
    pub fn truncate(&mut self) -> Result<(), StorageError> {
        let position = self.inner.stream_position()?;
        self.inner.set_len(position)?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<(), StorageError> {
        Ok(self.inner.sync_all()?)
    }

    pub fn eof(&mut self) -> Result<bool, StorageError> {
        Ok(self.inner.stream_position()? >= self.inner.metadata()?.len())
    }

    /// Copy `size` bytes from the current position of `source` to the
    /// current position of `destination`.
    pub fn copy_to_file(
        source: &mut File,
        destination: &mut File,
        size: u64,
    ) -> Result<u64, StorageError> {
        let mut reader = (&source.inner).take(size);
        Ok(io::copy(&mut reader, &mut destination.inner)?)
    }
}

/// Path-based storage service, initialized once per application lifetime.
pub struct Storage {
    initialized: bool,
}

impl Storage {
    pub(crate) fn new() -> Self {
        Self { initialized: false }
    }

    pub(crate) fn init(&mut self) -> Result<(), StorageError> {
        debug!("storage initialized");
        self.initialized = true;
        Ok(())
    }

    pub(crate) fn destroy(&mut self) {
        if self.initialized {
            debug!("storage destroyed");
            self.initialized = false;
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn guard(&self) -> Result<(), StorageError> {
        if self.initialized { Ok(()) } else { Err(StorageError::NotInitialized) }
    }

    pub fn open(
        &self,
        path: impl AsRef<Path>,
        access: AccessMode,
        mode: OpenMode,
    ) -> Result<File, StorageError> {
        self.guard()?;
        let mut options = fs::OpenOptions::new();
        match access {
            AccessMode::Read => options.read(true),
            AccessMode::Write => options.write(true),
            AccessMode::ReadWrite => options.read(true).write(true),
        };
        match mode {
            OpenMode::OpenExisting => &mut options,
            OpenMode::OpenAlways => options.create(true),
            OpenMode::OpenAppend => options.create(true).append(true),
            OpenMode::CreateAlways => options.create(true).truncate(true),
            OpenMode::CreateNew => options.create_new(true),
        };
        Ok(File { inner: options.open(path)? })
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.initialized && path.as_ref().exists()
    }

    pub fn stat(&self, path: impl AsRef<Path>) -> Result<FileInfo, StorageError> {
        self.guard()?;
        let metadata = fs::metadata(path)?;
        Ok(FileInfo { size: metadata.len(), is_dir: metadata.is_dir() })
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.guard()?;
        let path = path.as_ref();
        if fs::metadata(path)?.is_dir() {
            fs::remove_dir(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn remove_recursive(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.guard()?;
        let path = path.as_ref();
        if fs::metadata(path)?.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn rename(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
    ) -> Result<(), StorageError> {
        self.guard()?;
        Ok(fs::rename(from, to)?)
    }

    pub fn copy(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
    ) -> Result<u64, StorageError> {
        self.guard()?;
        Ok(fs::copy(from, to)?)
    }

    pub fn mkdir(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.guard()?;
        Ok(fs::create_dir_all(path)?)
    }

    pub fn read_dir(&self, path: impl AsRef<Path>) -> Result<Vec<DirEntry>, StorageError> {
        self.guard()?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                info: FileInfo { size: metadata.len(), is_dir: metadata.is_dir() },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// First `{base}{n}.{extension}` under `dir` that does not exist yet.
    pub fn next_filename(
        &self,
        dir: impl AsRef<Path>,
        base: &str,
        extension: &str,
    ) -> Result<PathBuf, StorageError> {
        self.guard()?;
        let dir = dir.as_ref();
        for n in 0u32.. {
            let candidate = dir.join(format!("{base}{n}.{extension}"));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
        unreachable!("u32 filename counter exhausted");
    }
}
