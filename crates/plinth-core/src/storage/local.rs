use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Local filesystem storage provider
#[derive(Clone)]
pub struct LocalStorageProvider {
    base_path: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider with the given base path
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Provider without a base path: relative paths resolve against the
    /// working directory and absolute paths are used as given.
    pub fn unrooted() -> Self {
        Self { base_path: PathBuf::new() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a relative path against the base path
    fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }
}

impl StorageProvider for LocalStorageProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve_path(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve_path(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve_path(path).is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        fs::create_dir_all(&full_path)
            .map_err(|e| StorageSystemError::io(e, "create_dir_all", full_path).into())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);
        fs::read_to_string(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageSystemError::FileNotFound(full_path).into()
            } else {
                StorageSystemError::io(e, "read_to_string", full_path).into()
            }
        })
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        let full_path = self.resolve_path(path);

        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => {
                return Err(StorageSystemError::OperationFailed {
                    operation: "write_string".to_string(),
                    path: full_path,
                    message: "Cannot write to path without parent directory".to_string(),
                }
                .into());
            }
        };
        if !parent.is_dir() {
            fs::create_dir_all(&parent)
                .map_err(|e| StorageSystemError::io(e, "create_dir_all", parent.clone()))?;
        }

        // Write next to the target and persist, atomically replacing it
        let mut temp_file = NamedTempFile::new_in(&parent)
            .map_err(|e| StorageSystemError::io(e, "create_temp_file", parent.clone()))?;
        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| {
                StorageSystemError::io(e, "write_to_temp_file", temp_file.path().to_path_buf())
            })?;
        temp_file
            .persist(&full_path)
            .map_err(|e| StorageSystemError::io(e.error, "persist_temp_file", full_path.clone()))?;

        Ok(())
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>> {
        let full_path = self.resolve_path(path);
        let file = File::open(&full_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageSystemError::FileNotFound(full_path.clone()),
            _ => StorageSystemError::io(e, "open_read", full_path.clone()),
        })?;
        Ok(Box::new(file))
    }
}

impl fmt::Debug for LocalStorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorageProvider")
            .field("base_path", &self.base_path)
            .finish()
    }
}
