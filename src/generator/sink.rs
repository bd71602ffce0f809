use crate::error::{Result, ScaffoldError};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Destination for generated files.
///
/// Paths are relative to the application root and may not leave it. Writes
/// happen in call order and are never rolled back: if a later write fails,
/// earlier files stay in place.
pub trait OutputSink {
    fn write_bytes(&mut self, relative: &Path, contents: &[u8]) -> Result<()>;

    fn write(&mut self, relative: &Path, contents: &str) -> Result<()> {
        self.write_bytes(relative, contents.as_bytes())
    }
}

/// Reject absolute paths and `..` so nothing lands outside the root.
fn check_relative(relative: &Path) -> Result<()> {
    let inside = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if inside && relative.components().next().is_some() {
        Ok(())
    } else {
        Err(ScaffoldError::io(
            relative,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "output path must stay inside the application directory",
            ),
        ))
    }
}

/// Writes files under a root directory, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn write_bytes(&mut self, relative: &Path, contents: &[u8]) -> Result<()> {
        check_relative(relative)?;
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| ScaffoldError::io(&path, e))?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }
}

/// Keeps every file in memory, ordered by path. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a text file; `None` if absent or not UTF-8.
    pub fn get(&self, relative: impl AsRef<Path>) -> Option<&str> {
        self.get_bytes(relative)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn get_bytes(&self, relative: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(relative.as_ref()).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_bytes(&mut self, relative: &Path, contents: &[u8]) -> Result<()> {
        check_relative(relative)?;
        self.files.insert(relative.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
