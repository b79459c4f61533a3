//! File access used by module resolution and snippet extraction.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory filesystem keyed by absolute path.
///
/// Records every read so callers can assert on access patterns.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Paths read so far, in order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().map(|reads| reads.clone()).unwrap_or_default()
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(path.to_path_buf());
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_tracks_reads() {
        let fs = MemoryFileSystem::new().with_file("/a/b.ts", "x");
        assert!(fs.is_file(Path::new("/a/b.ts")));
        assert!(!fs.is_file(Path::new("/a")));
        assert_eq!(fs.read_to_string(Path::new("/a/b.ts")).unwrap(), "x");
        assert!(fs.read_to_string(Path::new("/a/c.ts")).is_err());
        assert_eq!(fs.reads(), vec![PathBuf::from("/a/b.ts"), PathBuf::from("/a/c.ts")]);
    }

    #[test]
    fn test_os_fs_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("demo.ts"), "export const a = ``;").unwrap();
        assert!(OsFileSystem.is_file(&dir.path().join("demo.ts")));
        assert!(!OsFileSystem.is_file(dir.path()));
    }
}
