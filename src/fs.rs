use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::buffer::Buffer;
use crate::error::{Result, SyncError};

/// Abstraction over file system operations for testing
pub trait FileSystem {
    /// Read the whole file
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Append bytes to an existing file
    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Truncate the file and replace its contents
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Load a whole file into a [`Buffer`].
///
/// A file that cannot be opened for reading is fatal for the run.
pub fn load_buffer<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Buffer> {
    fs.read(path)
        .map(Buffer::new)
        .map_err(|e| SyncError::missing_file(path, e))
}

/// Real file system implementation using std::fs
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(path)?;
        file.write_all(contents)?;
        file.flush()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Overlay that never touches storage on writes.
///
/// Reads come from the wrapped file system until a path has been written or
/// appended to; from then on that path is served from memory.
#[derive(Debug)]
pub struct DryRunFileSystem<F> {
    inner: F,
    overlay: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl<F: FileSystem> DryRunFileSystem<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            overlay: RwLock::new(HashMap::new()),
        }
    }

    /// Contents that would have been written to `path`, if any
    pub fn pending(&self, path: &Path) -> Option<Vec<u8>> {
        self.overlay
            .read()
            .ok()
            .and_then(|files| files.get(path).cloned())
    }

    fn store(&self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        let mut files = self
            .overlay
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "dry-run overlay poisoned"))?;
        files.insert(path.to_path_buf(), contents);
        Ok(())
    }
}

impl<F: FileSystem> FileSystem for DryRunFileSystem<F> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.pending(path) {
            Some(contents) => Ok(contents),
            None => self.inner.read(path),
        }
    }

    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut current = self.read(path)?;
        current.extend_from_slice(contents);
        self.store(path, current)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.store(path, contents.to_vec())
    }
}

/// In-memory file system for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// An edit applied by "another process" right before a given read
    #[derive(Debug, Clone)]
    struct ExternalEdit {
        before_read: usize,
        path: PathBuf,
        appended: Vec<u8>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryFileSystem {
        files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
        read_only: Arc<RwLock<HashSet<PathBuf>>>,
        reads: Arc<Mutex<usize>>,
        edits: Arc<Mutex<Vec<ExternalEdit>>>,
    }

    impl InMemoryFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a file to the mock file system
        pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
            self.files
                .write()
                .unwrap()
                .insert(path.as_ref().to_path_buf(), contents.as_ref().to_vec());
        }

        /// Reject appends and writes to `path`
        pub fn make_read_only(&self, path: impl AsRef<Path>) {
            self.read_only
                .write()
                .unwrap()
                .insert(path.as_ref().to_path_buf());
        }

        /// Append `appended` to `path` just before the `nth` read (1-based)
        pub fn edit_before_read(
            &self,
            nth: usize,
            path: impl AsRef<Path>,
            appended: impl AsRef<[u8]>,
        ) {
            self.edits.lock().unwrap().push(ExternalEdit {
                before_read: nth,
                path: path.as_ref().to_path_buf(),
                appended: appended.as_ref().to_vec(),
            });
        }

        pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
            self.files.read().unwrap().get(path.as_ref()).cloned()
        }

        pub fn contents_lossy(&self, path: impl AsRef<Path>) -> String {
            String::from_utf8_lossy(&self.contents(path).unwrap_or_default()).into_owned()
        }

        pub fn read_count(&self) -> usize {
            *self.reads.lock().unwrap()
        }

        fn check_writable(&self, path: &Path) -> io::Result<()> {
            if self.read_only.read().unwrap().contains(path) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("read-only: {}", path.display()),
                ));
            }
            Ok(())
        }
    }

    impl FileSystem for InMemoryFileSystem {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            let nth = {
                let mut reads = self.reads.lock().unwrap();
                *reads += 1;
                *reads
            };
            for edit in self.edits.lock().unwrap().iter() {
                if edit.before_read == nth {
                    if let Some(file) = self.files.write().unwrap().get_mut(&edit.path) {
                        file.extend_from_slice(&edit.appended);
                    }
                }
            }
            self.files.read().unwrap().get(path).cloned().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )
            })
        }

        fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.check_writable(path)?;
            let mut files = self.files.write().unwrap();
            match files.get_mut(path) {
                Some(file) => {
                    file.extend_from_slice(contents);
                    Ok(())
                }
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )),
            }
        }

        fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.check_writable(path)?;
            self.files
                .write()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_vec());
            Ok(())
        }
    }
}
