use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view over the bundled resource directory.
///
/// Logical paths are slash-separated and independent of the platform
/// separator; they are mapped onto the store root segment by segment.
/// The store never writes.
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn physical(&self, logical: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in logical.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Open a leaf asset for reading. Directories are reported as absent,
    /// matching how bundled asset managers behave when a logical path names
    /// a directory instead of a file.
    pub fn open(&self, logical: &str) -> io::Result<fs::File> {
        let path = self.physical(logical);
        let meta = fs::metadata(&path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset is not a regular file: {logical}"),
            ));
        }
        fs::File::open(path)
    }

    /// List the child names of a directory asset, sorted for stable
    /// traversal order. Fails if the logical path is absent or a file.
    pub fn list(&self, logical: &str) -> io::Result<Vec<String>> {
        let path = self.physical(logical);
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
