//! Directory-backed collection.
//!
//! Each file `<key>.<extension>` directly inside the root directory is one
//! item. Subdirectories and files with other extensions are ignored.

use crate::collection::traits::Collection;
use crate::error::{CollectionError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default document file extension.
pub const DEFAULT_EXTENSION: &str = "md";

/// A directory of front-matter text files.
///
/// Keys are file stems. Enumeration is sorted by key so that snapshot order
/// does not depend on the platform's directory listing order.
///
/// # Examples
///
/// ```no_run
/// use casebook::collection::{Collection, DirCollection};
///
/// let collection = DirCollection::new("content/case-studies");
/// let keys = collection.list_keys().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirCollection {
    /// Directory holding the items.
    root: PathBuf,
    /// Extension without the leading dot.
    extension: String,
}

impl DirCollection {
    /// Creates a collection over `root` with the default extension.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the item extension. A leading dot is ignored.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the item extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Maps a key to its file path.
    ///
    /// Returns `None` for keys that could escape the root directory and
    /// for hidden stems (which also covers `.` and `..`).
    #[must_use]
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\', '\0']) {
            return None;
        }
        Some(self.root.join(format!("{key}.{}", self.extension)))
    }

    fn key_of(&self, path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        let key = path.file_stem()?.to_str()?;
        // Only list what `read` can address.
        self.path_for(key).map(|_| key.to_string())
    }

    fn list_failed(&self, err: &std::io::Error) -> CollectionError {
        CollectionError::ListFailed {
            location: self.root.to_string_lossy().to_string(),
            reason: err.to_string(),
        }
    }
}

impl Collection for DirCollection {
    fn list_keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| self.list_failed(&e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| self.list_failed(&e))?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(key) = self.key_of(&path) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CollectionError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn modified(&self, key: &str) -> Result<Option<SystemTime>> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(time) => Ok(Some(time)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CollectionError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn describe(&self) -> String {
        self.root.to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_list_keys_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(&dir, "charlie.md", "c");
        write(&dir, "alpha.md", "a");
        write(&dir, "bravo.md", "b");
        write(&dir, "readme.txt", "ignored");
        fs::create_dir(dir.path().join("nested.md")).unwrap();

        let collection = DirCollection::new(dir.path());
        assert_eq!(
            collection.list_keys().unwrap(),
            vec!["alpha".to_string(), "bravo".to_string(), "charlie".to_string()]
        );
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        let collection = DirCollection::new(dir.path().join("absent"));
        let err = collection.list_keys().unwrap_err();
        assert!(matches!(
            err,
            Error::Collection(CollectionError::ListFailed { .. })
        ));
    }

    #[test]
    fn test_read_existing_and_missing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.md", "---\ntitle: A\n---\nbody");

        let collection = DirCollection::new(dir.path());
        assert_eq!(
            collection.read("alpha").unwrap().as_deref(),
            Some("---\ntitle: A\n---\nbody")
        );
        assert!(collection.read("missing").unwrap().is_none());
    }

    #[test]
    fn test_read_invalid_utf8_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();

        let collection = DirCollection::new(dir.path());
        let err = collection.read("bin").unwrap_err();
        assert!(matches!(
            err,
            Error::Collection(CollectionError::ReadFailed { ref key, .. }) if key == "bin"
        ));
    }

    #[test]
    fn test_modified() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.md", "a");

        let collection = DirCollection::new(dir.path());
        assert!(collection.modified("alpha").unwrap().is_some());
        assert!(collection.modified("missing").unwrap().is_none());
    }

    #[test]
    fn test_path_traversal_is_not_found() {
        let dir = TempDir::new().unwrap();
        let collection = DirCollection::new(dir.path());

        for key in ["../secret", "a/b", "a\\b", "..", ".hidden", ""] {
            assert!(collection.path_for(key).is_none(), "{key} should be rejected");
            assert!(collection.read(key).unwrap().is_none());
        }
    }

    #[test]
    fn test_dotted_stems_listed_and_readable() {
        let dir = TempDir::new().unwrap();
        write(&dir, "v1..2.md", "dotted");
        write(&dir, "release.v2.md", "versioned");
        write(&dir, ".hidden.md", "hidden");

        let collection = DirCollection::new(dir.path());
        let keys = collection.list_keys().unwrap();
        assert_eq!(keys, vec!["release.v2".to_string(), "v1..2".to_string()]);
        for key in &keys {
            assert!(collection.read(key).unwrap().is_some(), "{key} should be readable");
            assert!(collection.modified(key).unwrap().is_some());
        }
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.mdx", "a");
        write(&dir, "bravo.md", "b");

        let collection = DirCollection::new(dir.path()).with_extension(".mdx");
        assert_eq!(collection.extension(), "mdx");
        assert_eq!(collection.list_keys().unwrap(), vec!["alpha".to_string()]);
    }
}
