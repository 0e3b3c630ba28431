use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::StoreError;

/// Directory-rooted object storage: put/get/delete by relative path.
///
/// Stands in for the hosted storage bucket. Writes land in a tempfile next
/// to the root and are persisted atomically, so a partially written upload
/// never becomes visible under its final path.
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Open (or create) the store rooted at `root`.
    pub fn open(root: &str) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let target = self.resolve(path)?;
        match std::fs::read(&target) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found("object", path))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    pub fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        match std::fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found("object", path))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    pub fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.resolve(path)?.exists())
    }

    /// Map a store path onto the filesystem. Absolute paths and anything
    /// containing `.` / `..` components are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(path);
        let valid = !path.is_empty()
            && rel.is_relative()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid object path: {path}"),
            )));
        }
        Ok(self.root.join(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> ObjectStore {
        ObjectStore::open(dir.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store
            .put("videos/team-1/clip.mp4", b"not really a video")
            .unwrap();
        let bytes = store.get("videos/team-1/clip.mp4").unwrap();
        assert_eq!(bytes, b"not really a video");
        assert!(store.exists("videos/team-1/clip.mp4").unwrap());
    }

    #[test]
    fn put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.put("photos/p.jpg", b"v1").unwrap();
        store.put("photos/p.jpg", b"v2").unwrap();
        assert_eq!(store.get("photos/p.jpg").unwrap(), b"v2");
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let result = store.get("contracts/nope.png");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.put("photos/p.jpg", b"bytes").unwrap();
        store.delete("photos/p.jpg").unwrap();
        assert!(!store.exists("photos/p.jpg").unwrap());
        assert!(matches!(
            store.delete("photos/p.jpg"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        assert!(store.put("../escape.txt", b"x").is_err());
        assert!(store.put("/etc/passwd", b"x").is_err());
        assert!(store.get("a/../../b").is_err());
        assert!(store.put("", b"x").is_err());
    }

    #[test]
    fn no_tempfile_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        store.put("a.bin", b"payload").unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("a.bin")]);
    }
}
