//! Object storage for Materials Hub.
//!
//! Filesystem-backed blob store addressed by relative path. Objects are
//! stored under a base directory and exposed through a public base URL:
//!
//! ```text
//! {base_path}/
//! └── uploads/
//!     ├── 1716899000123.pdf
//!     └── 1716899017456.mp4
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::{HubError, Result};

/// Directory prefix for uploaded objects.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Filesystem-backed object store.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Base directory for stored objects.
    base_path: PathBuf,
    /// Base URL under which objects are publicly resolvable.
    public_base_url: String,
}

impl ObjectStore {
    /// Create a new ObjectStore rooted at the given directory.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        let public_base_url = public_base_url.into();
        let public_base_url = public_base_url.trim_end_matches('/').to_string();

        Ok(Self {
            base_path,
            public_base_url,
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Derive a storage path for an upload.
    ///
    /// Paths are `uploads/<epoch-millis>.<extension>`. If the derived path
    /// is already taken, a short random suffix is appended; millisecond
    /// timestamps alone do not guarantee uniqueness.
    pub fn allocate_path(&self, original_name: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let ext = Self::extract_extension(original_name);
        let path = format!("{UPLOADS_PREFIX}/{millis}.{ext}");

        if !self.exists(&path) {
            return path;
        }

        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let path = format!("{UPLOADS_PREFIX}/{millis}-{}.{ext}", &suffix[..4]);
            if !self.exists(&path) {
                return path;
            }
        }
    }

    /// Store content at the given relative path.
    ///
    /// Rejects absolute paths and paths containing parent-directory
    /// components.
    pub fn put(&self, path: &str, content: &[u8]) -> Result<()> {
        let file_path = self.resolve(path)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&file_path, content)?;

        Ok(())
    }

    /// Load the content stored at the given path.
    pub fn get(&self, path: &str) -> Result<Vec<u8>> {
        let file_path = self.resolve(path)?;

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(HubError::NotFound(format!("object {path}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the object at the given path.
    ///
    /// Returns `true` if an object was deleted, `false` if none existed.
    pub fn delete(&self, path: &str) -> Result<bool> {
        let file_path = self.resolve(path)?;

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether an object exists at the given path.
    pub fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(file_path) => file_path.exists(),
            Err(_) => false,
        }
    }

    /// Get the size of a stored object.
    pub fn object_size(&self, path: &str) -> Result<u64> {
        let file_path = self.resolve(path)?;

        match fs::metadata(&file_path) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(HubError::NotFound(format!("object {path}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Public URL for the object at the given path.
    pub fn public_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect();
        format!("{}/{}", self.public_base_url, encoded.join("/"))
    }

    /// Resolve a relative object path against the base directory.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        if path.is_empty() {
            return Err(HubError::Storage("empty object path".to_string()));
        }

        let rel = Path::new(path);
        let traversal = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if traversal {
            return Err(HubError::Storage(format!("invalid object path: {path}")));
        }

        Ok(self.base_path.join(rel))
    }

    /// Extract the file extension from a filename.
    ///
    /// Returns "bin" if no extension is found.
    fn extract_extension(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, ObjectStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ObjectStore::new(temp_dir.path(), "http://localhost:8080/files").unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store_path = temp_dir.path().join("objects");

        assert!(!store_path.exists());

        let store = ObjectStore::new(&store_path, "http://example.com/files/").unwrap();

        assert!(store_path.exists());
        assert_eq!(store.base_path(), store_path);
    }

    #[test]
    fn test_put_and_get() {
        let (_temp_dir, store) = setup_store();
        let content = b"drill sheet";

        store.put("uploads/1716899000123.pdf", content).unwrap();

        let loaded = store.get("uploads/1716899000123.pdf").unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_get_not_found() {
        let (_temp_dir, store) = setup_store();

        let result = store.get("uploads/nonexistent.pdf");
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = setup_store();

        store.put("uploads/gone.pdf", b"bye").unwrap();
        assert!(store.exists("uploads/gone.pdf"));

        assert!(store.delete("uploads/gone.pdf").unwrap());
        assert!(!store.exists("uploads/gone.pdf"));

        // Idempotent: a second delete reports the object was already gone
        assert!(!store.delete("uploads/gone.pdf").unwrap());
    }

    #[test]
    fn test_rejects_traversal() {
        let (_temp_dir, store) = setup_store();

        assert!(store.put("../escape.pdf", b"x").is_err());
        assert!(store.put("uploads/../../escape.pdf", b"x").is_err());
        assert!(store.put("/etc/passwd", b"x").is_err());
        assert!(store.get("..").is_err());
        assert!(!store.exists("../escape.pdf"));
    }

    #[test]
    fn test_allocate_path_format() {
        let (_temp_dir, store) = setup_store();

        let path = store.allocate_path("practice video.mp4");
        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with(".mp4"));

        // Stem is the millisecond timestamp
        let stem = path
            .strip_prefix("uploads/")
            .unwrap()
            .strip_suffix(".mp4")
            .unwrap();
        assert!(stem.parse::<i64>().is_ok());
    }

    #[test]
    fn test_allocate_path_no_extension() {
        let (_temp_dir, store) = setup_store();

        let path = store.allocate_path("README");
        assert!(path.ends_with(".bin"));
    }

    #[test]
    fn test_allocate_path_collision() {
        let (_temp_dir, store) = setup_store();

        let path = store.allocate_path("a.pdf");
        store.put(&path, b"first").unwrap();

        // Allocating again in the same millisecond must pick a new path
        let millis = path
            .strip_prefix("uploads/")
            .unwrap()
            .strip_suffix(".pdf")
            .unwrap();
        let colliding = format!("uploads/{millis}.pdf");
        assert!(store.exists(&colliding));

        // Repeated allocation never returns a taken path
        for _ in 0..5 {
            let next = store.allocate_path("a.pdf");
            assert!(!store.exists(&next));
        }
    }

    #[test]
    fn test_public_url() {
        let (_temp_dir, store) = setup_store();

        assert_eq!(
            store.public_url("uploads/1716899000123.pdf"),
            "http://localhost:8080/files/uploads/1716899000123.pdf"
        );
    }

    #[test]
    fn test_public_url_encodes_segments() {
        let (_temp_dir, store) = setup_store();

        let url = store.public_url("uploads/with space.pdf");
        assert_eq!(url, "http://localhost:8080/files/uploads/with%20space.pdf");
    }

    #[test]
    fn test_object_size() {
        let (_temp_dir, store) = setup_store();
        let content = vec![0xAB; 1024 * 1024];

        store.put("uploads/big.bin", &content).unwrap();
        assert_eq!(store.object_size("uploads/big.bin").unwrap(), 1024 * 1024);

        let missing = store.object_size("uploads/none.bin");
        assert!(matches!(missing, Err(HubError::NotFound(_))));
    }
}
