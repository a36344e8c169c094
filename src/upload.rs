//! Upload handler
//!
//! Persists one uploaded image per admin request under the public upload
//! directory. Files are named `<millis>-<field><ext>`; the millisecond stamp
//! is forced to increase within the process so two uploads never collide.
//!
//! No content-type or size checks are made: whatever bytes arrive are written
//! as-is. Only the request body limit bounds the file size.

use crate::error::AppError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Public URL prefix under which uploads are served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// A file part taken from a multipart body, not yet on disk
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct UploadStore {
    dir: PathBuf,
    last_stamp: AtomicI64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_stamp: AtomicI64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the file and return its public path (`/uploads/<name>`).
    /// The directory is created on first use.
    pub async fn save(&self, file: &UploadedFile) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = self.file_name_for(file);
        tokio::fs::write(self.dir.join(&name), &file.bytes).await?;

        debug!("Stored upload {} ({} bytes)", name, file.bytes.len());
        Ok(format!("{}/{}", UPLOADS_ROUTE, name))
    }

    fn file_name_for(&self, file: &UploadedFile) -> String {
        let ext = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        format!("{}-{}{}", self.next_stamp(), sanitize(&file.field_name), ext)
    }

    /// Current time in millis, bumped past the previous stamp if needed
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

/// Field names come from the client; keep them path-safe
fn sanitize(field: &str) -> String {
    let cleaned: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(file_name: &str) -> UploadedFile {
        UploadedFile {
            field_name: "photo".into(),
            file_name: file_name.into(),
            bytes: b"not really a jpeg".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("uploads"));

        let path = store.save(&photo("rex.JPG")).await.unwrap();
        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with("-photo.JPG"));

        let name = path.trim_start_matches("/uploads/");
        let written = std::fs::read(store.dir().join(name)).unwrap();
        assert_eq!(written, b"not really a jpeg");
    }

    #[tokio::test]
    async fn test_names_never_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            assert!(seen.insert(store.save(&photo("a.png")).await.unwrap()));
        }
    }

    #[test]
    fn test_missing_extension_and_odd_field_names() {
        let store = UploadStore::new("unused");
        let file = UploadedFile {
            field_name: "../../etc".into(),
            file_name: "noext".into(),
            bytes: Vec::new(),
        };
        let name = store.file_name_for(&file);
        assert!(name.ends_with("-etc"), "{name}");
        assert!(!name.contains('/'));
    }
}
