//! On-disk document storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::Period;

/// `payroll_<employee>_<year>-<month>_v<version>`.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::Period;
/// use payroll_engine::render::document_file_stem;
///
/// let period = Period::new(2026, 3).unwrap();
/// assert_eq!(document_file_stem("emp_001", period, 2), "payroll_emp_001_2026-03_v2");
/// ```
pub fn document_file_stem(employee_id: &str, period: Period, version: u32) -> String {
    let safe: String = employee_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("payroll_{}_{}_v{}", safe, period, version)
}

/// MIME type for a stored document, from its file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => "text/plain; charset=utf-8",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// A document read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// File name, without directories.
    pub file_name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// Document bytes.
    pub bytes: Vec<u8>,
}

/// Writes documents under one directory and never overwrites a file.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Creates a store rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DocumentStore { dir: dir.into() }
    }

    /// The root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` as `<stem>.<extension>`.
    ///
    /// When that name is taken, a UTC timestamp suffix is appended instead of
    /// replacing the existing file.
    pub async fn write_new(&self, stem: &str, extension: &str, bytes: &[u8]) -> EngineResult<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let primary = self.dir.join(format!("{}.{}", stem, extension));
        match Self::create_new(&primary, bytes).await {
            Ok(()) => return Ok(primary),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                warn!(path = %primary.display(), "Document exists; writing with timestamp suffix");
            }
            Err(err) => return Err(err.into()),
        }

        let suffix = Utc::now().format("%Y%m%dT%H%M%S%.6f").to_string().replace('.', "");
        let fallback = self.dir.join(format!("{}_{}.{}", stem, suffix, extension));
        Self::create_new(&fallback, bytes).await?;
        Ok(fallback)
    }

    async fn create_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        debug!(path = %path.display(), size = bytes.len(), "Document written");
        Ok(())
    }

    /// Reads a stored document; `EntityNotFound` when the file is gone.
    pub async fn read(&self, path: &str) -> EngineResult<StoredDocument> {
        let path = Path::new(path);
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(EngineError::not_found("document", path.display()));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(StoredDocument {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content_type: content_type_for(path),
            bytes,
        })
    }

    /// True when `path` names an existing file.
    pub async fn exists(&self, path: &str) -> bool {
        fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("docs"));

        let first = store.write_new("payroll_emp_001_2026-03_v1", "txt", b"one").await.unwrap();
        let second = store.write_new("payroll_emp_001_2026-03_v1", "txt", b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            first.file_name().unwrap().to_str().unwrap(),
            "payroll_emp_001_2026-03_v1.txt"
        );
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_read_back_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let path = store.write_new("slip", "txt", b"hola").await.unwrap();
        let path = path.to_str().unwrap();
        let doc = store.read(path).await.unwrap();
        assert_eq!(doc.bytes, b"hola");
        assert_eq!(doc.file_name, "slip.txt");
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
        assert!(store.exists(path).await);

        std::fs::remove_file(path).unwrap();
        assert!(matches!(
            store.read(path).await,
            Err(EngineError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn test_file_stem_sanitizes_ids() {
        let period = Period::new(2026, 11).unwrap();
        assert_eq!(
            document_file_stem("emp/../x", period, 1),
            "payroll_emp____x_2026-11_v1"
        );
    }
}
