//! Validation of user-selected files

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// The only MIME type accepted for upload
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file the user picked for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    name: String,
    mime_type: String,
}

impl SelectedFile {
    /// Select a file by path, deriving its MIME type from the file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        Self::with_declared_type(path, mime_type)
    }

    /// Select a file whose MIME type was declared by the caller
    pub fn with_declared_type<P: AsRef<Path>>(path: P, mime_type: &str) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        if mime_type != PDF_MIME_TYPE {
            return Err(Error::InvalidFile {
                reason: format!("expected {}, got {}", PDF_MIME_TYPE, mime_type),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type: mime_type.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Read the whole file
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
                path: self.path.display().to_string(),
            }),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
