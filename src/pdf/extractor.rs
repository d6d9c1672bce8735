//! Text extraction seam used by the controller

use crate::error::{Error, Result};
use crate::pdf::reader::PdfReader;
use crate::source::SelectedFile;
use async_trait::async_trait;

/// Turns a selected file into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, in page order.
    ///
    /// Returning whitespace only is not an error at this level.
    async fn extract(&self, file: &SelectedFile) -> Result<String>;
}

/// PDFium-backed extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumExtractor;

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, file: &SelectedFile) -> Result<String> {
        let data = file.read_bytes().await?;

        // Move CPU-heavy PDF work to blocking thread pool
        let reader = tokio::task::spawn_blocking(move || PdfReader::open_bytes(&data))
            .await
            .map_err(|e| Error::Pdfium {
                reason: format!("Task join error: {}", e),
            })??;

        Ok(reader.full_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_rejects_non_pdf_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        fs::write(&path, b"plain text pretending").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        let result = PdfiumExtractor::new().extract(&file).await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let result = PdfiumExtractor::new().extract(&file).await;
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
