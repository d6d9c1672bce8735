//! Error types for PDF Tutor

use crate::generator::DISCLAIMER_TEXT;
use thiserror::Error;

/// Result type alias for PDF Tutor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF Tutor
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Selected file is not an acceptable PDF
    #[error("Invalid file: {reason}")]
    InvalidFile { reason: String },

    /// Selected file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Submit was pressed without a selected file
    #[error("No file selected")]
    NoFileSelected,

    /// Submit was pressed while a request is still running
    #[error("A request is already in progress")]
    RequestInFlight,

    /// PDF could not be opened or read
    #[error("Failed to extract text from PDF: {reason}")]
    Extraction { reason: String },

    /// PDF opened fine but held no text
    #[error("No extractable text in PDF")]
    NoExtractableText,

    /// PDFium library could not be loaded
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// The model declined the content as non-educational
    #[error("{text}", text = DISCLAIMER_TEXT)]
    Disclaimer,

    /// Remote generation call failed or returned something unusable
    #[error("Failed to generate {operation} from AI model: {reason}")]
    Generation {
        operation: &'static str,
        reason: String,
    },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Return a message safe to show to the user.
    /// Local paths and library internals are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::Configuration { reason } => format!("Configuration error: {}", reason),
            Error::InvalidFile { .. } => "Please upload a valid PDF file.".to_string(),
            Error::FileNotFound { .. } => "File not found".to_string(),
            Error::NoFileSelected => "Please upload a PDF file first.".to_string(),
            Error::RequestInFlight => "A request is already in progress".to_string(),
            Error::Extraction { .. } => {
                "Failed to extract text from PDF. The file may be corrupt or protected."
                    .to_string()
            }
            Error::NoExtractableText => {
                "Could not extract text from the PDF. The file might be empty or image-based."
                    .to_string()
            }
            Error::Pdfium { .. } => "PDF engine unavailable".to_string(),
            Error::Disclaimer => DISCLAIMER_TEXT.to_string(),
            Error::Generation { .. } => self.to_string(),
            Error::HttpRequest(e) => format!("Failed to reach the AI service: {}", e),
            Error::Io(_) => "I/O error".to_string(),
        }
    }

    pub(crate) fn generation(operation: &'static str, reason: impl Into<String>) -> Self {
        Error::Generation {
            operation,
            reason: reason.into(),
        }
    }
}
