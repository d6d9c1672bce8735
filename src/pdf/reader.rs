//! PDF text reader backed by PDFium

use crate::error::{Error, Result};
use pdfium_render::prelude::*;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Check for the `%PDF` magic bytes
fn has_pdf_header(data: &[u8]) -> bool {
    data.len() >= 4 && &data[0..4] == b"%PDF"
}

/// Join the text fragments of one page with single spaces
pub fn join_page_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut page = String::new();
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            page.push(' ');
        }
        page.push_str(fragment.as_ref());
    }
    page
}

/// Concatenate page texts in order, each followed by a newline
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let capacity = pages.iter().map(|p| p.as_ref().len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}

/// Page texts of an opened PDF
#[derive(Debug, Clone)]
pub struct PdfReader {
    page_texts: Vec<String>,
}

impl PdfReader {
    /// Open a PDF from bytes and extract the text of every page
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        if !has_pdf_header(data) {
            return Err(Error::Extraction {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let pdfium = create_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(Self::map_pdfium_error)?;

        let page_texts = Self::extract_all_page_texts(&document)?;
        tracing::debug!(pages = page_texts.len(), "extracted PDF text");

        Ok(Self { page_texts })
    }

    fn extract_all_page_texts(document: &PdfDocument) -> Result<Vec<String>> {
        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Extraction {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            texts.push(Self::extract_page_text(&page));
        }

        Ok(texts)
    }

    /// Text segments of a page in content order; pages without a text layer yield ""
    fn extract_page_text(page: &PdfPage) -> String {
        match page.text() {
            Ok(text) => join_page_fragments(text.segments().iter().map(|s| s.text())),
            Err(_) => String::new(),
        }
    }

    /// Map PDFium errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::Extraction {
                    reason: "PDF is password protected".to_string(),
                }
            }
            _ => Error::Extraction {
                reason: format!("{}", err),
            },
        }
    }

    /// All pages joined in order
    pub fn full_text(&self) -> String {
        join_pages(&self.page_texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_pdf_detection() {
        let result = PdfReader::open_bytes(b"not a pdf");
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[test]
    fn test_truncated_header() {
        assert!(!has_pdf_header(b"%PD"));
        assert!(has_pdf_header(b"%PDF-1.7"));
    }

    #[test]
    fn test_join_page_fragments() {
        assert_eq!(join_page_fragments(["Cells", "divide", "by mitosis."]), "Cells divide by mitosis.");
        assert_eq!(join_page_fragments(Vec::<String>::new()), "");
    }

    #[test]
    fn test_join_pages_keeps_order() {
        let pages = vec!["first page".to_string(), String::new(), "third".to_string()];
        assert_eq!(join_pages(&pages), "first page\n\nthird\n");
    }

    #[test]
    fn test_full_text_ends_each_page() {
        let reader = PdfReader {
            page_texts: vec!["one".to_string(), "two".to_string()],
        };
        assert_eq!(reader.full_text(), "one\ntwo\n");
    }
}
