//! PDF processing layer
//!
//! This module provides text extraction using PDFium.

mod extractor;
mod reader;

pub use extractor::{PdfiumExtractor, TextExtractor};
pub use reader::{join_page_fragments, join_pages, PdfReader};
