//! File selection

pub mod resolver;

pub use resolver::{SelectedFile, PDF_MIME_TYPE};
