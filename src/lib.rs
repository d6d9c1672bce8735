//! PDF Tutor Library
//!
//! This crate turns a PDF into study material:
//! - `pdf`: page-ordered text extraction with PDFium
//! - `generator`: explanation and quiz generation through Gemini
//! - `controller`: session state and the extract → generate → display flow
//! - `quiz`: answer tracking and scoring
//! - `console`: the interactive terminal front end

pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod generator;
pub mod pdf;
pub mod quiz;
pub mod source;
pub mod view;

pub use config::AppConfig;
pub use controller::{Controller, Mode, Outcome, Phase, Session, Ticket};
pub use error::{Error, Result};
pub use generator::{ContentGenerator, GeminiClient, GenerativeModel, DISCLAIMER_TEXT};
pub use pdf::{PdfiumExtractor, TextExtractor};
pub use quiz::{Question, Quiz, QuizPresenter, Score};
pub use source::SelectedFile;
