//! PDF Tutor - Entry point
//!
//! Interactive terminal client that explains a PDF or quizzes you on it.

use pdf_tutor::{AppConfig, ContentGenerator, Controller, GeminiClient, PdfiumExtractor};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_tutor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Without a key nothing works, so refuse to start
    let config = AppConfig::from_env()?;
    tracing::info!(model = %config.model, "Starting PDF Tutor");

    let model = GeminiClient::new(&config)?;
    let controller = Arc::new(Controller::new(
        Arc::new(PdfiumExtractor::new()),
        ContentGenerator::new(Arc::new(model)),
    ));

    pdf_tutor::console::run(controller).await
}
