//! Session state and the extract → generate → display flow

use crate::error::{Error, Result};
use crate::generator::{ContentGenerator, DISCLAIMER_TEXT};
use crate::pdf::TextExtractor;
use crate::quiz::{QuizPresenter, Score};
use crate::source::SelectedFile;
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Which kind of content to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Explainer,
    Quiz,
}

impl Mode {
    /// Label of the submit control
    pub fn submit_label(self) -> &'static str {
        match self {
            Mode::Explainer => "Generate Explanation",
            Mode::Quiz => "Generate Quiz",
        }
    }

    /// Tab title
    pub fn title(self) -> &'static str {
        match self {
            Mode::Explainer => "Concept Explainer",
            Mode::Quiz => "Quiz Generator",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Explainer => f.write_str("explainer"),
            Mode::Quiz => f.write_str("quiz"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explain" | "explainer" | "explanation" => Ok(Mode::Explainer),
            "quiz" => Ok(Mode::Quiz),
            other => Err(format!(
                "Unknown mode {:?}: expected \"explain\" or \"quiz\"",
                other
            )),
        }
    }
}

/// A generated result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Explanation(String),
    Quiz(QuizPresenter),
}

impl Outcome {
    /// Mode that produced this result
    pub fn mode(&self) -> Mode {
        match self {
            Outcome::Explanation(_) => Mode::Explainer,
            Outcome::Quiz(_) => Mode::Quiz,
        }
    }
}

/// Stamp of one submit.
///
/// A result is applied only while the session still matches its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: Uuid,
    mode: Mode,
    selection: Uuid,
    file: SelectedFile,
}

impl Ticket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Generating(Ticket),
    Success(Outcome),
    Failed(String),
}

/// Everything the user interface displays
#[derive(Debug, Clone)]
pub struct Session {
    file: Option<SelectedFile>,
    mode: Mode,
    phase: Phase,
    selection: Uuid,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            file: None,
            mode: Mode::default(),
            phase: Phase::Idle,
            selection: Uuid::new_v4(),
        }
    }
}

impl Session {
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating(_))
    }

    /// Submit is enabled only with a file and nothing in flight
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_generating()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Result to display under the active tab
    pub fn visible_outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Success(outcome) if outcome.mode() == self.mode => Some(outcome),
            _ => None,
        }
    }

    fn quiz_mut(&mut self) -> Option<&mut QuizPresenter> {
        let mode = self.mode;
        match &mut self.phase {
            Phase::Success(Outcome::Quiz(presenter)) if mode == Mode::Quiz => Some(presenter),
            _ => None,
        }
    }

    fn resting_phase(&self) -> Phase {
        if self.file.is_some() {
            Phase::FileSelected
        } else {
            Phase::Idle
        }
    }
}

/// Map a failure to the single message shown to the user
pub fn failure_message(err: &Error) -> String {
    match err {
        Error::Disclaimer => DISCLAIMER_TEXT.to_string(),
        Error::NoExtractableText | Error::NoFileSelected => err.client_message(),
        other => format!(
            "An error occurred while processing your request: {}. Please try again.",
            other.client_message().trim_end_matches('.')
        ),
    }
}

/// Owns the session and sequences extraction and generation
pub struct Controller {
    extractor: Arc<dyn TextExtractor>,
    generator: ContentGenerator,
    session: Mutex<Session>,
}

impl Controller {
    pub fn new(extractor: Arc<dyn TextExtractor>, generator: ContentGenerator) -> Self {
        Self {
            extractor,
            generator,
            session: Mutex::new(Session::default()),
        }
    }

    /// Copy of the current session for rendering
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Replace the selected file and clear any previous result or error
    pub fn select_file(&self, file: Option<SelectedFile>) {
        let mut session = self.session.lock();
        if let Some(f) = &file {
            tracing::debug!(file = %f.name(), "file selected");
        }
        session.file = file;
        session.selection = Uuid::new_v4();
        session.phase = session.resting_phase();
    }

    /// Discard an unacceptable selection.
    ///
    /// The previous file is dropped too. Returns the alert to show.
    pub fn reject_file(&self, err: &Error) -> String {
        tracing::warn!(error = %err, "file selection rejected");
        self.select_file(None);
        err.client_message()
    }

    pub fn set_mode(&self, mode: Mode) {
        self.session.lock().mode = mode;
    }

    /// Move into `Generating` and hand out the ticket for this request
    pub fn begin_submit(&self) -> Result<Ticket> {
        let mut session = self.session.lock();

        if session.is_generating() {
            return Err(Error::RequestInFlight);
        }

        let Some(file) = session.file.clone() else {
            session.phase = Phase::Failed(failure_message(&Error::NoFileSelected));
            return Err(Error::NoFileSelected);
        };

        let ticket = Ticket {
            id: Uuid::new_v4(),
            mode: session.mode,
            selection: session.selection,
            file,
        };
        tracing::debug!(request = %ticket.id, mode = %ticket.mode, "request started");
        session.phase = Phase::Generating(ticket.clone());

        Ok(ticket)
    }

    /// Run extraction then generation for a ticket, without touching the session
    pub async fn execute(&self, ticket: &Ticket) -> Result<Outcome> {
        let text = self.extractor.extract(&ticket.file).await?;

        if text.trim().is_empty() {
            return Err(Error::NoExtractableText);
        }

        match ticket.mode {
            Mode::Explainer => {
                let explanation = self.generator.explain(&text).await?;
                Ok(Outcome::Explanation(explanation))
            }
            Mode::Quiz => {
                let quiz = self.generator.generate_quiz(&text).await?;
                Ok(Outcome::Quiz(QuizPresenter::new(quiz)))
            }
        }
    }

    /// Store the result of a request if the session still matches its ticket.
    ///
    /// Returns whether the result was applied.
    pub fn complete(&self, ticket: Ticket, result: Result<Outcome>) -> bool {
        let mut session = self.session.lock();

        let in_flight = matches!(&session.phase, Phase::Generating(t) if t.id == ticket.id);
        if !in_flight {
            tracing::debug!(request = %ticket.id, "discarding result of superseded request");
            return false;
        }

        if session.mode != ticket.mode || session.selection != ticket.selection {
            tracing::debug!(request = %ticket.id, "discarding stale result");
            session.phase = session.resting_phase();
            return false;
        }

        session.phase = match result {
            Ok(outcome) => Phase::Success(outcome),
            Err(e) => {
                tracing::warn!(request = %ticket.id, error = %e, "request failed");
                Phase::Failed(failure_message(&e))
            }
        };
        true
    }

    /// Submit and wait for the result
    pub async fn submit(&self) -> Result<bool> {
        let ticket = self.begin_submit()?;
        let result = self.execute(&ticket).await;
        Ok(self.complete(ticket, result))
    }

    /// Record an answer for the displayed quiz
    pub fn select_answer(&self, index: usize, option: &str) -> bool {
        self.session
            .lock()
            .quiz_mut()
            .map(|quiz| quiz.select(index, option))
            .unwrap_or(false)
    }

    /// Record an answer by option position (0-based)
    pub fn select_option(&self, index: usize, option: usize) -> bool {
        let mut session = self.session.lock();
        let Some(quiz) = session.quiz_mut() else {
            return false;
        };
        let Some(text) = quiz.quiz().get(index).and_then(|q| q.options.get(option)).cloned()
        else {
            return false;
        };
        quiz.select(index, text)
    }

    /// Freeze the displayed quiz and score it
    pub fn reveal_results(&self) -> Option<Score> {
        self.session.lock().quiz_mut().map(QuizPresenter::reveal)
    }
}
