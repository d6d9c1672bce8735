//! Quiz data model and answer tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of questions requested from the model
pub const QUIZ_LENGTH: usize = 5;

/// Number of options requested per question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// JSON keys of a question object, as the model sends them
pub const QUESTION_FIELDS: [&str; 4] = ["question", "options", "correctAnswer", "explanation"];

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Expected to equal one of `options`; the model is trusted on this
    pub correct_answer: String,
    pub explanation: String,
}

impl Question {
    /// Whether the correct answer is among the options
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}

/// An ordered list of questions
pub type Quiz = Vec<Question>;

/// Quiz result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// How an option should be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    /// Chosen, results hidden
    Selected,
    /// Not chosen, results hidden
    Unselected,
    /// The right answer, after reveal
    Correct,
    /// Chosen but wrong, after reveal
    Incorrect,
    /// Neither chosen nor right, after reveal
    Neutral,
}

/// Answer state for a displayed quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPresenter {
    quiz: Quiz,
    answers: HashMap<usize, String>,
    revealed: bool,
}

impl QuizPresenter {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: HashMap::new(),
            revealed: false,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Record an answer, replacing any earlier one for the same question.
    ///
    /// Returns false when the selection was ignored (results already shown,
    /// or no such question).
    pub fn select(&mut self, index: usize, option: impl Into<String>) -> bool {
        if self.revealed || index >= self.quiz.len() {
            return false;
        }
        self.answers.insert(index, option.into());
        true
    }

    /// Currently selected option for a question
    pub fn selected(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Number of questions with an answer recorded
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Questions answered exactly right (case-sensitive)
    pub fn score(&self) -> Score {
        let correct = self
            .quiz
            .iter()
            .enumerate()
            .filter(|(i, q)| self.selected(*i) == Some(q.correct_answer.as_str()))
            .count();

        Score {
            correct,
            total: self.quiz.len(),
        }
    }

    /// Freeze answers and compute the score
    pub fn reveal(&mut self) -> Score {
        self.revealed = true;
        self.score()
    }

    pub fn option_state(&self, index: usize, option: &str) -> OptionState {
        let is_selected = self.selected(index) == Some(option);

        if !self.revealed {
            return if is_selected {
                OptionState::Selected
            } else {
                OptionState::Unselected
            };
        }

        let is_correct = self
            .quiz
            .get(index)
            .map(|q| q.correct_answer == option)
            .unwrap_or(false);

        match (is_correct, is_selected) {
            (true, _) => OptionState::Correct,
            (false, true) => OptionState::Incorrect,
            (false, false) => OptionState::Neutral,
        }
    }
}
