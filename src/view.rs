//! Plain-text rendering of the session

use crate::controller::{Mode, Outcome, Session};
use crate::quiz::{OptionState, QuizPresenter};
use std::fmt::Write;

const RULE: &str = "------------------------------------------------------------";

/// Letter shown next to an option (A, B, C, ...)
pub fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn option_marker(state: OptionState) -> &'static str {
    match state {
        OptionState::Selected => "(*)",
        OptionState::Unselected => "( )",
        OptionState::Correct => "[✓]",
        OptionState::Incorrect => "[✗]",
        OptionState::Neutral => "[ ]",
    }
}

pub fn banner() -> String {
    format!(
        "{rule}\nAI PDF Tutor\nUpload a PDF to get an explanation or test your knowledge with a quiz.\n{rule}\n",
        rule = RULE
    )
}

pub fn footer() -> &'static str {
    "Powered by Gemini AI"
}

pub fn help() -> &'static str {
    "Commands:
  open <path>            select a PDF file
  mode <explain|quiz>    switch between explanation and quiz
  generate               run the selected mode on the selected file
  answer <n> <option>    answer question n with option 1-4 or A-D
  results                submit answers and see your score
  show                   redraw the screen
  help                   show this help
  quit                   exit
"
}

fn tabs(active: Mode) -> String {
    [Mode::Explainer, Mode::Quiz]
        .iter()
        .map(|&mode| {
            if mode == active {
                format!("[{}]", mode.title())
            } else {
                format!(" {} ", mode.title())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn submit_control(session: &Session) -> String {
    if session.is_generating() {
        "[ Processing... ] (disabled)".to_string()
    } else if session.can_submit() {
        format!("[ {} ]  type `generate`", session.mode().submit_label())
    } else {
        format!("[ {} ] (disabled: select a PDF first)", session.mode().submit_label())
    }
}

/// Full screen for the current session
pub fn render(session: &Session) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", tabs(session.mode()));
    match session.file() {
        Some(file) => {
            let _ = writeln!(out, "File selected: {}", file.name());
        }
        None => {
            let _ = writeln!(out, "No file selected. Type `open <path>` (PDF only).");
        }
    }
    let _ = writeln!(out, "{}", submit_control(session));

    if let Some(message) = session.error() {
        let _ = writeln!(out, "\nError: {}", message);
    }

    if session.is_generating() {
        let _ = writeln!(out, "\nAI is thinking... please wait.");
    }

    match session.visible_outcome() {
        Some(Outcome::Explanation(text)) => {
            let _ = writeln!(out, "\n{}\nConcept Explanation\n{}\n{}", RULE, RULE, text);
        }
        Some(Outcome::Quiz(presenter)) => {
            out.push('\n');
            out.push_str(&render_quiz(presenter));
        }
        None => {}
    }

    let _ = writeln!(out, "\n{}", footer());
    out
}

/// Questions, answer markers and, once revealed, answers and score
pub fn render_quiz(presenter: &QuizPresenter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\nTest Your Knowledge!\n{}", RULE, RULE);

    for (q_index, question) in presenter.quiz().iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", q_index + 1, question.question);
        for (o_index, option) in question.options.iter().enumerate() {
            let state = presenter.option_state(q_index, option);
            let _ = writeln!(
                out,
                "   {} {}. {}",
                option_marker(state),
                option_label(o_index),
                option
            );
        }
        if presenter.is_revealed() {
            let _ = writeln!(out, "   Correct Answer: {}", question.correct_answer);
            let _ = writeln!(out, "   {}", question.explanation);
        }
    }

    out.push('\n');
    if presenter.is_revealed() {
        let _ = writeln!(out, "Your Score: {}", presenter.score());
    } else {
        let _ = writeln!(
            out,
            "Answered {} of {}. Type `results` to submit and see results.",
            presenter.answered_count(),
            presenter.quiz().len()
        );
    }
    out
}
