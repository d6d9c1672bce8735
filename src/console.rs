//! Interactive terminal front end

use crate::controller::{Controller, Mode, Outcome};
use crate::error::Error;
use crate::source::SelectedFile;
use crate::view;
use anyhow::Result;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use uuid::Uuid;

const PROMPT: &str = "> ";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Mode(Mode),
    Generate,
    /// Both indices 0-based
    Answer { question: usize, option: usize },
    Results,
    Show,
    Help,
    Quit,
}

fn parse_question(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Invalid question number {:?}", raw)),
    }
}

fn parse_option(raw: &str) -> std::result::Result<usize, String> {
    if let Ok(n) = raw.parse::<usize>() {
        return if n >= 1 {
            Ok(n - 1)
        } else {
            Err(format!("Invalid option {:?}", raw))
        };
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Ok((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => Err(format!("Invalid option {:?}: use 1-4 or A-D", raw)),
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "open" | "upload" => {
                if rest.is_empty() {
                    return Err("Usage: open <path>".to_string());
                }
                let path = rest.trim_matches(|c| c == '"' || c == '\'');
                Ok(Command::Open(PathBuf::from(path)))
            }
            "mode" | "tab" => rest.parse().map(Command::Mode),
            "generate" | "submit" => Ok(Command::Generate),
            "answer" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next(), args.next()) {
                    (Some(q), Some(o), None) => Ok(Command::Answer {
                        question: parse_question(q)?,
                        option: parse_option(o)?,
                    }),
                    _ => Err("Usage: answer <question> <option>".to_string()),
                }
            }
            "results" => Ok(Command::Results),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command {:?}. Type `help`.", other)),
        }
    }
}

/// What the event loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Applies commands to the controller and renders the result
pub struct Console {
    controller: Arc<Controller>,
    completed: mpsc::UnboundedSender<Uuid>,
}

impl Console {
    /// `completed` receives the id of each request once its result is settled
    pub fn new(controller: Arc<Controller>, completed: mpsc::UnboundedSender<Uuid>) -> Self {
        Self {
            controller,
            completed,
        }
    }

    fn screen(&self) -> String {
        view::render(&self.controller.snapshot())
    }

    pub fn handle(&self, command: Command) -> Reply {
        let output = match command {
            Command::Open(path) => self.open(path),
            Command::Mode(mode) => {
                self.controller.set_mode(mode);
                self.screen()
            }
            Command::Generate => self.generate(),
            Command::Answer { question, option } => self.answer(question, option),
            Command::Results => match self.controller.reveal_results() {
                Some(_) => self.screen(),
                None => "There is no quiz to submit. Generate one first.\n".to_string(),
            },
            Command::Show => self.screen(),
            Command::Help => view::help().to_string(),
            Command::Quit => return Reply::Quit,
        };
        Reply::Output(output)
    }

    fn open(&self, path: PathBuf) -> String {
        match SelectedFile::from_path(&path) {
            Ok(file) => {
                self.controller.select_file(Some(file));
                self.screen()
            }
            Err(e) => {
                let alert = self.controller.reject_file(&e);
                format!("Alert: {}\n\n{}", alert, self.screen())
            }
        }
    }

    fn generate(&self) -> String {
        match self.controller.begin_submit() {
            Ok(ticket) => {
                let controller = Arc::clone(&self.controller);
                let completed = self.completed.clone();
                tokio::spawn(async move {
                    let id = ticket.id();
                    let result = controller.execute(&ticket).await;
                    controller.complete(ticket, result);
                    let _ = completed.send(id);
                });
                self.screen()
            }
            Err(Error::RequestInFlight) => "Still processing, please wait.\n".to_string(),
            Err(_) => self.screen(),
        }
    }

    fn answer(&self, question: usize, option: usize) -> String {
        if self.controller.select_option(question, option) {
            return match self.controller.snapshot().visible_outcome() {
                Some(Outcome::Quiz(presenter)) => view::render_quiz(presenter),
                _ => self.screen(),
            };
        }

        match self.controller.snapshot().visible_outcome() {
            Some(Outcome::Quiz(presenter)) if presenter.is_revealed() => {
                "Results are already shown; answers are locked.\n".to_string()
            }
            Some(Outcome::Quiz(_)) => "No such question or option.\n".to_string(),
            _ => "There is no quiz to answer. Generate one first.\n".to_string(),
        }
    }
}

async fn write(out: &mut tokio::io::Stdout, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(controller: Arc<Controller>) -> Result<()> {
    let (completed_tx, mut completed_rx) = mpsc::unbounded_channel();
    let console = Console::new(Arc::clone(&controller), completed_tx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    write(&mut out, &view::banner()).await?;
    write(&mut out, view::help()).await?;
    write(&mut out, &console.screen()).await?;

    loop {
        write(&mut out, PROMPT).await?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => match console.handle(command) {
                        Reply::Output(text) => write(&mut out, &text).await?,
                        Reply::Quit => break,
                    },
                    Err(message) => write(&mut out, &format!("{}\n", message)).await?,
                }
            }
            Some(id) = completed_rx.recv() => {
                tracing::debug!(request = %id, "request settled");
                write(&mut out, &format!("\n{}", console.screen())).await?;
            }
        }
    }

    Ok(())
}
