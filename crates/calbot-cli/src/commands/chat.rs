//! Interactive terminal chat.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use calbot_application::SessionStore;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/reset".to_string(), "/quit".to_string()],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Reset,
    Skip,
    Message(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" => Input::Skip,
        "quit" | "exit" | "/quit" => Input::Quit,
        "reset" | "/reset" => Input::Reset,
        _ => Input::Message(trimmed),
    }
}

/// Runs the read-eval-print loop until the user quits.
pub async fn run(store: Arc<SessionStore>, session_id: &str) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Cal.com AI Chatbot ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'reset' to start over, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        match rl.readline("You: ") {
            Ok(line) => match classify(&line) {
                Input::Quit => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Input::Skip => continue,
                Input::Reset => {
                    store.reset(session_id).await;
                    println!("{}", "Conversation reset.".bright_black());
                }
                Input::Message(text) => {
                    let _ = rl.add_history_entry(text);
                    match store.send(session_id, text).await {
                        Ok(reply) => {
                            println!("{}", "Assistant:".bright_magenta());
                            for line in reply.lines() {
                                println!("{}", line.bright_blue());
                            }
                            println!();
                        }
                        Err(err) => {
                            eprintln!("{}", format!("An error occurred: {err}").red());
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
