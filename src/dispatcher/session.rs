use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::{info, warn};

use crate::dispatcher::{CommandDispatcher, DispatchError, Outcome};

pub const PROMPT: &str = "> ";

/// Ends a session, compared case-insensitively.
pub const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Read-eval loop: one command per input line until end of input or `exit`.
///
/// Listings and failure reports both go to `output`; a failing command never
/// ends the session.
pub struct Session<R, W> {
    dispatcher: CommandDispatcher,
    input: R,
    output: W,
    prompt: bool,
    echo: bool,
    color: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(dispatcher: CommandDispatcher, input: R, output: W) -> Self {
        Self {
            dispatcher,
            input,
            output,
            prompt: false,
            echo: false,
            color: false,
        }
    }

    /// Write [`PROMPT`] before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Write each command, prefixed with [`PROMPT`], before running it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Paint failure reports red.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn into_parts(self) -> (CommandDispatcher, W) {
        (self.dispatcher, self.output)
    }

    pub fn run(&mut self) -> io::Result<SessionSummary> {
        info!("Session started");
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        loop {
            if self.prompt {
                write!(self.output, "{PROMPT}")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            if command.eq_ignore_ascii_case(EXIT_COMMAND) {
                break;
            }
            if self.echo {
                writeln!(self.output, "{PROMPT}{command}")?;
            }

            summary.executed += 1;
            match self.dispatcher.handle_line(command) {
                Ok(Outcome::Applied) => {}
                Ok(Outcome::Listing(lines)) => {
                    for listed in lines {
                        writeln!(self.output, "{listed}")?;
                    }
                }
                Err(error) => {
                    summary.failed += 1;
                    warn!("Rejected '{}': {}", command, error);
                    Self::report(&mut self.output, self.color, command, &error)?;
                }
            }
        }

        self.output.flush()?;
        info!(
            "Session finished: {} command(s), {} failed",
            summary.executed, summary.failed
        );
        Ok(summary)
    }

    fn report(output: &mut W, color: bool, command: &str, error: &DispatchError) -> io::Result<()> {
        let message = format!("Cannot execute '{command}' - {error}");
        if color {
            writeln!(output, "{}", message.as_str().red())
        } else {
            writeln!(output, "{message}")
        }
    }
}
