use snafu::prelude::*;
use tracing::debug;

use crate::dispatcher::{Command, CommandError};
use crate::tree::{Directory, TreeError};

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Listing(Vec<String>),
}

/// Applies commands to a directory tree. Holds no state besides the tree.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    root: Directory,
}

impl CommandDispatcher {
    pub fn new(root: Directory) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn into_root(self) -> Directory {
        self.root
    }

    pub fn dispatch(&mut self, command: &Command) -> Result<Outcome, TreeError> {
        debug!("Dispatching {}", command);
        match command {
            Command::Create { path } => self.root.create(path)?,
            Command::Delete { path } => self.root.delete(path)?,
            Command::Move {
                source,
                destination,
            } => self.root.move_path(source, destination)?,
            Command::List => return Ok(Outcome::Listing(self.root.list())),
        }
        Ok(Outcome::Applied)
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, DispatchError> {
        let command = line.parse::<Command>().context(InvalidCommandSnafu)?;
        self.dispatch(&command).context(TreeOperationSnafu {
            command: command.to_string(),
        })
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[snafu(display("{source}"))]
    InvalidCommand { source: CommandError },
    #[snafu(display("{source}"))]
    TreeOperation { command: String, source: TreeError },
}
