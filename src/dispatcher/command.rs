use std::str::FromStr;

use derive_more::Display;
use snafu::prelude::*;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Command {
    #[display("CREATE {path}")]
    Create { path: String },
    #[display("DELETE {path}")]
    Delete { path: String },
    #[display("MOVE {source} {destination}")]
    Move { source: String, destination: String },
    #[display("LIST")]
    List,
}

impl Command {
    fn usage(keyword: &str) -> Option<&'static str> {
        match keyword {
            "CREATE" => Some("CREATE <path>"),
            "DELETE" => Some("DELETE <path>"),
            "MOVE" => Some("MOVE <source_path> <destination_path>"),
            "LIST" => Some("LIST"),
            _ => None,
        }
    }
}

/// Tokens are separated by runs of whitespace and the keyword is matched
/// case-insensitively.
impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let given = tokens.next().context(EmptyCommandSnafu)?;
        let keyword = given.to_uppercase();
        let arguments = tokens.collect::<Vec<_>>();

        match (keyword.as_str(), arguments.as_slice()) {
            ("CREATE", [path]) => Ok(Command::Create {
                path: path.to_string(),
            }),
            ("DELETE", [path]) => Ok(Command::Delete {
                path: path.to_string(),
            }),
            ("MOVE", [source, destination]) => Ok(Command::Move {
                source: source.to_string(),
                destination: destination.to_string(),
            }),
            ("LIST", []) => Ok(Command::List),
            (known, found) => match Self::usage(known) {
                Some(usage) => WrongArgumentCountSnafu {
                    command: known,
                    usage,
                    found: found.len(),
                }
                .fail(),
                None => UnknownCommandSnafu { keyword: given }.fail(),
            },
        }
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[snafu(display("Empty command"))]
    EmptyCommand,
    #[snafu(display("Invalid command '{keyword}'"))]
    UnknownCommand { keyword: String },
    #[snafu(display("Invalid parameters for {command}: expected `{usage}`, got {found} argument(s)"))]
    WrongArgumentCount {
        command: String,
        usage: String,
        found: usize,
    },
}
