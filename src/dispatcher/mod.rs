//! Textual command boundary around the directory tree.
//!
//! A line is parsed into a [`Command`], the [`CommandDispatcher`] applies it
//! to its [`Directory`](crate::tree::Directory), and a [`Session`] drives the
//! whole thing from a reader to a writer.

mod command;
mod command_dispatcher;
mod session;

pub use command::{Command, CommandError};
pub use command_dispatcher::{CommandDispatcher, DispatchError, Outcome};
pub use session::{EXIT_COMMAND, PROMPT, Session, SessionSummary};
