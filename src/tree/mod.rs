//! In-memory directory tree.
//!
//! [`NaryTree`] owns the nodes and does parent/child bookkeeping, parameterised
//! by a [`NameValidator`] that decides which child names are acceptable.
//! [`Directory`] builds the `/`-delimited path operations on top of it.

mod directory;
mod error;
mod nary_tree;
mod validator;

pub use directory::{Directory, ROOT_NAME};
pub use error::TreeError;
pub use nary_tree::{Descendants, NaryTree, NodeId};
pub use validator::{DirectoryNames, NameValidator, Permissive};
