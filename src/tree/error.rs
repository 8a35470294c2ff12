use snafu::Snafu;

use crate::tree::NodeId;

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Invalid directory name '{name}'"))]
    InvalidName { name: String },
    #[snafu(display("'{path}' already exists"))]
    AlreadyExists { path: String },
    #[snafu(display("'{name}' does not exist in '{parent}'"))]
    NotFound { name: String, parent: String },
    #[snafu(display("'{name}' already exists in '{parent}'"))]
    NameCollision { name: String, parent: String },
    #[snafu(display("Cannot move '{node}' into its own subtree '{destination}'"))]
    CyclicMove { node: String, destination: String },
    #[snafu(display("Node {node} is no longer part of the tree"))]
    DanglingNode { node: NodeId },
    #[snafu(display("Node {node} is still attached to a parent"))]
    NotDetached { node: NodeId },
}
