use std::fmt;

use snafu::prelude::*;
use tracing::{debug, warn};

use crate::tree::error::{
    AlreadyExistsSnafu, CyclicMoveSnafu, DanglingNodeSnafu, NameCollisionSnafu, NotFoundSnafu,
};
use crate::tree::{DirectoryNames, NaryTree, NodeId, TreeError};

/// Name of the root directory. No other directory may carry it.
pub const ROOT_NAME: &str = "/";

const SEPARATOR: char = '/';
const INDENT: &str = "  ";

/// A rooted directory tree addressed by `/`-delimited paths relative to the root.
///
/// Every operation either succeeds completely or fails without touching the tree.
#[derive(Debug, Clone)]
pub struct Directory {
    tree: NaryTree<DirectoryNames>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self {
            tree: NaryTree::new(ROOT_NAME, DirectoryNames),
        }
    }

    pub fn tree(&self) -> &NaryTree<DirectoryNames> {
        &self.tree
    }

    /// Creates every missing directory along `path`, like `mkdir -p`, but
    /// fails when the final directory is already there.
    pub fn create(&mut self, path: &str) -> Result<(), TreeError> {
        let segments = path.split(SEPARATOR).collect::<Vec<_>>();

        let mut current = self.tree.root();
        let mut existing = 0;
        while let Some(child) = segments
            .get(existing)
            .and_then(|segment| self.tree.child(current, segment))
        {
            current = child;
            existing += 1;
        }
        ensure!(existing < segments.len(), AlreadyExistsSnafu { path });

        let missing = &segments[existing..];
        for segment in missing {
            self.tree.validate_name(segment)?;
        }
        for segment in missing {
            current = self.tree.create_child(current, segment)?;
        }
        debug!("Created '{}' ({} new)", path, missing.len());
        Ok(())
    }

    /// Detaches the directory at `path` and frees it together with its subtree.
    pub fn delete(&mut self, path: &str) -> Result<(), TreeError> {
        let target = self.resolve(path)?;
        let (parent, name) = self.parent_and_name(target)?;

        let detached = self.tree.remove_child(parent, &name)?;
        let freed = self.tree.release(detached)?;
        debug!("Deleted '{}' ({} node(s))", path, freed);
        Ok(())
    }

    /// Moves the directory at `source` with its subtree under `destination`.
    ///
    /// Identical paths are a no-op and are not resolved. Moving a directory
    /// into itself or one of its descendants fails with
    /// [`TreeError::CyclicMove`]; a destination that already holds a child of
    /// the same name fails with [`TreeError::NameCollision`].
    pub fn move_path(&mut self, source: &str, destination: &str) -> Result<(), TreeError> {
        if source == destination {
            debug!("Ignoring move of '{}' onto itself", source);
            return Ok(());
        }

        let node = self.resolve(source)?;
        let target = self.resolve(destination)?;
        ensure!(
            !self.tree.is_within(target, node),
            CyclicMoveSnafu {
                node: source,
                destination,
            }
        );

        let (old_parent, name) = self.parent_and_name(node)?;
        if old_parent == target {
            debug!("'{}' already lives in '{}'", source, destination);
            return Ok(());
        }
        ensure!(
            self.tree.child(target, &name).is_none(),
            NameCollisionSnafu {
                name: &name,
                parent: destination,
            }
        );

        let detached = self.tree.remove_child(old_parent, &name)?;
        self.attach_or_restore(target, detached, old_parent)?;
        debug!("Moved '{}' into '{}'", source, destination);
        Ok(())
    }

    /// Attaches `detached` under `target`, putting it back under `old_parent`
    /// when that fails. The attach error is returned either way.
    fn attach_or_restore(
        &mut self,
        target: NodeId,
        detached: NodeId,
        old_parent: NodeId,
    ) -> Result<(), TreeError> {
        let Err(error) = self.tree.add_child(target, detached) else {
            return Ok(());
        };
        if let Err(restore) = self.tree.add_child(old_parent, detached) {
            warn!("Failed to restore {} after a failed move: {}", detached, restore);
        }
        Err(error)
    }

    /// One line per directory below the root, pre-order with siblings in name
    /// order, indented by two spaces per level.
    pub fn list(&self) -> Vec<String> {
        self.tree
            .descendants(self.tree.root())
            .filter_map(|(depth, id)| {
                self.tree
                    .name(id)
                    .map(|name| format!("{}{}", INDENT.repeat(depth), name))
            })
            .collect()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Follows `path` from the root. Never resolves to the root itself.
    fn resolve(&self, path: &str) -> Result<NodeId, TreeError> {
        let mut current = self.tree.root();
        for segment in path.split(SEPARATOR) {
            current = self
                .tree
                .child(current, segment)
                .with_context(|| NotFoundSnafu {
                    name: segment,
                    parent: self.tree.path_of(current),
                })?;
        }
        Ok(current)
    }

    fn parent_and_name(&self, id: NodeId) -> Result<(NodeId, String), TreeError> {
        let parent = self.tree.parent(id).context(DanglingNodeSnafu { node: id })?;
        let name = self.tree.name(id).context(DanglingNodeSnafu { node: id })?;
        Ok((parent, name.to_string()))
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.list() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
