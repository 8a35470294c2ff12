use std::collections::BTreeMap;
use std::iter;

use derive_more::Display;
use snafu::prelude::*;
use tracing::debug;

use crate::tree::error::{
    CyclicMoveSnafu, DanglingNodeSnafu, NameCollisionSnafu, NotDetachedSnafu, NotFoundSnafu,
};
use crate::tree::{NameValidator, TreeError};

/// Handle to a node stored in a [`NaryTree`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("#{_0}")]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
}

impl Node {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: BTreeMap::new(),
        }
    }
}

/// Arena of uniquely named nodes.
///
/// Ownership flows from parent to children: a node is reachable from the root
/// only through `children` maps, while `parent` is a plain handle back up.
/// A node detached with [`NaryTree::remove_child`] stays allocated until
/// [`NaryTree::release`] frees its whole subtree.
#[derive(Debug, Clone)]
pub struct NaryTree<V> {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: NodeId,
    validator: V,
}

impl<V: NameValidator> NaryTree<V> {
    /// The root name is taken as is, without consulting the validator.
    pub fn new(root_name: impl Into<String>, validator: V) -> Self {
        Self {
            nodes: vec![Some(Node::new(root_name, None))],
            free: Vec::new(),
            root: NodeId(0),
            validator,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn validate_name(&self, name: &str) -> Result<(), TreeError> {
        self.validator.validate_name(name)
    }

    /// Number of live nodes, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.get(id)
            .and_then(|node| node.children.get(name).copied())
    }

    /// Children of `id` in name order.
    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = (&str, NodeId)> + '_ {
        self.get(id).into_iter().flat_map(|node| {
            node.children
                .iter()
                .map(|(name, &child)| (name.as_str(), child))
        })
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), |&ancestor| self.parent(ancestor))
    }

    /// Whether `id` is `subtree` itself or one of its descendants.
    pub fn is_within(&self, id: NodeId, subtree: NodeId) -> bool {
        id == subtree || self.ancestors(id).any(|ancestor| ancestor == subtree)
    }

    /// `/`-joined names from the topmost attached ancestor down to `id`.
    /// A node without a parent is rendered as its own name.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = iter::successors(Some(id), |&node| self.parent(node))
            .filter(|&node| self.parent(node).is_some())
            .filter_map(|node| self.name(node))
            .collect::<Vec<_>>();
        if names.is_empty() {
            return self.name(id).unwrap_or_default().to_string();
        }
        names.reverse();
        names.join("/")
    }

    pub fn descendants(&self, start: NodeId) -> Descendants<'_, V> {
        Descendants {
            tree: self,
            stack: self
                .children(start)
                .rev()
                .map(|(_, child)| (0, child))
                .collect(),
        }
    }

    /// Returns the child called `name`, creating it first if needed.
    pub fn create_child(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.validator.validate_name(name)?;
        let node = self.get(parent).context(DanglingNodeSnafu { node: parent })?;
        if let Some(&existing) = node.children.get(name) {
            return Ok(existing);
        }

        let child = self.allocate(Node::new(name, Some(parent)));
        self.live_mut(parent)?
            .children
            .insert(name.to_string(), child);
        debug!("Created '{}'", self.path_of(child));
        Ok(child)
    }

    /// Attaches the detached subtree rooted at `child` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let node = self.get(child).context(DanglingNodeSnafu { node: child })?;
        ensure!(
            node.parent.is_none() && child != self.root,
            NotDetachedSnafu { node: child }
        );
        let name = node.name.clone();

        let parent_node = self.get(parent).context(DanglingNodeSnafu { node: parent })?;
        ensure!(
            !parent_node.children.contains_key(&name),
            NameCollisionSnafu {
                name: &name,
                parent: self.path_of(parent),
            }
        );
        ensure!(
            !self.is_within(parent, child),
            CyclicMoveSnafu {
                node: &name,
                destination: self.path_of(parent),
            }
        );

        self.live_mut(parent)?.children.insert(name, child);
        self.live_mut(child)?.parent = Some(parent);
        debug!("Attached '{}'", self.path_of(child));
        Ok(())
    }

    /// Detaches the child called `name` and returns its handle.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        let removed = self.live_mut(parent)?.children.remove(name);
        let child = removed.with_context(|| NotFoundSnafu {
            name,
            parent: self.path_of(parent),
        })?;
        self.live_mut(child)?.parent = None;
        debug!("Detached '{}' from '{}'", name, self.path_of(parent));
        Ok(child)
    }

    /// Frees a detached subtree. Its handles dangle afterwards and the slots
    /// are reused by later creations. Returns the number of freed nodes.
    pub fn release(&mut self, id: NodeId) -> Result<usize, TreeError> {
        let node = self.get(id).context(DanglingNodeSnafu { node: id })?;
        ensure!(
            node.parent.is_none() && id != self.root,
            NotDetachedSnafu { node: id }
        );

        let mut pending = vec![id];
        let mut freed = 0;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                pending.extend(node.children.into_values());
                self.free.push(current);
                freed += 1;
            }
        }
        debug!("Released {} node(s) starting at {}", freed, id);
        Ok(freed)
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .context(DanglingNodeSnafu { node: id })
    }
}

/// Depth-first, pre-order walk below a node yielding `(depth, node)`, with
/// depth 0 for the immediate children. Siblings come out in name order.
pub struct Descendants<'a, V> {
    tree: &'a NaryTree<V>,
    stack: Vec<(usize, NodeId)>,
}

impl<V: NameValidator> Iterator for Descendants<'_, V> {
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        self.stack.extend(
            self.tree
                .children(id)
                .rev()
                .map(|(_, child)| (depth + 1, child)),
        );
        Some((depth, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirectoryNames, Permissive};

    fn tree() -> NaryTree<Permissive> {
        NaryTree::new("root", Permissive)
    }

    fn names<V: NameValidator>(tree: &NaryTree<V>, start: NodeId) -> Vec<(usize, String)> {
        tree.descendants(start)
            .map(|(depth, id)| (depth, tree.name(id).unwrap().to_string()))
            .collect()
    }

    #[test]
    fn create_child_links_both_directions() {
        let mut tree = tree();
        let root = tree.root();
        let child = tree.create_child(root, "fruits").unwrap();

        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.child(root, "fruits"), Some(child));
        assert_eq!(tree.name(child), Some("fruits"));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn create_child_is_idempotent() {
        let mut tree = tree();
        let root = tree.root();
        let first = tree.create_child(root, "a").unwrap();
        let second = tree.create_child(root, "a").unwrap();

        assert_eq!(first, second);
        assert_eq!(tree.children(root).count(), 1);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn permissive_tree_accepts_blank_names() {
        let mut tree = tree();
        let root = tree.root();
        assert!(tree.create_child(root, " ").is_ok());
    }

    #[test]
    fn create_child_consults_the_validator() {
        let mut tree = NaryTree::new("/", DirectoryNames);
        let root = tree.root();

        let result = tree.create_child(root, "  ");

        assert_eq!(result, Err(TreeError::InvalidName { name: "  ".into() }));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn remove_child_clears_parent_and_unlinks() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let b = tree.create_child(a, "b").unwrap();

        let detached = tree.remove_child(root, "a").unwrap();

        assert_eq!(detached, a);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.child(root, "a"), None);
        assert!(tree.descendants(root).all(|(_, id)| id != a && id != b));
        // the subtree stays intact until released
        assert_eq!(tree.parent(b), Some(a));
    }

    #[test]
    fn remove_child_of_missing_name_fails() {
        let mut tree = tree();
        let root = tree.root();
        tree.create_child(root, "a").unwrap();

        let result = tree.remove_child(root, "b");

        assert_eq!(
            result,
            Err(TreeError::NotFound {
                name: "b".into(),
                parent: "root".into()
            })
        );
    }

    #[test]
    fn add_child_reattaches_a_subtree() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let b = tree.create_child(root, "b").unwrap();
        tree.create_child(a, "inner").unwrap();

        let detached = tree.remove_child(root, "a").unwrap();
        tree.add_child(b, detached).unwrap();

        assert_eq!(tree.parent(a), Some(b));
        assert_eq!(tree.path_of(a), "b/a");
        assert_eq!(
            names(&tree, root),
            vec![(0, "b".into()), (1, "a".into()), (2, "inner".into())]
        );
    }

    #[test]
    fn add_child_rejects_name_collision() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let nested = tree.create_child(a, "x").unwrap();
        tree.create_child(root, "x").unwrap();

        let detached = tree.remove_child(a, "x").unwrap();
        let result = tree.add_child(root, detached);

        assert_eq!(
            result,
            Err(TreeError::NameCollision {
                name: "x".into(),
                parent: "root".into()
            })
        );
        assert_eq!(tree.parent(nested), None);
    }

    #[test]
    fn add_child_rejects_attached_nodes() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let b = tree.create_child(root, "b").unwrap();

        assert_eq!(
            tree.add_child(b, a),
            Err(TreeError::NotDetached { node: a })
        );
        assert_eq!(
            tree.add_child(a, root),
            Err(TreeError::NotDetached { node: root })
        );
    }

    #[test]
    fn add_child_rejects_attaching_below_itself() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let inner = tree.create_child(a, "inner").unwrap();
        let detached = tree.remove_child(root, "a").unwrap();

        assert!(matches!(
            tree.add_child(inner, detached),
            Err(TreeError::CyclicMove { .. })
        ));
        assert!(matches!(
            tree.add_child(detached, detached),
            Err(TreeError::CyclicMove { .. })
        ));
    }

    #[test]
    fn release_frees_the_whole_subtree_and_reuses_slots() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let b = tree.create_child(a, "b").unwrap();
        tree.create_child(b, "c").unwrap();
        assert_eq!(tree.node_count(), 4);

        let detached = tree.remove_child(root, "a").unwrap();
        assert_eq!(tree.release(detached), Ok(3));

        assert_eq!(tree.node_count(), 1);
        assert!(!tree.contains(a));
        assert_eq!(tree.name(b), None);

        tree.create_child(root, "d").unwrap();
        assert_eq!(tree.nodes.len(), 4);
    }

    #[test]
    fn release_refuses_attached_nodes() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();

        assert_eq!(tree.release(a), Err(TreeError::NotDetached { node: a }));
        assert_eq!(tree.release(root), Err(TreeError::NotDetached { node: root }));
    }

    #[test]
    fn dangling_handles_are_reported() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let detached = tree.remove_child(root, "a").unwrap();
        tree.release(detached).unwrap();

        assert_eq!(
            tree.create_child(a, "b"),
            Err(TreeError::DanglingNode { node: a })
        );
        assert_eq!(tree.children(a).count(), 0);
    }

    #[test]
    fn descendants_walk_pre_order_in_name_order() {
        let mut tree = tree();
        let root = tree.root();
        let vegetables = tree.create_child(root, "vegetables").unwrap();
        let fruits = tree.create_child(root, "fruits").unwrap();
        tree.create_child(fruits, "pears").unwrap();
        let apples = tree.create_child(fruits, "apples").unwrap();
        tree.create_child(apples, "fuji").unwrap();
        tree.create_child(vegetables, "leeks").unwrap();

        assert_eq!(
            names(&tree, root),
            vec![
                (0, "fruits".into()),
                (1, "apples".into()),
                (2, "fuji".into()),
                (1, "pears".into()),
                (0, "vegetables".into()),
                (1, "leeks".into()),
            ]
        );
        assert_eq!(
            names(&tree, fruits),
            vec![(0, "apples".into()), (1, "fuji".into()), (0, "pears".into())]
        );
    }

    #[test]
    fn ancestry_queries() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, "a").unwrap();
        let b = tree.create_child(a, "b").unwrap();
        let c = tree.create_child(root, "c").unwrap();

        assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![a, root]);
        assert!(tree.is_within(b, a));
        assert!(tree.is_within(a, a));
        assert!(!tree.is_within(a, b));
        assert!(!tree.is_within(c, a));
        assert_eq!(tree.path_of(b), "a/b");
        assert_eq!(tree.path_of(root), "root");
    }
}
