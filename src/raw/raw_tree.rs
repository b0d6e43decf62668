use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use crate::error::{Result, TreeError};
use crate::stats::TreeStats;
use super::handle::Handle;
use super::node::{Node, Side};

/// The link a subtree hangs from: `None` is the root link, otherwise a child
/// link of the given parent.
pub(crate) type Link = Option<(Handle, Side)>;

/// The binary tree storage shared by `OrderedMap` and `BalancedOrderedMap`.
///
/// Holds the read-only algorithms (search, extremes, traversal metrics) and
/// the primitive rewiring operations. The balancing policy lives in the maps.
#[derive(Clone)]
pub(crate) struct RawTree<E> {
    /// Arena owning every node.
    nodes: Arena<Node<E>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

/// Outcome of descending the tree in search of a key.
pub(crate) struct Search {
    /// The node holding an element equal to the key.
    pub(crate) found: Option<Handle>,
    /// The link the search arrived through; where the key would be attached
    /// if it was not found.
    pub(crate) link: Link,
    /// Number of branch descents taken.
    pub(crate) descents: usize,
}

impl<E> RawTree<E> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of live nodes, as tracked by the arena.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<E> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<E> {
        self.nodes.get_mut(handle)
    }

    /// Allocates a detached leaf for `element`.
    pub(crate) fn alloc(&mut self, element: E) -> Handle {
        self.nodes.alloc(Node::leaf(element))
    }

    /// Frees the node at `handle`, returning it. The caller must already have
    /// unlinked it.
    pub(crate) fn take(&mut self, handle: Handle) -> Node<E> {
        self.nodes.take(handle)
    }

    /// Points `link` at `child`.
    pub(crate) fn relink(&mut self, link: Link, child: Option<Handle>) {
        match link {
            None => self.root = child,
            Some((parent, side)) => self.node_mut(parent).set_child(side, child),
        }
    }

    /// Unlinks the smallest node of the subtree hanging from `link` and
    /// returns its element. The node's right subtree takes its place.
    ///
    /// # Panics
    ///
    /// Panics if the subtree at `link` is empty.
    pub(crate) fn detach_min(&mut self, mut link: (Handle, Side)) -> E {
        let mut current = self.node(link.0).child(link.1).expect("`RawTree::detach_min()` - subtree is empty!");
        while let Some(left) = self.node(current).left() {
            link = (current, Side::Left);
            current = left;
        }
        let right = self.node(current).right();
        self.relink(Some(link), right);
        self.take(current).into_element()
    }

    /// Disposes of every node.
    pub(crate) fn clear(&mut self) {
        tracing::debug!(nodes = self.nodes.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the leftmost node of the subtree rooted at `handle`.
    pub(crate) fn min_from(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left() {
            handle = left;
        }
        handle
    }

    /// Returns the rightmost node of the subtree rooted at `handle`.
    pub(crate) fn max_from(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right() {
            handle = right;
        }
        handle
    }

    /// Returns the smallest element.
    pub(crate) fn first(&self) -> Option<&E> {
        let min = self.min_from(self.root?);
        Some(self.node(min).element())
    }

    /// Returns the largest element.
    pub(crate) fn last(&self) -> Option<&E> {
        let max = self.max_from(self.root?);
        Some(self.node(max).element())
    }

    /// Returns the smallest element, failing on an empty tree.
    pub(crate) fn find_min(&self) -> Result<&E> {
        self.first().ok_or(TreeError::Underflow)
    }

    /// Returns the largest element, failing on an empty tree.
    pub(crate) fn find_max(&self) -> Result<&E> {
        self.last().ok_or(TreeError::Underflow)
    }

    /// Visits every node in pre-order along with its 1-based depth.
    fn for_each_depth(&self, mut visit: impl FnMut(&Node<E>, usize)) {
        let mut stack: Vec<(Handle, usize)> = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((handle, depth)) = stack.pop() {
            let node = self.node(handle);
            visit(node, depth);
            if let Some(right) = node.right() {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left() {
                stack.push((left, depth + 1));
            }
        }
    }

    /// Counts the nodes by walking the whole tree.
    pub(crate) fn size(&self) -> usize {
        let mut count = 0;
        self.for_each_depth(|_, _| count += 1);
        debug_assert_eq!(count, self.nodes.len(), "reachable nodes differ from allocated nodes");
        count
    }

    /// Sums the 1-based depth of every leaf.
    pub(crate) fn depth(&self) -> usize {
        let mut total = 0;
        self.for_each_depth(|node, depth| {
            if node.is_leaf() {
                total += depth;
            }
        });
        total
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        self.for_each_depth(|_, depth| height = height.max(depth));
        height
    }

    pub(crate) fn stats(&self) -> TreeStats {
        TreeStats::new(self.size(), self.depth())
    }

    /// Descends from the root towards `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Search
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut link = None;
        let mut current = self.root;
        let mut descents = 0;

        while let Some(handle) = current {
            let node = self.node(handle);
            let side = match key.cmp(node.element().borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    return Search {
                        found: Some(handle),
                        link,
                        descents,
                    };
                }
            };
            link = Some((handle, side));
            current = node.child(side);
            descents += 1;
        }

        Search {
            found: None,
            link,
            descents,
        }
    }

    /// Looks up `key`, also returning the branch descents taken.
    pub(crate) fn find_with_trace<Q>(&self, key: &Q) -> (Option<&E>, usize)
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Search { found, descents, .. } = self.search(key);
        (found.map(|handle| self.node(handle).element()), descents)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key).found?;
        Some(self.node(handle).element())
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key).found?;
        Some(self.node_mut(handle).element_mut())
    }
}
