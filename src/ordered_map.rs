use core::borrow::Borrow;
use core::cmp::Ordering;

use crate::error::Result;
use crate::iter::Iter;
use crate::merge::Merge;
use crate::raw::{RawTree, Search, Side};
use crate::stats::TreeStats;

/// An ordered map based on a plain (unbalanced) [binary search tree].
///
/// The map stores elements rather than key-value pairs: an element's [`Ord`]
/// implementation decides where it lives, and re-inserting an element equal to
/// a stored one [merges](Merge) the two instead of adding a node. Pairing a key
/// with accumulated data is the job of the element type; see
/// [`Bucket`](crate::Bucket).
///
/// Nothing keeps the tree balanced, so its shape follows insertion order:
/// random input gives O(log n) expected depth, sorted input degenerates to a
/// list with O(n) lookups. Every operation walks the tree iteratively, so even
/// a degenerate tree never recurses. Use
/// [`BalancedOrderedMap`](crate::BalancedOrderedMap) for a worst-case bound.
///
/// It is a logic error for an element to be modified in such a way that its
/// ordering relative to any other element changes while it is in the map.
///
/// # Examples
///
/// ```
/// use merge_tree::{Bucket, OrderedMap, TreeError};
///
/// let mut enzymes = OrderedMap::new();
/// enzymes.insert(Bucket::new("AAGCTT", "HindIII"));
/// enzymes.insert(Bucket::new("GAATTC", "EcoRI"));
/// enzymes.insert(Bucket::new("AAGCTT", "HindIII-HF"));
///
/// assert_eq!(enzymes.size(), 2);
/// assert_eq!(enzymes.find(&"AAGCTT").unwrap().values(), ["HindIII", "HindIII-HF"]);
/// assert!(!enzymes.contains(&"GGATCC"));
///
/// let (hit, descents) = enzymes.find_with_trace(&"GAATTC");
/// assert!(hit.is_some());
/// assert_eq!(descents, 1);
///
/// enzymes.clear();
/// assert_eq!(enzymes.find_min().unwrap_err(), TreeError::Underflow);
/// ```
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
pub struct OrderedMap<E> {
    raw: RawTree<E>,
}

impl<E> OrderedMap<E> {
    /// Makes a new, empty `OrderedMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_tree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OrderedMap { raw: RawTree::new() }
    }

    /// Creates an empty map with room for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of elements, counted by walking the tree.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// Returns the sum of the 1-based depths of all leaves.
    ///
    /// This is the aggregate behind the map's average-depth statistic (see
    /// [`stats`](Self::stats)), not its height.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_tree::OrderedMap;
    ///
    /// let map: OrderedMap<i32> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(map.depth(), 4);
    /// assert_eq!(map.height(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.raw.depth()
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the size and leaf-depth aggregate together.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        self.raw.stats()
    }

    /// Clears the map, removing all elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Underflow`](crate::TreeError::Underflow) if the map is empty.
    pub fn find_min(&self) -> Result<&E> {
        self.raw.find_min()
    }

    /// Returns the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Underflow`](crate::TreeError::Underflow) if the map is empty.
    pub fn find_max(&self) -> Result<&E> {
        self.raw.find_max()
    }

    /// Returns the smallest element, or `None` if the map is empty.
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        self.raw.first()
    }

    /// Returns the largest element, or `None` if the map is empty.
    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.raw.last()
    }

    /// Gets an iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(&self.raw)
    }

    /// Returns `true` if the map holds an element equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).found.is_some()
    }

    /// Returns the stored element equal to `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns the stored element equal to `key` for in-place updates that do
    /// not change its ordering.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Like [`find`](Self::find), also returning how many branch descents the
    /// search took. A hit at the root takes none.
    pub fn find_with_trace<Q>(&self, key: &Q) -> (Option<&E>, usize)
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find_with_trace(key)
    }

    /// Removes the element equal to `key` and returns it, or does nothing and
    /// returns `None` if there is none.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_with_trace(key).0
    }

    /// Like [`remove`](Self::remove), also returning how many branch descents
    /// the removal took, counting the step into the right subtree when the
    /// removed node's successor has to be moved up.
    pub fn remove_with_trace<Q>(&mut self, key: &Q) -> (Option<E>, usize)
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Search { found, link, mut descents } = self.raw.search(key);
        let Some(handle) = found else {
            return (None, descents);
        };

        let node = self.raw.node(handle);
        let removed = match (node.left(), node.right()) {
            (Some(_), Some(_)) => {
                // The successor's node has no left child, so it splices out.
                descents += 1;
                tracing::trace!(descents, "moving in-order successor into removed slot");
                let successor = self.raw.detach_min((handle, Side::Right));
                core::mem::replace(self.raw.node_mut(handle).element_mut(), successor)
            }
            (left, right) => {
                self.raw.relink(link, left.or(right));
                self.raw.take(handle).into_element()
            }
        };
        (Some(removed), descents)
    }
}

impl<E: Ord + Merge> OrderedMap<E> {
    /// Inserts `element`, or merges it into the stored element it equals.
    ///
    /// Returns `true` if a new node was created and `false` if the element was
    /// merged.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_tree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(map.insert(37));
    /// assert!(!map.insert(37));
    /// assert_eq!(map.size(), 1);
    /// ```
    pub fn insert(&mut self, element: E) -> bool {
        let mut link = None;
        let mut current = self.raw.root();

        while let Some(handle) = current {
            let side = match element.cmp(self.raw.node(handle).element()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    self.raw.node_mut(handle).element_mut().merge(element);
                    return false;
                }
            };
            link = Some((handle, side));
            current = self.raw.node(handle).child(side);
        }

        let handle = self.raw.alloc(element);
        self.raw.relink(link, Some(handle));
        true
    }
}

impl_map_traits!(OrderedMap);
