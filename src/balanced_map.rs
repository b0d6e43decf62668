use core::borrow::Borrow;
use core::cmp::Ordering;

use crate::error::Result;
use crate::iter::{Iter, Range};
use crate::merge::Merge;
use crate::raw::{Handle, Height, RawTree, Side};
use crate::stats::TreeStats;

/// An ordered map based on an [AVL tree].
///
/// `BalancedOrderedMap` has the same contract as
/// [`OrderedMap`](crate::OrderedMap): elements are placed by their [`Ord`]
/// implementation, and an element equal to a stored one is [merged](Merge)
/// into it. After every insertion or removal each node on the path back to the
/// root recomputes its height and, when its two subtrees differ in height by
/// more than one, is restored by a single or double rotation. The height of a
/// tree of `n` elements is therefore below `1.45 * log2(n + 2)`, and insertion,
/// removal and lookup take O(log n) comparisons whatever the insertion order.
///
/// The map also answers closed-interval [`range`](Self::range) queries.
///
/// It is a logic error for an element to be modified in such a way that its
/// ordering relative to any other element changes while it is in the map.
///
/// # Examples
///
/// ```
/// use merge_tree::BalancedOrderedMap;
///
/// let mut map = BalancedOrderedMap::new();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     map.insert(key);
/// }
///
/// assert!(map.iter().copied().eq([1, 3, 4, 5, 7, 8, 9]));
/// assert_eq!(map.find_min(), Ok(&1));
/// assert_eq!(map.find_max(), Ok(&9));
/// assert!(map.range(&4, &8).copied().eq([4, 5, 7, 8]));
/// assert_eq!(map.height(), 3);
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct BalancedOrderedMap<E> {
    raw: RawTree<E>,
}

impl<E> BalancedOrderedMap<E> {
    /// Makes a new, empty `BalancedOrderedMap`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        BalancedOrderedMap { raw: RawTree::new() }
    }

    /// Creates an empty map with room for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BalancedOrderedMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns `true` if the map contains no elements.
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
    /// O(1), read from the root.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height_of(self.raw.root()))
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

    /// Gets an iterator over the elements `e` with `low <= e <= high`, in
    /// ascending order.
    ///
    /// The walk skips every subtree lying wholly below `low` and stops at the
    /// first element above `high`, so a narrow range over a large map costs
    /// O(log n + k) for `k` yielded elements. An inverted interval
    /// (`low > high`) yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_tree::BalancedOrderedMap;
    ///
    /// let map: BalancedOrderedMap<u32> = (0..100).step_by(10).collect();
    /// assert!(map.range(&15, &42).copied().eq([20, 30, 40]));
    /// assert_eq!(map.range(&42, &15).count(), 0);
    /// ```
    pub fn range<'a, Q>(&'a self, low: &'a Q, high: &'a Q) -> Range<'a, E, Q>
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Range::new(&self.raw, low, high)
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
    /// search took.
    pub fn find_with_trace<Q>(&self, key: &Q) -> (Option<&E>, usize)
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find_with_trace(key)
    }

    /// Removes the element equal to `key` and returns it, rebalancing the path
    /// back to the root. Does nothing and returns `None` if there is none.
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
        let mut descents = 0;
        let root = self.raw.root();
        let (root, removed) = self.remove_at(root, key, &mut descents);
        self.raw.set_root(root);
        (removed, descents)
    }

    fn remove_at<Q>(&mut self, at: Option<Handle>, key: &Q, descents: &mut usize) -> (Option<Handle>, Option<E>)
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = at else {
            return (None, None);
        };

        let side = match key.cmp(self.raw.node(handle).element().borrow()) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return self.remove_node(handle, descents),
        };

        *descents += 1;
        let child = self.raw.node(handle).child(side);
        let (child, removed) = self.remove_at(child, key, descents);
        if removed.is_none() {
            return (Some(handle), None);
        }
        self.raw.node_mut(handle).set_child(side, child);
        (Some(self.rebalance(handle)), removed)
    }

    /// Removes the element at `handle` itself, returning the subtree's new
    /// root.
    fn remove_node(&mut self, handle: Handle, descents: &mut usize) -> (Option<Handle>, Option<E>) {
        let node = self.raw.node(handle);
        match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                *descents += 1;
                tracing::trace!(descents = *descents, "moving in-order successor into removed slot");
                let (right, successor) = self.remove_min(right);
                let node = self.raw.node_mut(handle);
                node.set_right(right);
                let removed = core::mem::replace(node.element_mut(), successor);
                (Some(self.rebalance(handle)), Some(removed))
            }
            (left, right) => (left.or(right), Some(self.raw.take(handle).into_element())),
        }
    }

    /// Unlinks the smallest element under `handle`, returning the rebalanced
    /// subtree root and the element.
    fn remove_min(&mut self, handle: Handle) -> (Option<Handle>, E) {
        match self.raw.node(handle).left() {
            None => {
                let node = self.raw.take(handle);
                (node.right(), node.into_element())
            }
            Some(left) => {
                let (left, min) = self.remove_min(left);
                self.raw.node_mut(handle).set_left(left);
                (Some(self.rebalance(handle)), min)
            }
        }
    }

    fn height_of(&self, link: Option<Handle>) -> Height {
        link.map_or(0, |handle| self.raw.node(handle).height())
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.raw.node(handle);
        let height = 1 + self.height_of(node.left()).max(self.height_of(node.right()));
        self.raw.node_mut(handle).set_height(height);
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance_factor(&self, handle: Handle) -> i16 {
        let node = self.raw.node(handle);
        i16::from(self.height_of(node.left())) - i16::from(self.height_of(node.right()))
    }

    /// Lifts the left child of `handle` into its place, returning the new
    /// subtree root.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.raw.node(handle).left().expect("`rotate_right()` - node has no left child!");
        let inner = self.raw.node(pivot).right();
        self.raw.node_mut(handle).set_left(inner);
        self.update_height(handle);
        self.raw.node_mut(pivot).set_right(Some(handle));
        self.update_height(pivot);
        tracing::trace!("rotated right");
        pivot
    }

    /// Lifts the right child of `handle` into its place, returning the new
    /// subtree root.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.raw.node(handle).right().expect("`rotate_left()` - node has no right child!");
        let inner = self.raw.node(pivot).left();
        self.raw.node_mut(handle).set_right(inner);
        self.update_height(handle);
        self.raw.node_mut(pivot).set_left(Some(handle));
        self.update_height(pivot);
        tracing::trace!("rotated left");
        pivot
    }

    /// Refreshes the height of `handle` and rotates if its subtrees differ in
    /// height by two. Returns the root of the repaired subtree.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.update_height(handle);
        let balance = self.balance_factor(handle);

        if balance > 1 {
            let left = self.raw.node(handle).left().expect("`rebalance()` - left-heavy node has no left child!");
            if self.balance_factor(left) < 0 {
                let left = self.rotate_left(left);
                self.raw.node_mut(handle).set_left(Some(left));
            }
            return self.rotate_right(handle);
        }

        if balance < -1 {
            let right = self.raw.node(handle).right().expect("`rebalance()` - right-heavy node has no right child!");
            if self.balance_factor(right) > 0 {
                let right = self.rotate_right(right);
                self.raw.node_mut(handle).set_right(Some(right));
            }
            return self.rotate_left(handle);
        }

        handle
    }
}

impl<E: Ord + Merge> BalancedOrderedMap<E> {
    /// Inserts `element`, or merges it into the stored element it equals,
    /// then rebalances the path back to the root.
    ///
    /// Returns `true` if a new node was created and `false` if the element was
    /// merged.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_tree::{BalancedOrderedMap, Bucket};
    ///
    /// let mut map = BalancedOrderedMap::new();
    /// assert!(map.insert(Bucket::new("A", 1)));
    /// assert!(!map.insert(Bucket::new("A", 2)));
    /// assert_eq!(map.size(), 1);
    /// assert_eq!(map.find(&"A").unwrap().values(), [1, 2]);
    /// ```
    pub fn insert(&mut self, element: E) -> bool {
        let root = self.raw.root();
        let (root, inserted) = self.insert_at(root, element);
        self.raw.set_root(Some(root));
        inserted
    }

    fn insert_at(&mut self, at: Option<Handle>, element: E) -> (Handle, bool) {
        let Some(handle) = at else {
            return (self.raw.alloc(element), true);
        };

        let side = match element.cmp(self.raw.node(handle).element()) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                self.raw.node_mut(handle).element_mut().merge(element);
                return (handle, false);
            }
        };

        let child = self.raw.node(handle).child(side);
        let (child, inserted) = self.insert_at(child, element);
        if !inserted {
            return (handle, false);
        }
        self.raw.node_mut(handle).set_child(side, Some(child));
        (self.rebalance(handle), true)
    }
}

impl_map_traits!(BalancedOrderedMap);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::TreeError;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn root_element(map: &BalancedOrderedMap<i32>) -> i32 {
        *map.raw.node(map.raw.root().unwrap()).element()
    }

    fn max_avl_height(n: usize) -> f64 {
        1.45 * ((n + 2) as f64).log2()
    }

    #[test]
    fn single_right_rotation() {
        let map: BalancedOrderedMap<i32> = [3, 2, 1].into_iter().collect();
        map.raw.validate_avl();
        assert_eq!(root_element(&map), 2);
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn single_left_rotation() {
        let map: BalancedOrderedMap<i32> = [1, 2, 3].into_iter().collect();
        map.raw.validate_avl();
        assert_eq!(root_element(&map), 2);
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn left_right_double_rotation() {
        let map: BalancedOrderedMap<i32> = [3, 1, 2].into_iter().collect();
        map.raw.validate_avl();
        assert_eq!(root_element(&map), 2);
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn right_left_double_rotation() {
        let map: BalancedOrderedMap<i32> = [1, 3, 2].into_iter().collect();
        map.raw.validate_avl();
        assert_eq!(root_element(&map), 2);
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn balanced_after_each_insert() {
        let mut map = BalancedOrderedMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            map.insert(key);
            map.raw.validate_avl();
        }
        assert_eq!(root_element(&map), 5);
        assert!(map.range(&4, &8).copied().eq([4, 5, 7, 8]));
    }

    #[test]
    fn removal_rebalances() {
        let mut map: BalancedOrderedMap<i32> = [5, 3, 8, 1, 4, 7, 9, 2].into_iter().collect();
        // Emptying the right side forces rotations at the root.
        for key in [7, 9, 8] {
            map.remove(&key);
            map.raw.validate_avl();
        }
        assert!(map.iter().copied().eq([1, 2, 3, 4, 5]));
        assert_eq!(root_element(&map), 3);
    }

    #[test]
    fn remove_trace_counts_descents() {
        let mut map: BalancedOrderedMap<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(map.remove_with_trace(&4), (None, 2));
        assert_eq!(map.remove_with_trace(&2), (Some(2), 1));
        assert_eq!(root_element(&map), 3);
        assert_eq!(map.remove_with_trace(&1), (Some(1), 1));
        map.raw.validate_avl();
    }

    #[test]
    fn sorted_input_stays_logarithmic() {
        const N: usize = 10_000;
        let map: BalancedOrderedMap<usize> = (0..N).collect();
        map.raw.validate_avl();
        assert!((map.height() as f64) <= max_avl_height(N));
        assert!(map.find_with_trace(&(N - 1)).1 < map.height());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            2 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn avl_invariant_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut map: BalancedOrderedMap<i32> = BalancedOrderedMap::new();
            let mut model: BTreeSet<i32> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(map.insert(key), model.insert(key));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(map.remove(&key), model.take(&key));
                    }
                }
                map.raw.validate_avl();
                prop_assert!((map.height() as f64) <= max_avl_height(model.len()));
            }

            prop_assert!(map.iter().eq(model.iter()));
        }

        #[test]
        fn removing_everything_empties_the_map(keys in prop::collection::vec(0i32..200, 0..200), seed in any::<u64>()) {
            let mut map: BalancedOrderedMap<i32> = keys.iter().copied().collect();
            let mut order: Vec<i32> = keys.clone();
            let mut x = seed | 1;
            for i in (1..order.len()).rev() {
                x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                #[allow(clippy::cast_possible_truncation)]
                order.swap(i, (x >> 33) as usize % (i + 1));
            }
            for key in &order {
                map.remove(key);
                map.raw.validate_avl();
                prop_assert!((map.height() as f64) <= max_avl_height(map.size()));
            }
            prop_assert!(map.is_empty());
            prop_assert_eq!(map.size(), 0);
            prop_assert_eq!(map.height(), 0);
            prop_assert_eq!(map.find_min(), Err(TreeError::Underflow));
        }

        #[test]
        fn range_matches_btreeset(keys in prop::collection::vec(-500i32..500, 0..300), low in -600i32..600, high in -600i32..600) {
            let map: BalancedOrderedMap<i32> = keys.iter().copied().collect();
            let model: BTreeSet<i32> = keys.iter().copied().collect();

            let actual: Vec<i32> = map.range(&low, &high).copied().collect();
            let expected: Vec<i32> = if low <= high {
                model.range(low..=high).copied().collect()
            } else {
                Vec::new()
            };
            prop_assert_eq!(actual, expected);
        }
    }
}
