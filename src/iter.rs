//! Iterators over the elements of [`OrderedMap`](crate::OrderedMap) and
//! [`BalancedOrderedMap`](crate::BalancedOrderedMap).

use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::raw::{Handle, RawTree};

/// Pending ancestors of an in-order walk. A balanced tree of any size the
/// arena can address fits without spilling.
type Stack = SmallVec<[Handle; 64]>;

/// An iterator over the elements of a tree map, in ascending order.
///
/// This `struct` is created by the `iter` method on
/// [`OrderedMap`](crate::OrderedMap::iter) and
/// [`BalancedOrderedMap`](crate::BalancedOrderedMap::iter). Calling `iter`
/// again, or cloning the iterator, restarts the walk.
///
/// # Examples
///
/// ```
/// use merge_tree::OrderedMap;
///
/// let map: OrderedMap<i32> = [3, 1, 2].into_iter().collect();
/// let mut iter = map.iter();
/// assert_eq!(iter.len(), 3);
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, E> {
    tree: &'a RawTree<E>,
    stack: Stack,
    remaining: usize,
}

impl<'a, E> Iter<'a, E> {
    pub(crate) fn new(tree: &'a RawTree<E>) -> Self {
        let mut iter = Iter {
            tree,
            stack: Stack::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(node.element())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<E> FusedIterator for Iter<'_, E> {}

impl<E> Clone for Iter<'_, E> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Iter<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the elements of a [`BalancedOrderedMap`](crate::BalancedOrderedMap)
/// lying in a closed interval, in ascending order.
///
/// This `struct` is created by
/// [`BalancedOrderedMap::range`](crate::BalancedOrderedMap::range). Subtrees
/// entirely below the interval are never entered, and the walk stops at the
/// first element above it.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, E, Q: ?Sized> {
    tree: &'a RawTree<E>,
    stack: Stack,
    low: &'a Q,
    high: &'a Q,
}

impl<'a, E, Q> Range<'a, E, Q>
where
    E: Borrow<Q>,
    Q: ?Sized + Ord,
{
    pub(crate) fn new(tree: &'a RawTree<E>, low: &'a Q, high: &'a Q) -> Self {
        let mut range = Range {
            tree,
            stack: Stack::new(),
            low,
            high,
        };
        range.descend(tree.root());
        range
    }

    /// Pushes the path to the smallest element `>= low` under `current`.
    fn descend(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            let node = self.tree.node(handle);
            if node.element().borrow() < self.low {
                // The node and its whole left subtree are below the interval.
                current = node.right();
            } else {
                self.stack.push(handle);
                current = node.left();
            }
        }
    }
}

impl<'a, E, Q> Iterator for Range<'a, E, Q>
where
    E: Borrow<Q>,
    Q: ?Sized + Ord,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        if node.element().borrow() > self.high {
            // Everything still pending is larger still.
            self.stack.clear();
            return None;
        }
        self.descend(node.right());
        Some(node.element())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tree.len()))
    }
}

impl<E, Q> FusedIterator for Range<'_, E, Q>
where
    E: Borrow<Q>,
    Q: ?Sized + Ord,
{
}

impl<E, Q: ?Sized> Clone for Range<'_, E, Q> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            stack: self.stack.clone(),
            low: self.low,
            high: self.high,
        }
    }
}

impl<E, Q: ?Sized + fmt::Debug> fmt::Debug for Range<'_, E, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range").field("low", &self.low).field("high", &self.high).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{BalancedOrderedMap, OrderedMap};
    use alloc::vec::Vec;

    #[test]
    fn balanced_walk_stays_inline() {
        let map: BalancedOrderedMap<u32> = (0..20_000).collect();
        let mut iter = map.iter();
        let mut seen = 0u32;
        while let Some(&element) = iter.next() {
            assert!(!iter.stack.spilled());
            assert_eq!(element, seen);
            seen += 1;
        }
        assert_eq!(seen, 20_000);

        let mut range = map.range(&5_000, &5_100);
        assert!(!range.stack.spilled());
        assert_eq!(range.by_ref().count(), 101);
        assert!(range.stack.is_empty());
    }

    #[test]
    fn degenerate_walk_spills_to_heap() {
        let map: OrderedMap<u32> = (0..100).rev().collect();
        let iter = map.iter();
        assert!(iter.stack.spilled());
        assert_eq!(iter.copied().collect::<Vec<_>>(), (0..100).collect::<Vec<_>>());
    }
}
