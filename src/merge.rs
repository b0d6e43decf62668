//! Duplicate resolution for stored elements.

use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;

/// Folds an equal element into one already stored in a tree.
///
/// When [`insert`](crate::OrderedMap::insert) meets an element that compares
/// equal to one in the tree, it calls `merge` on the stored element instead of
/// adding a node. Implementations must not change how `self` orders.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use merge_tree::{Merge, OrderedMap};
///
/// // Ordered by word; the count rides along.
/// struct Hits {
///     word: &'static str,
///     count: u32,
/// }
///
/// impl PartialEq for Hits {
///     fn eq(&self, other: &Self) -> bool {
///         self.word == other.word
///     }
/// }
///
/// impl Eq for Hits {}
///
/// impl PartialOrd for Hits {
///     fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
///         Some(self.cmp(other))
///     }
/// }
///
/// impl Ord for Hits {
///     fn cmp(&self, other: &Self) -> Ordering {
///         self.word.cmp(other.word)
///     }
/// }
///
/// impl Merge for Hits {
///     fn merge(&mut self, other: Self) {
///         self.count += other.count;
///     }
/// }
///
/// let mut map = OrderedMap::new();
/// map.insert(Hits { word: "tree", count: 1 });
/// map.insert(Hits { word: "tree", count: 2 });
/// assert_eq!(map.size(), 1);
/// assert_eq!(map.find(&Hits { word: "tree", count: 0 }).unwrap().count, 3);
/// ```
pub trait Merge {
    /// Absorbs `other`, which compares equal to `self`.
    fn merge(&mut self, other: Self);
}

// Equal values of these types are indistinguishable; the stored one is kept.
macro_rules! keep_existing {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                #[inline]
                fn merge(&mut self, _other: Self) {}
            }
        )*
    };
}

keep_existing!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, (), String);

impl Merge for &str {
    #[inline]
    fn merge(&mut self, _other: Self) {}
}

/// A key with an ordered list of values gathered under it.
///
/// Buckets order and compare by key alone, and merging appends the other
/// bucket's values, so inserting buckets into a tree accumulates every value
/// seen for a key in insertion order.
///
/// # Examples
///
/// ```
/// use merge_tree::{BalancedOrderedMap, Bucket};
///
/// let mut map = BalancedOrderedMap::new();
/// map.insert(Bucket::new("GAATTC", "EcoRI"));
/// map.insert(Bucket::new("GGATCC", "BamHI"));
/// map.insert(Bucket::new("GAATTC", "EcoRI-HF"));
///
/// let hit = map.find(&"GAATTC").unwrap();
/// assert_eq!(hit.values(), ["EcoRI", "EcoRI-HF"]);
/// assert_eq!(hit.to_string(), "GAATTC : EcoRI EcoRI-HF");
/// ```
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    key: K,
    values: Vec<V>,
}

impl<K, V> Bucket<K, V> {
    /// Creates a bucket holding a single value.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            values: alloc::vec![value],
        }
    }

    /// Creates a bucket with no values, typically to use as a lookup key.
    #[must_use]
    pub const fn empty(key: K) -> Self {
        Self {
            key,
            values: Vec::new(),
        }
    }

    /// The key the bucket orders by.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// The values gathered under the key, oldest first.
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Appends a value after those already gathered.
    pub fn push(&mut self, value: V) {
        self.values.push(value);
    }

    /// Splits the bucket into its key and values.
    ///
    /// ```
    /// use merge_tree::{Bucket, Merge};
    ///
    /// let mut bucket = Bucket::new('k', 1);
    /// bucket.push(2);
    /// bucket.merge(Bucket::new('k', 3));
    /// assert_eq!(*bucket.key(), 'k');
    /// assert_eq!(bucket.into_parts(), ('k', vec![1, 2, 3]));
    /// ```
    #[must_use]
    pub fn into_parts(self) -> (K, Vec<V>) {
        (self.key, self.values)
    }
}

impl<K, V> Merge for Bucket<K, V> {
    fn merge(&mut self, mut other: Self) {
        self.values.append(&mut other.values);
    }
}

impl<K: PartialEq, V> PartialEq for Bucket<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Bucket<K, V> {}

impl<K: PartialOrd, V> PartialOrd for Bucket<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

impl<K: Ord, V> Ord for Bucket<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for Bucket<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :", self.key)?;
        for value in &self.values {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn bucket_merge_appends_in_order() {
        let mut bucket = Bucket::new("AAGCTT", "EcoRI");
        bucket.merge(Bucket::new("AAGCTT", "HindIII"));
        bucket.merge(Bucket::empty("AAGCTT"));
        assert_eq!(bucket.values(), ["EcoRI", "HindIII"]);
        assert_eq!(bucket.to_string(), "AAGCTT : EcoRI HindIII");
    }

    #[test]
    fn bucket_orders_by_key_only() {
        let a = Bucket::new(1, "z");
        let b = Bucket::new(1, "a");
        let c = Bucket::new(2, "a");
        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        let key: &i32 = a.borrow();
        assert_eq!(*key, 1);
    }

    #[test]
    fn plain_values_keep_existing() {
        let mut s = String::from("kept");
        s.merge(String::from("kept"));
        assert_eq!(s, "kept");

        let mut n = 7u32;
        n.merge(7);
        assert_eq!(n, 7);
    }

    #[test]
    fn empty_bucket_display() {
        let lookup: Bucket<&str, &str> = Bucket::empty("GATC");
        assert_eq!(lookup.to_string(), "GATC :");
        assert_eq!(lookup.into_parts(), ("GATC", Vec::new()));
    }
}
