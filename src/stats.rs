use core::fmt;

/// Shape statistics of a tree, as returned by `stats()` on either map.
///
/// `depth` is the sum of the 1-based depths of every leaf, not the height of
/// the tree; dividing it by `size` gives the average leaf depth that the
/// ratio below compares against `log2(size)`.
///
/// # Examples
///
/// ```
/// use merge_tree::BalancedOrderedMap;
///
/// let map: BalancedOrderedMap<u32> = (1..=7).collect();
/// let stats = map.stats();
/// assert_eq!(stats.size, 7);
/// // A perfect tree of 7 nodes: four leaves at depth 3.
/// assert_eq!(stats.depth, 12);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct TreeStats {
    /// Number of nodes.
    pub size: usize,
    /// Sum of the 1-based depths of the leaves.
    pub depth: usize,
}

impl TreeStats {
    #[must_use]
    pub const fn new(size: usize, depth: usize) -> Self {
        Self { size, depth }
    }

    /// `depth / size`, or `None` for an empty tree.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_depth(&self) -> Option<f64> {
        (self.size > 0).then(|| self.depth as f64 / self.size as f64)
    }

    /// The average depth divided by `log2(size)`, or `None` when the tree
    /// holds fewer than two nodes.
    #[cfg(feature = "std")]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn depth_to_log2_ratio(&self) -> Option<f64> {
        if self.size < 2 {
            return None;
        }
        self.average_depth().map(|average| average / (self.size as f64).log2())
    }
}

struct Maybe(Option<f64>);

impl fmt::Display for Maybe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}", self.size)?;
        write!(f, "Average Depth: {}", Maybe(self.average_depth()))?;
        #[cfg(feature = "std")]
        write!(f, "\nAverage Depth to Log2N Ratio: {}", Maybe(self.depth_to_log2_ratio()))?;
        Ok(())
    }
}
