//! Binary search tree maps with duplicate-merge semantics.
//!
//! This crate provides two ordered containers with the same contract:
//!
//! - [`OrderedMap`] - a plain binary search tree whose shape follows insertion order
//! - [`BalancedOrderedMap`] - an AVL tree, O(log n) in the worst case, with [`range`](BalancedOrderedMap::range) queries
//!
//! Both store *elements* ordered by their [`Ord`] implementation. Inserting an
//! element equal to one already stored calls [`Merge::merge`] on the stored
//! element instead of adding a node, so a key can accumulate data across
//! insertions. [`Bucket`] is a ready-made element pairing a key with a list of
//! values.
//!
//! # Example
//!
//! ```
//! use merge_tree::{BalancedOrderedMap, Bucket};
//!
//! let mut sites = BalancedOrderedMap::new();
//! sites.insert(Bucket::new("AAGCTT", "HindIII"));
//! sites.insert(Bucket::new("GAATTC", "EcoRI"));
//! sites.insert(Bucket::new("AAGCTT", "HindIII-HF"));
//!
//! // Duplicates merge into one entry.
//! assert_eq!(sites.size(), 2);
//! assert_eq!(sites.find(&"AAGCTT").unwrap().to_string(), "AAGCTT : HindIII HindIII-HF");
//!
//! // Instrumented lookups report how far they descended.
//! let (hit, descents) = sites.find_with_trace(&"GAATTC");
//! assert!(hit.is_some());
//! assert_eq!(descents, 1);
//!
//! // Closed-interval range queries.
//! let keys: Vec<_> = sites.range(&"A", &"C").map(|b| *b.key()).collect();
//! assert_eq!(keys, ["AAGCTT"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Disable the default `std` feature to depend on `alloc` only
//! - **Arena storage** - Nodes live in one slot arena and link by handle, so dropping a tree never recurses
//! - **Instrumented search** - `find_with_trace` and `remove_with_trace` report the branch descents taken
//! - **Shape statistics** - [`TreeStats`] exposes size and the leaf-depth aggregate

#![cfg_attr(not(feature = "std"), no_std)]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[macro_use]
mod macros;

mod error;
mod merge;
mod raw;
mod stats;

pub mod balanced_map;
pub mod iter;
pub mod ordered_map;

pub use balanced_map::BalancedOrderedMap;
pub use error::{Result, TreeError};
pub use merge::{Bucket, Merge};
pub use ordered_map::OrderedMap;
pub use stats::TreeStats;
