use thiserror::Error;

/// Errors reported by the tree maps.
///
/// Lookups that miss are not errors: [`find`](crate::OrderedMap::find) returns
/// `None` and [`remove`](crate::OrderedMap::remove) of an absent element does
/// nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeError {
    /// The smallest or largest element was requested from an empty tree.
    #[error("underflow: the tree is empty")]
    Underflow,
}

/// Shorthand for results carrying a [`TreeError`].
pub type Result<T> = core::result::Result<T, TreeError>;
