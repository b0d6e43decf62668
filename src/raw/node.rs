use super::handle::Handle;

/// Height of a subtree counted in nodes. A leaf has height 1.
///
/// An AVL tree of height 255 holds more nodes than `Handle` can address, so a
/// byte is enough.
pub(crate) type Height = u8;

/// Which child link of a parent node a subtree hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A tree node: one element and links to its two subtrees.
#[derive(Clone)]
pub(crate) struct Node<E> {
    element: E,
    left: Option<Handle>,
    right: Option<Handle>,
    // Maintained by the balanced map only; the plain map leaves it at 1.
    height: Height,
}

impl<E> Node<E> {
    /// Creates a detached leaf holding `element`.
    pub(crate) const fn leaf(element: E) -> Self {
        Self {
            element,
            left: None,
            right: None,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn element(&self) -> &E {
        &self.element
    }

    #[inline]
    pub(crate) const fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Consumes the node, returning its element.
    pub(crate) fn into_element(self) -> E {
        self.element
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns true if the node has no children.
    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) const fn height(&self) -> Height {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: Height) {
        self.height = height;
    }
}
