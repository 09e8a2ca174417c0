use super::handle::Handle;

/// Node color for the Red-Black balancing protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot a descent stepped into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Branch {
    Left,
    Right,
}

impl Branch {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Branch::Left => Branch::Right,
            Branch::Right => Branch::Left,
        }
    }
}

/// A tree node. Children are exclusively-owned arena handles; there are no
/// parent back-references, so rotations only ever rewrite downward links.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) color: Color,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<T> Node<T> {
    /// New nodes enter the tree as red leaves; insert-fixup restores the
    /// invariants afterwards.
    pub(crate) const fn new_leaf(key: T) -> Self {
        Self {
            key,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, branch: Branch) -> Option<Handle> {
        match branch {
            Branch::Left => self.left,
            Branch::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, branch: Branch, child: Option<Handle>) {
        match branch {
            Branch::Left => self.left = child,
            Branch::Right => self.right = child,
        }
    }
}
