use core::ops::Not;

use super::handle::{Handle, Link};

/// A side of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// `height(right) - height(left)`, restricted to the three values AVL allows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Balance {
    LeftHeavy,
    Balanced,
    RightHeavy,
}

impl Balance {
    /// The balance of a node whose `dir` subtree is one taller.
    #[inline]
    pub(crate) const fn heavy(dir: Dir) -> Self {
        match dir {
            Dir::Left => Balance::LeftHeavy,
            Dir::Right => Balance::RightHeavy,
        }
    }

    pub(crate) const fn factor(self) -> isize {
        match self {
            Balance::LeftHeavy => -1,
            Balance::Balanced => 0,
            Balance::RightHeavy => 1,
        }
    }

    pub(crate) const fn symbol(self) -> char {
        match self {
            Balance::LeftHeavy => '\\',
            Balance::Balanced => '-',
            Balance::RightHeavy => '/',
        }
    }
}

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    children: [Link; 2],
    parent: Link,
    balance: Balance,
    // 1 + size of the left subtree.
    rank: usize,
}

impl<T> Node<T> {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(key: T, parent: Link) -> Self {
        Self {
            key,
            children: [None, None],
            parent,
            balance: Balance::Balanced,
            rank: 1,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) const fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) const fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) {
        self.children[dir as usize] = child;
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        self.children[0].is_none() && self.children[1].is_none()
    }

    /// Which side `child` hangs from. `child` must be a child of this node.
    #[inline]
    pub(crate) fn side_of(&self, child: Handle) -> Dir {
        if self.left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(self.right(), Some(child), "`child` must be a child of this node");
            Dir::Right
        }
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Link {
        self.parent
    }

    /// Sets the parent link, returning the old one.
    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        core::mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) const fn balance(&self) -> Balance {
        self.balance
    }

    #[inline]
    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }

    #[inline]
    pub(crate) const fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub(crate) fn set_rank(&mut self, rank: usize) {
        debug_assert!(rank >= 1, "rank counts the node itself");
        self.rank = rank;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn leaf_defaults() {
        let node = Node::leaf("k", None);
        assert!(node.is_leaf());
        assert_eq!(node.rank(), 1);
        assert_eq!(node.balance(), Balance::Balanced);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn side_of_children() {
        let (a, b) = (Handle::from_index(1), Handle::from_index(2));
        let mut node = Node::leaf(0, None);
        node.set_child(Dir::Left, Some(a));
        node.set_child(Dir::Right, Some(b));
        assert_eq!(node.side_of(a), Dir::Left);
        assert_eq!(node.side_of(b), Dir::Right);
        assert!(!node.is_leaf());
    }

    #[test]
    fn balance_encoding() {
        assert_eq!(Balance::heavy(Dir::Left), Balance::LeftHeavy);
        assert_eq!(Balance::heavy(!Dir::Left), Balance::RightHeavy);
        assert_eq!(Balance::LeftHeavy.factor(), -1);
        assert_eq!(Balance::RightHeavy.symbol(), '/');
    }
}
