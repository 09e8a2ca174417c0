use core::borrow::Borrow;
use core::fmt::{self, Write as _};
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use alloc::string::String;
use alloc::vec::Vec;

use crate::raw::{Iter as RawIter, RawRBTree};

/// An ordered set based on a Red-Black tree.
///
/// Insert, remove, and lookup are O(log n), and the tree's height is at most
/// 2·log₂(n + 1) regardless of insertion order: every mutation is followed by
/// the classical Red-Black recolor/rotate fixup before it returns. Keys are
/// unique; inserting a key that is already present leaves the set untouched.
///
/// Nodes are stored in an index arena with exclusively-owned child links and
/// no parent back-pointers. The set is `Send`/`Sync` when `T` is, and
/// concurrent mutation is excluded by `&mut` rather than by caller discipline.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the set.
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeSet;
///
/// let mut primes = RBTreeSet::new();
///
/// primes.insert(5);
/// primes.insert(2);
/// primes.insert(3);
/// primes.insert(7);
///
/// assert!(primes.contains(&3));
/// assert!(!primes.contains(&4));
///
/// // Keys come back in order.
/// let sorted: Vec<_> = primes.iter().copied().collect();
/// assert_eq!(sorted, [2, 3, 5, 7]);
/// ```
///
/// A `RBTreeSet` with a known list of keys can be initialized from an array:
///
/// ```
/// use sumi_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct RBTreeSet<T> {
    tree: RawRBTree<T>,
}

/// An iterator over the keys of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: RawIter<'a, T>,
}

/// An owning iterator over the keys of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: RBTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self { tree: RawRBTree::new() }
    }

    /// Makes a new, empty `RBTreeSet` with room for `capacity` keys before
    /// the node arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RawRBTree::with_capacity(capacity),
        }
    }

    /// Returns the number of keys in the set.
    ///
    /// The count is maintained incrementally by insert and remove; it is never
    /// recomputed by traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the capacity of the underlying node arena.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Clears the set, removing all keys.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the smallest key in the set, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest key in the set, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Returns the length of the longest root-to-leaf path in edges, or
    /// `None` if the set is empty.
    ///
    /// The Red-Black invariants guarantee the result never exceeds
    /// 2·log₂(len + 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.height(), None);
    ///
    /// set.insert(10);
    /// set.insert(20);
    /// set.insert(30);
    /// assert_eq!(set.height(), Some(1));
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.tree.height()
    }

    /// Returns the `2^depth` complete-binary-tree positions at the given
    /// depth, in left-to-right order, with absent positions as `None`. Depth 0
    /// is the root.
    ///
    /// This is a presentation helper for level-by-level layout; it performs a
    /// read-only traversal and imposes nothing on the tree itself.
    ///
    /// # Panics
    ///
    /// Panics if `2^depth` overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([20, 10, 30]);
    /// assert_eq!(set.level_keys(0), [Some(&20)]);
    /// assert_eq!(set.level_keys(1), [Some(&10), Some(&30)]);
    /// ```
    #[must_use]
    pub fn level_keys(&self, depth: usize) -> Vec<Option<&T>> {
        self.tree.level_keys(depth)
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.tree.iter() }
    }

    /// Renders the tree level by level with power-of-two spacing, one depth
    /// per line. Every position occupies a fixed-width cell sized to the
    /// widest key, so columns stay aligned for multi-character keys. Intended
    /// for debugging small trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([2, 1, 3]);
    /// assert_eq!(set.render(), " 2\n1 3\n");
    /// ```
    #[must_use]
    pub fn render(&self) -> String
    where
        T: fmt::Display,
    {
        let Some(height) = self.height() else {
            return String::new();
        };

        let mut cell = 1;
        let mut scratch = String::new();
        for key in self.iter() {
            scratch.clear();
            // Writing to a String cannot fail.
            let _ = write!(scratch, "{key}");
            cell = cell.max(scratch.chars().count());
        }

        let mut out = String::new();
        for depth in 0..=height {
            let lead = ((1usize << (height - depth)) - 1) * cell;
            let gap = ((1usize << (height - depth + 1)) - 1) * cell;
            for (i, slot) in self.level_keys(depth).iter().enumerate() {
                for _ in 0..if i == 0 { lead } else { gap } {
                    out.push(' ');
                }
                match slot {
                    Some(key) => {
                        let _ = write!(out, "{key:>width$}", width = cell);
                    }
                    None => out.extend(core::iter::repeat_n(' ', cell)),
                }
            }
            while out.ends_with(' ') {
                out.pop();
            }
            out.push('\n');
        }
        out
    }
}

impl<T: Ord> RBTreeSet<T> {
    /// Adds a key to the set.
    ///
    /// Returns whether the key was newly inserted. Inserting a key that is
    /// already present is a no-op: the set is unchanged and `false` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        self.tree.insert(key)
    }

    /// Removes a key from the set. Returns whether the key was present.
    ///
    /// The key may be any borrowed form of the set's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([2]);
    ///
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.remove(key)
    }

    /// Returns `true` if the set contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search(key).is_some()
    }

    /// Returns a reference to the key in the set, if any, that is equal to
    /// the given key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search(key)
    }

    /// Returns the smallest key strictly greater than the given key, which
    /// itself need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.successor(&10), Some(&20));
    /// assert_eq!(set.successor(&15), Some(&20));
    /// assert_eq!(set.successor(&30), None);
    /// ```
    #[must_use]
    pub fn successor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.successor(key)
    }

    /// Returns the largest key strictly less than the given key, which itself
    /// need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.predecessor(&30), Some(&20));
    /// assert_eq!(set.predecessor(&25), Some(&20));
    /// assert_eq!(set.predecessor(&10), None);
    /// ```
    #[must_use]
    pub fn predecessor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.predecessor(key)
    }
}

impl<T> Default for RBTreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RBTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RBTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RBTreeSet<T> {}

impl<T: Hash> Hash for RBTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for key in self.iter() {
            key.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for RBTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RBTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    /// Converts a `[T; N]` into a `RBTreeSet<T>`. Duplicate keys collapse.
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2, 1]);
    /// assert_eq!(set.len(), 3);
    /// ```
    fn from(keys: [T; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a RBTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for RBTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator that visits the keys in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
