use core::borrow::Borrow;
use core::cmp::Ordering;
use core::iter::FusedIterator;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Branch, Color, Node};

/// One step of a root-to-target descent: the node we passed through and the
/// child slot we stepped into.
#[derive(Clone, Copy)]
struct PathElement {
    node: Handle,
    branch: Branch,
}

/// Stack of descent steps, replayed by the fixup passes in place of parent
/// pointers. Sixteen inline slots cover trees of tens of thousands of keys
/// before spilling to the heap.
type Path = SmallVec<[PathElement; 16]>;

/// The core Red-Black tree backing `RBTreeSet`.
///
/// All five structural invariants hold between public operations: BST order,
/// black root, no red node with a red child, equal black count on every
/// root-to-nil path, and `len` equal to the reachable node count.
pub(crate) struct RawRBTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of keys in the tree, maintained incrementally.
    len: usize,
}

impl<T> Clone for RawRBTree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

impl<T> RawRBTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` keys before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the node arena.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops all keys and resets the tree to empty.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match node.left {
                Some(left) => current = left,
                None => return Some(&node.key),
            }
        }
    }

    /// Returns the largest key, or `None` if the tree is empty.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match node.right {
                Some(right) => current = right,
                None => return Some(&node.key),
            }
        }
    }

    /// Returns the length of the longest root-to-leaf path in edges, or `None`
    /// if the tree is empty. The Red-Black invariants bound this by
    /// 2·log₂(len + 1).
    pub(crate) fn height(&self) -> Option<usize> {
        self.root.map(|root| self.subtree_height(root))
    }

    fn subtree_height(&self, handle: Handle) -> usize {
        let node = self.nodes.get(handle);
        let left = node.left.map_or(0, |h| 1 + self.subtree_height(h));
        let right = node.right.map_or(0, |h| 1 + self.subtree_height(h));
        left.max(right)
    }

    /// Returns the `2^depth` complete-binary-tree positions at `depth`, in
    /// left-to-right order, with absent positions as `None`. Depth 0 is the
    /// root. A purely presentational read-only traversal.
    ///
    /// # Panics
    ///
    /// Panics if `2^depth` overflows `usize`.
    pub(crate) fn level_keys(&self, depth: usize) -> Vec<Option<&T>> {
        let width = 1usize
            .checked_shl(u32::try_from(depth).unwrap_or(u32::MAX))
            .expect("`RawRBTree::level_keys()` - `depth` is out of range!");
        let mut row = Vec::with_capacity(width);
        self.fill_level(self.root, depth, &mut row);
        row
    }

    fn fill_level<'a>(&'a self, node: Option<Handle>, remaining: usize, row: &mut Vec<Option<&'a T>>) {
        if remaining == 0 {
            row.push(node.map(|handle| &self.nodes.get(handle).key));
            return;
        }
        match node {
            Some(handle) => {
                let n = self.nodes.get(handle);
                self.fill_level(n.left, remaining - 1, row);
                self.fill_level(n.right, remaining - 1, row);
            }
            // An absent subtree still occupies its 2^remaining layout slots.
            None => row.extend(core::iter::repeat_n(None, 1 << remaining)),
        }
    }

    /// Returns an in-order iterator over the keys.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: SmallVec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Consumes the tree, returning its keys in ascending order.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<T> {
        let handles: Vec<Handle> = {
            let mut iter = self.iter();
            core::iter::from_fn(|| iter.next_handle()).collect()
        };
        let mut keys = Vec::with_capacity(handles.len());
        for handle in handles {
            keys.push(self.nodes.take(handle).key);
        }
        keys
    }

    /// Rotates the subtree rooted at `h` in the given direction and returns
    /// the handle that rose to the subtree root. Only local links move; the
    /// caller must reattach the result to `h`'s former parent (or the tree
    /// root) and recolor as its fixup case dictates.
    fn rotate(&mut self, h: Handle, direction: Branch) -> Handle {
        let rising_side = direction.opposite();
        let riser = self
            .nodes
            .get(h)
            .child(rising_side)
            .expect("`RawRBTree::rotate()` - no child on the rising side!");
        let transfer = self.nodes.get(riser).child(direction);
        self.nodes.get_mut(h).set_child(rising_side, transfer);
        self.nodes.get_mut(riser).set_child(direction, Some(h));
        riser
    }

    /// Points the child slot above the top of a rotated (or unlinked) subtree
    /// at `child`. With an empty path the slot is the tree root itself.
    fn reattach(&mut self, parent: Option<&PathElement>, child: Option<Handle>) {
        match parent {
            Some(&PathElement { node, branch }) => self.nodes.get_mut(node).set_child(branch, child),
            None => self.root = child,
        }
    }
}

impl<T: Ord> RawRBTree<T> {
    /// Searches for a key, descending from the root by comparison. Absence is
    /// an ordinary `None`, never an error.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(&node.key),
            }
        }
        None
    }

    /// Returns the smallest key strictly greater than `key`, which itself need
    /// not be present.
    pub(crate) fn successor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut best = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if node.key.borrow() > key {
                best = Some(handle);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best.map(|handle| &self.nodes.get(handle).key)
    }

    /// Returns the largest key strictly less than `key`, which itself need not
    /// be present.
    pub(crate) fn predecessor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut best = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if node.key.borrow() < key {
                best = Some(handle);
                current = node.right;
            } else {
                current = node.left;
            }
        }
        best.map(|handle| &self.nodes.get(handle).key)
    }

    /// Inserts a key. Returns true if the key was not already present; a
    /// duplicate insert is a structural no-op.
    pub(crate) fn insert(&mut self, key: T) -> bool {
        let Some(root) = self.root else {
            // The root is always black.
            let mut node = Node::new_leaf(key);
            node.color = Color::Black;
            self.root = Some(self.nodes.alloc(node));
            self.len = 1;
            return true;
        };

        // Descend to the leaf slot, recording the path for the fixup pass.
        let mut path = Path::new();
        let mut current = root;
        let branch = loop {
            let node = self.nodes.get(current);
            let branch = match key.cmp(&node.key) {
                Ordering::Less => Branch::Left,
                Ordering::Greater => Branch::Right,
                Ordering::Equal => return false,
            };
            match node.child(branch) {
                Some(child) => {
                    path.push(PathElement { node: current, branch });
                    current = child;
                }
                None => break branch,
            }
        };

        let leaf = self.nodes.alloc(Node::new_leaf(key));
        self.nodes.get_mut(current).set_child(branch, Some(leaf));
        path.push(PathElement { node: current, branch });
        self.len += 1;
        self.insert_fixup(path, leaf);
        true
    }

    /// Restores the Red-Black invariants after attaching the red leaf `x`.
    /// Each pass either finishes or moves the red-red violation two levels
    /// toward the root, so the loop runs O(height) times.
    fn insert_fixup(&mut self, mut path: Path, mut x: Handle) {
        loop {
            let Some(parent_elem) = path.pop() else {
                // x rose to the root; the root is always black.
                self.nodes.get_mut(x).color = Color::Black;
                return;
            };
            let parent = parent_elem.node;
            if self.nodes.get(parent).color == Color::Black {
                // A black parent absorbs the new red node as-is.
                return;
            }

            // A red parent cannot be the root, so the grandparent exists.
            let gp_elem = path
                .pop()
                .expect("`RawRBTree::insert_fixup()` - red node at the root!");
            let (gp, pdir) = (gp_elem.node, gp_elem.branch);
            let uncle = self.nodes.get(gp).child(pdir.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.nodes.get(u).color == Color::Red) {
                // Red uncle: recolor and push the violation up to the grandparent.
                self.nodes.get_mut(parent).color = Color::Black;
                self.nodes.get_mut(uncle).color = Color::Black;
                self.nodes.get_mut(gp).color = Color::Red;
                x = gp;
                continue;
            }

            // Black (or absent) uncle: one or two rotations finish the repair.
            let xdir = parent_elem.branch;
            let top = if xdir == pdir {
                parent
            } else {
                // Zig-zag: straighten the x/parent/grandparent line first.
                let top = self.rotate(parent, pdir);
                self.nodes.get_mut(gp).set_child(pdir, Some(top));
                top
            };
            self.nodes.get_mut(top).color = Color::Black;
            self.nodes.get_mut(gp).color = Color::Red;
            let risen = self.rotate(gp, pdir.opposite());
            self.reattach(path.last(), Some(risen));
            return;
        }
    }

    /// Removes a key. Returns true if a matching node existed and was removed.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;
        let located = loop {
            let Some(handle) = current else { return false };
            let node = self.nodes.get(handle);
            let branch = match key.cmp(node.key.borrow()) {
                Ordering::Less => Branch::Left,
                Ordering::Greater => Branch::Right,
                Ordering::Equal => break handle,
            };
            path.push(PathElement { node: handle, branch });
            current = node.child(branch);
        };

        // Two children: physically remove the in-order predecessor instead and
        // move its key into the located node afterwards.
        let victim = {
            let node = self.nodes.get(located);
            if node.left.is_some() && node.right.is_some() {
                path.push(PathElement { node: located, branch: Branch::Left });
                let mut pred = node.left.expect("two-child node has a left child");
                while let Some(right) = self.nodes.get(pred).right {
                    path.push(PathElement { node: pred, branch: Branch::Right });
                    pred = right;
                }
                pred
            } else {
                located
            }
        };

        // The victim has at most one child.
        let (victim_color, child) = {
            let node = self.nodes.get(victim);
            (node.color, node.left.or(node.right))
        };
        match (victim_color, child) {
            (Color::Red, _) => {
                // A red node with one child would break black-height, so the
                // victim is a leaf; unlinking it costs nothing.
                debug_assert!(child.is_none());
                self.reattach(path.last(), None);
            }
            (Color::Black, Some(child)) => {
                // The lone child of a black node is a red leaf: splice it up
                // and blacken it to restore the missing black.
                self.reattach(path.last(), Some(child));
                self.nodes.get_mut(child).color = Color::Black;
            }
            (Color::Black, None) => {
                // Unlinking a black leaf leaves its slot one black short.
                self.reattach(path.last(), None);
                self.remove_fixup(path);
            }
        }

        let removed = self.nodes.take(victim);
        self.len -= 1;
        if victim != located {
            self.nodes.get_mut(located).key = removed.key;
        }
        true
    }

    /// Resolves a black-height deficit hanging below `path.last()` on its
    /// recorded branch. Each pass either settles the deficit or pushes it one
    /// level toward the root, so the loop runs O(height) times. The deficit
    /// slot itself is never read; every case works on the parent, the sibling,
    /// and the sibling's children, all of which exist by the black-height
    /// invariant.
    fn remove_fixup(&mut self, mut path: Path) {
        loop {
            // Case 1: the deficit reached the root; black-height shrank uniformly.
            let Some(PathElement { node: parent, branch: dir }) = path.pop() else {
                return;
            };

            let sibling = self
                .nodes
                .get(parent)
                .child(dir.opposite())
                .expect("`RawRBTree::remove_fixup()` - deficit node has no sibling!");

            // Case 2: red sibling. Rotate it up through the parent to expose a
            // black sibling, then re-examine from the same deficit slot.
            if self.nodes.get(sibling).color == Color::Red {
                self.nodes.get_mut(sibling).color = Color::Black;
                self.nodes.get_mut(parent).color = Color::Red;
                let risen = self.rotate(parent, dir);
                self.reattach(path.last(), Some(risen));
                path.push(PathElement { node: risen, branch: dir });
                path.push(PathElement { node: parent, branch: dir });
                continue;
            }

            let near = self.nodes.get(sibling).child(dir);
            let far = self.nodes.get(sibling).child(dir.opposite());
            let near_red = near.is_some_and(|h| self.nodes.get(h).color == Color::Red);
            let far_red = far.is_some_and(|h| self.nodes.get(h).color == Color::Red);

            if !near_red && !far_red {
                self.nodes.get_mut(sibling).color = Color::Red;
                if self.nodes.get(parent).color == Color::Red {
                    // Case 4: trade the parent's red for the missing black.
                    self.nodes.get_mut(parent).color = Color::Black;
                    return;
                }
                // Case 3: the whole parent subtree is now one black short;
                // push the deficit up a level.
                continue;
            }

            // Case 5: only the near nephew is red. Rotate it into the far slot
            // so a single rotation at the parent can finish.
            let sibling = if far_red {
                sibling
            } else {
                let near = near.expect("near nephew is red");
                self.nodes.get_mut(sibling).color = Color::Red;
                self.nodes.get_mut(near).color = Color::Black;
                let risen = self.rotate(sibling, dir.opposite());
                self.nodes.get_mut(parent).set_child(dir.opposite(), Some(risen));
                risen
            };

            // Case 6: far nephew red. The sibling takes the parent's color,
            // parent and far nephew turn black, and one rotation at the parent
            // settles the deficit unconditionally.
            self.nodes.get_mut(sibling).color = self.nodes.get(parent).color;
            self.nodes.get_mut(parent).color = Color::Black;
            let far = self
                .nodes
                .get(sibling)
                .child(dir.opposite())
                .expect("far nephew is red");
            self.nodes.get_mut(far).color = Color::Black;
            let risen = self.rotate(parent, dir);
            self.reattach(path.last(), Some(risen));
            return;
        }
    }
}

/// An in-order iterator over the keys of a `RawRBTree`.
pub(crate) struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    stack: SmallVec<[Handle; 16]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.nodes.get(handle).left;
        }
    }

    fn next_handle(&mut self) -> Option<Handle> {
        let handle = self.stack.pop()?;
        self.push_left_spine(self.nodes.get(handle).right);
        self.remaining -= 1;
        Some(handle)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.next_handle()?;
        Some(&self.nodes.get(handle).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
impl<T: Ord + core::fmt::Debug> RawRBTree<T> {
    /// Verifies all five structural invariants: BST order, black root, no
    /// red-red edge, uniform black-height, and the size counter against the
    /// actual node population. Panics on any violation.
    pub(crate) fn check_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.nodes.get(root).color, Color::Black, "root must be black");
        }
        let mut count = 0;
        self.check_subtree(self.root, None, None, &mut count);
        assert_eq!(count, self.len, "size counter out of sync with node count");
    }

    /// Returns the black-height of the subtree, counting nil leaves as black.
    fn check_subtree(&self, node: Option<Handle>, low: Option<&T>, high: Option<&T>, count: &mut usize) -> usize {
        let Some(handle) = node else { return 1 };
        *count += 1;

        let n = self.nodes.get(handle);
        if let Some(low) = low {
            assert!(n.key > *low, "BST order violated: {:?} <= {:?}", n.key, low);
        }
        if let Some(high) = high {
            assert!(n.key < *high, "BST order violated: {:?} >= {:?}", n.key, high);
        }
        if n.color == Color::Red {
            for child in [n.left, n.right].into_iter().flatten() {
                assert_eq!(self.nodes.get(child).color, Color::Black, "red node {:?} has a red child", n.key);
            }
        }

        let left = self.check_subtree(n.left, low, Some(&n.key), count);
        let right = self.check_subtree(n.right, Some(&n.key), high, count);
        assert_eq!(left, right, "black-height mismatch under {:?}", n.key);
        left + usize::from(n.color == Color::Black)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn ascending_insert_rotates() {
        // 10, 20, 30 in order forces the left-rotation fixup at 20.
        let mut tree = RawRBTree::new();
        for key in [10, 20, 30] {
            assert!(tree.insert(key));
            tree.check_invariants();
        }

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.height(), Some(1));
        assert_eq!(tree.level_keys(0), [Some(&20)]);
        assert_eq!(tree.level_keys(1), [Some(&10), Some(&30)]);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut tree = RawRBTree::new();
        assert!(tree.insert(7));
        assert!(!tree.insert(7));
        assert_eq!(tree.len(), 1);
        tree.check_invariants();
    }

    #[test]
    fn remove_missing_reports_false() {
        let mut tree: RawRBTree<i32> = RawRBTree::new();
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 0);

        tree.insert(1);
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_two_child_node() {
        let mut tree = RawRBTree::new();
        for key in [10, 20, 30, 40, 50, 25] {
            tree.insert(key);
        }
        assert!(tree.remove(&25));
        tree.check_invariants();
        assert_eq!(tree.len(), 5);
        assert!(tree.search(&25).is_none());
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 30, 40, 50]);
    }

    #[test]
    fn remove_root_repeatedly() {
        let mut tree = RawRBTree::new();
        for key in 0..64 {
            tree.insert(key);
        }
        loop {
            let Some(root_key) = tree.level_keys(0)[0].copied() else { break };
            assert!(tree.remove(&root_key));
            tree.check_invariants();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn order_queries() {
        let mut tree = RawRBTree::new();
        for key in [10, 20, 30, 40] {
            tree.insert(key);
        }

        assert_eq!(tree.first(), Some(&10));
        assert_eq!(tree.last(), Some(&40));
        assert_eq!(tree.successor(&10), Some(&20));
        assert_eq!(tree.successor(&15), Some(&20));
        assert_eq!(tree.successor(&40), None);
        assert_eq!(tree.predecessor(&40), Some(&30));
        assert_eq!(tree.predecessor(&35), Some(&30));
        assert_eq!(tree.predecessor(&10), None);
    }

    #[test]
    fn empty_tree_queries() {
        let tree: RawRBTree<i32> = RawRBTree::new();
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.height(), None);
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.level_keys(0), [None]);
    }

    #[test]
    fn level_keys_pads_absent_subtrees() {
        let mut tree = RawRBTree::new();
        for key in [20, 10, 30, 5] {
            tree.insert(key);
        }
        // Depth 2 has four slots; only 5 (leftmost) is populated.
        assert_eq!(tree.level_keys(2), [Some(&5), None, None, None]);
    }

    #[test]
    fn height_stays_logarithmic_under_ordered_insert() {
        let mut tree = RawRBTree::new();
        for key in 0..1024i32 {
            tree.insert(key);
        }
        tree.check_invariants();
        // n = 1024: 2·log₂(n + 1) ≈ 20.
        assert!(tree.height().unwrap() <= 20);
    }

    #[test]
    fn churn_a_thousand_random_keys_with_invariant_checks() {
        // Deterministic LCG so the scenario reproduces exactly.
        let mut x: u64 = 12345;
        let mut lcg = || {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            (x >> 33) as i64
        };

        let mut keys: Vec<i64> = (0..1_000).map(|_| lcg()).collect();
        let mut tree = RawRBTree::new();
        let mut model = BTreeSet::new();
        for &key in &keys {
            assert_eq!(tree.insert(key), model.insert(key));
            tree.check_invariants();
        }

        // Delete in a different (shuffled) order than insertion, verifying
        // all five invariants after every single removal.
        let n = keys.len();
        for i in 0..n {
            let j = (lcg().unsigned_abs() as usize) % n;
            keys.swap(i, j);
        }
        for &key in &keys {
            assert_eq!(tree.remove(&key), model.remove(&key));
            tree.check_invariants();
            assert_eq!(tree.len(), model.len());
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
    }

    #[test]
    fn into_sorted_vec_drains_in_order() {
        let mut tree = RawRBTree::new();
        for key in [3, 1, 4, 1, 5, 9, 2, 6] {
            tree.insert(key);
        }
        assert_eq!(tree.into_sorted_vec(), [1, 2, 3, 4, 5, 6, 9]);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i16),
        Remove(i16),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        // A narrow key range forces collisions, duplicate inserts, and
        // removals of present keys.
        prop_oneof![
            3 => (-256i16..256).prop_map(Operation::Insert),
            2 => (-256i16..256).prop_map(Operation::Remove),
        ]
    }

    proptest! {
        /// Invariants 1-5 hold after every single mutation in a random
        /// insert/remove sequence, and membership matches a model set.
        #[test]
        fn invariants_hold_under_random_ops(operations in prop::collection::vec(strategy(), 0..512)) {
            let mut tree = RawRBTree::new();
            let mut model = BTreeSet::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key) => {
                        prop_assert_eq!(tree.insert(key), model.insert(key));
                    }
                    Operation::Remove(key) => {
                        prop_assert_eq!(tree.remove(&key), model.remove(&key));
                    }
                }

                tree.check_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.first(), model.first());
                prop_assert_eq!(tree.last(), model.last());
            }

            let keys: Vec<i16> = tree.iter().copied().collect();
            let expected: Vec<i16> = model.iter().copied().collect();
            prop_assert_eq!(keys, expected);
        }

        /// Every in-order neighbor pair agrees with successor/predecessor.
        #[test]
        fn neighbors_match_inorder_traversal(keys in prop::collection::btree_set(-512i16..512, 1..64)) {
            let mut tree = RawRBTree::new();
            for &key in &keys {
                tree.insert(key);
            }

            let sorted: Vec<i16> = keys.iter().copied().collect();
            for window in sorted.windows(2) {
                prop_assert_eq!(tree.successor(&window[0]), Some(&window[1]));
                prop_assert_eq!(tree.predecessor(&window[1]), Some(&window[0]));
            }
            prop_assert_eq!(tree.predecessor(&sorted[0]), None);
            prop_assert_eq!(tree.successor(&sorted[sorted.len() - 1]), None);
        }

        /// The Red-Black height guarantee: height ≤ 2·log₂(n + 1).
        #[test]
        fn height_bound(keys in prop::collection::btree_set(any::<i32>(), 1..1024)) {
            let mut tree = RawRBTree::new();
            for &key in &keys {
                tree.insert(key);
            }

            let n = tree.len() as f64;
            let bound = 2.0 * (n + 1.0).log2();
            prop_assert!(tree.height().unwrap() as f64 <= bound);
        }
    }
}
