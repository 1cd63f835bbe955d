use crate::arena::{Entry, TypedArena};
use crate::error::{Error, Result};
use crate::red_black_tree::iter::{Iter, RevIter};
use crate::red_black_tree::node::{Color, Node, Side};
use crate::red_black_tree::stats::Stats;
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

const DEFAULT_CHUNK_SIZE: usize = 1024;

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

/// A reference to a node of a specific `RedBlackTree<T>`.
///
/// Handles are obtained from `insert`, `search` and the traversal operations, and stay valid
/// until the node they refer to is physically removed. A handle remembers the tree that issued
/// it, so passing it to another tree is detected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeHandle {
    tree_id: usize,
    entry: Entry,
}

/// A red-black tree whose nodes carry parent links.
///
/// Every node lives in an arena owned by the tree, and links between nodes are arena entries.
/// Keys are ordered by `Ord`; equal keys are allowed and a new key is placed to the right of the
/// equal keys already present, so in-order traversal yields equal keys in insertion order.
///
/// # Examples
///
/// ```
/// use rbtree_index::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(10);
/// tree.insert(20);
/// tree.insert(30);
///
/// let root = tree.root().unwrap();
/// assert_eq!(tree.key(root), &20);
///
/// let node = tree.search(&10).unwrap();
/// assert_eq!(tree.delete(node), 10);
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&20, &30]);
/// ```
pub struct RedBlackTree<T> {
    id: usize,
    arena: TypedArena<Node<T>>,
    root: Option<Entry>,
    size: usize,
    // rotations performed by the last insert or delete
    #[cfg(test)]
    rotations: usize,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackTree<T>` whose arena grows `chunk_size` nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackTree {
            id: NEXT_TREE_ID.fetch_add(1, AtomicOrdering::Relaxed),
            arena: TypedArena::new(chunk_size),
            root: None,
            size: 0,
            #[cfg(test)]
            rotations: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every key from the tree. All outstanding handles become stale.
    pub fn clear(&mut self) {
        debug!("clearing tree {} with {} nodes", self.id, self.size);
        self.arena.clear();
        self.root = None;
        self.size = 0;
    }

    /// Returns the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeHandle> {
        self.root.map(|entry| self.handle(entry))
    }

    /// Returns the key stored in a node.
    ///
    /// Two-child deletion moves the successor's key into the deleted node, so a handle may read a
    /// different key after a deletion elsewhere in the tree.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to another tree or its node was removed.
    pub fn key(&self, node: NodeHandle) -> &T {
        &self.arena[self.resolve(node)].key
    }

    /// Returns the key stored in a node, or `None` if the handle is foreign or stale.
    pub fn get(&self, node: NodeHandle) -> Option<&T> {
        self.check(node).ok().map(|entry| &self.arena[entry].key)
    }

    /// Returns the color of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to another tree or its node was removed.
    pub fn color(&self, node: NodeHandle) -> Color {
        self.arena[self.resolve(node)].color
    }

    /// Returns the left child of a node.
    pub fn left(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.link(node, |node| node.left)
    }

    /// Returns the right child of a node.
    pub fn right(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.link(node, |node| node.right)
    }

    /// Returns the parent of a node, or `None` for the root.
    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.link(node, |node| node.parent)
    }

    /// Returns `true` if the handle refers to a live node of this tree.
    pub fn contains_node(&self, node: NodeHandle) -> bool {
        self.check(node).is_ok()
    }

    /// Inserts a key into the tree and returns a handle to the node holding it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let node = tree.insert(1);
    /// assert_eq!(tree.key(node), &1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> NodeHandle
    where
        T: Ord,
    {
        #[cfg(test)]
        {
            self.rotations = 0;
        }

        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            side = if key < node.key { Side::Left } else { Side::Right };
            parent = Some(entry);
            curr = node.child(side);
        }

        let new_entry = self.arena.allocate(Node::new(key, parent));
        match parent {
            None => self.root = Some(new_entry),
            Some(parent) => *self.arena[parent].child_mut(side) = Some(new_entry),
        }
        self.size += 1;

        self.insert_fixup(new_entry);
        self.handle(new_entry)
    }

    /// Removes a node from the tree and returns the key it held.
    ///
    /// If the node has two children, its in-order successor is unlinked instead and the
    /// successor's key is moved into the node, which keeps its identity. Handles to the node then
    /// read the successor's key, and handles to the successor become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to another tree or its node was already removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// let node = tree.insert(2);
    /// assert_eq!(tree.delete(node), 2);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn delete(&mut self, node: NodeHandle) -> T {
        let entry = self.resolve(node);
        self.remove_entry(entry)
    }

    /// Removes a node from the tree and returns the key it held, or an error if the handle is
    /// foreign or stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// let node = tree.insert(1);
    /// assert_eq!(tree.try_delete(node), Ok(1));
    /// assert_eq!(tree.try_delete(node), Err(Error::StaleHandle));
    /// ```
    pub fn try_delete(&mut self, node: NodeHandle) -> Result<T> {
        let entry = self.check(node)?;
        Ok(self.remove_entry(entry))
    }

    /// Returns the node holding a key equal to `key`, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert!(tree.search(&1).is_some());
    /// assert!(tree.search(&2).is_none());
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<NodeHandle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            curr = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(self.handle(entry)),
            };
        }
        None
    }

    /// Returns the node with the minimum key of the tree, or `None` if the tree is empty.
    pub fn tree_minimum(&self) -> Option<NodeHandle> {
        self.root
            .map(|root| self.handle(self.extreme(root, Side::Left)))
    }

    /// Returns the node with the maximum key of the tree, or `None` if the tree is empty.
    pub fn tree_maximum(&self) -> Option<NodeHandle> {
        self.root
            .map(|root| self.handle(self.extreme(root, Side::Right)))
    }

    /// Returns the node with the minimum key of the subtree rooted at `node`.
    pub fn subtree_minimum(&self, node: NodeHandle) -> NodeHandle {
        self.handle(self.extreme(self.resolve(node), Side::Left))
    }

    /// Returns the node with the maximum key of the subtree rooted at `node`.
    pub fn subtree_maximum(&self, node: NodeHandle) -> NodeHandle {
        self.handle(self.extreme(self.resolve(node), Side::Right))
    }

    /// Returns the next node in key order, or `None` if `node` holds the maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let one = tree.insert(1);
    /// let two = tree.insert(2);
    /// assert_eq!(tree.successor(one), Some(two));
    /// assert_eq!(tree.successor(two), None);
    /// ```
    pub fn successor(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.step(self.resolve(node), Side::Right)
            .map(|entry| self.handle(entry))
    }

    /// Returns the previous node in key order, or `None` if `node` holds the minimum.
    pub fn predecessor(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.step(self.resolve(node), Side::Left)
            .map(|entry| self.handle(entry))
    }

    /// Calls `visit` on every key in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// let mut keys = Vec::new();
    /// tree.walk_in_order(|key| keys.push(*key));
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    pub fn walk_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        for key in self.iter() {
            visit(key);
        }
    }

    /// Calls `visit` on every key in descending order.
    pub fn walk_reverse_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        for key in self.iter_rev() {
            visit(key);
        }
    }

    /// Returns an iterator over the keys of the tree in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self, self.root.map(|root| self.extreme(root, Side::Left)))
    }

    /// Returns an iterator over the keys of the tree in descending order.
    pub fn iter_rev(&self) -> RevIter<'_, T> {
        RevIter::new(self, self.root.map(|root| self.extreme(root, Side::Right)))
    }

    /// Checks every red-black invariant and the parent links, and returns shape statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in 0..100 {
    ///     tree.insert(key);
    /// }
    /// let stats = tree.validate().unwrap();
    /// assert_eq!(stats.entries(), 100);
    /// ```
    pub fn validate(&self) -> Result<Stats>
    where
        T: Ord,
    {
        if self.is_red(self.root) {
            return Err(Error::RedRoot);
        }

        let mut stats = Stats::new();
        let black_height = self.validate_subtree(self.root, None, 0, &mut stats)?;
        stats.set_black_height(black_height);

        if stats.entries() != self.size || self.arena.len() != self.size {
            return Err(Error::SizeMismatch {
                expected: self.size,
                found: stats.entries(),
            });
        }

        let mut prev: Option<&T> = None;
        for key in self.iter() {
            if let Some(prev) = prev {
                if prev > key {
                    return Err(Error::SortError);
                }
            }
            prev = Some(key);
        }

        Ok(stats)
    }

    pub(crate) fn node(&self, entry: Entry) -> &Node<T> {
        &self.arena[entry]
    }

    // Next node in in-order direction `side`: Right for successor, Left for predecessor.
    pub(crate) fn step(&self, entry: Entry, side: Side) -> Option<Entry> {
        if let Some(child) = self.arena[entry].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut curr = entry;
        let mut parent = self.arena[entry].parent;
        while let Some(parent_entry) = parent {
            if self.arena[parent_entry].child(side) != Some(curr) {
                break;
            }
            curr = parent_entry;
            parent = self.arena[parent_entry].parent;
        }
        parent
    }

    pub(crate) fn replace_key(&mut self, node: NodeHandle, key: T) -> T {
        let entry = self.resolve(node);
        mem::replace(&mut self.arena[entry].key, key)
    }

    fn handle(&self, entry: Entry) -> NodeHandle {
        NodeHandle {
            tree_id: self.id,
            entry,
        }
    }

    fn check(&self, node: NodeHandle) -> Result<Entry> {
        if node.tree_id != self.id {
            return Err(Error::ForeignHandle);
        }
        if !self.arena.contains(&node.entry) {
            return Err(Error::StaleHandle);
        }
        Ok(node.entry)
    }

    fn resolve(&self, node: NodeHandle) -> Entry {
        match self.check(node) {
            Ok(entry) => entry,
            Err(error) => panic!("Error: {}.", error),
        }
    }

    fn link<F>(&self, node: NodeHandle, f: F) -> Option<NodeHandle>
    where
        F: Fn(&Node<T>) -> Option<Entry>,
    {
        f(&self.arena[self.resolve(node)]).map(|entry| self.handle(entry))
    }

    fn is_red(&self, link: Option<Entry>) -> bool {
        match link {
            None => false,
            Some(entry) => self.arena[entry].is_red(),
        }
    }

    fn paint(&mut self, link: Option<Entry>, color: Color) {
        if let Some(entry) = link {
            self.arena[entry].color = color;
        }
    }

    fn parent_of(&self, entry: Entry) -> Option<Entry> {
        self.arena[entry].parent
    }

    fn child_of(&self, entry: Entry, side: Side) -> Option<Entry> {
        self.arena[entry].child(side)
    }

    fn side_of(&self, parent: Entry, child: Option<Entry>) -> Side {
        if self.arena[parent].left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn extreme(&self, entry: Entry, side: Side) -> Entry {
        let mut curr = entry;
        while let Some(child) = self.arena[curr].child(side) {
            curr = child;
        }
        curr
    }

    // Rotates the subtree rooted at `entry` towards `side`: the child on the opposite side takes
    // the place of `entry`, and `entry` becomes its child on `side`. Colors are untouched.
    fn rotate(&mut self, entry: Entry, side: Side) {
        let pivot = self
            .child_of(entry, side.opposite())
            .expect("Expected rotation pivot to be `Some`.");
        trace!("rotate {:?} at {:?}", side, entry);
        #[cfg(test)]
        {
            self.rotations += 1;
        }

        let inner = self.child_of(pivot, side);
        *self.arena[entry].child_mut(side.opposite()) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(entry);
        }

        let parent = self.parent_of(entry);
        self.arena[pivot].parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(parent) => {
                let parent_side = self.side_of(parent, Some(entry));
                *self.arena[parent].child_mut(parent_side) = Some(pivot);
            },
        }

        *self.arena[pivot].child_mut(side) = Some(entry);
        self.arena[entry].parent = Some(pivot);
    }

    fn rotate_left(&mut self, entry: Entry) {
        self.rotate(entry, Side::Left);
    }

    fn rotate_right(&mut self, entry: Entry) {
        self.rotate(entry, Side::Right);
    }

    fn rotate_towards(&mut self, entry: Entry, side: Side) {
        match side {
            Side::Left => self.rotate_left(entry),
            Side::Right => self.rotate_right(entry),
        }
    }

    fn insert_fixup(&mut self, entry: Entry) {
        let mut curr = entry;
        while let Some(parent) = self.parent_of(curr) {
            if !self.arena[parent].is_red() {
                break;
            }

            // a red parent is never the root
            let grandparent = self
                .parent_of(parent)
                .expect("Expected red node to have a parent.");
            let side = self.side_of(grandparent, Some(parent));
            let uncle = self.child_of(grandparent, side.opposite());

            if self.is_red(uncle) {
                trace!("insert fixup: red uncle at {:?}", grandparent);
                self.paint(Some(parent), Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(Some(grandparent), Color::Red);
                curr = grandparent;
                continue;
            }

            if self.child_of(parent, side.opposite()) == Some(curr) {
                trace!("insert fixup: inner child at {:?}", curr);
                curr = parent;
                self.rotate_towards(curr, side);
            }

            trace!("insert fixup: outer child at {:?}", curr);
            let parent = self
                .parent_of(curr)
                .expect("Expected rotated node to have a parent.");
            let grandparent = self
                .parent_of(parent)
                .expect("Expected red node to have a parent.");
            self.paint(Some(parent), Color::Black);
            self.paint(Some(grandparent), Color::Red);
            self.rotate_towards(grandparent, side.opposite());
        }

        let root = self.root;
        self.paint(root, Color::Black);
    }

    fn remove_entry(&mut self, entry: Entry) -> T {
        #[cfg(test)]
        {
            self.rotations = 0;
        }

        let spliced = {
            let node = &self.arena[entry];
            match (node.left, node.right) {
                (Some(_), Some(right)) => self.extreme(right, Side::Left),
                _ => entry,
            }
        };

        let (child, parent) = {
            let node = &self.arena[spliced];
            (node.left.or(node.right), node.parent)
        };
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(parent) => {
                let side = self.side_of(parent, Some(spliced));
                *self.arena[parent].child_mut(side) = child;
            },
        }

        let mut removed = self.arena.free(&spliced);
        if spliced != entry {
            mem::swap(&mut self.arena[entry].key, &mut removed.key);
        }
        if removed.color == Color::Black {
            self.delete_fixup(child, parent);
        }
        self.size -= 1;
        removed.key
    }

    // `curr` may be an empty link, so its parent is tracked alongside it.
    fn delete_fixup(&mut self, mut curr: Option<Entry>, mut parent: Option<Entry>) {
        while curr != self.root && !self.is_red(curr) {
            let parent_entry = match parent {
                Some(parent_entry) => parent_entry,
                None => break,
            };
            let side = self.side_of(parent_entry, curr);
            let mut sibling = self
                .child_of(parent_entry, side.opposite())
                .expect("Expected sibling of a doubly black node to be `Some`.");

            if self.arena[sibling].is_red() {
                trace!("delete fixup: red sibling at {:?}", sibling);
                self.paint(Some(sibling), Color::Black);
                self.paint(Some(parent_entry), Color::Red);
                self.rotate_towards(parent_entry, side);
                sibling = self
                    .child_of(parent_entry, side.opposite())
                    .expect("Expected sibling of a doubly black node to be `Some`.");
            }

            let near = self.child_of(sibling, side);
            let far = self.child_of(sibling, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                trace!("delete fixup: black nephews at {:?}", sibling);
                self.paint(Some(sibling), Color::Red);
                curr = Some(parent_entry);
                parent = self.parent_of(parent_entry);
                continue;
            }

            if !self.is_red(far) {
                trace!("delete fixup: red near nephew at {:?}", sibling);
                self.paint(near, Color::Black);
                self.paint(Some(sibling), Color::Red);
                self.rotate_towards(sibling, side.opposite());
                sibling = self
                    .child_of(parent_entry, side.opposite())
                    .expect("Expected sibling of a doubly black node to be `Some`.");
            }

            trace!("delete fixup: red far nephew at {:?}", sibling);
            let parent_color = self.arena[parent_entry].color;
            let far = self.child_of(sibling, side.opposite());
            self.paint(Some(sibling), parent_color);
            self.paint(Some(parent_entry), Color::Black);
            self.paint(far, Color::Black);
            self.rotate_towards(parent_entry, side);
            curr = self.root;
            parent = None;
        }

        self.paint(curr, Color::Black);
    }

    // Returns the number of black nodes on every path from `link` down to an empty link.
    fn validate_subtree(
        &self,
        link: Option<Entry>,
        parent: Option<Entry>,
        depth: usize,
        stats: &mut Stats,
    ) -> Result<usize> {
        let entry = match link {
            None => {
                stats.sample(depth);
                return Ok(0);
            },
            Some(entry) => entry,
        };

        let node = &self.arena[entry];
        if node.parent != parent {
            return Err(Error::BrokenParentLink);
        }
        if node.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(Error::ConsecutiveReds);
        }
        stats.count_entry();

        let left = self.validate_subtree(node.left, Some(entry), depth + 1, stats)?;
        let right = self.validate_subtree(node.right, Some(entry), depth + 1, stats)?;
        if left != right {
            return Err(Error::UnbalancedBlacks { left, right });
        }
        Ok(if node.is_red() { left } else { left + 1 })
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
