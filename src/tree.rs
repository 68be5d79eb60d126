//! A BST of unique keys that is built height-minimal from an arbitrary sequence of keys and only
//! ever regains that shape by rebuilding itself from scratch.
//!
//! Inserts and deletes modify the tree in place without any rotations so a tree can drift out of
//! balance. [`Tree::rebalance`] flattens it back into a sorted sequence and rebuilds it.
//!
//! # Examples
//!
//! ```
//! use rebuild_bst::tree::Tree;
//!
//! let mut tree = Tree::from_keys(vec![12, 6, 3, 1, 8, 233, 47, 8]);
//!
//! // Duplicates are dropped and the middle key ends up at the root.
//! assert_eq!(tree.inorder(), vec![&1, &3, &6, &8, &12, &47, &233]);
//! assert_eq!(tree.root().map(|root| *root.key()), Some(8));
//!
//! // Ascending inserts pile up on the right...
//! for key in 234..240 {
//!     tree.insert(key);
//! }
//! assert!(!tree.is_balanced());
//!
//! // ...until the tree is rebuilt.
//! tree.rebalance();
//! assert!(tree.is_balanced());
//! assert_eq!(tree.len(), 13);
//! ```

use std::cmp::Ordering;
use std::iter::FromIterator;

use log::{debug, trace};

use crate::sort::merge_sort;

type Link<K> = Option<Box<Node<K>>>;

/// A Binary Search Tree over unique keys. See the [module documentation][self] for an overview.
///
/// Insert, delete, the queries and [`Tree::rebalance`] all recurse once per level of the tree, so
/// a tree that has drifted far out of balance (tens of thousands of levels, e.g. from ascending
/// inserts with no rebalance in between) can overflow the stack. Only dropping a tree is safe at
/// any depth. Rebalance before a tree gets that deep.
#[derive(Clone, Debug)]
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        // Unlink nodes one at a time so a list-shaped tree doesn't recurse once per node.
        let mut nodes: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = nodes.pop() {
            nodes.extend(node.left.take());
            nodes.extend(node.right.take());
        }
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self::from_keys(keys)
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Builds a tree holding every distinct key in `keys`. The keys are sorted with
    /// [`merge_sort`], duplicates are dropped and the tree is built by repeatedly promoting the
    /// middle key of a range to be the root of that range's subtree. For ranges with an even
    /// number of keys, the lower of the two middle keys is promoted.
    ///
    /// The result is as short as possible for its number of keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let tree = Tree::from_keys(vec![3, 1, 2, 3, 4]);
    ///
    /// assert_eq!(tree.len(), 4);
    /// assert_eq!(tree.preorder(), vec![&2, &1, &3, &4]);
    /// ```
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Ord,
    {
        let keys = keys.into_iter().collect::<Vec<_>>();
        let received = keys.len();

        // The sort is stable so deduplicating afterwards keeps the first of each run.
        let mut keys = merge_sort(keys);
        keys.dedup();
        debug!("Building tree from {} keys ({} unique)", received, keys.len());

        let len = keys.len();
        Self {
            root: build(&mut keys.into_iter(), len),
            len,
        }
    }

    /// The root of the tree, if it has any nodes.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Potentially finds the node holding the given key. If no node has the key, `None` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let tree = Tree::from_keys(1..=7);
    ///
    /// assert_eq!(tree.find(&6).map(|n| n.right().is_some()), Some(true));
    /// assert!(tree.find(&42).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.root().and_then(|root| root.find(key))
    }

    /// Whether some node holds the given key.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find(key).is_some()
    }

    /// Inserts `key` as a new leaf. Inserting a key that's already in the tree does nothing.
    ///
    /// The tree is never rebalanced here. Use [`Tree::rebalance`] once enough inserts have made
    /// it lopsided.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let mut tree = Tree::from_keys(vec![2, 4]);
    /// tree.insert(3);
    /// tree.insert(3);
    ///
    /// assert_eq!(tree.inorder(), vec![&2, &3, &4]);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let inserted_at = match self.root.as_mut() {
            Some(root) => root.insert(key, 0),
            None => {
                self.root = Some(Box::new(Node::new(key)));
                Some(0)
            }
        };

        match inserted_at {
            Some(depth) => {
                trace!("Inserted new leaf at depth {}", depth);
                self.len += 1;
            }
            None => debug!("Duplicate key, skipping insertion"),
        }
    }

    /// Removes the node holding `key` from the tree. Deleting a key that isn't in the tree does
    /// nothing.
    ///
    /// A node with a single child is replaced by that child. A node with two children takes the
    /// key of its in-order successor (the smallest key in its right subtree) and the successor's
    /// node is removed from the right subtree instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let mut tree = Tree::from_keys(vec![1, 3, 5, 7, 9]);
    /// tree.delete(&5);
    ///
    /// assert_eq!(tree.inorder(), vec![&1, &3, &7, &9]);
    /// assert_eq!(tree.root().map(|root| *root.key()), Some(7));
    /// ```
    pub fn delete(&mut self, key: &K)
    where
        K: Ord,
    {
        if delete(&mut self.root, key) {
            self.len -= 1;
        } else {
            debug!("Key not found, nothing deleted");
        }
    }

    /// Keys in in-order (left subtree, node, right subtree). This is always strictly increasing.
    pub fn inorder(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root() {
            root.inorder(&mut keys);
        }
        keys
    }

    /// Keys in pre-order (node, left subtree, right subtree).
    pub fn preorder(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root() {
            root.preorder(&mut keys);
        }
        keys
    }

    /// Keys in post-order (left subtree, right subtree, node).
    pub fn postorder(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root() {
            root.postorder(&mut keys);
        }
        keys
    }

    /// Keys grouped by their depth. Each level lists its keys from left to right.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let tree = Tree::from_keys(1..=5);
    ///
    /// assert_eq!(tree.level_order(), vec![vec![&3], vec![&1, &4], vec![&2, &5]]);
    /// ```
    pub fn level_order(&self) -> Vec<Vec<&K>> {
        let mut levels = Vec::new();
        if let Some(root) = self.root() {
            root.level_order(0, &mut levels);
        }
        levels
    }

    /// The height of the subtree rooted at the node holding `key`, or `-1` if no node holds it.
    /// See [`subtree_height`].
    pub fn height(&self, key: &K) -> isize
    where
        K: Ord,
    {
        self.find(key).map_or(-1, Node::height)
    }

    /// The number of edges between the root and the node holding `key`, or `-1` if no node holds
    /// it. The root has a depth of `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebuild_bst::tree::Tree;
    ///
    /// let tree = Tree::from_keys(1..=7);
    ///
    /// assert_eq!(tree.depth(&4), 0);
    /// assert_eq!(tree.depth(&7), 2);
    /// assert_eq!(tree.depth(&8), -1);
    /// ```
    pub fn depth(&self, key: &K) -> isize
    where
        K: Ord,
    {
        self.root()
            .and_then(|root| root.depth(key))
            .map_or(-1, |depth| depth as isize)
    }

    /// Whether every node's subtrees differ in height by at most one. An empty tree is balanced.
    pub fn is_balanced(&self) -> bool {
        self.root().map_or(true, Node::is_balanced)
    }

    /// Rebuilds the tree so that it's balanced again. Nothing happens if it's already balanced.
    ///
    /// Otherwise the keys are collected in order, sorted and built into a brand new tree exactly
    /// as [`Tree::from_keys`] would. The old nodes are dropped.
    pub fn rebalance(&mut self)
    where
        K: Ord,
    {
        if self.is_balanced() {
            debug!("Tree is balanced, skipping rebalance");
            return;
        }
        debug!(
            "Tree is unbalanced (height {}), rebuilding {} nodes",
            subtree_height(self.root()),
            self.len
        );

        let mut keys = Vec::with_capacity(self.len);
        if let Some(root) = self.root.take() {
            root.into_inorder(&mut keys);
        }

        let keys = merge_sort(keys);
        let len = keys.len();
        self.root = build(&mut keys.into_iter(), len);
        self.len = len;
    }
}

/// Builds a subtree from the next `len` keys of an ascending iterator.
///
/// For the range `[start, end]` of the sorted keys, the root is the key at
/// `start + (end - start) / 2` so the left subtree gets `(len - 1) / 2` keys and the right subtree
/// gets whatever is left.
fn build<K, I>(keys: &mut I, len: usize) -> Link<K>
where
    I: Iterator<Item = K>,
{
    if len == 0 {
        return None;
    }

    let left_len = (len - 1) / 2;
    let left = build(keys, left_len);
    let key = keys.next()?;
    let right = build(keys, len - left_len - 1);

    Some(Box::new(Node { key, left, right }))
}

/// Deletes `key` from the subtree in `link`, replacing the subtree's root if it holds the key.
/// Returns whether a node was removed.
fn delete<K>(link: &mut Link<K>, key: &K) -> bool
where
    K: Ord,
{
    let Some(node) = link else {
        return false;
    };

    match key.cmp(&node.key) {
        Ordering::Less => delete(&mut node.left, key),
        Ordering::Greater => delete(&mut node.right, key),
        Ordering::Equal => {
            if node.left.is_none() {
                *link = node.right.take();
            } else if node.right.is_none() {
                *link = node.left.take();
            } else {
                debug!("Deleting node with two children, splicing in its successor");
                match take_smallest(&mut node.right) {
                    Some(successor) => node.key = successor,
                    None => return false,
                }
            }
            true
        }
    }
}

/// Unlinks the leftmost node of the subtree in `link`, moving its right child up into its place,
/// and returns its key.
///
/// When called on a node's right subtree this removes the node's in-order successor: either the
/// right child itself (if it has no left child) or the leftmost node below it.
fn take_smallest<K>(link: &mut Link<K>) -> Option<K> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        return take_smallest(&mut node.left);
    }

    let smallest = link.take()?;
    let Node { key, right, .. } = *smallest;
    *link = right;
    Some(key)
}

/// The canonical height metric: the number of edges on the longest path from `node` down to a
/// leaf. An empty subtree has a height of `-1` so a single node has a height of `0`.
///
/// # Examples
///
/// ```
/// use rebuild_bst::tree::{subtree_height, Tree};
///
/// let tree = Tree::from_keys(1..=7);
///
/// assert_eq!(subtree_height(tree.root()), 2);
/// assert_eq!(subtree_height(Tree::<u8>::new().root()), -1);
/// ```
pub fn subtree_height<K>(node: Option<&Node<K>>) -> isize {
    match node {
        None => -1,
        Some(n) => 1 + subtree_height(n.left()).max(subtree_height(n.right())),
    }
}

/// Returns the height of `node` if every node below it is balanced.
fn balanced_height<K>(node: Option<&Node<K>>) -> Option<isize> {
    let Some(node) = node else {
        return Some(-1);
    };

    let left_height = balanced_height(node.left())?;
    let right_height = balanced_height(node.right())?;
    if (left_height - right_height).abs() > 1 {
        return None;
    }
    Some(1 + left_height.max(right_height))
}

/// A single key in a [`Tree`] along with its (possibly empty) left and right subtrees.
///
/// Nodes can only be read from outside the tree. Every key in the left subtree is less than
/// this node's key and every key in the right subtree is greater.
#[derive(Clone, Debug)]
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The root of the left subtree.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of the right subtree.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// The height of the subtree rooted at this node. See [`subtree_height`].
    pub fn height(&self) -> isize {
        subtree_height(Some(self))
    }

    /// Whether this node and every node below it have subtrees that differ in height by at most
    /// one.
    pub fn is_balanced(&self) -> bool {
        balanced_height(Some(self)).is_some()
    }

    fn find(&self, key: &K) -> Option<&Self>
    where
        K: Ord,
    {
        match key.cmp(&self.key) {
            Ordering::Less => self.left().and_then(|n| n.find(key)),
            Ordering::Equal => Some(self),
            Ordering::Greater => self.right().and_then(|n| n.find(key)),
        }
    }

    fn depth(&self, key: &K) -> Option<usize>
    where
        K: Ord,
    {
        let child = match key.cmp(&self.key) {
            Ordering::Less => self.left(),
            Ordering::Equal => return Some(0),
            Ordering::Greater => self.right(),
        };
        child.and_then(|n| n.depth(key)).map(|depth| depth + 1)
    }

    /// Inserts `key` below this node, which is at `depth`. Returns the depth of the new leaf or
    /// `None` if the key was already present.
    fn insert(&mut self, key: K, depth: usize) -> Option<usize>
    where
        K: Ord,
    {
        let child = match key.cmp(&self.key) {
            Ordering::Less => &mut self.left,
            Ordering::Equal => return None,
            Ordering::Greater => &mut self.right,
        };
        let inserted_at = match child {
            Some(child) => child.insert(key, depth + 1),
            None => {
                *child = Some(Box::new(Self::new(key)));
                Some(depth + 1)
            }
        };

        if cfg!(debug_assertions) {
            if let Some(left) = self.left() {
                assert!(self.key > left.key);
            }
            if let Some(right) = self.right() {
                assert!(self.key < right.key);
            }
        }
        inserted_at
    }

    fn inorder<'a>(&'a self, keys: &mut Vec<&'a K>) {
        if let Some(left) = self.left() {
            left.inorder(keys);
        }
        keys.push(&self.key);
        if let Some(right) = self.right() {
            right.inorder(keys);
        }
    }

    fn preorder<'a>(&'a self, keys: &mut Vec<&'a K>) {
        keys.push(&self.key);
        if let Some(left) = self.left() {
            left.preorder(keys);
        }
        if let Some(right) = self.right() {
            right.preorder(keys);
        }
    }

    fn postorder<'a>(&'a self, keys: &mut Vec<&'a K>) {
        if let Some(left) = self.left() {
            left.postorder(keys);
        }
        if let Some(right) = self.right() {
            right.postorder(keys);
        }
        keys.push(&self.key);
    }

    fn level_order<'a>(&'a self, level: usize, levels: &mut Vec<Vec<&'a K>>) {
        if levels.len() <= level {
            levels.push(Vec::new());
        }
        levels[level].push(&self.key);

        if let Some(left) = self.left() {
            left.level_order(level + 1, levels);
        }
        if let Some(right) = self.right() {
            right.level_order(level + 1, levels);
        }
    }

    /// Moves every key in this subtree into `keys` in order, consuming the nodes.
    fn into_inorder(self: Box<Self>, keys: &mut Vec<K>) {
        let Node { key, left, right } = *self;
        if let Some(left) = left {
            left.into_inorder(keys);
        }
        keys.push(key);
        if let Some(right) = right {
            right.into_inorder(keys);
        }
    }
}
