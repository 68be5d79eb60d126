//! This crate exposes a Binary Search Tree (BST) that is built from an arbitrary
//! sequence of keys and keeps itself in shape by rebuilding rather than rotating.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as
//! the longest path from the root `Node` to a leaf `Node`). Building the tree from
//! a sorted sequence by always promoting the middle key limits the height to
//! `O(lg N)` where `N` is the number of nodes in the tree. BSTs also naturally
//! support sorted iteration by visiting the left subtree, then the subtree root,
//! then the right subtree.
//!
//! ## Rebuilding
//!
//! [`tree::Tree`] doesn't rotate nodes on insert or delete so it can become
//! lopsided. Calling [`tree::Tree::rebalance`] collects its keys in order, sorts
//! them with [`sort::merge_sort`] and builds a fresh tree from them.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod sort;
pub mod tree;

#[cfg(test)]
mod test;
