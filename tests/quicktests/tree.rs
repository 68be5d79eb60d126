use rebuild_bst::sort::merge_sort;
use rebuild_bst::tree::{subtree_height, Tree};

use std::collections::{BTreeSet, HashSet};

use crate::init_logging;

/// Whether each key is strictly greater than the one before it.
fn strictly_increasing<K: Ord>(keys: &[&K]) -> bool {
    keys.windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn inorder_is_sorted_and_unique(xs: Vec<i8>) -> bool {
    init_logging();
    let tree = Tree::from_keys(xs.clone());

    let mut expected = merge_sort(xs);
    expected.dedup();

    tree.inorder().into_iter().eq(expected.iter()) && tree.len() == expected.len()
}

#[quickcheck]
fn inserts_keep_keys_unique(xs: Vec<i8>, inserts: Vec<i8>) -> bool {
    init_logging();
    let mut tree = Tree::from_keys(xs.clone());
    for x in &inserts {
        tree.insert(*x);
    }

    let unique: HashSet<_> = xs.iter().chain(&inserts).collect();
    strictly_increasing(&tree.inorder()) && tree.len() == unique.len()
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    init_logging();
    let tree = Tree::from_keys(xs.clone());
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none() && tree.height(x) == -1 && tree.depth(x) == -1)
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    init_logging();
    let mut tree = Tree::from_keys(xs.clone());
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present: BTreeSet<_> = xs.into_iter().collect();
    for delete in &deletes {
        still_present.remove(delete);
    }

    deletes.iter().all(|x| tree.find(x).is_none())
        && tree.inorder().into_iter().eq(still_present.iter())
        && tree.len() == still_present.len()
}

#[quickcheck]
fn rebalance_restores_balance(xs: Vec<u8>, inserts: Vec<u8>) -> bool {
    init_logging();
    let mut tree = Tree::from_keys(xs);
    for x in inserts {
        tree.insert(x);
    }
    let before: Vec<u8> = tree.inorder().into_iter().copied().collect();

    tree.rebalance();
    let once: Vec<u8> = tree.preorder().into_iter().copied().collect();
    tree.rebalance();
    let twice: Vec<u8> = tree.preorder().into_iter().copied().collect();

    tree.is_balanced()
        && once == twice
        && tree.inorder().into_iter().copied().eq(before.into_iter())
}

#[quickcheck]
fn root_height_and_depth_agree(xs: Vec<i16>) -> bool {
    init_logging();
    let tree = Tree::from_keys(xs);
    match tree.root() {
        Some(root) => {
            tree.depth(root.key()) == 0 && tree.height(root.key()) == subtree_height(Some(root))
        }
        None => subtree_height(tree.root()) == -1,
    }
}

#[quickcheck]
fn depths_count_edges_from_root(xs: Vec<i8>, inserts: Vec<i8>) -> bool {
    init_logging();
    let mut tree = Tree::from_keys(xs);
    for x in inserts {
        tree.insert(x);
    }

    tree.level_order()
        .iter()
        .enumerate()
        .all(|(level, keys)| keys.iter().all(|key| tree.depth(key) == level as isize))
}

#[test]
fn unbalancing_and_repair() {
    init_logging();
    let mut tree = Tree::from_keys(vec![10, 20, 30, 40, 50, 60, 70, 80]);
    assert!(tree.is_balanced());

    for key in 81..=87 {
        tree.insert(key);
    }
    assert!(!tree.is_balanced());

    tree.rebalance();

    assert!(tree.is_balanced());
    assert_eq!(tree.len(), 15);
    assert!(strictly_increasing(&tree.inorder()));
}

#[test]
fn string_keys() {
    init_logging();
    let mut tree: Tree<String> = ["pear", "apple", "fig", "apple", "kiwi"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_eq!(tree.inorder(), vec!["apple", "fig", "kiwi", "pear"]);
    assert_eq!(tree.root().map(|root| root.key().as_str()), Some("fig"));

    tree.delete(&"fig".to_string());
    tree.insert("banana".to_string());

    assert_eq!(tree.inorder(), vec!["apple", "banana", "kiwi", "pear"]);
}
