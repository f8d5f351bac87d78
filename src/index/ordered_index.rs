//! Ordered Index for O(log n) Lookups and Range Scans
//!
//! B+Tree variant with owned children (no parent or sibling pointers).
//!
//! Design:
//! - Pre-emptive splitting: a node holding `order` keys is split before the
//!   insert descends into it, so the node receiving a promoted separator
//!   always has spare room.
//! - Leaf split copies the middle key up (it stays as the new leaf's first
//!   key); internal split moves the middle key up (removed from both halves).
//! - Routing: keys equal to a separator live in the right subtree. Insert,
//!   search and range scan all use the same rule.
//! - Duplicate keys overwrite the stored value in place.

use log::{debug, trace};
use std::fmt::Debug;

use super::KeyIndex;
use crate::config::MIN_ORDER;
use crate::error::{DuodexError, Result};
use crate::types::IndexKind;

// ============ NODES ============

#[derive(Debug, Clone)]
struct LeafNode<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K: Ord, V> LeafNode<K, V> {
    fn new() -> Self {
        Self { keys: Vec::new(), values: Vec::new() }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.keys.binary_search(key).ok().map(|pos| &self.values[pos])
    }

    /// Sorted shift-insert; an existing key has its value replaced.
    /// Returns true when a new key was added.
    fn upsert(&mut self, key: K, value: V) -> bool {
        match self.keys.binary_search(&key) {
            Ok(pos) => {
                self.values[pos] = value;
                false
            }
            Err(pos) => {
                self.keys.insert(pos, key);
                self.values.insert(pos, value);
                true
            }
        }
    }
}

#[derive(Debug, Clone)]
struct InternalNode<K, V> {
    /// Separator keys; child `i` holds keys `< keys[i]`, the last child holds the rest
    keys: Vec<K>,
    children: Vec<Node<K, V>>,
}

impl<K: Ord, V> InternalNode<K, V> {
    /// Index of the first separator strictly greater than `key`.
    fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|sep| sep <= key)
    }
}

#[derive(Debug, Clone)]
enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Internal(InternalNode<K, V>),
}

impl<K, V> Node<K, V> {
    fn key_count(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.keys.len(),
            Node::Internal(inner) => inner.keys.len(),
        }
    }
}

// ============ TREE ============

/// B+Tree-like ordered index.
///
/// Not safe for concurrent mutation: splits restructure nodes in place
/// mid-descent. Wrap the owning engine in a lock if it must be shared.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K, V> {
    root: Node<K, V>,
    order: usize,
    len: usize,
}

impl<K: Ord + Clone, V: Clone> OrderedIndex<K, V> {
    /// Create an empty tree. `order` is the key count at which a node splits.
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(DuodexError::InvalidOrder { order });
        }
        Ok(Self {
            root: Node::Leaf(LeafNode::new()),
            order,
            len: 0,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry, keeping the configured order.
    pub fn clear(&mut self) {
        self.root = Node::Leaf(LeafNode::new());
        self.len = 0;
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: K, value: V) {
        if self.root.key_count() >= self.order {
            let old_root = std::mem::replace(&mut self.root, Node::Leaf(LeafNode::new()));
            let mut new_root = InternalNode {
                keys: Vec::with_capacity(self.order),
                children: vec![old_root],
            };
            Self::split_child(&mut new_root, 0, self.order);
            self.root = Node::Internal(new_root);
            debug!("ordered index grew to height {}", self.height());
        }

        if Self::insert_non_full(&mut self.root, key, value, self.order) {
            self.len += 1;
        }
    }

    fn insert_non_full(node: &mut Node<K, V>, key: K, value: V, order: usize) -> bool {
        match node {
            Node::Leaf(leaf) => leaf.upsert(key, value),
            Node::Internal(inner) => {
                let mut idx = inner.child_index(&key);
                if inner.children[idx].key_count() >= order {
                    Self::split_child(inner, idx, order);
                    // Re-resolve against the promoted separator
                    if key >= inner.keys[idx] {
                        idx += 1;
                    }
                }
                Self::insert_non_full(&mut inner.children[idx], key, value, order)
            }
        }
    }

    /// Split the full child at `index`, promoting a separator into `parent`.
    fn split_child(parent: &mut InternalNode<K, V>, index: usize, order: usize) {
        let mid = order / 2;
        let (separator, sibling) = match &mut parent.children[index] {
            Node::Leaf(leaf) => {
                let keys = leaf.keys.split_off(mid);
                let values = leaf.values.split_off(mid);
                // Separator is copied: it stays as the new leaf's first key
                let separator = keys[0].clone();
                trace!("split leaf: {} | {} keys", leaf.keys.len(), keys.len());
                (separator, Node::Leaf(LeafNode { keys, values }))
            }
            Node::Internal(inner) => {
                let mut keys = inner.keys.split_off(mid);
                // Separator is moved: it leaves both halves
                let separator = keys.remove(0);
                let children = inner.children.split_off(mid + 1);
                trace!("split internal: {} | {} keys", inner.keys.len(), keys.len());
                (separator, Node::Internal(InternalNode { keys, children }))
            }
        };
        parent.keys.insert(index, separator);
        parent.children.insert(index + 1, sibling);
    }

    /// Point lookup.
    pub fn search(&self, key: &K) -> Option<&V> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Internal(inner) => node = &inner.children[inner.child_index(key)],
                Node::Leaf(leaf) => return leaf.get(key),
            }
        }
    }

    /// All entries with `start <= key <= end`, ascending. Empty when `start > end`.
    pub fn range_search(&self, start: &K, end: &K) -> Vec<(K, V)> {
        let mut out = Vec::new();
        if start <= end {
            Self::collect_range(&self.root, start, end, &mut out);
        }
        out
    }

    fn collect_range(node: &Node<K, V>, start: &K, end: &K, out: &mut Vec<(K, V)>) {
        match node {
            Node::Leaf(leaf) => {
                let from = leaf.keys.partition_point(|k| k < start);
                for (k, v) in leaf.keys[from..].iter().zip(&leaf.values[from..]) {
                    if k > end {
                        break;
                    }
                    out.push((k.clone(), v.clone()));
                }
            }
            Node::Internal(inner) => {
                // Children left of this one only hold keys below `start`
                let first = inner.child_index(start);
                for (j, child) in inner.children.iter().enumerate().skip(first) {
                    if j > 0 && inner.keys[j - 1] > *end {
                        break;
                    }
                    Self::collect_range(child, start, end, out);
                }
            }
        }
    }

    /// Full in-order scan.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len);
        Self::collect_all(&self.root, &mut out);
        out
    }

    fn collect_all(node: &Node<K, V>, out: &mut Vec<(K, V)>) {
        match node {
            Node::Leaf(leaf) => {
                out.extend(leaf.keys.iter().cloned().zip(leaf.values.iter().cloned()));
            }
            Node::Internal(inner) => {
                for child in &inner.children {
                    Self::collect_all(child, out);
                }
            }
        }
    }
}

impl<K, V> OrderedIndex<K, V> {
    /// Number of levels, 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Node::Internal(inner) = node {
            height += 1;
            node = &inner.children[0];
        }
        height
    }

    pub fn node_count(&self) -> usize {
        fn count<K, V>(node: &Node<K, V>) -> usize {
            match node {
                Node::Leaf(_) => 1,
                Node::Internal(inner) => 1 + inner.children.iter().map(count).sum::<usize>(),
            }
        }
        count(&self.root)
    }

    /// Largest key count held by any node.
    pub fn max_node_keys(&self) -> usize {
        fn walk<K, V>(node: &Node<K, V>) -> usize {
            match node {
                Node::Leaf(leaf) => leaf.keys.len(),
                Node::Internal(inner) => inner
                    .children
                    .iter()
                    .map(walk)
                    .fold(inner.keys.len(), usize::max),
            }
        }
        walk(&self.root)
    }
}

impl<K: Ord + Debug, V> OrderedIndex<K, V> {
    /// Verify structural invariants: strictly ascending keys, node capacity,
    /// child counts, separator bounds and uniform leaf depth.
    pub fn check_invariants(&self) -> Result<()> {
        let mut leaf_depth = None;
        self.check_node(&self.root, None, None, 1, &mut leaf_depth)?;
        Ok(())
    }

    fn check_node(
        &self,
        node: &Node<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> Result<()> {
        let keys = match node {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(inner) => &inner.keys,
        };

        if keys.len() > self.order {
            return Err(DuodexError::Corrupted(format!(
                "node at depth {depth} holds {} keys (order {})",
                keys.len(),
                self.order
            )));
        }
        if let Some(pair) = keys.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DuodexError::Corrupted(format!(
                "keys not ascending at depth {depth}: {:?} >= {:?}",
                pair[0], pair[1]
            )));
        }
        for key in keys {
            let below = lower.is_some_and(|lo| key < lo);
            let above = upper.is_some_and(|hi| key >= hi);
            if below || above {
                return Err(DuodexError::Corrupted(format!(
                    "key {key:?} outside bounds [{lower:?}, {upper:?}) at depth {depth}"
                )));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.values.len() != leaf.keys.len() {
                    return Err(DuodexError::Corrupted(format!(
                        "leaf at depth {depth} has {} keys but {} values",
                        leaf.keys.len(),
                        leaf.values.len()
                    )));
                }
                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(DuodexError::Corrupted(format!(
                            "leaf at depth {depth}, expected {expected}"
                        )));
                    }
                    Some(_) => {}
                }
                Ok(())
            }
            Node::Internal(inner) => {
                if inner.children.len() != inner.keys.len() + 1 {
                    return Err(DuodexError::Corrupted(format!(
                        "internal node at depth {depth} has {} keys but {} children",
                        inner.keys.len(),
                        inner.children.len()
                    )));
                }
                for (i, child) in inner.children.iter().enumerate() {
                    let lo = if i == 0 { lower } else { Some(&inner.keys[i - 1]) };
                    let hi = if i == inner.keys.len() { upper } else { Some(&inner.keys[i]) };
                    self.check_node(child, lo, hi, depth + 1, leaf_depth)?;
                }
                Ok(())
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone> KeyIndex<K, V> for OrderedIndex<K, V> {
    fn insert(&mut self, key: K, value: V) {
        OrderedIndex::insert(self, key, value);
    }

    fn search(&self, key: &K) -> Option<&V> {
        OrderedIndex::search(self, key)
    }

    fn range_search(&self, start: &K, end: &K) -> Vec<(K, V)> {
        OrderedIndex::range_search(self, start, end)
    }

    fn clear(&mut self) {
        OrderedIndex::clear(self);
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Ordered
    }

    fn len(&self) -> usize {
        self.len
    }
}
