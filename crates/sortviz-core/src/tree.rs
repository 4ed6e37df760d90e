#![forbid(unsafe_code)]

//! Static recursion tree emitted by divide-and-conquer producers.
//!
//! The tree records how an algorithm partitioned its input: one node per
//! recursive call, carrying the inclusive index range the call covered and
//! a snapshot of the subsequence at the time the node was formed. It is
//! built once, before playback starts, and read-only afterwards; the
//! resolver in `sortviz-tree` projects per-node display states from it on
//! every tick without ever writing back.
//!
//! # Invariants
//!
//! 1. For any non-leaf node, every child's range is a sub-interval of the
//!    parent's range.
//! 2. Children are ordered left-to-right by ascending lower bound.
//!
//! Bounds are signed: the quick-sort producer emits empty ranges such as
//! `[0, -1]` for recursion into a zero-length side of a partition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static phase tag the producer stamps on a node when it forms it.
///
/// Never altered by the resolver; `sorted`/`partitioned` mark spans the
/// producer finished during trace construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodePhase {
    Divide,
    Leaf,
    Sorted,
    Partitioned,
}

/// One node of the recursion tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecursionTreeNode {
    /// Producer-assigned identifier, unique within one tree
    /// (e.g. `merge-0-7`, `quick-3-5`).
    pub id: String,
    /// Inclusive `[l, r]` positions of the original sequence this node
    /// covers. May be empty (`l > r`) on partition edges.
    pub range: [i64; 2],
    /// Subsequence occupying `range` when the node was formed.
    #[serde(default)]
    pub array: Vec<i64>,
    /// Child calls, left-to-right. Empty means leaf.
    #[serde(default)]
    pub children: Vec<RecursionTreeNode>,
    /// Absolute pivot position, set by partition-style producers only.
    #[serde(
        rename = "pivotIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pivot_index: Option<usize>,
    /// Static producer phase, if stamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<NodePhase>,
}

impl RecursionTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit this node and every descendant, parents before children.
    pub fn for_each<F: FnMut(&RecursionTreeNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.for_each(f);
        }
    }

    /// Total node count, this node included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.for_each(&mut |_| count += 1);
        count
    }
}

/// A tree that violates the nesting or ordering invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeShapeError {
    /// A child's range escapes its parent's range.
    #[error("node {parent}: child {child} range [{child_l}, {child_r}] escapes parent range [{l}, {r}]")]
    ChildOutOfRange {
        parent: String,
        child: String,
        child_l: i64,
        child_r: i64,
        l: i64,
        r: i64,
    },
    /// Siblings are not ordered by ascending lower bound.
    #[error("node {parent}: children out of order at {child}")]
    UnorderedChildren { parent: String, child: String },
}

/// Validate the tree shape once, at the deserialization boundary.
///
/// Empty child ranges (`l > r`) satisfy nesting vacuously as long as both
/// bounds stay within the parent's span.
pub fn validate_tree(root: &RecursionTreeNode) -> Result<(), TreeShapeError> {
    let [l, r] = root.range;
    let mut prev_lower: Option<i64> = None;
    for child in &root.children {
        let [child_l, child_r] = child.range;
        if child_l < l || child_r > r {
            return Err(TreeShapeError::ChildOutOfRange {
                parent: root.id.clone(),
                child: child.id.clone(),
                child_l,
                child_r,
                l,
                r,
            });
        }
        if let Some(prev) = prev_lower {
            if child_l < prev {
                return Err(TreeShapeError::UnorderedChildren {
                    parent: root.id.clone(),
                    child: child.id.clone(),
                });
            }
        }
        prev_lower = Some(child_l);
        validate_tree(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, l: i64, r: i64, children: Vec<RecursionTreeNode>) -> RecursionTreeNode {
        RecursionTreeNode {
            id: id.to_string(),
            range: [l, r],
            array: Vec::new(),
            children,
            pivot_index: None,
            phase: None,
        }
    }

    #[test]
    fn producer_shape_deserializes() {
        let json = r#"{
            "id": "quick-0-3",
            "range": [0, 3],
            "array": [4, 1, 3, 2],
            "phase": "partitioned",
            "pivotIndex": 2,
            "children": [
                {"id": "quick-0-1", "range": [0, 1], "array": [1, 2], "children": []},
                {"id": "quick-3-3", "range": [3, 3], "array": [4], "children": []}
            ]
        }"#;
        let tree: RecursionTreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.pivot_index, Some(2));
        assert_eq!(tree.phase, Some(NodePhase::Partitioned));
        assert_eq!(tree.node_count(), 3);
        assert!(tree.children[0].is_leaf());
        assert_eq!(validate_tree(&tree), Ok(()));
    }

    #[test]
    fn empty_partition_range_deserializes() {
        let json = r#"{"id": "quick-0--1", "range": [0, -1], "array": [], "children": []}"#;
        let tree: RecursionTreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.range, [0, -1]);
        assert_eq!(validate_tree(&tree), Ok(()));
    }

    #[test]
    fn child_escaping_parent_range_is_rejected() {
        let tree = node("merge-0-3", 0, 3, vec![node("merge-0-4", 0, 4, vec![])]);
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeShapeError::ChildOutOfRange { ref child, .. }) if child == "merge-0-4"
        ));
    }

    #[test]
    fn unordered_siblings_are_rejected() {
        let tree = node(
            "merge-0-3",
            0,
            3,
            vec![node("merge-2-3", 2, 3, vec![]), node("merge-0-1", 0, 1, vec![])],
        );
        assert!(matches!(
            validate_tree(&tree),
            Err(TreeShapeError::UnorderedChildren { ref child, .. }) if child == "merge-0-1"
        ));
    }

    #[test]
    fn for_each_visits_parents_before_children() {
        let tree = node(
            "merge-0-3",
            0,
            3,
            vec![
                node("merge-0-1", 0, 1, vec![]),
                node("merge-2-3", 2, 3, vec![]),
            ],
        );
        let mut order = Vec::new();
        tree.for_each(&mut |n| order.push(n.id.clone()));
        assert_eq!(order, vec!["merge-0-3", "merge-0-1", "merge-2-3"]);
    }
}
