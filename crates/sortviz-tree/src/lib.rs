#![forbid(unsafe_code)]

//! Recursion tree display-state resolution.
//!
//! Maps `(tree, highlighted indices, phase, algorithm)` to one
//! [`NodeState`] per node. The resolver is a pure projection: no timers,
//! no mutation, re-run in full on every playback tick because the rule
//! set is not incremental. Each node is evaluated independently against
//! the same shared highlight/phase pair; a node's state never depends on
//! a parent's or child's computed state.
//!
//! Precedence is an explicit ordered rule list rather than nested
//! conditionals, so each rule is auditable and testable on its own:
//!
//! 1. [`pivot_rule`]: partition-based algorithm, pivot-selection phase,
//!    and the highlight is exactly this node's pivot index.
//! 2. [`exact_range_rule`]: the highlight equals the node's `[l, r]`;
//!    the phase picks `dividing`, `merging`, or `active`.
//! 3. [`contained_range_rule`]: the highlighted span lies inside the
//!    node's span; requires at least two highlight elements (a
//!    single-element highlight skips this rule rather than matching it).
//! 4. Fallback: `default`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sortviz_core::{AlgorithmKind, RecursionTreeNode, StepKind};

/// Visual emphasis of one tree node at one playback instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Not involved in the current operation.
    Default,
    /// The current operation happens somewhere inside this node's span.
    Path,
    /// The current operation targets exactly this node's span.
    Active,
    /// This span is being divided.
    Dividing,
    /// This span is at a merge boundary.
    Merging,
    /// This node's pivot is being selected.
    Pivot,
}

/// The per-tick inputs shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct HighlightContext<'a> {
    /// Indices the current step highlights, in step order.
    pub highlighted: &'a [usize],
    /// The current step's phase tag.
    pub phase: StepKind,
    /// Algorithm the trace was produced by.
    pub algorithm: AlgorithmKind,
}

/// One precedence level: returns a state on match, `None` to fall through.
pub type Rule = fn(&RecursionTreeNode, &HighlightContext<'_>) -> Option<NodeState>;

/// The ordered rule list; first match wins.
pub const RULES: &[Rule] = &[pivot_rule, exact_range_rule, contained_range_rule];

/// Rule 1: the highlight is exactly this node's pivot, during pivot
/// selection of a partition-based algorithm.
pub fn pivot_rule(node: &RecursionTreeNode, cx: &HighlightContext<'_>) -> Option<NodeState> {
    if !cx.algorithm.is_partition_based() || cx.phase != StepKind::Pivot {
        return None;
    }
    let pivot = node.pivot_index?;
    matches!(*cx.highlighted, [single] if single == pivot).then_some(NodeState::Pivot)
}

/// Rule 2: the highlight equals the node's `[l, r]` exactly, in order.
pub fn exact_range_rule(node: &RecursionTreeNode, cx: &HighlightContext<'_>) -> Option<NodeState> {
    let [l, r] = node.range;
    match *cx.highlighted {
        [first, second] if first as i64 == l && second as i64 == r => Some(match cx.phase {
            StepKind::Divide => NodeState::Dividing,
            phase if phase.is_merge_boundary() => NodeState::Merging,
            _ => NodeState::Active,
        }),
        _ => None,
    }
}

/// Rule 3: the highlighted span lies inside the node's span.
///
/// Intentionally narrowed to highlights of at least two elements; a
/// single comparison index never marks a path.
pub fn contained_range_rule(
    node: &RecursionTreeNode,
    cx: &HighlightContext<'_>,
) -> Option<NodeState> {
    let [l, r] = node.range;
    match *cx.highlighted {
        [first, .., last] => (first as i64 >= l && last as i64 <= r).then_some(NodeState::Path),
        _ => None,
    }
}

/// State of a single node, evaluated against the rule list.
pub fn node_state(node: &RecursionTreeNode, cx: &HighlightContext<'_>) -> NodeState {
    RULES
        .iter()
        .find_map(|rule| rule(node, cx))
        .unwrap_or(NodeState::Default)
}

/// Resolve a display state for every node of the tree.
///
/// Returns an empty map when `algorithm` is not a divide-and-conquer
/// variant; the caller renders nothing in that case.
pub fn resolve_tree_states(
    tree: &RecursionTreeNode,
    highlighted: &[usize],
    phase: StepKind,
    algorithm: AlgorithmKind,
) -> BTreeMap<String, NodeState> {
    let mut states = BTreeMap::new();
    if !algorithm.is_divide_and_conquer() {
        return states;
    }
    let cx = HighlightContext {
        highlighted,
        phase,
        algorithm,
    };
    tree.for_each(&mut |node| {
        states.insert(node.id.clone(), node_state(node, &cx));
    });
    states
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    const PHASES: [StepKind; 7] = [
        StepKind::Initial,
        StepKind::Comparison,
        StepKind::Swap,
        StepKind::Divide,
        StepKind::MergeStart,
        StepKind::MergeEnd,
        StepKind::Pivot,
    ];

    fn arb_phase() -> impl Strategy<Value = StepKind> {
        prop::sample::select(PHASES.to_vec())
    }

    fn arb_node(depth: u32) -> BoxedStrategy<RecursionTreeNode> {
        let node = (0i64..8, 0i64..8, prop::option::of(0usize..8)).prop_map(|(a, b, pivot)| {
            let (l, r) = (a.min(b), a.max(b));
            RecursionTreeNode {
                id: format!("n-{l}-{r}-{}", pivot.map_or(0, |p| p + 1)),
                range: [l, r],
                array: Vec::new(),
                children: Vec::new(),
                pivot_index: pivot,
                phase: None,
            }
        });
        if depth == 0 {
            node.boxed()
        } else {
            (node, prop::collection::vec(arb_node(depth - 1), 0..3))
                .prop_map(|(mut parent, children)| {
                    parent.children = children;
                    parent
                })
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic(
            tree in arb_node(2),
            highlighted in prop::collection::vec(0usize..8, 0..3),
            phase in arb_phase(),
        ) {
            let a = resolve_tree_states(&tree, &highlighted, phase, AlgorithmKind::Quick);
            let b = resolve_tree_states(&tree, &highlighted, phase, AlgorithmKind::Quick);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn node_state_ignores_ancestry(
            tree in arb_node(2),
            highlighted in prop::collection::vec(0usize..8, 0..3),
            phase in arb_phase(),
        ) {
            // A node's resolved state must equal the state of the same
            // node evaluated in isolation.
            let states = resolve_tree_states(&tree, &highlighted, phase, AlgorithmKind::Quick);
            let cx = HighlightContext {
                highlighted: &highlighted,
                phase,
                algorithm: AlgorithmKind::Quick,
            };
            let mut ok = true;
            tree.for_each(&mut |node| {
                ok &= states.get(&node.id) == Some(&node_state(node, &cx));
            });
            prop_assert!(ok);
        }
    }
}
