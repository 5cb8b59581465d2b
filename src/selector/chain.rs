//! Selector chains: ordered sequences of [`SelectorNode`]s.
//!
//! A [`Selector`] models either a declared rule pattern or the live ancestor
//! path of an element (a "query path"). Index 0 is the root-most node and the
//! last node is the target element.

use std::fmt;

use super::node::{Rank, SelectorNode};

/// Maximum number of nodes a selector may hold: the aggregate rank packs two
/// bits per node into a `u64`.
pub const MAX_SELECTOR_LEN: usize = 32;

/// An ordered chain of selector nodes, outermost ancestor first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selector {
    nodes: Vec<SelectorNode>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node as the new innermost node.
    pub fn push(&mut self, node: SelectorNode) {
        self.nodes.push(node);
    }

    /// Append a node (builder).
    pub fn with(mut self, node: SelectorNode) -> Self {
        self.push(node);
        self
    }

    pub fn nodes(&self) -> &[SelectorNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The innermost (target) node.
    pub fn last(&self) -> Option<&SelectorNode> {
        self.nodes.last()
    }

    /// Mutable access to the innermost node.
    pub(crate) fn last_mut(&mut self) -> Option<&mut SelectorNode> {
        self.nodes.last_mut()
    }

    /// Mutable access to the outermost node.
    pub(crate) fn first_mut(&mut self) -> Option<&mut SelectorNode> {
        self.nodes.first_mut()
    }

    /// Aggregate specificity: each node contributes its two rank bits shifted
    /// by `2 * i`, where `i` counts from the tail.
    ///
    /// Returns `None` when the selector exceeds [`MAX_SELECTOR_LEN`].
    pub fn rank(&self) -> Option<u64> {
        if self.nodes.len() > MAX_SELECTOR_LEN {
            return None;
        }
        Some(
            self.nodes
                .iter()
                .rev()
                .enumerate()
                .fold(0u64, |acc, (i, node)| {
                    acc | (u64::from(node.rank().bits()) << (2 * i))
                }),
        )
    }

    /// Rank bits of the node at tail position `i` (0 = innermost).
    pub fn rank_at(&self, i: usize) -> Rank {
        self.nodes
            .len()
            .checked_sub(i + 1)
            .map(|idx| self.nodes[idx].rank())
            .unwrap_or_default()
    }

    /// The last `k` nodes with id and relationship both wildcarded.
    ///
    /// This is the key shape of a "base" selector in the cascade.
    pub fn relaxed_suffix(&self, k: usize) -> Selector {
        let start = self.nodes.len().saturating_sub(k);
        Selector {
            nodes: self.nodes[start..].iter().map(SelectorNode::relaxed).collect(),
        }
    }
}

impl From<Vec<SelectorNode>> for Selector {
    fn from(nodes: Vec<SelectorNode>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<SelectorNode> for Selector {
    fn from_iter<T: IntoIterator<Item = SelectorNode>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Selector {
    type Item = &'a SelectorNode;
    type IntoIter = std::slice::Iter<'a, SelectorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Canonical string form, e.g. `.dialog>.panel .button#ok`.
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&joined.replace(" >", ">"))
    }
}
