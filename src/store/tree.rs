//! Rule store: a suffix-indexed selector tree, backed by a slotmap arena.
//!
//! Selectors are inserted innermost node first, so the root's children are
//! keyed by target elements and each level below walks one ancestor outward.
//! Any node may carry a [`Rule`]; nodes created only as path scaffolding do
//! not.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use super::rule::Rule;
use crate::error::{Result, ThemeError};
use crate::selector::{Selector, SelectorNode, MAX_SELECTOR_LEN};

new_key_type! {
    /// Identifier of a node in a [`RuleStore`]. Copy, lightweight (u64).
    pub struct RuleId;
}

/// A single rule store node.
#[derive(Debug)]
struct RuleNode<S, D> {
    /// The edge from the parent to this node. `None` only for the root.
    discriminator: Option<SelectorNode>,
    children: HashMap<SelectorNode, RuleId>,
    rule: Option<Rule<S, D>>,
    parent: Option<RuleId>,
}

impl<S, D> RuleNode<S, D> {
    fn new(discriminator: Option<SelectorNode>, parent: Option<RuleId>) -> Self {
        Self {
            discriminator,
            children: HashMap::new(),
            rule: None,
            parent,
        }
    }
}

/// The compiled, suffix-indexed tree of selectors to rules.
#[derive(Debug)]
pub struct RuleStore<S, D> {
    nodes: SlotMap<RuleId, RuleNode<S, D>>,
    root: RuleId,
    rule_count: usize,
}

impl<S, D> RuleStore<S, D> {
    /// Create a store holding only the root node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(RuleNode::new(None, None));
        Self {
            nodes,
            root,
            rule_count: 0,
        }
    }

    /// The root node: no discriminator, never carries a rule.
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// Insert `rule` under `selector`.
    ///
    /// An empty selector is a no-op and returns `Ok(None)`. Inserting the same
    /// selector again replaces the rule in place; nodes below it are kept.
    pub fn insert(&mut self, selector: &Selector, rule: Rule<S, D>) -> Result<Option<RuleId>> {
        if selector.is_empty() {
            return Ok(None);
        }
        if selector.len() > MAX_SELECTOR_LEN {
            return Err(ThemeError::SelectorTooDeep {
                selector: selector.to_string(),
                len: selector.len(),
            });
        }

        let mut current = self.root;
        for node in selector.nodes().iter().rev() {
            let existing = self.nodes[current].children.get(node).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = self
                        .nodes
                        .insert(RuleNode::new(Some(node.clone()), Some(current)));
                    self.nodes[current].children.insert(node.clone(), child);
                    child
                }
            };
        }

        let slot = &mut self.nodes[current].rule;
        if slot.is_some() {
            trace!(%selector, "replacing rule");
        } else {
            trace!(%selector, "inserting rule");
            self.rule_count += 1;
        }
        *slot = Some(rule);
        Ok(Some(current))
    }

    /// The child of `id` reached through exactly `key`.
    pub fn child(&self, id: RuleId, key: &SelectorNode) -> Option<RuleId> {
        self.nodes.get(id)?.children.get(key).copied()
    }

    /// Iterate the outgoing edges of `id`.
    pub fn children(&self, id: RuleId) -> impl Iterator<Item = (&SelectorNode, RuleId)> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|node| node.children.iter().map(|(k, &v)| (k, v)))
    }

    /// The rule stored at `id`, if any.
    pub fn rule(&self, id: RuleId) -> Option<&Rule<S, D>> {
        self.nodes.get(id)?.rule.as_ref()
    }

    pub fn has_rule(&self, id: RuleId) -> bool {
        self.rule(id).is_some()
    }

    /// The parent of `id`; `None` for the root.
    pub fn parent(&self, id: RuleId) -> Option<RuleId> {
        self.nodes.get(id)?.parent
    }

    /// Rebuild the declared selector that leads to `id`.
    ///
    /// Walking from `id` back to the root visits the nodes outermost first.
    pub fn selector_of(&self, id: RuleId) -> Selector {
        let mut selector = Selector::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            if let Some(discriminator) = &node.discriminator {
                selector.push(discriminator.clone());
            }
            current = node.parent;
        }
        selector
    }

    /// Aggregate rank of the selector that leads to `id`.
    pub fn rank_of(&self, id: RuleId) -> u64 {
        self.selector_of(id).rank().unwrap_or_default()
    }

    /// Number of nodes carrying a rule.
    pub fn len(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }

    /// Number of tree nodes, including the root and scaffolding.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate every node carrying a rule, in arena order.
    pub fn iter_rules(&self) -> impl Iterator<Item = (RuleId, &Rule<S, D>)> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| node.rule.as_ref().map(|rule| (id, rule)))
    }
}

impl<S, D> Default for RuleStore<S, D> {
    fn default() -> Self {
        Self::new()
    }
}
