//! Best-match resolution of query paths against a [`RuleStore`].
//!
//! Matching starts at the target element (the last node of the query) and
//! walks outward through its ancestors, following the store's suffix edges.
//! At every level the edge is chosen greedily from a fixed precedence list of
//! relaxations. A node with no matching edge is skipped, the target included,
//! and matching continues with the next ancestor out at the same tree node.

use std::collections::HashMap;

use tracing::trace;

use super::rule::Rule;
use super::tree::{RuleId, RuleStore};
use crate::selector::{Rank, Selector, SelectorNode};

/// One way of comparing a query node against the store's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    /// The node as given.
    Exact,
    /// Id wildcarded. Only tried when the node has an id.
    WithoutId,
    /// Relationship wildcarded. Only tried for child nodes.
    WithoutRelationship,
}

impl Relaxation {
    /// Order in which relaxations are attempted; the first edge found wins.
    pub const PRECEDENCE: [Relaxation; 3] = [
        Relaxation::Exact,
        Relaxation::WithoutId,
        Relaxation::WithoutRelationship,
    ];

    /// The lookup key for `node`, or `None` if this relaxation does not apply.
    pub fn key(self, node: &SelectorNode) -> Option<SelectorNode> {
        let rank = node.rank();
        match self {
            Relaxation::Exact => Some(node.clone()),
            Relaxation::WithoutId => rank.contains(Rank::HAS_ID).then(|| node.without_id()),
            Relaxation::WithoutRelationship => rank
                .contains(Rank::IS_CHILD)
                .then(|| node.without_relationship()),
        }
    }
}

/// A resolved rule together with the selector it was declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a, S, D> {
    pub id: RuleId,
    /// The declared selector that matched.
    pub selector: Selector,
    /// Aggregate rank of the declared selector.
    pub rank: u64,
    pub rule: &'a Rule<S, D>,
}

/// Owns a compiled [`RuleStore`] and memoizes lookups against it.
///
/// The cache is keyed by the exact query path and also remembers misses. It
/// is never evicted; it is dropped along with the store.
#[derive(Debug)]
pub struct Resolver<S, D> {
    store: RuleStore<S, D>,
    cache: HashMap<Selector, Option<RuleId>>,
    caching: bool,
}

impl<S, D> Resolver<S, D> {
    /// Create a caching resolver over `store`.
    pub fn new(store: RuleStore<S, D>) -> Self {
        Self {
            store,
            cache: HashMap::new(),
            caching: true,
        }
    }

    /// Enable or disable memoization (builder).
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        if !caching {
            self.cache.clear();
        }
        self
    }

    pub fn store(&self) -> &RuleStore<S, D> {
        &self.store
    }

    /// Number of memoized query paths, hits and misses alike.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every memoized result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The store node best matching `query`, memoized.
    pub fn lookup_match(&mut self, query: &Selector) -> Option<RuleId> {
        if !self.caching {
            return self.search(query);
        }
        if let Some(&hit) = self.cache.get(query) {
            return hit;
        }
        let found = self.search(query);
        trace!(%query, matched = found.is_some(), "lookup cache miss");
        self.cache.insert(query.clone(), found);
        found
    }

    /// The rule best matching `query`, memoized. `None` means the element is
    /// not themed.
    pub fn lookup(&mut self, query: &Selector) -> Option<&Rule<S, D>> {
        let id = self.lookup_match(query)?;
        self.store.rule(id)
    }

    /// Like [`lookup`](Self::lookup), but also reports which declared
    /// selector matched.
    pub fn resolve(&mut self, query: &Selector) -> Option<RuleMatch<'_, S, D>> {
        let id = self.lookup_match(query)?;
        let selector = self.store.selector_of(id);
        let rank = selector.rank().unwrap_or_default();
        let rule = self.store.rule(id)?;
        Some(RuleMatch {
            id,
            selector,
            rank,
            rule,
        })
    }

    /// Run the matching algorithm without touching the cache.
    ///
    /// The root carries no rule, so a query none of whose nodes reach a rule
    /// resolves to `None`.
    pub fn search(&self, query: &Selector) -> Option<RuleId> {
        self.search_from(self.store.root(), query.nodes())
    }

    /// Match the remaining ancestors below `at`.
    ///
    /// Falls back to the rule at `at` when no deeper continuation carries a
    /// rule, so the most specific fully matched declaration wins.
    fn search_from(&self, at: RuleId, path: &[SelectorNode]) -> Option<RuleId> {
        let own = self.store.has_rule(at).then_some(at);

        let mut remaining = path;
        while let Some((node, rest)) = remaining.split_last() {
            if let Some(child) = self.match_edge(at, node) {
                return self.search_from(child, rest).or(own);
            }
            // No edge for this node: skip it and try the next one out.
            remaining = rest;
        }
        own
    }

    /// The first edge out of `at` matching `node` under the relaxation order.
    fn match_edge(&self, at: RuleId, node: &SelectorNode) -> Option<RuleId> {
        Relaxation::PRECEDENCE
            .iter()
            .filter_map(|relaxation| relaxation.key(node))
            .find_map(|key| self.store.child(at, &key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{parse_query, parse_selectors};
    use pretty_assertions::assert_eq;

    type Store = RuleStore<&'static str, ()>;

    fn store(rules: &[(&str, &'static str)]) -> Resolver<&'static str, ()> {
        let mut store = Store::new();
        for (selector, style) in rules {
            for s in parse_selectors(selector).unwrap() {
                store.insert(&s, Rule::style(*style)).unwrap();
            }
        }
        Resolver::new(store)
    }

    fn style_for(resolver: &mut Resolver<&'static str, ()>, query: &str) -> Option<&'static str> {
        let q = parse_query(query).unwrap();
        resolver.lookup(&q).and_then(|r| r.style)
    }

    // ── Relaxation keys ──────────────────────────────────────────────

    #[test]
    fn relaxation_keys_only_apply_when_bits_set() {
        let plain = SelectorNode::class("a");
        assert_eq!(Relaxation::Exact.key(&plain), Some(plain.clone()));
        assert_eq!(Relaxation::WithoutId.key(&plain), None);
        assert_eq!(Relaxation::WithoutRelationship.key(&plain), None);

        let id_only = SelectorNode::class("a").with_id("x");
        assert_eq!(Relaxation::WithoutId.key(&id_only), Some(plain.clone()));
        assert_eq!(Relaxation::WithoutRelationship.key(&id_only), None);

        let both = SelectorNode::class("a").with_id("x").child();
        assert_eq!(Relaxation::WithoutId.key(&both), Some(plain.clone().child()));
        assert_eq!(
            Relaxation::WithoutRelationship.key(&both),
            Some(plain.with_id("x"))
        );
    }

    // ── Basic matching ───────────────────────────────────────────────

    #[test]
    fn exact_selector_matches_itself() {
        let mut r = store(&[(".dialog > .panel .button#ok", "s")]);
        let q = parse_selectors(".dialog > .panel .button#ok").unwrap().remove(0);
        assert_eq!(r.lookup(&q).and_then(|x| x.style), Some("s"));
    }

    #[test]
    fn empty_query_and_empty_store() {
        let mut r = store(&[]);
        assert!(r.lookup(&Selector::new()).is_none());
        assert_eq!(style_for(&mut r, ".button"), None);
    }

    #[test]
    fn unknown_element_is_not_themed() {
        let mut r = store(&[(".button", "s")]);
        assert_eq!(style_for(&mut r, ".label"), None);
    }

    // ── Relaxation precedence ────────────────────────────────────────

    #[test]
    fn other_id_falls_back_to_class_rule() {
        let mut r = store(&[(".a#x", "with-id"), (".a", "plain")]);
        assert_eq!(style_for(&mut r, ".a#y"), Some("plain"));
        assert_eq!(style_for(&mut r, ".a#x"), Some("with-id"));
        assert_eq!(style_for(&mut r, ".a"), Some("plain"));
    }

    #[test]
    fn id_rule_alone_does_not_match_other_id() {
        let mut r = store(&[(".a#x", "with-id")]);
        assert_eq!(style_for(&mut r, ".a#y"), None);
        assert_eq!(style_for(&mut r, ".a"), None);
    }

    #[test]
    fn descendant_rule_matches_child_query() {
        let mut r = store(&[(".box .frame .button", "s")]);
        assert_eq!(style_for(&mut r, ">.box>.frame>.button"), Some("s"));
    }

    #[test]
    fn child_rule_does_not_match_descendant_query() {
        let mut r = store(&[(".a > .b", "s")]);
        assert_eq!(style_for(&mut r, ".a .b"), None);
        assert_eq!(style_for(&mut r, ".a>.b"), Some("s"));
    }

    #[test]
    fn exact_relationship_preferred_over_relaxed() {
        let mut r = store(&[(".a > .b", "child"), (".a .b", "desc")]);
        assert_eq!(style_for(&mut r, ".a>.b"), Some("child"));
        assert_eq!(style_for(&mut r, ".a .b"), Some("desc"));
    }

    #[test]
    fn id_relaxed_before_relationship() {
        let mut r = store(&[(".x > .a", "no-id"), (".x .a#i", "no-rel")]);
        assert_eq!(style_for(&mut r, ".x>.a#i"), Some("no-id"));
    }

    #[test]
    fn id_and_relationship_are_never_relaxed_together() {
        let mut r = store(&[(".root .a", "s")]);
        assert_eq!(style_for(&mut r, ".root>.a#y"), None);
        assert_eq!(style_for(&mut r, ".root>.a"), Some("s"));
        assert_eq!(style_for(&mut r, ".root .a#y"), Some("s"));
    }

    // ── Ancestor skipping ────────────────────────────────────────────

    #[test]
    fn single_rule_matches_through_ancestors() {
        let mut r = store(&[(".button", "s")]);
        assert_eq!(style_for(&mut r, ">.dialog>.panel>.button"), Some("s"));
    }

    #[test]
    fn descendant_rule_skips_unnamed_intermediate() {
        let mut r = store(&[(".dialog .button", "s")]);
        assert_eq!(style_for(&mut r, ".dialog>.panel>.frame>.button"), Some("s"));
    }

    #[test]
    fn unmatched_target_is_skipped_like_any_ancestor() {
        let mut r = store(&[(".panel", "s")]);
        assert_eq!(style_for(&mut r, ".panel>.button"), Some("s"));
        assert_eq!(style_for(&mut r, ".dialog>.panel>.frame>.button#ok"), Some("s"));
        // Nothing left to skip to.
        assert_eq!(style_for(&mut r, ".button"), None);
    }

    #[test]
    fn unmatched_required_ancestor_is_no_match() {
        let mut r = store(&[(".box .button", "s")]);
        assert_eq!(style_for(&mut r, ".dialog>.button"), None);
        assert_eq!(style_for(&mut r, ".button"), None);
    }

    // ── Fallback ─────────────────────────────────────────────────────

    #[test]
    fn more_specific_path_wins() {
        let mut r = store(&[(".button", "plain"), (".dialog .button", "dialog")]);
        assert_eq!(style_for(&mut r, ".dialog>.button"), Some("dialog"));
        assert_eq!(style_for(&mut r, ".window>.button"), Some("plain"));
    }

    #[test]
    fn falls_back_to_enclosing_rule_when_continuation_fails() {
        let mut r = store(&[(".button", "plain"), (".a .b .button", "deep")]);
        // `.b` matches but `.a` is missing above it.
        assert_eq!(style_for(&mut r, ".x>.b>.button"), Some("plain"));
        assert_eq!(style_for(&mut r, ".a>.x>.b>.button"), Some("deep"));
    }

    #[test]
    fn greedy_edge_choice_does_not_backtrack_into_alternatives() {
        // `.b` is taken as soon as it matches; the skip that would reach
        // `.c .button` is not explored.
        let mut r = store(&[(".a .b .button", "ab"), (".c .button", "c")]);
        assert_eq!(style_for(&mut r, ".c>.b>.button"), None);
    }

    // ── Memoization ──────────────────────────────────────────────────

    #[test]
    fn cache_records_hits_and_misses() {
        let mut r = store(&[(".button", "s")]);
        assert_eq!(r.cache_len(), 0);
        assert_eq!(style_for(&mut r, ".button"), Some("s"));
        assert_eq!(style_for(&mut r, ".label"), None);
        assert_eq!(r.cache_len(), 2);
        assert_eq!(style_for(&mut r, ".button"), Some("s"));
        assert_eq!(style_for(&mut r, ".label"), None);
        assert_eq!(r.cache_len(), 2);

        r.clear_cache();
        assert_eq!(r.cache_len(), 0);
    }

    #[test]
    fn uncached_resolver_gives_same_answers() {
        let rules = [(".button", "plain"), (".dialog .button", "dialog"), (".a#x", "x")];
        let mut cached = store(&rules);
        let mut uncached = store(&rules).with_caching(false);
        for q in [".dialog>.button", ".button", ".a#x", ".a#y", ">.z>.dialog>.q>.button"] {
            let first = style_for(&mut cached, q);
            let second = style_for(&mut cached, q);
            assert_eq!(first, second, "{q}");
            assert_eq!(first, style_for(&mut uncached, q), "{q}");
        }
        assert_eq!(uncached.cache_len(), 0);
    }

    #[test]
    fn resolve_reports_declared_selector_and_rank() {
        let mut r = store(&[(".dialog > .button#ok", "s")]);
        let q = parse_query(".window>.dialog>.button#ok").unwrap();
        let m = r.resolve(&q).unwrap();
        assert_eq!(m.selector.to_string(), ".dialog>.button#ok");
        assert_eq!(m.rank, 0b00_11);
        assert_eq!(m.rule.style, Some("s"));
    }
}
