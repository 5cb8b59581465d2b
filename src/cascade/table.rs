//! Compile-time selector table: every declared selector and its properties.

use std::collections::{BTreeMap, HashMap};

use crate::selector::Selector;

/// Property name to raw value. Ordered so compiled output is deterministic.
pub type PropertyMap = BTreeMap<String, String>;

/// Declared selectors and their property maps, in first-declaration order.
///
/// Only lives for the duration of one theme compile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorTable {
    entries: Vec<(Selector, PropertyMap)>,
    index: HashMap<Selector, usize>,
}

impl SelectorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a declaration into the table.
    ///
    /// A selector declared more than once keeps its first position; later
    /// declarations override earlier keys.
    pub fn fold(&mut self, selector: Selector, properties: PropertyMap) {
        match self.index.get(&selector) {
            Some(&i) => self.entries[i].1.extend(properties),
            None => {
                self.index.insert(selector.clone(), self.entries.len());
                self.entries.push((selector, properties));
            }
        }
    }

    /// Properties declared for exactly this selector.
    pub fn get(&self, selector: &Selector) -> Option<&PropertyMap> {
        self.index.get(selector).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, selector: &Selector) -> bool {
        self.index.contains_key(selector)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Selector, &PropertyMap)> {
        self.entries.iter().map(|(s, p)| (s, p))
    }

    /// Position of `selector` in declaration order.
    pub(crate) fn position(&self, selector: &Selector) -> Option<usize> {
        self.index.get(selector).copied()
    }

    /// Properties of the entry at position `i`.
    pub(crate) fn properties_at(&self, i: usize) -> &PropertyMap {
        &self.entries[i].1
    }

    /// Mutable properties of the entry at position `i`.
    pub(crate) fn properties_at_mut(&mut self, i: usize) -> &mut PropertyMap {
        &mut self.entries[i].1
    }

    /// Selector of the entry at position `i`.
    pub(crate) fn selector_at(&self, i: usize) -> &Selector {
        &self.entries[i].0
    }
}

impl IntoIterator for SelectorTable {
    type Item = (Selector, PropertyMap);
    type IntoIter = std::vec::IntoIter<(Selector, PropertyMap)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
