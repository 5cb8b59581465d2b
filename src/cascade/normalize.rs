//! Cascade normalization: fill unset properties from base selectors.
//!
//! A base of `S` is any strictly shorter trailing part of `S` with ids and
//! relationships ignored. A base fills only the keys `S` does not declare, so
//! explicit declarations always win. Longer bases are consulted first.
//!
//! Derivate classes (`.button.primary`) additionally inherit from their parent
//! derivate (`.button.primary` -> `.button`) after the suffix bases.

use std::iter;

use tracing::trace;

use super::table::{PropertyMap, SelectorTable};
use crate::selector::Selector;

/// Normalize every entry of `table` in place.
///
/// Each base is normalized before it is read, so the result does not depend
/// on declaration order and a second call changes nothing.
pub fn normalize(table: &mut SelectorTable) {
    let mut done = vec![false; table.len()];
    for i in 0..table.len() {
        normalize_entry(table, i, &mut done);
    }
}

fn normalize_entry(table: &mut SelectorTable, i: usize, done: &mut [bool]) {
    if done[i] {
        return;
    }
    // Bases are strictly smaller than their selector, so this never cycles.
    done[i] = true;

    for base in bases(table.selector_at(i)) {
        let Some(j) = table.position(&base) else {
            continue;
        };
        normalize_entry(table, j, done);
        inherit(table, i, j);
    }
}

/// Bases of `selector` in the order they are consulted: relaxed suffixes
/// longest first, then parent derivates nearest first.
fn bases(selector: &Selector) -> Vec<Selector> {
    let suffixes = (1..selector.len())
        .rev()
        .map(|k| selector.relaxed_suffix(k));
    let derivates = iter::successors(parent_derivate(selector), parent_derivate);
    suffixes.chain(derivates).collect()
}

/// Copy the properties of entry `base` that entry `i` lacks.
fn inherit(table: &mut SelectorTable, i: usize, base: usize) {
    let own = table.properties_at(i);
    let missing: PropertyMap = table
        .properties_at(base)
        .iter()
        .filter(|(key, _)| !own.contains_key(*key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if missing.is_empty() {
        return;
    }
    trace!(
        selector = %table.selector_at(i),
        base = %table.selector_at(base),
        count = missing.len(),
        "inheriting properties"
    );
    table.properties_at_mut(i).extend(missing);
}

/// `selector` with the last derivate of its innermost node removed.
fn parent_derivate(selector: &Selector) -> Option<Selector> {
    let parent = selector.last()?.parent_derivate()?;
    let mut out = selector.clone();
    if let Some(last) = out.last_mut() {
        *last = parent;
    }
    Some(out)
}
