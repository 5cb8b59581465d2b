//! The compiled rule store and the resolver that queries it.

pub mod resolve;
pub mod rule;
pub mod tree;

pub use resolve::{Relaxation, Resolver, RuleMatch};
pub use rule::Rule;
pub use tree::{RuleId, RuleStore};
