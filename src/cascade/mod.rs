//! Cascade: the compile-time selector table and its normalization pass.

pub mod normalize;
pub mod table;

pub use normalize::normalize;
pub use table::{PropertyMap, SelectorTable};
