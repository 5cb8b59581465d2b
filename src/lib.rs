//! # gilt-theme
//!
//! Selector-matched theme resolution for themable element hierarchies.
//!
//! Given a theme made of `selector { key: value }` declarations, gilt-theme
//! answers, for any element and its chain of styled ancestors, which style
//! and which delegate template apply.
//!
//! ## Core Systems
//!
//! - **[`selector`]**: selector nodes, chains, specificity ranks and the parser
//! - **[`cascade`]**: the compile-time selector table and property inheritance
//! - **[`store`]**: the suffix-indexed rule store and the memoizing resolver
//! - **[`theme`]**: theme sources, directives, template factories and the engine
//! - **[`error`]**: the crate-wide error type
//!
//! ## Example
//!
//! ```
//! use gilt_theme::{ThemeConfig, ThemeDocument, ThemeEngine};
//!
//! let theme = ThemeDocument::new()
//!     .map("PushButton", "button")
//!     .declare(".button", "color: red; delegate: ButtonDelegate")
//!     .declare(".dialog .button", "color: blue");
//!
//! let mut engine = ThemeEngine::new(ThemeConfig::default());
//! engine.load(&theme).unwrap();
//!
//! let path = engine.query_path([("dialog", "", None), ("PushButton", "", None)]);
//! let rule = engine.lookup(&path).unwrap();
//! assert_eq!(rule.delegate.as_deref(), Some("ButtonDelegate"));
//! ```

pub mod cascade;
pub mod error;
pub mod selector;
pub mod store;
pub mod theme;

pub use error::{Result, ThemeError};
pub use selector::{parse_query, parse_selectors, Relationship, Selector, SelectorNode};
pub use store::{Resolver, Rule, RuleId, RuleMatch, RuleStore};
pub use theme::{
    CompiledTheme, PropertyTemplates, TemplateFactory, ThemeConfig, ThemeDocument, ThemeEngine,
    ThemeItem, ThemeSource,
};
