//! Theme compilation and the engine that serves lookups.
//!
//! A [`ThemeSource`] is compiled through the selector parser, the cascade
//! normalizer and a [`TemplateFactory`] into a [`CompiledTheme`];
//! [`ThemeEngine`] owns the active one and swaps it atomically on re-theme.

pub mod compile;
pub mod config;
pub mod directive;
pub mod engine;
pub mod source;
pub mod template;

pub use compile::{compile, CompiledTheme};
pub use config::{ThemeConfig, DEFAULT_DELEGATE_KEY};
pub use directive::{DirectiveKind, Directives};
pub use engine::ThemeEngine;
pub use source::{ThemeDocument, ThemeItem, ThemeSource};
pub use template::{DelegateHandle, PropertyTemplates, StyleHandle, TemplateFactory};
