//! Crate-wide error type for theme compilation.
//!
//! Every variant aborts the compile that produced it. Lookups never fail; a
//! missing match is `None`, not an error.

/// Errors raised while parsing or compiling a theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// Malformed selector string or declarator.
    #[error("failed to parse '{input}': {message}")]
    Parse { input: String, message: String },

    /// A directive was given the wrong number of arguments.
    #[error("directive '@{directive}' expects {expected} argument(s), got {found}")]
    MappingArity {
        directive: String,
        expected: usize,
        found: usize,
    },

    /// The same import or mapping was declared twice.
    #[error("duplicate directive '@{directive} {argument}'")]
    DuplicateDirective { directive: String, argument: String },

    /// Selector has more nodes than the rank encoding can hold.
    #[error("selector '{selector}' has {len} nodes, the limit is {limit}", limit = crate::selector::MAX_SELECTOR_LEN)]
    SelectorTooDeep { selector: String, len: usize },

    /// The template factory refused a rule.
    #[error("template for '{selector}' failed: {message}")]
    Template { selector: String, message: String },
}

impl ThemeError {
    /// Build a [`ThemeError::Parse`] for the given input.
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Shorthand for results carrying a [`ThemeError`].
pub type Result<T, E = ThemeError> = std::result::Result<T, E>;
