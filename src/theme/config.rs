//! Theme engine configuration.

/// Property key that names a rule's delegate template by default.
pub const DEFAULT_DELEGATE_KEY: &str = "delegate";

/// Configuration for a [`ThemeEngine`](crate::theme::ThemeEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Memoize lookups per query path until the next re-theme.
    pub cache_lookups: bool,
    /// Property key whose value names the delegate template.
    pub delegate_key: String,
    /// Reject unknown directives instead of skipping them with a warning.
    pub strict_directives: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cache_lookups: true,
            delegate_key: DEFAULT_DELEGATE_KEY.to_owned(),
            strict_directives: false,
        }
    }
}

impl ThemeConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable lookup memoization (builder).
    pub fn with_cache_lookups(mut self, cache_lookups: bool) -> Self {
        self.cache_lookups = cache_lookups;
        self
    }

    /// Set the delegate property key (builder).
    pub fn with_delegate_key(mut self, key: impl Into<String>) -> Self {
        self.delegate_key = key.into();
        self
    }

    /// Set strict directive handling (builder).
    pub fn with_strict_directives(mut self, strict: bool) -> Self {
        self.strict_directives = strict;
        self
    }
}
