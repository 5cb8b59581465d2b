//! Rule payloads attached to rule store nodes.

/// A compiled rule: an optional style handle and an optional delegate handle.
///
/// Both handles are opaque to the store and the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<S, D> {
    pub style: Option<S>,
    pub delegate: Option<D>,
}

impl<S, D> Rule<S, D> {
    /// Create a rule from both handles.
    pub fn new(style: Option<S>, delegate: Option<D>) -> Self {
        Self { style, delegate }
    }

    /// A rule carrying only a style.
    pub fn style(style: S) -> Self {
        Self::new(Some(style), None)
    }

    /// A rule carrying only a delegate.
    pub fn delegate(delegate: D) -> Self {
        Self::new(None, Some(delegate))
    }

    /// Add a delegate (builder).
    pub fn with_delegate(mut self, delegate: D) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Returns `true` if neither handle is set.
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.delegate.is_none()
    }
}

impl<S, D> Default for Rule<S, D> {
    fn default() -> Self {
        Self::new(None, None)
    }
}
