//! Template factories: turning normalized properties into rule payloads.

use std::sync::Arc;

use crate::cascade::PropertyMap;
use crate::error::Result;
use crate::selector::Selector;
use crate::store::Rule;
use crate::theme::config::DEFAULT_DELEGATE_KEY;

/// Builds the opaque style and delegate handles for each compiled selector.
pub trait TemplateFactory {
    /// Style handle type.
    type Style;
    /// Delegate handle type.
    type Delegate;

    /// Create the rule for `selector` from its normalized properties.
    ///
    /// Returning `Ok(None)`, or a rule with neither handle set, leaves the
    /// selector out of the store. An error aborts the compile.
    fn create(
        &mut self,
        selector: &Selector,
        properties: &PropertyMap,
        imports: &[String],
    ) -> Result<Option<Rule<Self::Style, Self::Delegate>>>;
}

/// Style handle produced by [`PropertyTemplates`].
pub type StyleHandle = Arc<PropertyMap>;
/// Delegate handle produced by [`PropertyTemplates`].
pub type DelegateHandle = Arc<str>;

/// Default factory: the style is the property map itself, minus the delegate
/// key, and the delegate is the delegate key's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTemplates {
    delegate_key: String,
}

impl PropertyTemplates {
    pub fn new(delegate_key: impl Into<String>) -> Self {
        Self {
            delegate_key: delegate_key.into(),
        }
    }
}

impl Default for PropertyTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_DELEGATE_KEY)
    }
}

impl TemplateFactory for PropertyTemplates {
    type Style = StyleHandle;
    type Delegate = DelegateHandle;

    fn create(
        &mut self,
        _selector: &Selector,
        properties: &PropertyMap,
        _imports: &[String],
    ) -> Result<Option<Rule<StyleHandle, DelegateHandle>>> {
        let delegate = properties
            .get(&self.delegate_key)
            .map(|name| Arc::from(unquote(name)));

        let style: PropertyMap = properties
            .iter()
            .filter(|(key, _)| **key != self.delegate_key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let style = (!style.is_empty()).then(|| Arc::new(style));

        Ok(Some(Rule::new(style, delegate)))
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
