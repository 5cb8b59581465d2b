//! The theme engine: owns the active compiled theme and answers lookups.

use std::fmt;

use tracing::{debug, warn};

use super::compile::{compile, CompiledTheme};
use super::config::ThemeConfig;
use super::source::ThemeSource;
use super::template::{PropertyTemplates, TemplateFactory};
use crate::error::Result;
use crate::selector::{Relationship, Selector, SelectorNode};
use crate::store::{Rule, RuleMatch};

/// Owns the template factory and the active theme.
///
/// Re-theming compiles a complete new theme and swaps it in; the previous
/// theme (and its lookup cache) is dropped only once the new one is built.
pub struct ThemeEngine<F: TemplateFactory = PropertyTemplates> {
    config: ThemeConfig,
    factory: F,
    active: Option<CompiledTheme<F::Style, F::Delegate>>,
    generation: u64,
}

impl ThemeEngine<PropertyTemplates> {
    /// Create an engine with the default [`PropertyTemplates`] factory.
    pub fn new(config: ThemeConfig) -> Self {
        let factory = PropertyTemplates::new(config.delegate_key.clone());
        Self::with_factory(config, factory)
    }
}

impl Default for ThemeEngine<PropertyTemplates> {
    fn default() -> Self {
        Self::new(ThemeConfig::default())
    }
}

impl<F: TemplateFactory> ThemeEngine<F> {
    /// Create an engine with a caller-supplied factory.
    pub fn with_factory(config: ThemeConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            active: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Compile `source` and make it the active theme.
    ///
    /// On error the previously active theme stays in place.
    pub fn load<Src: ThemeSource + ?Sized>(&mut self, source: &Src) -> Result<()> {
        let theme = match compile(source, &mut self.factory, &self.config) {
            Ok(theme) => theme,
            Err(err) => {
                warn!(error = %err, "theme compile failed, keeping active theme");
                return Err(err);
            }
        };
        self.active = Some(theme);
        self.generation += 1;
        debug!(generation = self.generation, "theme activated");
        Ok(())
    }

    /// Drop the active theme.
    pub fn unload(&mut self) {
        if self.active.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    /// Bumped every time the active theme changes. Elements can compare it to
    /// decide whether to look up again.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active(&self) -> Option<&CompiledTheme<F::Style, F::Delegate>> {
        self.active.as_ref()
    }

    /// Modules imported by the active theme.
    pub fn imports(&self) -> &[String] {
        self.active
            .as_ref()
            .map(|theme| theme.directives().imports())
            .unwrap_or_default()
    }

    /// Best rule for `query`. `None` when nothing matches or no theme is
    /// loaded.
    pub fn lookup(&mut self, query: &Selector) -> Option<&Rule<F::Style, F::Delegate>> {
        self.active.as_mut()?.lookup(query)
    }

    pub fn resolve(&mut self, query: &Selector) -> Option<RuleMatch<'_, F::Style, F::Delegate>> {
        self.active.as_mut()?.resolve(query)
    }

    /// Query node for one element, with the active theme's `@map` applied.
    pub fn element_node(
        &self,
        element_type: &str,
        style_class: &str,
        style_id: Option<&str>,
    ) -> SelectorNode {
        match &self.active {
            Some(theme) => {
                theme.element_node(element_type, style_class, style_id, Relationship::Child)
            }
            None => SelectorNode::new(
                element_type.to_lowercase(),
                style_class.to_lowercase(),
                style_id.map(str::to_lowercase),
                Relationship::Child,
            ),
        }
    }

    /// Query path for an element and its styled ancestors, root-most first.
    ///
    /// Each item is `(element_type, style_class, style_id)`. Elements that
    /// name nothing (no type, class or id) are not styled and are left out.
    /// Every node is linked to its predecessor as a child; the root-most one
    /// is a descendant of whatever unstyled element holds it.
    pub fn query_path<'a, I>(&self, elements: I) -> Selector
    where
        I: IntoIterator<Item = (&'a str, &'a str, Option<&'a str>)>,
    {
        let mut path: Selector = elements
            .into_iter()
            .map(|(element_type, style_class, style_id)| {
                self.element_node(element_type, style_class, style_id)
            })
            .filter(|node| !node.is_empty())
            .collect();
        if let Some(first) = path.first_mut() {
            *first = first.clone().with_relationship(Relationship::Descendant);
        }
        path
    }
}

impl<F: TemplateFactory> fmt::Debug for ThemeEngine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .field("generation", &self.generation)
            .finish()
    }
}
