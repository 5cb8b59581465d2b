//! Theme compilation: source -> selector table -> normalized table -> rule
//! store, as one all-or-nothing step.

use tracing::{debug, warn};

use super::config::ThemeConfig;
use super::directive::Directives;
use super::source::{ThemeItem, ThemeSource};
use super::template::TemplateFactory;
use crate::cascade::{normalize, SelectorTable};
use crate::error::Result;
use crate::selector::{parse_declarator, parse_selectors, Relationship, Selector, SelectorNode};
use crate::store::{Resolver, Rule, RuleMatch, RuleStore};

/// A fully compiled theme: the resolver over its rule store plus the
/// directives it declared.
#[derive(Debug)]
pub struct CompiledTheme<S, D> {
    resolver: Resolver<S, D>,
    directives: Directives,
}

impl<S, D> CompiledTheme<S, D> {
    pub fn resolver(&self) -> &Resolver<S, D> {
        &self.resolver
    }

    pub fn store(&self) -> &RuleStore<S, D> {
        self.resolver.store()
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    /// Best rule for `query`, memoized.
    pub fn lookup(&mut self, query: &Selector) -> Option<&Rule<S, D>> {
        self.resolver.lookup(query)
    }

    /// Best rule for `query` with the declared selector that matched.
    pub fn resolve(&mut self, query: &Selector) -> Option<RuleMatch<'_, S, D>> {
        self.resolver.resolve(query)
    }

    /// Build a query node for one element, applying `@map` when the element
    /// has no explicit class.
    pub fn element_node(
        &self,
        element_type: &str,
        style_class: &str,
        style_id: Option<&str>,
        relationship: Relationship,
    ) -> SelectorNode {
        let class = if style_class.is_empty() {
            self.directives.mapped_class(element_type).unwrap_or_default()
        } else {
            style_class
        };
        SelectorNode::new(
            element_type.to_lowercase(),
            class.to_lowercase(),
            style_id.map(str::to_lowercase),
            relationship,
        )
    }
}

/// Compile `source` into a [`CompiledTheme`].
///
/// Nothing is returned unless every step succeeds; the first error aborts the
/// compile.
pub fn compile<F, Src>(
    source: &Src,
    factory: &mut F,
    config: &ThemeConfig,
) -> Result<CompiledTheme<F::Style, F::Delegate>>
where
    F: TemplateFactory,
    Src: ThemeSource + ?Sized,
{
    let mut directives = Directives::new();
    let mut table = SelectorTable::new();

    for item in source.items() {
        match item {
            ThemeItem::Directive { name, args } => {
                directives.apply(&name, &args, config.strict_directives)?;
            }
            ThemeItem::Declaration {
                selector,
                declarator,
            } => {
                let properties = parse_declarator(&declarator)?;
                for parsed in parse_selectors(&selector)? {
                    table.fold(parsed, properties.clone());
                }
            }
        }
    }

    normalize(&mut table);

    let mut store = RuleStore::new();
    let mut skipped = 0usize;
    for (selector, properties) in table.iter() {
        let rule = factory.create(selector, properties, directives.imports())?;
        match rule {
            Some(rule) if !rule.is_empty() => {
                store.insert(selector, rule)?;
            }
            _ => {
                warn!(%selector, "rule has neither style nor delegate, skipping");
                skipped += 1;
            }
        }
    }

    debug!(
        selectors = table.len(),
        rules = store.len(),
        nodes = store.node_count(),
        skipped,
        imports = directives.imports().len(),
        "compiled theme"
    );

    Ok(CompiledTheme {
        resolver: Resolver::new(store).with_caching(config.cache_lookups),
        directives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThemeError;
    use crate::selector::parse_query;
    use crate::theme::source::ThemeDocument;
    use crate::theme::template::{DelegateHandle, PropertyTemplates, StyleHandle};
    use tracing_test::traced_test;

    fn build(doc: &ThemeDocument) -> Result<CompiledTheme<StyleHandle, DelegateHandle>> {
        compile(doc, &mut PropertyTemplates::default(), &ThemeConfig::default())
    }

    #[test]
    fn compile_normalizes_before_building() {
        let doc = ThemeDocument::new()
            .declare(".baseA", "border: 2")
            .declare(".testA .baseA", "color: \"blue\"");
        let mut theme = build(&doc).unwrap();
        assert_eq!(theme.store().len(), 2);

        let q = parse_query(".testA>.baseA").unwrap();
        let style = theme.lookup(&q).and_then(|r| r.style.clone()).unwrap();
        assert_eq!(style.get("border").map(String::as_str), Some("2"));
        assert_eq!(style.get("color").map(String::as_str), Some("\"blue\""));

        let q = parse_query(".baseA").unwrap();
        let style = theme.lookup(&q).and_then(|r| r.style.clone()).unwrap();
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn alternatives_share_declarator() {
        let doc = ThemeDocument::new().declare(".a, .b > .c", "x: 1");
        let theme = build(&doc).unwrap();
        assert_eq!(theme.store().len(), 2);
    }

    #[test]
    fn repeated_declarations_merge() {
        let doc = ThemeDocument::new()
            .declare(".a", "x: 1; y: 1")
            .declare(".a", "y: 2");
        let mut theme = build(&doc).unwrap();
        let style = theme
            .lookup(&parse_query(".a").unwrap())
            .and_then(|r| r.style.clone())
            .unwrap();
        assert_eq!(style.get("x").map(String::as_str), Some("1"));
        assert_eq!(style.get("y").map(String::as_str), Some("2"));
    }

    #[test]
    fn parse_errors_abort_compile() {
        let doc = ThemeDocument::new()
            .declare(".a", "x: 1")
            .declare(".b >", "x: 1");
        assert!(matches!(build(&doc), Err(ThemeError::Parse { input, .. }) if input == ".b >"));

        let doc = ThemeDocument::new().declare(".a", "x 1");
        assert!(matches!(build(&doc), Err(ThemeError::Parse { .. })));
    }

    #[test]
    fn directive_errors_abort_compile() {
        let doc = ThemeDocument::new().import("controls").import("controls");
        assert!(matches!(build(&doc), Err(ThemeError::DuplicateDirective { .. })));

        let doc = ThemeDocument::new().directive("map", ["label"]);
        assert!(matches!(build(&doc), Err(ThemeError::MappingArity { .. })));
    }

    #[test]
    fn strict_config_rejects_unknown_directive() {
        let doc = ThemeDocument::new().directive("charset", ["utf-8"]);
        let strict = ThemeConfig::new().with_strict_directives(true);
        assert!(compile(&doc, &mut PropertyTemplates::default(), &strict).is_err());
        assert!(build(&doc).is_ok());
    }

    #[test]
    #[traced_test]
    fn empty_rules_are_skipped_with_warning() {
        let doc = ThemeDocument::new().declare(".a", "").declare(".b", "x: 1");
        let theme = build(&doc).unwrap();
        assert_eq!(theme.store().len(), 1);
        assert!(logs_contain("rule has neither style nor delegate"));
        assert!(logs_contain("compiled theme"));
    }

    #[test]
    fn element_node_applies_mapping() {
        let doc = ThemeDocument::new().map("PushButton", "button");
        let theme = build(&doc).unwrap();

        let mapped = theme.element_node("PushButton", "", None, Relationship::Child);
        assert_eq!(mapped.effective_class(), "button");

        let explicit = theme.element_node("PushButton", "Danger", Some("OK"), Relationship::Child);
        assert_eq!(explicit.effective_class(), "danger");
        assert_eq!(explicit.style_id(), Some("ok"));

        let unmapped = theme.element_node("Label", "", None, Relationship::Descendant);
        assert_eq!(unmapped.effective_class(), "label");
    }

    #[test]
    fn mapped_class_replaces_type_name_in_matching() {
        let doc = ThemeDocument::new()
            .map("PushButton", "button")
            .declare("PushButton", "from: type")
            .declare("Label", "from: label");
        let mut theme = build(&doc).unwrap();

        // The mapped element matches as `.button`, so a rule naming its type does not apply.
        let mapped = theme.element_node("PushButton", "", None, Relationship::Descendant);
        assert!(theme.lookup(&Selector::from(vec![mapped])).is_none());

        // Unmapped elements still match rules written with their type name.
        let label = theme.element_node("Label", "", None, Relationship::Descendant);
        let style = theme
            .lookup(&Selector::from(vec![label]))
            .and_then(|r| r.style.clone())
            .unwrap();
        assert_eq!(style.get("from").map(String::as_str), Some("label"));
    }
}
