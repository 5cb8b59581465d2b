//! Theme sources: the declarations and directives a theme is compiled from.
//!
//! Lexing theme text is left to the caller; a source only has to hand over
//! already-split selector strings, declarators and directives.

/// One item of a theme source, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeItem {
    /// `selector { declarator }`: a selector string (possibly with `,`
    /// alternatives) and its `key: value; ...` body.
    Declaration { selector: String, declarator: String },
    /// `@name arg...`
    Directive { name: String, args: Vec<String> },
}

/// Anything that can yield theme items.
pub trait ThemeSource {
    /// The items of this source, in source order.
    fn items(&self) -> Vec<ThemeItem>;
}

impl ThemeSource for [ThemeItem] {
    fn items(&self) -> Vec<ThemeItem> {
        self.to_vec()
    }
}

impl ThemeSource for Vec<ThemeItem> {
    fn items(&self) -> Vec<ThemeItem> {
        self.clone()
    }
}

/// An in-memory theme source built declaration by declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeDocument {
    items: Vec<ThemeItem>,
}

impl ThemeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration (builder).
    pub fn declare(mut self, selector: impl Into<String>, declarator: impl Into<String>) -> Self {
        self.items.push(ThemeItem::Declaration {
            selector: selector.into(),
            declarator: declarator.into(),
        });
        self
    }

    /// Add a directive (builder).
    pub fn directive<I, A>(mut self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.items.push(ThemeItem::Directive {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add an `@import` directive (builder).
    pub fn import(self, module: impl Into<String>) -> Self {
        self.directive("import", [module.into()])
    }

    /// Add a `@map` directive (builder).
    pub fn map(self, element_type: impl Into<String>, style_class: impl Into<String>) -> Self {
        self.directive("map", [element_type.into(), style_class.into()])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ThemeSource for ThemeDocument {
    fn items(&self) -> Vec<ThemeItem> {
        self.items.clone()
    }
}
