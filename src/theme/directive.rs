//! Theme directives: `@import <module>` and `@map <element-type> <style-class>`.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Result, ThemeError};

/// A directive recognised by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `@import <module>`: a template module rules may refer to.
    Import,
    /// `@map <element-type> <style-class>`: elements of a type without an
    /// explicit class are matched as that class.
    Map,
}

impl DirectiveKind {
    /// Look up a directive by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "import" => Some(Self::Import),
            "map" => Some(Self::Map),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Map => "map",
        }
    }

    /// Number of arguments the directive takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Import => 1,
            Self::Map => 2,
        }
    }
}

/// Imports and element type mappings collected from one theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    imports: Vec<String>,
    mappings: HashMap<String, String>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one directive.
    ///
    /// Unknown directives are an error when `strict` is set and are skipped
    /// with a warning otherwise.
    pub fn apply(&mut self, name: &str, args: &[String], strict: bool) -> Result<()> {
        let Some(kind) = DirectiveKind::from_name(name) else {
            if strict {
                return Err(ThemeError::parse(
                    format!("@{name}"),
                    "unknown directive",
                ));
            }
            warn!(directive = name, "skipping unknown directive");
            return Ok(());
        };

        if args.len() != kind.arity() {
            return Err(ThemeError::MappingArity {
                directive: kind.name().to_owned(),
                expected: kind.arity(),
                found: args.len(),
            });
        }

        match kind {
            DirectiveKind::Import => {
                let module = args[0].trim().to_owned();
                if self.imports.contains(&module) {
                    return Err(ThemeError::DuplicateDirective {
                        directive: kind.name().to_owned(),
                        argument: module,
                    });
                }
                debug!(module = %module, "import");
                self.imports.push(module);
            }
            DirectiveKind::Map => {
                let element_type = args[0].trim().to_lowercase();
                let style_class = args[1].trim().to_lowercase();
                if self.mappings.contains_key(&element_type) {
                    return Err(ThemeError::DuplicateDirective {
                        directive: kind.name().to_owned(),
                        argument: element_type,
                    });
                }
                debug!(element_type = %element_type, style_class = %style_class, "map");
                self.mappings.insert(element_type, style_class);
            }
        }
        Ok(())
    }

    /// Imported modules, in declaration order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// The style class mapped to `element_type`, if any.
    pub fn mapped_class(&self, element_type: &str) -> Option<&str> {
        self.mappings
            .get(&element_type.to_lowercase())
            .map(String::as_str)
    }
}
