//! Selector nodes: the single matching atom of a selector chain.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

/// How a node relates to the node before it in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relationship {
    /// Any styled ancestor: `A B`.
    #[default]
    Descendant,
    /// The immediate styled parent: `A > B`.
    Child,
}

bitflags! {
    /// Two-bit specificity contribution of a single node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rank: u8 {
        /// The node names an id.
        const HAS_ID = 0b01;
        /// The node is bound to its parent with `>`.
        const IS_CHILD = 0b10;
    }
}

/// One matching atom: type name, class chain, optional id, relationship.
///
/// Equality and hashing only look at the effective class (the style class, or
/// the element type when no class is set), the id and the relationship.
#[derive(Debug, Clone, Default)]
pub struct SelectorNode {
    element_type: String,
    style_class: String,
    style_id: Option<String>,
    relationship: Relationship,
}

impl SelectorNode {
    /// Create a node. Empty class or id strings count as unset.
    pub fn new(
        element_type: impl Into<String>,
        style_class: impl Into<String>,
        style_id: Option<String>,
        relationship: Relationship,
    ) -> Self {
        Self {
            element_type: element_type.into(),
            style_class: style_class.into(),
            style_id: style_id.filter(|id| !id.is_empty()),
            relationship,
        }
    }

    /// Descendant node carrying only a style class.
    pub fn class(style_class: impl Into<String>) -> Self {
        Self::new(String::new(), style_class, None, Relationship::Descendant)
    }

    /// Descendant node carrying only an element type.
    pub fn element(element_type: impl Into<String>) -> Self {
        Self::new(element_type, String::new(), None, Relationship::Descendant)
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.style_id = (!id.is_empty()).then_some(id);
        self
    }

    /// Set the relationship (builder).
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = relationship;
        self
    }

    /// Mark this node as a direct child of the previous node (builder).
    pub fn child(self) -> Self {
        self.with_relationship(Relationship::Child)
    }

    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn style_class(&self) -> &str {
        &self.style_class
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style_id.as_deref()
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    /// The class used for matching: the style class, or the element type if
    /// no class was given.
    pub fn effective_class(&self) -> &str {
        if self.style_class.is_empty() {
            &self.element_type
        } else {
            &self.style_class
        }
    }

    /// A node naming nothing: no type, no class and no id. It renders as an
    /// empty string and can never be parsed back.
    pub fn is_empty(&self) -> bool {
        self.effective_class().is_empty() && self.style_id.is_none()
    }

    /// First segment of the effective class chain (`button` for `button.primary`).
    pub fn base_class(&self) -> &str {
        let class = self.effective_class();
        class.split_once('.').map_or(class, |(base, _)| base)
    }

    /// Derivate segments trailing the base class.
    pub fn derivates(&self) -> impl Iterator<Item = &str> {
        self.effective_class().split('.').skip(1)
    }

    /// The same node with its last derivate removed, or `None` if the class
    /// chain has no derivates.
    pub fn parent_derivate(&self) -> Option<Self> {
        let (parent, _) = self.effective_class().rsplit_once('.')?;
        Some(Self {
            element_type: self.element_type.clone(),
            style_class: parent.to_owned(),
            style_id: self.style_id.clone(),
            relationship: self.relationship,
        })
    }

    /// Specificity bits of this node.
    pub fn rank(&self) -> Rank {
        let mut rank = Rank::empty();
        if self.style_id.is_some() {
            rank |= Rank::HAS_ID;
        }
        if self.relationship == Relationship::Child {
            rank |= Rank::IS_CHILD;
        }
        rank
    }

    /// Lookup key with the id wildcarded.
    pub fn without_id(&self) -> Self {
        Self {
            style_id: None,
            ..self.clone()
        }
    }

    /// Lookup key with the relationship wildcarded.
    pub fn without_relationship(&self) -> Self {
        Self {
            relationship: Relationship::Descendant,
            ..self.clone()
        }
    }

    /// Lookup key with both the id and the relationship wildcarded.
    pub fn relaxed(&self) -> Self {
        Self {
            style_id: None,
            relationship: Relationship::Descendant,
            ..self.clone()
        }
    }
}

impl PartialEq for SelectorNode {
    fn eq(&self, other: &Self) -> bool {
        self.effective_class() == other.effective_class()
            && self.style_id == other.style_id
            && self.relationship == other.relationship
    }
}

impl Eq for SelectorNode {}

impl Hash for SelectorNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.effective_class().hash(state);
        self.style_id.hash(state);
        self.relationship.hash(state);
    }
}

/// Renders `[>].class[.derivate]*[#id]`. A node without any class renders as
/// just its id.
impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relationship == Relationship::Child {
            f.write_str(">")?;
        }
        let class = self.effective_class();
        if !class.is_empty() {
            write!(f, ".{class}")?;
        }
        if let Some(id) = &self.style_id {
            write!(f, "#{id}")?;
        }
        Ok(())
    }
}
