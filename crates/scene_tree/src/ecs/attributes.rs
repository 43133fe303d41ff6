//! Entity attributes
//!
//! Read-only facts a component publishes on its entity for siblings that
//! should not depend on the publishing component's type, such as the render
//! group a mesh component was assigned to.

use std::collections::HashMap;

/// Attribute key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Render group handle
    RenderGroup,
    /// Collision layer index
    CollisionLayer,
    /// Human-readable label
    Label,
    /// Bounding radius in local units
    BoundingRadius,
}

/// Attribute value, one variant per [`AttributeKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Opaque handle to the render group
    RenderGroup(u64),
    /// Collision layer index
    CollisionLayer(u32),
    /// Label text
    Label(String),
    /// Bounding radius
    BoundingRadius(f32),
}

impl Attribute {
    /// Key under which this attribute is stored
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::RenderGroup(_) => AttributeKind::RenderGroup,
            Self::CollisionLayer(_) => AttributeKind::CollisionLayer,
            Self::Label(_) => AttributeKind::Label,
            Self::BoundingRadius(_) => AttributeKind::BoundingRadius,
        }
    }
}

/// At most one attribute per kind
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: HashMap<AttributeKind, Attribute>,
}

impl Attributes {
    /// Store `attribute`, returning the previous value of the same kind
    pub fn set(&mut self, attribute: Attribute) -> Option<Attribute> {
        self.values.insert(attribute.kind(), attribute)
    }

    /// Look up an attribute
    pub fn get(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.values.get(&kind)
    }

    /// Remove an attribute
    pub fn remove(&mut self, kind: AttributeKind) -> Option<Attribute> {
        self.values.remove(&kind)
    }

    /// Number of stored attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attribute is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
