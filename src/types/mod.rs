//! Primitive kinds, literal values, and type references.

mod promote;
mod value;

pub use promote::{can_promote, common_candidate, is_numeric, is_ordered};
pub use value::{PrimitiveKind, Value};

use serde::{Deserialize, Serialize};

/// The shape of a type reference: a primitive, a structured type identified
/// by its qualified name, or a collection of either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// Primitive EDM type.
    Primitive(PrimitiveKind),
    /// Structured (entity or complex) type, by qualified name.
    Structured(String),
    /// Collection of the element type.
    Collection(Box<TypeRef>),
}

/// A reference to a type, with nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// The referenced type.
    pub kind: TypeKind,
    /// Whether null is an admissible value.
    pub nullable: bool,
}

impl TypeRef {
    /// Creates a non-nullable primitive type reference.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef {
            kind: TypeKind::Primitive(kind),
            nullable: false,
        }
    }

    /// Creates a nullable primitive type reference.
    #[must_use]
    pub fn nullable_primitive(kind: PrimitiveKind) -> Self {
        TypeRef {
            kind: TypeKind::Primitive(kind),
            nullable: true,
        }
    }

    /// Creates a structured type reference by qualified name.
    #[must_use]
    pub fn structured(qualified_name: impl Into<String>) -> Self {
        TypeRef {
            kind: TypeKind::Structured(qualified_name.into()),
            nullable: true,
        }
    }

    /// Creates a collection of the given element type.
    #[must_use]
    pub fn collection(element: TypeRef) -> Self {
        TypeRef {
            kind: TypeKind::Collection(Box::new(element)),
            nullable: false,
        }
    }

    /// Returns a copy of this reference with the given nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Returns true if this is a collection type.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, TypeKind::Collection(_))
    }

    /// Returns the element type of a collection, or `None` for scalars.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Collection(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the primitive kind, or `None` for structured/collection types.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns the qualified name of a structured type reference.
    #[must_use]
    pub fn structured_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Structured(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the display name of the referenced type.
    #[must_use]
    pub fn name(&self) -> String {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.name().to_string(),
            TypeKind::Structured(name) => name.clone(),
            TypeKind::Collection(element) => format!("Collection({})", element.name()),
        }
    }
}
