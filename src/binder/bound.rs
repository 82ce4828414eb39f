//! Bound node definitions: the typed output of binding.

use crate::model::{EntitySet, NavigationProperty, StructuralProperty};
use crate::syntax::{BinaryOperator, OrderByDirection, UnaryOperator};
use crate::types::{PrimitiveKind, TypeKind, TypeRef, Value};

/// Which lambda form a bound any/all node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaKind {
    /// `any`: true if some element satisfies the body.
    Any,
    /// `all`: true if every element satisfies the body.
    All,
}

/// A typed, validated expression node.
///
/// Nodes split by cardinality first: a node either produces a single value
/// or a collection, and [`BoundNode::is_collection`] reflects that. A
/// single-valued node with no type reference is *untyped* (the result of
/// combining null/open operands); untyped-ness propagates and is never
/// defaulted to a concrete type.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundNode {
    /// Typed constant.
    Constant {
        /// Literal value.
        value: Value,
        /// Type, or `None` for the null literal.
        type_ref: Option<TypeRef>,
    },

    /// Explicit type coercion wrapping a source node.
    Convert {
        /// Converted node.
        source: Box<BoundNode>,
        /// Conversion target type.
        type_ref: TypeRef,
    },

    /// Binary operator application.
    Binary {
        /// Operator kind.
        op: BinaryOperator,
        /// Left operand.
        left: Box<BoundNode>,
        /// Right operand.
        right: Box<BoundNode>,
        /// Result type, `None` when both operands were untyped.
        type_ref: Option<TypeRef>,
    },

    /// Unary operator application.
    Unary {
        /// Operator kind.
        op: UnaryOperator,
        /// Operand.
        operand: Box<BoundNode>,
        /// Result type, `None` when the operand was untyped.
        type_ref: Option<TypeRef>,
    },

    /// Access to a declared single-valued structural property.
    PropertyAccess {
        /// Source resource.
        source: Box<BoundNode>,
        /// The declared property.
        property: StructuralProperty,
    },

    /// Access to a declared collection-valued structural property.
    CollectionPropertyAccess {
        /// Source resource.
        source: Box<BoundNode>,
        /// The declared property.
        property: StructuralProperty,
    },

    /// Access to an undeclared property of an open type. Untyped.
    OpenPropertyAccess {
        /// Source resource.
        source: Box<BoundNode>,
        /// Dynamic property name.
        name: String,
    },

    /// Single-valued navigation.
    Navigation {
        /// Source resource.
        source: Box<BoundNode>,
        /// The navigation property.
        property: NavigationProperty,
    },

    /// Collection-valued navigation.
    CollectionNavigation {
        /// Source resource.
        source: Box<BoundNode>,
        /// The navigation property.
        property: NavigationProperty,
    },

    /// Value-returning function call.
    FunctionCall {
        /// Function name.
        name: String,
        /// Bound parent for bound operations; `None` for unbound calls.
        source: Option<Box<BoundNode>>,
        /// Bound arguments, converted to the resolved parameter types.
        arguments: Vec<BoundNode>,
        /// Return type; `None` for untyped results.
        return_type: Option<TypeRef>,
    },

    /// Function call returning a single resource.
    SingleResourceFunctionCall {
        /// Function name.
        name: String,
        /// Bound parent for bound operations.
        source: Option<Box<BoundNode>>,
        /// Bound arguments.
        arguments: Vec<BoundNode>,
        /// Structured return type.
        return_type: TypeRef,
    },

    /// Function call returning a collection of resources.
    CollectionResourceFunctionCall {
        /// Function name.
        name: String,
        /// Bound parent for bound operations.
        source: Option<Box<BoundNode>>,
        /// Bound arguments.
        arguments: Vec<BoundNode>,
        /// Collection return type.
        return_type: TypeRef,
    },

    /// Reference to an entity set.
    EntitySetReference {
        /// The entity set.
        entity_set: EntitySet,
    },

    /// Key lookup narrowing a collection to a single resource.
    KeyLookup {
        /// The collection being looked into.
        collection: Box<BoundNode>,
        /// Key property name/value pairs.
        key_values: Vec<(String, BoundNode)>,
    },

    /// Cast of a single resource to a derived/ancestor type.
    SingleResourceCast {
        /// Source resource.
        source: Box<BoundNode>,
        /// Qualified target type name.
        target_type: String,
    },

    /// Cast of a resource collection to a derived/ancestor element type.
    CollectionResourceCast {
        /// Source collection.
        source: Box<BoundNode>,
        /// Qualified target element type name.
        target_type: String,
    },

    /// Reference to a range variable in scope.
    RangeVariableReference {
        /// Variable name.
        name: String,
        /// Declared element type.
        type_ref: TypeRef,
    },

    /// Bound `any`/`all` expression.
    Lambda {
        /// Which lambda form.
        kind: LambdaKind,
        /// Source collection.
        source: Box<BoundNode>,
        /// Range variable name; `None` for a bare `any()`.
        parameter: Option<String>,
        /// Body predicate (`true` constant for a bare `any()`).
        body: Box<BoundNode>,
    },
}

impl BoundNode {
    /// Creates a typed constant from a literal value.
    #[must_use]
    pub fn constant(value: Value) -> Self {
        let type_ref = value.primitive_kind().map(TypeRef::primitive);
        BoundNode::Constant { value, type_ref }
    }

    /// Creates a conversion node.
    #[must_use]
    pub fn convert(source: BoundNode, type_ref: TypeRef) -> Self {
        BoundNode::Convert {
            source: Box::new(source),
            type_ref,
        }
    }

    /// Returns the static type of this node, or `None` for untyped nodes.
    #[must_use]
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            BoundNode::Constant { type_ref, .. }
            | BoundNode::Binary { type_ref, .. }
            | BoundNode::Unary { type_ref, .. } => type_ref.clone(),
            BoundNode::Convert { type_ref, .. } => Some(type_ref.clone()),
            BoundNode::PropertyAccess { property, .. }
            | BoundNode::CollectionPropertyAccess { property, .. } => {
                Some(property.type_ref.clone())
            }
            BoundNode::OpenPropertyAccess { .. } => None,
            BoundNode::Navigation { property, .. }
            | BoundNode::CollectionNavigation { property, .. } => Some(property.target_type_ref()),
            BoundNode::FunctionCall { return_type, .. } => return_type.clone(),
            BoundNode::SingleResourceFunctionCall { return_type, .. }
            | BoundNode::CollectionResourceFunctionCall { return_type, .. } => {
                Some(return_type.clone())
            }
            BoundNode::EntitySetReference { entity_set } => Some(TypeRef::collection(
                TypeRef::structured(entity_set.element_type.clone()),
            )),
            BoundNode::KeyLookup { collection, .. } => collection
                .type_ref()
                .and_then(|t| t.element_type().cloned()),
            BoundNode::SingleResourceCast { target_type, .. } => {
                Some(TypeRef::structured(target_type.clone()))
            }
            BoundNode::CollectionResourceCast { target_type, .. } => Some(TypeRef::collection(
                TypeRef::structured(target_type.clone()),
            )),
            BoundNode::RangeVariableReference { type_ref, .. } => Some(type_ref.clone()),
            BoundNode::Lambda { .. } => Some(TypeRef::primitive(PrimitiveKind::Boolean)),
        }
    }

    /// Returns true if this node produces a collection.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.type_ref().is_some_and(|t| t.is_collection())
    }

    /// Returns true if this node produces a single value (untyped nodes
    /// are single-valued).
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        !self.is_collection()
    }

    /// Returns true if this node's static type is unknown: the null
    /// constant or an open property access (directly or through a failed
    /// combination of the two).
    #[must_use]
    pub fn is_untyped(&self) -> bool {
        self.type_ref().is_none()
    }

    /// Returns the qualified name of the structured type this node
    /// produces: the node's own type for single resources, the element
    /// type for resource collections.
    #[must_use]
    pub fn structured_type_name(&self) -> Option<String> {
        match self.type_ref()?.kind {
            TypeKind::Structured(name) => Some(name),
            TypeKind::Collection(element) => match element.kind {
                TypeKind::Structured(name) => Some(name),
                _ => None,
            },
            TypeKind::Primitive(_) => None,
        }
    }

    /// Returns the primitive kind of a single-valued primitive node.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.type_ref().and_then(|t| t.primitive_kind())
    }
}

/// A bound `$filter`: the predicate plus the range variable it ranges over.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// The boolean predicate.
    pub expression: BoundNode,
    /// Name of the implicit range variable.
    pub range_variable: String,
}

/// A bound `$orderby`: a linked chain preserving term order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    /// Ordering expression.
    pub expression: BoundNode,
    /// Sort direction.
    pub direction: OrderByDirection,
    /// The next ordering criterion.
    pub then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    /// Returns the number of criteria in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.then_by.as_ref().map_or(0, |next| next.len())
    }

    /// A chain always has at least one criterion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_types() {
        let node = BoundNode::constant(Value::Int32(7));
        assert_eq!(node.primitive_kind(), Some(PrimitiveKind::Int32));
        assert!(node.is_single_value());

        let null = BoundNode::constant(Value::Null);
        assert!(null.is_untyped());
        assert!(null.is_single_value());
    }

    #[test]
    fn test_entity_set_reference_is_collection() {
        let node = BoundNode::EntitySetReference {
            entity_set: EntitySet::new("People", "NS.Person"),
        };
        assert!(node.is_collection());
        assert_eq!(node.structured_type_name().as_deref(), Some("NS.Person"));
    }

    #[test]
    fn test_key_lookup_type_is_element_type() {
        let collection = BoundNode::EntitySetReference {
            entity_set: EntitySet::new("People", "NS.Person"),
        };
        let lookup = BoundNode::KeyLookup {
            collection: Box::new(collection),
            key_values: vec![("ID".into(), BoundNode::constant(Value::Int32(1)))],
        };
        assert!(lookup.is_single_value());
        assert_eq!(lookup.structured_type_name().as_deref(), Some("NS.Person"));
    }
}
