//! Path segment binders: end paths, inner paths with key values, and
//! dotted (namespace-qualified) segments.
//!
//! A segment with no explicit parent binds against the implicit range
//! variable. Resolution on a structured type tries declared structural
//! properties first, then navigation properties, then zero-argument bound
//! functions; open types admit anything left over as a dynamic property.

use crate::syntax::QueryToken;

use super::bound::BoundNode;
use super::context::BindingContext;
use super::function;
use super::key;
use super::metadata::bind_token;
use super::BindError;

/// Binds the parent of a path segment: the explicit parent token when
/// present, otherwise a reference to the implicit range variable.
///
/// # Errors
///
/// Fails with [`BindError::PropertyAccessWithoutParent`] when there is no
/// parent token and no implicit range variable is established.
pub(super) fn bind_parent(
    ctx: &mut BindingContext<'_>,
    parent: Option<&QueryToken>,
) -> Result<BoundNode, BindError> {
    match parent {
        Some(token) => bind_token(ctx, token),
        None => implicit_reference(ctx),
    }
}

/// A reference to the implicit range variable of the current bind.
pub(super) fn implicit_reference(ctx: &BindingContext<'_>) -> Result<BoundNode, BindError> {
    let variable = ctx
        .scope
        .implicit()
        .ok_or(BindError::PropertyAccessWithoutParent)?;
    Ok(BoundNode::RangeVariableReference {
        name: variable.name.clone(),
        type_ref: variable.type_ref.clone(),
    })
}

/// Binds a terminal path segment.
///
/// # Errors
///
/// Fails when the parent is not a single value, or the identifier resolves
/// to nothing on a closed type.
pub fn bind_end_path(
    ctx: &mut BindingContext<'_>,
    identifier: &str,
    parent: Option<&QueryToken>,
) -> Result<BoundNode, BindError> {
    let parent = bind_parent(ctx, parent)?;
    resolve_segment(ctx, parent, identifier)
}

/// Binds a non-terminal path segment, applying attached key values.
///
/// # Errors
///
/// Fails under the same conditions as [`bind_end_path`], plus the key
/// lookup rules when key values are attached.
pub fn bind_inner_path(
    ctx: &mut BindingContext<'_>,
    identifier: &str,
    parent: Option<&QueryToken>,
    key_values: &[(Option<String>, QueryToken)],
) -> Result<BoundNode, BindError> {
    let parent = bind_parent(ctx, parent)?;
    let resolved = resolve_segment(ctx, parent, identifier)?;
    key::bind_key_lookup(ctx, resolved, key_values)
}

/// Binds a namespace-qualified segment: a type cast when the identifier
/// names a declared type, otherwise a qualified bound-function call.
///
/// # Errors
///
/// Fails when a cast leaves the parent's type hierarchy, targets a
/// dynamically typed parent, or the identifier names neither a type nor a
/// bound function.
pub fn bind_dotted_identifier(
    ctx: &mut BindingContext<'_>,
    identifier: &str,
    parent: Option<&QueryToken>,
) -> Result<BoundNode, BindError> {
    let parent = bind_parent(ctx, parent)?;

    if let Some(target) = ctx.model.find_type(identifier, ctx.config.case_insensitive) {
        let target_name = target.qualified_name.clone();
        if parent.is_untyped() {
            return Err(BindError::TypeCastOnOpenProperty {
                type_name: target_name,
            });
        }
        let Some(parent_type) = parent.structured_type_name() else {
            return Err(BindError::HierarchyNotFollowed {
                type_name: target_name,
                parent: parent.type_ref().map_or_else(String::new, |t| t.name()),
            });
        };
        if !ctx.model.in_same_hierarchy(&parent_type, &target_name) {
            return Err(BindError::HierarchyNotFollowed {
                type_name: target_name,
                parent: parent_type,
            });
        }
        return Ok(if parent.is_collection() {
            BoundNode::CollectionResourceCast {
                source: Box::new(parent),
                target_type: target_name,
            }
        } else {
            BoundNode::SingleResourceCast {
                source: Box::new(parent),
                target_type: target_name,
            }
        });
    }

    function::try_bind_bound_function(ctx, identifier, parent, &[])?.ok_or_else(|| {
        BindError::UnknownFunction {
            name: identifier.to_string(),
        }
    })
}

/// Resolves an identifier against the type of a bound parent.
fn resolve_segment(
    ctx: &mut BindingContext<'_>,
    parent: BoundNode,
    identifier: &str,
) -> Result<BoundNode, BindError> {
    if parent.is_collection() {
        return Err(BindError::PropertyAccessSourceNotSingleValue {
            property: identifier.to_string(),
        });
    }
    if parent.is_untyped() {
        // Dynamic access chained off an earlier open property.
        return Ok(BoundNode::OpenPropertyAccess {
            source: Box::new(parent),
            name: identifier.to_string(),
        });
    }

    let case_insensitive = ctx.config.case_insensitive;
    let Some(type_name) = parent.structured_type_name() else {
        return Err(BindError::PropertyNotDeclared {
            type_name: parent.type_ref().map_or_else(String::new, |t| t.name()),
            property: identifier.to_string(),
        });
    };

    if let Some(property) = ctx.model.find_property(&type_name, identifier, case_insensitive) {
        let property = property.clone();
        return Ok(if property.type_ref.is_collection() {
            BoundNode::CollectionPropertyAccess {
                source: Box::new(parent),
                property,
            }
        } else {
            BoundNode::PropertyAccess {
                source: Box::new(parent),
                property,
            }
        });
    }

    if let Some(navigation) = ctx
        .model
        .find_navigation(&type_name, identifier, case_insensitive)
    {
        let navigation = navigation.clone();
        return Ok(if navigation.is_collection {
            BoundNode::CollectionNavigation {
                source: Box::new(parent),
                property: navigation,
            }
        } else {
            BoundNode::Navigation {
                source: Box::new(parent),
                property: navigation,
            }
        });
    }

    if let Some(node) = function::try_bind_bound_function(ctx, identifier, parent.clone(), &[])? {
        return Ok(node);
    }

    if ctx
        .model
        .get_type(&type_name)
        .map_or(false, |ty| ty.is_open)
    {
        return Ok(BoundNode::OpenPropertyAccess {
            source: Box::new(parent),
            name: identifier.to_string(),
        });
    }

    Err(BindError::PropertyNotDeclared {
        type_name,
        property: identifier.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use crate::model::{Model, StructuredType};
    use crate::types::{PrimitiveKind, TypeRef};

    use super::super::context::BinderConfig;
    use super::super::scope::RangeVariable;

    fn model() -> Model {
        let mut model = Model::new();
        model
            .add_type(
                StructuredType::new("NS.Person")
                    .with_property("Name", TypeRef::primitive(PrimitiveKind::String))
                    .with_navigation("MyDog", "NS.Dog", false),
            )
            .unwrap();
        model
            .add_type(StructuredType::new("NS.Dog").open().with_property(
                "Color",
                TypeRef::primitive(PrimitiveKind::String),
            ))
            .unwrap();
        model
    }

    fn context<'a>(
        model: &'a Model,
        registry: &'a FunctionRegistry,
        config: &'a BinderConfig,
    ) -> BindingContext<'a> {
        let mut ctx = BindingContext::new(model, registry, config);
        ctx.scope.set_implicit(RangeVariable::new(
            "$it",
            TypeRef::structured("NS.Person"),
        ));
        ctx
    }

    #[test]
    fn test_end_path_resolves_declared_property() {
        let model = model();
        let registry = FunctionRegistry::empty();
        let config = BinderConfig::default();
        let mut ctx = context(&model, &registry, &config);

        let node = bind_end_path(&mut ctx, "Name", None).unwrap();
        assert_eq!(node.primitive_kind(), Some(PrimitiveKind::String));
    }

    #[test]
    fn test_undeclared_on_closed_type_fails() {
        let model = model();
        let registry = FunctionRegistry::empty();
        let config = BinderConfig::default();
        let mut ctx = context(&model, &registry, &config);

        let result = bind_end_path(&mut ctx, "Nickname", None);
        assert_eq!(
            result,
            Err(BindError::PropertyNotDeclared {
                type_name: "NS.Person".into(),
                property: "Nickname".into(),
            })
        );
    }

    #[test]
    fn test_undeclared_on_open_type_is_dynamic() {
        let model = model();
        let registry = FunctionRegistry::empty();
        let config = BinderConfig::default();
        let mut ctx = context(&model, &registry, &config);

        let dog = QueryToken::end_path("MyDog");
        let node = bind_end_path(&mut ctx, "Nickname", Some(&dog)).unwrap();
        assert!(node.is_untyped());
        assert!(matches!(node, BoundNode::OpenPropertyAccess { .. }));
    }

    #[test]
    fn test_cast_outside_hierarchy_fails() {
        let model = model();
        let registry = FunctionRegistry::empty();
        let config = BinderConfig::default();
        let mut ctx = context(&model, &registry, &config);

        let result = bind_dotted_identifier(&mut ctx, "NS.Dog", None);
        assert_eq!(
            result,
            Err(BindError::HierarchyNotFollowed {
                type_name: "NS.Dog".into(),
                parent: "NS.Person".into(),
            })
        );
    }

    #[test]
    fn test_cast_on_open_property_fails() {
        let model = model();
        let registry = FunctionRegistry::empty();
        let config = BinderConfig::default();
        let mut ctx = context(&model, &registry, &config);

        let dynamic =
            QueryToken::end_path_on("Nickname", QueryToken::end_path("MyDog"));
        let result = bind_dotted_identifier(&mut ctx, "NS.Dog", Some(&dynamic));
        assert_eq!(
            result,
            Err(BindError::TypeCastOnOpenProperty {
                type_name: "NS.Dog".into(),
            })
        );
    }
}
