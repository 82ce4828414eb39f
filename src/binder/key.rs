//! Key lookup binder: narrows a resource collection to a single resource.

use crate::types::{self, TypeKind};

use super::bound::BoundNode;
use super::context::BindingContext;
use super::metadata::bind_token;
use super::BindError;

use crate::syntax::QueryToken;

/// Applies key values to a bound collection.
///
/// With no key values the collection passes through unchanged. Otherwise
/// every declared key property of the element type must be supplied; an
/// unnamed value is admissible only against a single-property key. Each
/// value is wrapped in a conversion to the declared key property type.
///
/// # Errors
///
/// Fails when the source is not a resource collection, a key name is
/// missing, undeclared, or supplied twice, an unnamed value meets a
/// compound key, or a value's type cannot promote to the key property
/// type.
pub fn bind_key_lookup(
    ctx: &mut BindingContext<'_>,
    collection: BoundNode,
    key_values: &[(Option<String>, QueryToken)],
) -> Result<BoundNode, BindError> {
    if key_values.is_empty() {
        return Ok(collection);
    }

    let Some(type_name) = collection
        .structured_type_name()
        .filter(|_| collection.is_collection())
    else {
        return Err(BindError::CannotConvertToType {
            from: collection
                .type_ref()
                .map_or_else(String::new, |t| t.name()),
            to: "a resource collection".to_string(),
        });
    };

    let key_properties: Vec<_> = ctx
        .model
        .key_properties(&type_name)
        .into_iter()
        .cloned()
        .collect();

    let mut named = Vec::with_capacity(key_values.len());
    for (name, token) in key_values {
        let value = bind_token(ctx, token)?;
        let name = match name {
            Some(name) => name.clone(),
            None => {
                if key_properties.len() != 1 || key_values.len() != 1 {
                    return Err(BindError::UnnamedKeyOnMultiKeyType {
                        type_name: type_name.clone(),
                    });
                }
                key_properties[0].name.clone()
            }
        };
        named.push((name, value));
    }

    let case_insensitive = ctx.config.case_insensitive;
    let matches = |supplied: &str, declared: &str| {
        if case_insensitive {
            supplied.eq_ignore_ascii_case(declared)
        } else {
            supplied == declared
        }
    };

    // Reject names that match no declared key property or repeat an
    // earlier one.
    for (index, (name, _)) in named.iter().enumerate() {
        if !key_properties.iter().any(|p| matches(name, &p.name)) {
            return Err(BindError::PropertyNotDeclared {
                type_name: type_name.clone(),
                property: name.clone(),
            });
        }
        if named[..index].iter().any(|(earlier, _)| matches(name, earlier)) {
            return Err(BindError::DuplicateKeyProperty {
                type_name: type_name.clone(),
                property: name.clone(),
            });
        }
    }

    let mut bound = Vec::with_capacity(key_properties.len());
    for property in &key_properties {
        let Some((_, value)) = named.iter().find(|(name, _)| matches(name, &property.name))
        else {
            return Err(BindError::MissingKeyProperty {
                type_name: type_name.clone(),
                property: property.name.clone(),
            });
        };

        if let (Some(from), Some(to)) = (
            value.primitive_kind(),
            property.type_ref.primitive_kind(),
        ) {
            if !types::can_promote(from, to) {
                return Err(BindError::CannotConvertToType {
                    from: from.name().to_string(),
                    to: to.name().to_string(),
                });
            }
        }

        let value = if matches!(property.type_ref.kind, TypeKind::Primitive(_))
            && value.type_ref().as_ref() == Some(&property.type_ref)
        {
            value.clone()
        } else {
            BoundNode::convert(value.clone(), property.type_ref.clone())
        };
        bound.push((property.name.clone(), value));
    }

    Ok(BoundNode::KeyLookup {
        collection: Box::new(collection),
        key_values: bound,
    })
}
