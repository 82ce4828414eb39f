//! Select/expand path segment resolution.

use crate::model::Model;

use super::super::context::BinderConfig;
use super::super::BindError;
use super::clause::SelectPathSegment;

/// Follows the leading type-cast segments of a path, returning the bound
/// cast segments and the type the path has narrowed to.
///
/// # Errors
///
/// Fails when a segment is not a declared type, leaves the hierarchy, or
/// the path exceeds the configured maximum depth.
pub(crate) fn follow_type_segments(
    model: &Model,
    config: &BinderConfig,
    identifiers: &[&str],
    starting_type: &str,
) -> Result<(Vec<SelectPathSegment>, String), BindError> {
    let mut segments = Vec::with_capacity(identifiers.len());
    let mut current = starting_type.to_string();
    for (index, identifier) in identifiers.iter().enumerate() {
        if index >= config.max_depth {
            return Err(BindError::PathTooDeep {
                limit: config.max_depth,
            });
        }
        if !identifier.contains('.') {
            return Err(BindError::FollowNonTypeSegment {
                identifier: (*identifier).to_string(),
            });
        }
        let Some(target) = model.find_type(identifier, config.case_insensitive) else {
            return Err(BindError::FollowNonTypeSegment {
                identifier: (*identifier).to_string(),
            });
        };
        let target_name = target.qualified_name.clone();
        if !model.in_same_hierarchy(&current, &target_name) {
            return Err(BindError::HierarchyNotFollowed {
                type_name: target_name,
                parent: current,
            });
        }
        segments.push(SelectPathSegment::TypeCast(target_name.clone()));
        current = target_name;
    }
    Ok((segments, current))
}

/// Resolves the final identifier of a select/expand path against a type.
///
/// Qualified identifiers resolve to type casts or bound operations;
/// unqualified ones to declared properties, navigations, or (on open
/// types) dynamic properties. Unqualified operation names never match:
/// operations are addressable by qualified name only.
///
/// # Errors
///
/// Fails when the identifier resolves to nothing admissible on the type.
pub(crate) fn classify_segment(
    model: &Model,
    config: &BinderConfig,
    type_name: &str,
    identifier: &str,
) -> Result<SelectPathSegment, BindError> {
    let case_insensitive = config.case_insensitive;

    if identifier.contains('.') {
        if let Some(target) = model.find_type(identifier, case_insensitive) {
            let target_name = target.qualified_name.clone();
            if !model.in_same_hierarchy(type_name, &target_name) {
                return Err(BindError::HierarchyNotFollowed {
                    type_name: target_name,
                    parent: type_name.to_string(),
                });
            }
            return Ok(SelectPathSegment::TypeCast(target_name));
        }
        let operations = model.find_bound_operations(type_name, identifier, case_insensitive);
        if let Some(operation) = operations.first() {
            return Ok(SelectPathSegment::Operation(
                operation.qualified_name.clone(),
            ));
        }
        return Err(BindError::PropertyNotDeclared {
            type_name: type_name.to_string(),
            property: identifier.to_string(),
        });
    }

    if let Some(property) = model.find_property(type_name, identifier, case_insensitive) {
        return Ok(SelectPathSegment::Property(property.clone()));
    }
    if let Some(navigation) = model.find_navigation(type_name, identifier, case_insensitive) {
        return Ok(SelectPathSegment::Navigation(navigation.clone()));
    }
    if model
        .get_type(type_name)
        .map_or(false, |ty| ty.is_open)
    {
        return Ok(SelectPathSegment::Dynamic(identifier.to_string()));
    }

    Err(BindError::PropertyNotDeclared {
        type_name: type_name.to_string(),
        property: identifier.to_string(),
    })
}
