//! Function-call binder: built-in and custom signatures, bound operations,
//! and the `cast`/`isof` special forms.
//!
//! Overload resolution filters the candidate signatures by arity, then by
//! argument promotability; an untyped argument (null constant, open
//! property) matches any parameter. Resolution succeeds only when exactly
//! one signature survives, so adding a custom overload can make a
//! previously unambiguous call ambiguous.

use crate::functions::FunctionSignature;
use crate::syntax::QueryToken;
use crate::types::{self, PrimitiveKind, TypeKind, TypeRef, Value};

use super::bound::BoundNode;
use super::context::BindingContext;
use super::metadata::bind_token;
use super::path;
use super::BindError;

/// Binds a function call token.
///
/// # Errors
///
/// Fails when the name is unknown, no single overload applies, a built-in
/// is called through a parent, or the `cast`/`isof` argument rules are
/// violated.
pub fn bind_function_call(
    ctx: &mut BindingContext<'_>,
    name: &str,
    argument_tokens: &[QueryToken],
    parent: Option<&QueryToken>,
) -> Result<BoundNode, BindError> {
    if name == "cast" || name == "isof" {
        return bind_cast_or_isof(ctx, name, argument_tokens);
    }

    if let Some(parent_token) = parent {
        if ctx.registry.contains(name) {
            return Err(BindError::FunctionMustBeCalledWithoutParent {
                name: name.to_string(),
            });
        }
        let source = bind_token(ctx, parent_token)?;
        let arguments = bind_arguments(ctx, name, argument_tokens)?;
        return try_bind_bound_function(ctx, name, source, &arguments)?.ok_or_else(|| {
            BindError::UnknownFunction {
                name: name.to_string(),
            }
        });
    }

    let arguments = bind_arguments(ctx, name, argument_tokens)?;
    let signatures = ctx.registry.signatures(name);
    if signatures.is_empty() {
        // Not in the registry: the name may be an operation bound to the
        // implicit range variable.
        let Ok(source) = path::implicit_reference(ctx) else {
            return Err(BindError::UnknownFunction {
                name: name.to_string(),
            });
        };
        return try_bind_bound_function(ctx, name, source, &arguments)?.ok_or_else(|| {
            BindError::UnknownFunction {
                name: name.to_string(),
            }
        });
    }

    let signature = resolve_overload(ctx, name, &arguments, &signatures)?;
    let arguments = convert_arguments(arguments, &signature.parameter_types);
    Ok(call_node(name, None, arguments, signature.return_type))
}

/// Attempts to bind `name` as an operation bound to the type of `source`.
/// Returns `Ok(None)` when no operation by that name binds to the type.
///
/// # Errors
///
/// Fails when operations by that name exist but none (or more than one)
/// applies to the arguments.
pub(super) fn try_bind_bound_function(
    ctx: &mut BindingContext<'_>,
    name: &str,
    source: BoundNode,
    arguments: &[BoundNode],
) -> Result<Option<BoundNode>, BindError> {
    let Some(binding_type) = source.structured_type_name() else {
        return Ok(None);
    };
    let operations =
        ctx.model
            .find_bound_operations(&binding_type, name, ctx.config.case_insensitive);

    // Only value-returning functions are addressable in expressions;
    // actions sharing the name are not candidates and must not supply
    // the qualified name either.
    let functions: Vec<_> = operations
        .iter()
        .filter(|op| op.is_function && op.return_type.is_some())
        .collect();
    let Some(qualified_name) = functions.first().map(|op| op.qualified_name.clone()) else {
        return Ok(None);
    };
    let candidates: Vec<FunctionSignature> = functions
        .iter()
        .filter_map(|op| {
            op.return_type
                .clone()
                .map(|ret| FunctionSignature::new(op.parameter_types.clone(), ret))
        })
        .collect();

    let signature = resolve_overload(ctx, name, arguments, &candidates)?;
    let arguments = convert_arguments(arguments.to_vec(), &signature.parameter_types);
    Ok(Some(call_node(
        &qualified_name,
        Some(source),
        arguments,
        signature.return_type,
    )))
}

fn bind_arguments(
    ctx: &mut BindingContext<'_>,
    name: &str,
    tokens: &[QueryToken],
) -> Result<Vec<BoundNode>, BindError> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let argument = bind_token(ctx, token)?;
        if argument.is_collection() {
            return Err(BindError::OperandNotSingleValue {
                operator: name.to_string(),
            });
        }
        out.push(argument);
    }
    Ok(out)
}

/// Picks the single applicable signature for the arguments.
fn resolve_overload(
    ctx: &BindingContext<'_>,
    name: &str,
    arguments: &[BoundNode],
    signatures: &[FunctionSignature],
) -> Result<FunctionSignature, BindError> {
    let applicable: Vec<&FunctionSignature> = signatures
        .iter()
        .filter(|s| s.parameter_types.len() == arguments.len())
        .filter(|s| {
            arguments
                .iter()
                .zip(&s.parameter_types)
                .all(|(argument, parameter)| argument_matches(ctx, argument, parameter))
        })
        .collect();

    match applicable.as_slice() {
        [signature] => Ok((*signature).clone()),
        _ => Err(BindError::NoApplicableFunctionFound {
            name: name.to_string(),
            candidates: render_candidates(name, signatures),
        }),
    }
}

/// An argument matches a parameter when its type promotes to the parameter
/// type; an untyped argument matches anything, including non-nullable
/// parameters.
fn argument_matches(ctx: &BindingContext<'_>, argument: &BoundNode, parameter: &TypeRef) -> bool {
    let Some(argument_type) = argument.type_ref() else {
        return true;
    };
    match (&argument_type.kind, &parameter.kind) {
        (TypeKind::Primitive(from), TypeKind::Primitive(to)) => types::can_promote(*from, *to),
        (TypeKind::Structured(from), TypeKind::Structured(to)) => {
            ctx.model.is_or_derives_from(from, to)
        }
        (TypeKind::Collection(from), TypeKind::Collection(to)) => from.kind == to.kind,
        _ => false,
    }
}

fn render_candidates(name: &str, signatures: &[FunctionSignature]) -> String {
    signatures
        .iter()
        .map(|s| format!("{name}{s}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Wraps each argument in a conversion to its resolved parameter type
/// where the types differ; untyped arguments convert to the nullable form
/// of the parameter type.
fn convert_arguments(arguments: Vec<BoundNode>, parameters: &[TypeRef]) -> Vec<BoundNode> {
    arguments
        .into_iter()
        .zip(parameters)
        .map(|(argument, parameter)| match argument.type_ref() {
            None => BoundNode::convert(argument, parameter.clone().with_nullable(true)),
            Some(t) if t.kind == parameter.kind => argument,
            Some(t) => {
                let nullable = t.nullable || parameter.nullable;
                BoundNode::convert(argument, parameter.clone().with_nullable(nullable))
            }
        })
        .collect()
}

/// Builds the call node matching the shape of the return type.
fn call_node(
    name: &str,
    source: Option<BoundNode>,
    arguments: Vec<BoundNode>,
    return_type: TypeRef,
) -> BoundNode {
    let element_is_structured = matches!(
        &return_type.kind,
        TypeKind::Collection(element) if matches!(element.kind, TypeKind::Structured(_))
    );
    if element_is_structured {
        BoundNode::CollectionResourceFunctionCall {
            name: name.to_string(),
            source: source.map(Box::new),
            arguments,
            return_type,
        }
    } else if matches!(return_type.kind, TypeKind::Structured(_)) {
        BoundNode::SingleResourceFunctionCall {
            name: name.to_string(),
            source: source.map(Box::new),
            arguments,
            return_type,
        }
    } else {
        BoundNode::FunctionCall {
            name: name.to_string(),
            source: source.map(Box::new),
            arguments,
            return_type: Some(return_type),
        }
    }
}

/// Binds the `cast`/`isof` special forms. Both take one or two arguments,
/// the last of which must be a string literal naming a declared or
/// primitive type; the one-argument form applies to the implicit range
/// variable.
fn bind_cast_or_isof(
    ctx: &mut BindingContext<'_>,
    name: &str,
    argument_tokens: &[QueryToken],
) -> Result<BoundNode, BindError> {
    let (source_token, type_token) = match argument_tokens {
        [type_token] => (None, type_token),
        [source_token, type_token] => (Some(source_token), type_token),
        _ => {
            return Err(BindError::CastArgumentCount {
                name: name.to_string(),
            })
        }
    };

    let QueryToken::Literal {
        value: Value::String(type_name),
        ..
    } = type_token
    else {
        return Err(BindError::CastMissingTypeArgument);
    };
    if type_name.starts_with("Collection(") {
        return Err(BindError::CastCollectionsNotSupported);
    }
    let target =
        resolve_type_name(ctx, type_name).ok_or(BindError::CastMissingTypeArgument)?;

    let source = match source_token {
        Some(token) => bind_token(ctx, token)?,
        None => path::implicit_reference(ctx)?,
    };
    if source.is_collection() {
        return Err(BindError::CastCollectionsNotSupported);
    }

    if name == "isof" {
        return Ok(BoundNode::FunctionCall {
            name: "isof".to_string(),
            source: None,
            arguments: vec![source, BoundNode::constant(Value::String(type_name.clone()))],
            return_type: Some(TypeRef::nullable_primitive(PrimitiveKind::Boolean)),
        });
    }

    match &target.kind {
        TypeKind::Structured(target_name) => {
            if let Some(source_type) = source.structured_type_name() {
                if !ctx.model.in_same_hierarchy(&source_type, target_name) {
                    return Err(BindError::HierarchyNotFollowed {
                        type_name: target_name.clone(),
                        parent: source_type,
                    });
                }
            }
            Ok(BoundNode::SingleResourceCast {
                source: Box::new(source),
                target_type: target_name.clone(),
            })
        }
        _ => Ok(BoundNode::convert(source, target.with_nullable(true))),
    }
}

fn resolve_type_name(ctx: &BindingContext<'_>, name: &str) -> Option<TypeRef> {
    if let Some(kind) = PrimitiveKind::parse(name) {
        return Some(TypeRef::primitive(kind));
    }
    ctx.model
        .find_type(name, ctx.config.case_insensitive)
        .map(|ty| TypeRef::structured(ty.qualified_name.clone()))
}
