//! `any`/`all` lambda binder.

use crate::syntax::QueryToken;
use crate::types::{PrimitiveKind, TypeRef, Value};

use super::bound::{BoundNode, LambdaKind};
use super::context::BindingContext;
use super::metadata::bind_token;
use super::scope::RangeVariable;
use super::BindError;

/// Binds an `any`/`all` expression over a collection source.
///
/// The range variable is pushed for the duration of the body bind and
/// popped again on every exit path, success or failure. A bare `any()` has
/// no parameter and an implicit `true` body. An untyped body is wrapped in
/// a conversion to nullable boolean.
///
/// # Errors
///
/// Fails when the source is not a collection or the body is not a single
/// boolean value.
pub fn bind_lambda(
    ctx: &mut BindingContext<'_>,
    kind: LambdaKind,
    parameter: Option<&str>,
    body: Option<&QueryToken>,
    source: &QueryToken,
) -> Result<BoundNode, BindError> {
    let source = bind_token(ctx, source)?;
    let element = source
        .type_ref()
        .filter(TypeRef::is_collection)
        .and_then(|t| t.element_type().cloned())
        .ok_or(BindError::LambdaParentMustBeCollection)?;

    let pushed = parameter.is_some();
    if let Some(name) = parameter {
        ctx.scope
            .push_range_variable(RangeVariable::with_source(name, element, source.clone()));
    }
    let body = match body {
        Some(token) => bind_token(ctx, token),
        None => Ok(BoundNode::constant(Value::Boolean(true))),
    };
    if pushed {
        ctx.scope.pop_range_variable();
    }
    let body = body?;

    if body.is_collection() {
        return Err(BindError::LambdaBodyNotBoolean);
    }
    let body = if body.is_untyped() {
        BoundNode::convert(body, TypeRef::nullable_primitive(PrimitiveKind::Boolean))
    } else if body.primitive_kind() == Some(PrimitiveKind::Boolean) {
        body
    } else {
        return Err(BindError::LambdaBodyNotBoolean);
    };

    Ok(BoundNode::Lambda {
        kind,
        source: Box::new(source),
        parameter: parameter.map(ToString::to_string),
        body: Box::new(body),
    })
}
