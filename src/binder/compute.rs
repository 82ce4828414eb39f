//! `$compute` binder.

use crate::syntax::ComputeToken;
use crate::types::TypeRef;

use super::bound::BoundNode;
use super::context::BindingContext;
use super::metadata::bind_token;
use super::BindError;

/// One bound `expression as alias` item.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeItem {
    /// The computed expression.
    pub expression: BoundNode,
    /// Alias the result is exposed under.
    pub alias: String,
    /// Static type of the expression, `None` when untyped.
    pub type_ref: Option<TypeRef>,
}

/// A bound `$compute` option.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeClause {
    /// Computed items in declaration order.
    pub items: Vec<ComputeItem>,
}

/// Binds every compute item against the current scope.
///
/// # Errors
///
/// Fails when an item expression does not bind or is collection-valued.
pub fn bind_compute(
    ctx: &mut BindingContext<'_>,
    token: &ComputeToken,
) -> Result<ComputeClause, BindError> {
    let mut items = Vec::with_capacity(token.items.len());
    for item in &token.items {
        let expression = bind_token(ctx, &item.expression)?;
        if expression.is_collection() {
            return Err(BindError::OperandNotSingleValue {
                operator: "$compute".to_string(),
            });
        }
        let type_ref = expression.type_ref();
        items.push(ComputeItem {
            expression,
            alias: item.alias.clone(),
            type_ref,
        });
    }
    Ok(ComputeClause { items })
}
