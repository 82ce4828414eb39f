//! `$orderby` binder.

use crate::syntax::OrderByToken;

use super::bound::OrderByClause;
use super::context::BindingContext;
use super::metadata::bind_token;
use super::BindError;

/// Binds the `$orderby` terms into a linked clause chain preserving term
/// order: the first term is the head, each later term hangs off `then_by`.
///
/// # Errors
///
/// Fails when a term expression does not bind or is collection-valued.
pub fn bind_order_by(
    ctx: &mut BindingContext<'_>,
    tokens: &[OrderByToken],
) -> Result<Option<OrderByClause>, BindError> {
    let mut clause = None;
    for token in tokens.iter().rev() {
        let expression = bind_token(ctx, &token.expression)?;
        if expression.is_collection() {
            return Err(BindError::OperandNotSingleValue {
                operator: "$orderby".to_string(),
            });
        }
        clause = Some(OrderByClause {
            expression,
            direction: token.direction,
            then_by: clause.map(Box::new),
        });
    }
    Ok(clause)
}
