//! Literal binder: raw literal tokens to typed constants.

use crate::types::Value;

use super::bound::BoundNode;

/// Converts a raw literal into a typed constant node. The null literal
/// yields an untyped constant; its type is decided later by the operator
/// or parameter it combines with.
#[must_use]
pub fn bind_literal(value: &Value) -> BoundNode {
    BoundNode::constant(value.clone())
}
