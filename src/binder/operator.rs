//! Binary and unary operator binders.
//!
//! Operand handling follows the null-propagation rules: an operand whose
//! static type is unknown (null constant, open property) is wrapped in a
//! conversion to the type the operator requires of it, derived from the
//! other operand where necessary. When both operands are unknown no
//! conversion is inserted and the result stays untyped.

use crate::syntax::{BinaryOperator, QueryToken, UnaryOperator};
use crate::types::{self, PrimitiveKind, TypeKind, TypeRef};

use super::bound::BoundNode;
use super::context::BindingContext;
use super::metadata::bind_token;
use super::BindError;

/// Binds a binary operator expression.
///
/// # Errors
///
/// Fails when an operand is collection-valued, or when both operand types
/// are known and no promotion brings them together.
pub fn bind_binary(
    ctx: &mut BindingContext<'_>,
    op: BinaryOperator,
    left: &QueryToken,
    right: &QueryToken,
) -> Result<BoundNode, BindError> {
    let left = bind_token(ctx, left)?;
    let right = bind_token(ctx, right)?;

    ensure_single_value(&left, op.as_str())?;
    ensure_single_value(&right, op.as_str())?;

    if op.is_logical() {
        bind_logical(op, left, right)
    } else if op.is_equality() {
        bind_comparison(op, left, right, false)
    } else if op.is_relational() {
        bind_comparison(op, left, right, true)
    } else {
        bind_arithmetic(op, left, right)
    }
}

/// Binds a unary operator expression.
///
/// # Errors
///
/// Fails when the operand is collection-valued or has a known type the
/// operator does not apply to.
pub fn bind_unary(
    ctx: &mut BindingContext<'_>,
    op: UnaryOperator,
    operand: &QueryToken,
) -> Result<BoundNode, BindError> {
    let operand = bind_token(ctx, operand)?;
    ensure_single_value(&operand, op.as_str())?;

    match op {
        UnaryOperator::Not => {
            let (operand, type_ref) = coerce_to_boolean(operand, op.as_str())?;
            Ok(BoundNode::Unary {
                op,
                operand: Box::new(operand),
                type_ref,
            })
        }
        UnaryOperator::Negate => {
            let type_ref = match operand.primitive_kind() {
                Some(kind) if types::is_numeric(kind) => operand.type_ref(),
                Some(kind) => {
                    return Err(BindError::CannotConvertToType {
                        from: kind.name().to_string(),
                        to: "a numeric type".to_string(),
                    })
                }
                None if operand.is_untyped() => None,
                None => {
                    return Err(BindError::CannotConvertToType {
                        from: operand.type_ref().map_or_else(String::new, |t| t.name()),
                        to: "a numeric type".to_string(),
                    })
                }
            };
            Ok(BoundNode::Unary {
                op,
                operand: Box::new(operand),
                type_ref,
            })
        }
    }
}

fn ensure_single_value(node: &BoundNode, operator: &str) -> Result<(), BindError> {
    if node.is_collection() {
        return Err(BindError::OperandNotSingleValue {
            operator: operator.to_string(),
        });
    }
    Ok(())
}

/// Wraps an untyped node in a conversion to nullable boolean; validates a
/// typed node is boolean. Returns the (possibly wrapped) node and the
/// result type.
fn coerce_to_boolean(
    node: BoundNode,
    operator: &str,
) -> Result<(BoundNode, Option<TypeRef>), BindError> {
    if node.is_untyped() {
        let target = TypeRef::nullable_primitive(PrimitiveKind::Boolean);
        return Ok((
            BoundNode::convert(node, target.clone()),
            Some(target),
        ));
    }
    match node.primitive_kind() {
        Some(PrimitiveKind::Boolean) => {
            let type_ref = node.type_ref();
            Ok((node, type_ref))
        }
        _ => Err(BindError::IncompatibleOperands {
            op: operator.to_string(),
            left: node.type_ref().map_or_else(String::new, |t| t.name()),
            right: PrimitiveKind::Boolean.name().to_string(),
        }),
    }
}

fn bind_logical(
    op: BinaryOperator,
    left: BoundNode,
    right: BoundNode,
) -> Result<BoundNode, BindError> {
    // Both unknown: leave operands untouched and propagate untyped-ness.
    if left.is_untyped() && right.is_untyped() {
        return Ok(BoundNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            type_ref: None,
        });
    }

    let (left, left_type) = coerce_to_boolean(left, op.as_str())?;
    let (right, right_type) = coerce_to_boolean(right, op.as_str())?;

    let nullable = [&left_type, &right_type]
        .iter()
        .any(|t| t.as_ref().map_or(true, |t| t.nullable));
    Ok(BoundNode::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        type_ref: Some(TypeRef {
            kind: TypeKind::Primitive(PrimitiveKind::Boolean),
            nullable,
        }),
    })
}

/// Equality and relational operators share the promotion rule; relational
/// operators additionally require an ordered operand kind.
fn bind_comparison(
    op: BinaryOperator,
    left: BoundNode,
    right: BoundNode,
    ordered: bool,
) -> Result<BoundNode, BindError> {
    if left.is_untyped() && right.is_untyped() {
        return Ok(BoundNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            type_ref: None,
        });
    }

    let (left, right) = if left.is_untyped() {
        if ordered {
            require_ordered(op, &right)?;
        }
        let target = known_type(&right).with_nullable(true);
        (BoundNode::convert(left, target), right)
    } else if right.is_untyped() {
        if ordered {
            require_ordered(op, &left)?;
        }
        let target = known_type(&left).with_nullable(true);
        (left, BoundNode::convert(right, target))
    } else {
        promote_pair(op, left, right, ordered)?
    };

    Ok(BoundNode::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        type_ref: Some(TypeRef::nullable_primitive(PrimitiveKind::Boolean)),
    })
}

fn bind_arithmetic(
    op: BinaryOperator,
    left: BoundNode,
    right: BoundNode,
) -> Result<BoundNode, BindError> {
    if left.is_untyped() && right.is_untyped() {
        return Ok(BoundNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            type_ref: None,
        });
    }

    let (left, right) = if left.is_untyped() {
        let target = known_type(&right).with_nullable(true);
        require_numeric(op, &target)?;
        (BoundNode::convert(left, target), right)
    } else if right.is_untyped() {
        let target = known_type(&left).with_nullable(true);
        require_numeric(op, &target)?;
        (left, BoundNode::convert(right, target))
    } else {
        let left_kind = require_numeric_kind(op, &left)?;
        let right_kind = require_numeric_kind(op, &right)?;
        let common = types::common_candidate(left_kind, right_kind).ok_or_else(|| {
            BindError::IncompatibleOperands {
                op: op.as_str().to_string(),
                left: left_kind.name().to_string(),
                right: right_kind.name().to_string(),
            }
        })?;
        promote_operands(left, right, common)
    };

    let nullable = operands_nullable(&left, &right);
    let result_kind = left
        .primitive_kind()
        .or_else(|| right.primitive_kind())
        .expect("arithmetic operands are numeric after promotion");
    Ok(BoundNode::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        type_ref: Some(TypeRef {
            kind: TypeKind::Primitive(result_kind),
            nullable,
        }),
    })
}

/// Promotes two known-typed comparison operands to a common kind,
/// wrapping the narrower one in a conversion.
fn promote_pair(
    op: BinaryOperator,
    left: BoundNode,
    right: BoundNode,
    ordered: bool,
) -> Result<(BoundNode, BoundNode), BindError> {
    let incompatible = || BindError::IncompatibleOperands {
        op: op.as_str().to_string(),
        left: known_type(&left).name(),
        right: known_type(&right).name(),
    };

    match (left.primitive_kind(), right.primitive_kind()) {
        (Some(left_kind), Some(right_kind)) => {
            let common = types::common_candidate(left_kind, right_kind).ok_or_else(incompatible)?;
            if ordered && !types::is_ordered(common) {
                return Err(incompatible());
            }
            Ok(promote_operands(left, right, common))
        }
        // Resource comparison: admissible for related structured types
        // under equality only.
        (None, None) if !ordered => {
            let left_name = left.structured_type_name();
            let right_name = right.structured_type_name();
            match (left_name, right_name) {
                (Some(a), Some(b)) if a == b => Ok((left, right)),
                _ => Err(incompatible()),
            }
        }
        _ => Err(incompatible()),
    }
}

/// Wraps whichever operand is narrower than `common` in a conversion.
fn promote_operands(
    left: BoundNode,
    right: BoundNode,
    common: PrimitiveKind,
) -> (BoundNode, BoundNode) {
    let nullable = operands_nullable(&left, &right);
    let target = TypeRef {
        kind: TypeKind::Primitive(common),
        nullable,
    };
    let left = if left.primitive_kind() == Some(common) {
        left
    } else {
        BoundNode::convert(left, target.clone())
    };
    let right = if right.primitive_kind() == Some(common) {
        right
    } else {
        BoundNode::convert(right, target)
    };
    (left, right)
}

fn operands_nullable(left: &BoundNode, right: &BoundNode) -> bool {
    [left, right]
        .iter()
        .any(|n| n.type_ref().map_or(true, |t| t.nullable))
}

/// The type of a node known not to be untyped.
fn known_type(node: &BoundNode) -> TypeRef {
    node.type_ref().expect("operand has a known type")
}

fn require_numeric(op: BinaryOperator, type_ref: &TypeRef) -> Result<(), BindError> {
    match type_ref.primitive_kind() {
        Some(kind) if types::is_numeric(kind) => Ok(()),
        _ => Err(BindError::IncompatibleOperands {
            op: op.as_str().to_string(),
            left: type_ref.name(),
            right: "a numeric type".to_string(),
        }),
    }
}

/// Relational operands must carry an ordered primitive kind; structured
/// resources and kinds like boolean or binary never order.
fn require_ordered(op: BinaryOperator, node: &BoundNode) -> Result<(), BindError> {
    match node.primitive_kind() {
        Some(kind) if types::is_ordered(kind) => Ok(()),
        _ => Err(BindError::IncompatibleOperands {
            op: op.as_str().to_string(),
            left: node.type_ref().map_or_else(String::new, |t| t.name()),
            right: "an ordered type".to_string(),
        }),
    }
}

fn require_numeric_kind(op: BinaryOperator, node: &BoundNode) -> Result<PrimitiveKind, BindError> {
    match node.primitive_kind() {
        Some(kind) if types::is_numeric(kind) => Ok(kind),
        _ => Err(BindError::IncompatibleOperands {
            op: op.as_str().to_string(),
            left: node.type_ref().map_or_else(String::new, |t| t.name()),
            right: "a numeric type".to_string(),
        }),
    }
}
