//! Numeric promotion and comparability rules.
//!
//! Promotion decides when an operand or argument of one primitive kind may be
//! implicitly widened to another, and which common kind two numeric operands
//! share. The binder materializes every promotion as an explicit conversion
//! node, so these rules fully determine where conversions appear.

use super::PrimitiveKind;

/// Widening rank within the integral/floating chain. Decimal sits outside
/// the chain and is handled separately.
fn numeric_rank(kind: PrimitiveKind) -> Option<u8> {
    match kind {
        PrimitiveKind::SByte => Some(0),
        PrimitiveKind::Int16 => Some(1),
        PrimitiveKind::Int32 => Some(2),
        PrimitiveKind::Int64 => Some(3),
        PrimitiveKind::Single => Some(4),
        PrimitiveKind::Double => Some(5),
        _ => None,
    }
}

fn is_integral(kind: PrimitiveKind) -> bool {
    matches!(
        kind,
        PrimitiveKind::SByte | PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
    )
}

/// Returns true if the kind participates in arithmetic.
#[must_use]
pub fn is_numeric(kind: PrimitiveKind) -> bool {
    numeric_rank(kind).is_some() || kind == PrimitiveKind::Decimal
}

/// Returns true if the kind admits relational comparison (`gt`, `lt`, ...).
#[must_use]
pub fn is_ordered(kind: PrimitiveKind) -> bool {
    is_numeric(kind)
        || matches!(
            kind,
            PrimitiveKind::String
                | PrimitiveKind::Guid
                | PrimitiveKind::Date
                | PrimitiveKind::DateTimeOffset
                | PrimitiveKind::TimeOfDay
                | PrimitiveKind::Duration
        )
}

/// Returns true if a value of kind `from` may be implicitly widened to `to`.
///
/// Identical kinds always promote. Within the numeric chain the narrower
/// side promotes to the wider. Integral kinds additionally promote to
/// Decimal, and Decimal promotes to Single/Double.
#[must_use]
pub fn can_promote(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    if from == to {
        return true;
    }
    if let (Some(a), Some(b)) = (numeric_rank(from), numeric_rank(to)) {
        return a <= b;
    }
    if to == PrimitiveKind::Decimal {
        return is_integral(from);
    }
    if from == PrimitiveKind::Decimal {
        return matches!(to, PrimitiveKind::Single | PrimitiveKind::Double);
    }
    false
}

/// Returns the common kind two operands share under promotion, or `None`
/// if no promotion brings them together.
#[must_use]
pub fn common_candidate(left: PrimitiveKind, right: PrimitiveKind) -> Option<PrimitiveKind> {
    if left == right {
        return Some(left);
    }
    if can_promote(left, right) {
        return Some(right);
    }
    if can_promote(right, left) {
        return Some(left);
    }
    None
}
