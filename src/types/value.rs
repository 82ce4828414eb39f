//! Primitive kinds and literal values.

use serde::{Deserialize, Serialize};

/// Primitive EDM types understood by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Boolean.
    Boolean,
    /// 8-bit signed integer.
    SByte,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Single,
    /// 64-bit floating point.
    Double,
    /// Arbitrary-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Globally unique identifier.
    Guid,
    /// Calendar date.
    Date,
    /// Point in time with offset.
    DateTimeOffset,
    /// Time of day.
    TimeOfDay,
    /// Signed duration.
    Duration,
}

impl PrimitiveKind {
    /// Returns the qualified EDM name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Edm.Boolean",
            PrimitiveKind::SByte => "Edm.SByte",
            PrimitiveKind::Int16 => "Edm.Int16",
            PrimitiveKind::Int32 => "Edm.Int32",
            PrimitiveKind::Int64 => "Edm.Int64",
            PrimitiveKind::Single => "Edm.Single",
            PrimitiveKind::Double => "Edm.Double",
            PrimitiveKind::Decimal => "Edm.Decimal",
            PrimitiveKind::String => "Edm.String",
            PrimitiveKind::Guid => "Edm.Guid",
            PrimitiveKind::Date => "Edm.Date",
            PrimitiveKind::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveKind::TimeOfDay => "Edm.TimeOfDay",
            PrimitiveKind::Duration => "Edm.Duration",
        }
    }
}

impl PrimitiveKind {
    /// Parses a qualified EDM type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Edm.Boolean" => Some(PrimitiveKind::Boolean),
            "Edm.SByte" => Some(PrimitiveKind::SByte),
            "Edm.Int16" => Some(PrimitiveKind::Int16),
            "Edm.Int32" => Some(PrimitiveKind::Int32),
            "Edm.Int64" => Some(PrimitiveKind::Int64),
            "Edm.Single" => Some(PrimitiveKind::Single),
            "Edm.Double" => Some(PrimitiveKind::Double),
            "Edm.Decimal" => Some(PrimitiveKind::Decimal),
            "Edm.String" => Some(PrimitiveKind::String),
            "Edm.Guid" => Some(PrimitiveKind::Guid),
            "Edm.Date" => Some(PrimitiveKind::Date),
            "Edm.DateTimeOffset" => Some(PrimitiveKind::DateTimeOffset),
            "Edm.TimeOfDay" => Some(PrimitiveKind::TimeOfDay),
            "Edm.Duration" => Some(PrimitiveKind::Duration),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal value as produced by the lexer.
///
/// `Decimal` and the date/time kinds keep their original lexical form; the
/// binder never evaluates them, it only types them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The untyped null literal.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// 32-bit integer literal.
    Int32(i32),
    /// 64-bit integer literal.
    Int64(i64),
    /// 32-bit float literal.
    Single(f32),
    /// 64-bit float literal.
    Double(f64),
    /// Decimal literal, raw text.
    Decimal(String),
    /// String literal.
    String(String),
    /// GUID literal, raw text.
    Guid(String),
    /// Date literal, raw text.
    Date(String),
    /// Date-time-offset literal, raw text.
    DateTimeOffset(String),
    /// Time-of-day literal, raw text.
    TimeOfDay(String),
    /// Duration literal, raw text.
    Duration(String),
}

impl Value {
    /// Returns the primitive kind of this literal, or `None` for null.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            Value::Int32(_) => Some(PrimitiveKind::Int32),
            Value::Int64(_) => Some(PrimitiveKind::Int64),
            Value::Single(_) => Some(PrimitiveKind::Single),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::Decimal(_) => Some(PrimitiveKind::Decimal),
            Value::String(_) => Some(PrimitiveKind::String),
            Value::Guid(_) => Some(PrimitiveKind::Guid),
            Value::Date(_) => Some(PrimitiveKind::Date),
            Value::DateTimeOffset(_) => Some(PrimitiveKind::DateTimeOffset),
            Value::TimeOfDay(_) => Some(PrimitiveKind::TimeOfDay),
            Value::Duration(_) => Some(PrimitiveKind::Duration),
        }
    }

    /// Returns true if this is the null literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(PrimitiveKind::Int32.name(), "Edm.Int32");
        assert_eq!(PrimitiveKind::DateTimeOffset.name(), "Edm.DateTimeOffset");
    }

    #[test]
    fn test_null_has_no_kind() {
        assert_eq!(Value::Null.primitive_kind(), None);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_literal_kinds() {
        assert_eq!(
            Value::Boolean(true).primitive_kind(),
            Some(PrimitiveKind::Boolean)
        );
        assert_eq!(
            Value::Decimal("3.5".into()).primitive_kind(),
            Some(PrimitiveKind::Decimal)
        );
    }
}
