//! The built-in canonical function table.

use std::collections::HashMap;

use crate::types::{PrimitiveKind, TypeRef};

use super::FunctionSignature;

fn string() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::String)
}

fn int32() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Int32)
}

fn boolean() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Boolean)
}

fn double() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Double)
}

fn decimal() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Decimal)
}

fn sig(parameters: Vec<TypeRef>, ret: TypeRef) -> FunctionSignature {
    FunctionSignature::new(parameters, ret)
}

/// Builds the canonical built-in signature table.
///
/// `cast` and `isof` are not listed here: the binder special-cases them
/// before overload resolution runs.
#[must_use]
pub fn builtin_signatures() -> HashMap<&'static str, Vec<FunctionSignature>> {
    let date = TypeRef::primitive(PrimitiveKind::Date);
    let datetime = TypeRef::primitive(PrimitiveKind::DateTimeOffset);
    let time_of_day = TypeRef::primitive(PrimitiveKind::TimeOfDay);

    let mut table: HashMap<&'static str, Vec<FunctionSignature>> = HashMap::new();

    // String functions.
    table.insert("contains", vec![sig(vec![string(), string()], boolean())]);
    table.insert("startswith", vec![sig(vec![string(), string()], boolean())]);
    table.insert("endswith", vec![sig(vec![string(), string()], boolean())]);
    table.insert("length", vec![sig(vec![string()], int32())]);
    table.insert("indexof", vec![sig(vec![string(), string()], int32())]);
    table.insert(
        "substring",
        vec![
            sig(vec![string(), int32()], string()),
            sig(vec![string(), int32(), int32()], string()),
        ],
    );
    table.insert("tolower", vec![sig(vec![string()], string())]);
    table.insert("toupper", vec![sig(vec![string()], string())]);
    table.insert("trim", vec![sig(vec![string()], string())]);
    table.insert("concat", vec![sig(vec![string(), string()], string())]);

    // Date/time component functions, overloaded for the applicable sources.
    table.insert(
        "year",
        vec![
            sig(vec![date.clone()], int32()),
            sig(vec![datetime.clone()], int32()),
        ],
    );
    table.insert(
        "month",
        vec![
            sig(vec![date.clone()], int32()),
            sig(vec![datetime.clone()], int32()),
        ],
    );
    table.insert(
        "day",
        vec![
            sig(vec![date.clone()], int32()),
            sig(vec![datetime.clone()], int32()),
        ],
    );
    table.insert(
        "hour",
        vec![
            sig(vec![datetime.clone()], int32()),
            sig(vec![time_of_day.clone()], int32()),
        ],
    );
    table.insert(
        "minute",
        vec![
            sig(vec![datetime.clone()], int32()),
            sig(vec![time_of_day.clone()], int32()),
        ],
    );
    table.insert(
        "second",
        vec![
            sig(vec![datetime.clone()], int32()),
            sig(vec![time_of_day.clone()], int32()),
        ],
    );
    table.insert(
        "fractionalseconds",
        vec![
            sig(vec![datetime.clone()], decimal()),
            sig(vec![time_of_day.clone()], decimal()),
        ],
    );
    table.insert("date", vec![sig(vec![datetime.clone()], date)]);
    table.insert("time", vec![sig(vec![datetime.clone()], time_of_day)]);
    table.insert("now", vec![sig(vec![], datetime)]);

    // Numeric functions.
    table.insert(
        "round",
        vec![
            sig(vec![double()], double()),
            sig(vec![decimal()], decimal()),
        ],
    );
    table.insert(
        "floor",
        vec![
            sig(vec![double()], double()),
            sig(vec![decimal()], decimal()),
        ],
    );
    table.insert(
        "ceiling",
        vec![
            sig(vec![double()], double()),
            sig(vec![decimal()], decimal()),
        ],
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_canonical_names() {
        let table = builtin_signatures();
        for name in [
            "contains", "length", "substring", "concat", "year", "hour", "now", "round",
        ] {
            assert!(table.contains_key(name), "missing builtin '{name}'");
        }
        // cast/isof are special forms, not table entries.
        assert!(!table.contains_key("cast"));
        assert!(!table.contains_key("isof"));
    }

    #[test]
    fn test_overload_arities() {
        let table = builtin_signatures();
        let substring = &table["substring"];
        let arities: Vec<usize> = substring.iter().map(|s| s.parameter_types.len()).collect();
        assert_eq!(arities, vec![2, 3]);
    }
}
