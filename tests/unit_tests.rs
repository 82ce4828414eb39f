//! Unit tests for odata-bind.

use odata_bind::binder::{BindError, BoundNode, MetadataBinder, QueryOptions};
use odata_bind::functions::{FunctionRegistry, FunctionSignature};
use odata_bind::model::{BoundOperation, EntitySet, Model, StructuredType};
use odata_bind::syntax::{
    BinaryOperator, OrderByDirection, OrderByToken, QueryToken, UnaryOperator,
};
use odata_bind::types::{self, PrimitiveKind, TypeRef, Value};
use odata_bind::ODataError;

const NS: &str = "Fully.Qualified.Namespace";

fn qualified(name: &str) -> String {
    format!("{NS}.{name}")
}

/// The shared fixture model: people with a dog and paintings, an employee
/// subtype, an open painting type, and a compound-key lion.
fn fixture_model() -> Model {
    let mut model = Model::new();
    model
        .add_type(
            StructuredType::new(qualified("Person"))
                .with_property("ID", TypeRef::primitive(PrimitiveKind::Int32))
                .with_property("Name", TypeRef::nullable_primitive(PrimitiveKind::String))
                .with_property("Shoe", TypeRef::nullable_primitive(PrimitiveKind::String))
                .with_property(
                    "Birthdate",
                    TypeRef::primitive(PrimitiveKind::DateTimeOffset),
                )
                .with_property(
                    "FavoriteNumber",
                    TypeRef::primitive(PrimitiveKind::Double),
                )
                .with_navigation("MyDog", qualified("Dog"), false)
                .with_navigation("MyPaintings", qualified("Painting"), true)
                .with_key(vec!["ID".into()]),
        )
        .unwrap();
    model
        .add_type(
            StructuredType::new(qualified("Employee"))
                .with_base_type(qualified("Person"))
                .with_property(
                    "WorkEmail",
                    TypeRef::nullable_primitive(PrimitiveKind::String),
                ),
        )
        .unwrap();
    model
        .add_type(
            StructuredType::new(qualified("Dog"))
                .with_property("ID", TypeRef::primitive(PrimitiveKind::Int32))
                .with_property("Color", TypeRef::nullable_primitive(PrimitiveKind::String))
                .with_navigation("MyPeople", qualified("Person"), true)
                .with_key(vec!["ID".into()]),
        )
        .unwrap();
    model
        .add_type(
            StructuredType::new(qualified("Painting"))
                .open()
                .with_property("ID", TypeRef::primitive(PrimitiveKind::Int32))
                .with_property("Artist", TypeRef::nullable_primitive(PrimitiveKind::String))
                .with_property(
                    "Colors",
                    TypeRef::collection(TypeRef::primitive(PrimitiveKind::String)),
                )
                .with_navigation("Owner", qualified("Person"), false)
                .with_key(vec!["ID".into()]),
        )
        .unwrap();
    model
        .add_type(
            StructuredType::new(qualified("Lion"))
                .with_property("ID1", TypeRef::primitive(PrimitiveKind::Int32))
                .with_property("ID2", TypeRef::primitive(PrimitiveKind::Int32))
                .with_key(vec!["ID1".into(), "ID2".into()]),
        )
        .unwrap();
    model
        .add_operation(BoundOperation {
            qualified_name: qualified("GetColorAtPosition"),
            binding_type: qualified("Painting"),
            parameter_types: vec![
                TypeRef::primitive(PrimitiveKind::Int32),
                TypeRef::primitive(PrimitiveKind::Int32),
            ],
            return_type: Some(TypeRef::nullable_primitive(PrimitiveKind::String)),
            is_function: true,
        })
        .unwrap();
    model
        .add_operation(BoundOperation {
            qualified_name: qualified("FullName"),
            binding_type: qualified("Person"),
            parameter_types: vec![],
            return_type: Some(TypeRef::nullable_primitive(PrimitiveKind::String)),
            is_function: true,
        })
        .unwrap();
    model
        .add_entity_set(EntitySet::new("People", qualified("Person")))
        .unwrap();
    model
        .add_entity_set(EntitySet::new("Dogs", qualified("Dog")))
        .unwrap();
    model
        .add_entity_set(EntitySet::new("Paintings", qualified("Painting")))
        .unwrap();
    model
        .add_entity_set(EntitySet::new("Lions", qualified("Lion")))
        .unwrap();
    model
}

fn bind_filter(model: &Model, entity_set: &str, filter: QueryToken) -> Result<BoundNode, ODataError> {
    let registry = FunctionRegistry::new();
    let binder = MetadataBinder::new(model, &registry);
    let options = QueryOptions {
        filter: Some(filter),
        ..QueryOptions::default()
    };
    let bound = binder.bind_query(entity_set, &options)?;
    Ok(bound.filter.expect("filter was supplied").expression)
}

// =============================================================================
// Error Display Tests
// =============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_bind_error_messages() {
        let err = BindError::PropertyNotDeclared {
            type_name: "NS.Person".into(),
            property: "Nickname".into(),
        };
        assert!(err.to_string().contains("Nickname"));
        assert!(err.to_string().contains("NS.Person"));
        assert!(err.to_string().contains("not open"));

        let err = BindError::NegativeQueryOption {
            option: "$top".into(),
            text: "-5".into(),
        };
        assert_eq!(
            err.to_string(),
            "The value '-5' for query option '$top' requires a non-negative integer"
        );
    }

    #[test]
    fn test_model_error_display() {
        let err = ODataError::Model("Entity set 'Nowhere' does not exist".into());
        assert!(err.to_string().contains("Model error"));
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn test_bind_error_transparent_through_odata_error() {
        let err = ODataError::from(BindError::PropertyAccessWithoutParent);
        assert_eq!(
            err.to_string(),
            BindError::PropertyAccessWithoutParent.to_string()
        );
    }
}

// =============================================================================
// Type Promotion Tests
// =============================================================================

mod promotion_tests {
    use super::*;

    #[test]
    fn test_integral_chain_promotes_upward_only() {
        assert!(types::can_promote(
            PrimitiveKind::SByte,
            PrimitiveKind::Int64
        ));
        assert!(types::can_promote(
            PrimitiveKind::Int32,
            PrimitiveKind::Double
        ));
        assert!(!types::can_promote(
            PrimitiveKind::Int64,
            PrimitiveKind::Int32
        ));
        assert!(!types::can_promote(
            PrimitiveKind::String,
            PrimitiveKind::Int32
        ));
    }

    #[test]
    fn test_decimal_promotions() {
        assert!(types::can_promote(
            PrimitiveKind::Int64,
            PrimitiveKind::Decimal
        ));
        assert!(types::can_promote(
            PrimitiveKind::Decimal,
            PrimitiveKind::Double
        ));
        assert!(!types::can_promote(
            PrimitiveKind::Single,
            PrimitiveKind::Decimal
        ));
    }

    #[test]
    fn test_common_candidate_picks_wider() {
        assert_eq!(
            types::common_candidate(PrimitiveKind::Int32, PrimitiveKind::Double),
            Some(PrimitiveKind::Double)
        );
        assert_eq!(
            types::common_candidate(PrimitiveKind::Int16, PrimitiveKind::Int16),
            Some(PrimitiveKind::Int16)
        );
        assert_eq!(
            types::common_candidate(PrimitiveKind::String, PrimitiveKind::Int32),
            None
        );
    }
}

// =============================================================================
// Operator Binding Tests
// =============================================================================

mod operator_tests {
    use super::*;

    #[test]
    fn test_comparison_result_is_nullable_boolean() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path("Name"),
            QueryToken::literal(Value::String("Bob".into()), "'Bob'"),
        );
        let bound = bind_filter(&model, "People", filter).unwrap();
        let type_ref = bound.type_ref().unwrap();
        assert_eq!(type_ref.primitive_kind(), Some(PrimitiveKind::Boolean));
        assert!(type_ref.nullable);
    }

    #[test]
    fn test_null_operand_converted_to_known_side() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path("Name"),
            QueryToken::literal(Value::Null, "null"),
        );
        let bound = bind_filter(&model, "People", filter).unwrap();
        let BoundNode::Binary { right, .. } = bound else {
            panic!("expected a binary node");
        };
        // The null side gets a single conversion to nullable string.
        let BoundNode::Convert { type_ref, .. } = *right else {
            panic!("expected a conversion around the null literal");
        };
        assert_eq!(type_ref.primitive_kind(), Some(PrimitiveKind::String));
        assert!(type_ref.nullable);
    }

    #[test]
    fn test_arithmetic_promotes_narrower_operand() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Gt,
            QueryToken::binary(
                BinaryOperator::Add,
                QueryToken::end_path("FavoriteNumber"),
                QueryToken::literal(Value::Int32(1), "1"),
            ),
            QueryToken::literal(Value::Double(10.0), "10.0"),
        );
        let bound = bind_filter(&model, "People", filter).unwrap();
        let BoundNode::Binary { left, .. } = bound else {
            panic!("expected a binary node");
        };
        // Int32 literal promoted to Double inside the addition.
        let BoundNode::Binary {
            right, type_ref, ..
        } = *left
        else {
            panic!("expected the addition node");
        };
        assert!(matches!(*right, BoundNode::Convert { .. }));
        assert_eq!(
            type_ref.and_then(|t| t.primitive_kind()),
            Some(PrimitiveKind::Double)
        );
    }

    #[test]
    fn test_incompatible_operands_rejected() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Add,
            QueryToken::end_path("Name"),
            QueryToken::literal(Value::Int32(1), "1"),
        );
        let result = bind_filter(&model, "People", filter);
        assert!(matches!(
            result,
            Err(ODataError::Bind(BindError::IncompatibleOperands { .. }))
        ));
    }

    #[test]
    fn test_not_requires_boolean_operand() {
        let model = fixture_model();
        let filter = QueryToken::unary(UnaryOperator::Not, QueryToken::end_path("Name"));
        assert!(bind_filter(&model, "People", filter).is_err());

        let filter = QueryToken::unary(
            UnaryOperator::Not,
            QueryToken::binary(
                BinaryOperator::Eq,
                QueryToken::end_path("Shoe"),
                QueryToken::literal(Value::Null, "null"),
            ),
        );
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_negate_on_string_rejected() {
        let model = fixture_model();
        let filter = QueryToken::unary(UnaryOperator::Negate, QueryToken::end_path("Name"));
        assert!(matches!(
            bind_filter(&model, "People", filter),
            Err(ODataError::Bind(BindError::CannotConvertToType { .. }))
        ));
    }

    #[test]
    fn test_relational_on_boolean_with_null_rejected() {
        let model = fixture_model();
        // Booleans do not order, so `lt` must not accept one even when the
        // other side is null.
        let filter = QueryToken::binary(
            BinaryOperator::Lt,
            QueryToken::literal(Value::Boolean(true), "true"),
            QueryToken::literal(Value::Null, "null"),
        );
        assert!(matches!(
            bind_filter(&model, "People", filter),
            Err(ODataError::Bind(BindError::IncompatibleOperands { .. }))
        ));

        // Equality keeps accepting the same operands.
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::literal(Value::Boolean(true), "true"),
            QueryToken::literal(Value::Null, "null"),
        );
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_relational_on_resource_with_null_rejected() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Gt,
            QueryToken::end_path("MyDog"),
            QueryToken::literal(Value::Null, "null"),
        );
        assert!(matches!(
            bind_filter(&model, "People", filter),
            Err(ODataError::Bind(BindError::IncompatibleOperands { .. }))
        ));
    }

    #[test]
    fn test_both_null_operands_stay_untyped() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::literal(Value::Null, "null"),
            QueryToken::literal(Value::Null, "null"),
        );
        let bound = bind_filter(&model, "People", filter).unwrap();
        // The comparison of two nulls is untyped; the filter wraps it in a
        // conversion to nullable boolean.
        let BoundNode::Convert { source, type_ref } = bound else {
            panic!("expected the filter-level conversion");
        };
        assert!(source.is_untyped());
        assert_eq!(type_ref.primitive_kind(), Some(PrimitiveKind::Boolean));
    }
}

// =============================================================================
// Path and Key Tests
// =============================================================================

mod path_tests {
    use super::*;

    #[test]
    fn test_navigation_then_property() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path_on("Color", QueryToken::end_path("MyDog")),
            QueryToken::literal(Value::String("Brown".into()), "'Brown'"),
        );
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_property_on_collection_navigation_rejected() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path_on("Artist", QueryToken::inner_path("MyPaintings", None)),
            QueryToken::literal(Value::Null, "null"),
        );
        assert!(matches!(
            bind_filter(&model, "People", filter),
            Err(ODataError::Bind(
                BindError::PropertyAccessSourceNotSingleValue { .. }
            ))
        ));
    }

    #[test]
    fn test_key_lookup_narrows_collection() {
        let model = fixture_model();
        let keyed = QueryToken::InnerPath {
            identifier: "MyPaintings".into(),
            parent: None,
            key_values: vec![(None, QueryToken::literal(Value::Int32(3), "3"))],
        };
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path_on("Artist", keyed),
            QueryToken::literal(Value::String("Vermeer".into()), "'Vermeer'"),
        );
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_derived_property_through_cast() {
        let model = fixture_model();
        let cast = QueryToken::DottedIdentifier {
            identifier: format!("{NS}.Employee"),
            parent: None,
        };
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path_on("WorkEmail", cast),
            QueryToken::literal(Value::Null, "null"),
        );
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_zero_argument_bound_function_as_path() {
        let model = fixture_model();
        let filter = QueryToken::binary(
            BinaryOperator::Eq,
            QueryToken::end_path("FullName"),
            QueryToken::literal(Value::String("Bob H".into()), "'Bob H'"),
        );
        let bound = bind_filter(&model, "People", filter).unwrap();
        let BoundNode::Binary { left, .. } = bound else {
            panic!("expected a binary node");
        };
        assert!(matches!(*left, BoundNode::FunctionCall { .. }));
    }

    #[test]
    fn test_lambda_over_paintings() {
        let model = fixture_model();
        let filter = QueryToken::Any {
            parameter: Some("p".into()),
            body: Some(Box::new(QueryToken::binary(
                BinaryOperator::Eq,
                QueryToken::end_path_on("Artist", QueryToken::RangeVariable("p".into())),
                QueryToken::literal(Value::String("Vermeer".into()), "'Vermeer'"),
            ))),
            source: Box::new(QueryToken::inner_path("MyPaintings", None)),
        };
        assert!(bind_filter(&model, "People", filter).is_ok());
    }

    #[test]
    fn test_lambda_parameter_out_of_scope_after_body() {
        let model = fixture_model();
        // `p` referenced outside the any() that declared it.
        let filter = QueryToken::binary(
            BinaryOperator::And,
            QueryToken::Any {
                parameter: Some("p".into()),
                body: None,
                source: Box::new(QueryToken::inner_path("MyPaintings", None)),
            },
            QueryToken::binary(
                BinaryOperator::Eq,
                QueryToken::end_path_on("Artist", QueryToken::RangeVariable("p".into())),
                QueryToken::literal(Value::Null, "null"),
            ),
        );
        assert!(matches!(
            bind_filter(&model, "People", filter),
            Err(ODataError::Bind(BindError::ParameterNotInScope(name))) if name == "p"
        ));
    }
}

// =============================================================================
// Order-By and Option Validation Tests
// =============================================================================

mod option_tests {
    use super::*;

    #[test]
    fn test_orderby_chain_order() {
        let model = fixture_model();
        let registry = FunctionRegistry::new();
        let binder = MetadataBinder::new(&model, &registry);
        let options = QueryOptions {
            order_by: vec![
                OrderByToken {
                    expression: QueryToken::end_path("Name"),
                    direction: OrderByDirection::Descending,
                },
                OrderByToken {
                    expression: QueryToken::end_path("ID"),
                    direction: OrderByDirection::Ascending,
                },
            ],
            ..QueryOptions::default()
        };
        let bound = binder.bind_query("People", &options).unwrap();
        let clause = bound.order_by.unwrap();
        assert_eq!(clause.len(), 2);
        assert_eq!(clause.direction, OrderByDirection::Descending);
    }

    #[test]
    fn test_orderby_collection_property_rejected() {
        let model = fixture_model();
        let registry = FunctionRegistry::new();
        let binder = MetadataBinder::new(&model, &registry);
        let options = QueryOptions {
            order_by: vec![OrderByToken {
                expression: QueryToken::end_path("Colors"),
                direction: OrderByDirection::Ascending,
            }],
            ..QueryOptions::default()
        };
        assert!(matches!(
            binder.bind_query("Paintings", &options),
            Err(ODataError::Bind(BindError::OperandNotSingleValue { operator })) if operator == "$orderby"
        ));
    }

    #[test]
    fn test_negative_skip_rejected_with_text() {
        let model = fixture_model();
        let registry = FunctionRegistry::new();
        let binder = MetadataBinder::new(&model, &registry);
        let options = QueryOptions {
            skip: Some(-2),
            ..QueryOptions::default()
        };
        match binder.bind_query("People", &options) {
            Err(ODataError::Bind(BindError::NegativeQueryOption { option, text })) => {
                assert_eq!(option, "$skip");
                assert_eq!(text, "-2");
            }
            other => panic!("expected a negative-option error, got {other:?}"),
        }
    }
}

// =============================================================================
// Function Registry Tests
// =============================================================================

mod registry_tests {
    use super::*;

    #[test]
    fn test_custom_function_resolves_in_filter() {
        let model = fixture_model();
        let registry = FunctionRegistry::new();
        registry.register(
            "shout",
            FunctionSignature::new(
                vec![TypeRef::nullable_primitive(PrimitiveKind::String)],
                TypeRef::nullable_primitive(PrimitiveKind::String),
            ),
        );
        let binder = MetadataBinder::new(&model, &registry);
        let options = QueryOptions {
            filter: Some(QueryToken::binary(
                BinaryOperator::Eq,
                QueryToken::FunctionCall {
                    name: "shout".into(),
                    arguments: vec![QueryToken::end_path("Name")],
                    parent: None,
                },
                QueryToken::literal(Value::String("BOB".into()), "'BOB'"),
            )),
            ..QueryOptions::default()
        };
        assert!(binder.bind_query("People", &options).is_ok());

        registry.unregister("shout");
        assert!(matches!(
            binder.bind_query("People", &options),
            Err(ODataError::Bind(BindError::UnknownFunction { name })) if name == "shout"
        ));
    }

    #[test]
    fn test_bound_operation_with_arguments() {
        let model = fixture_model();
        let registry = FunctionRegistry::new();
        let binder = MetadataBinder::new(&model, &registry);
        let options = QueryOptions {
            filter: Some(QueryToken::binary(
                BinaryOperator::Eq,
                QueryToken::FunctionCall {
                    name: format!("{NS}.GetColorAtPosition"),
                    arguments: vec![
                        QueryToken::literal(Value::Int32(1), "1"),
                        QueryToken::literal(Value::Int32(2), "2"),
                    ],
                    parent: None,
                },
                QueryToken::literal(Value::String("Blue".into()), "'Blue'"),
            )),
            ..QueryOptions::default()
        };
        assert!(binder.bind_query("Paintings", &options).is_ok());
        // The same operation is not bound to Person.
        assert!(binder.bind_query("People", &options).is_err());
    }
}
