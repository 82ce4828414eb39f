//! Semantic binding of OData query options.
//!
//! This crate takes the untyped token trees a query-option parser produces
//! for `$filter`, `$orderby`, `$select`, `$expand`, `$search`, `$compute`,
//! `$skip`, `$top`, and `$count`, and binds them against a structural type
//! model into typed, validated clauses. It does not parse URLs and it does
//! not evaluate queries; it sits between the two, deciding what every
//! identifier means and what type every expression has.
//!
//! ```
//! use odata_bind::binder::{MetadataBinder, QueryOptions};
//! use odata_bind::functions::FunctionRegistry;
//! use odata_bind::model::{EntitySet, Model, StructuredType};
//! use odata_bind::syntax::{BinaryOperator, QueryToken};
//! use odata_bind::types::{PrimitiveKind, TypeRef, Value};
//!
//! # fn main() -> odata_bind::Result<()> {
//! let mut model = Model::new();
//! model.add_type(
//!     StructuredType::new("NS.Person")
//!         .with_property("Name", TypeRef::primitive(PrimitiveKind::String))
//!         .with_key(vec!["Name".into()]),
//! )?;
//! model.add_entity_set(EntitySet::new("People", "NS.Person"))?;
//!
//! let registry = FunctionRegistry::new();
//! let binder = MetadataBinder::new(&model, &registry);
//!
//! let options = QueryOptions {
//!     filter: Some(QueryToken::binary(
//!         BinaryOperator::Eq,
//!         QueryToken::end_path("Name"),
//!         QueryToken::literal(Value::String("Bob".into()), "'Bob'"),
//!     )),
//!     ..QueryOptions::default()
//! };
//! let bound = binder.bind_query("People", &options)?;
//! assert!(bound.filter.is_some());
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod error;
pub mod functions;
pub mod model;
pub mod syntax;
pub mod types;

pub use binder::{BindError, BoundQuery, MetadataBinder, QueryOptions};
pub use error::{ODataError, Result};
pub use model::Model;
