//! Structural type model consumed by the binder.
//!
//! The model is the read-only metadata side of binding: structured types
//! with declared properties and navigation properties, bound operations,
//! and entity sets. The binder only ever looks things up here; nothing in
//! this module mutates after construction.

mod schema;

pub use schema::{
    BoundOperation, EntitySet, Model, NavigationProperty, StructuralProperty, StructuredType,
};
