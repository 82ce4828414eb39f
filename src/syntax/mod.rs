//! Untyped token tree definitions.
//!
//! These are the shapes an external lexer produces from the raw query
//! options. Nothing here is validated against the model; the binder does
//! that. Path segment tokens arrive in leaf-first (parent-pointing) order
//! and are inverted by the expand/select normalizers before binding.

mod token;

pub use token::{
    BinaryOperator, ComputeItemToken, ComputeToken, ExpandTermToken, ExpandToken, LevelsToken,
    OrderByDirection, OrderByToken, PathSegmentToken, QueryToken, SearchToken, SelectTermToken,
    SelectToken, UnaryOperator,
};
