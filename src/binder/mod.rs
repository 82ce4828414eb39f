//! Semantic binding: turns untyped query option tokens into typed, model-
//! validated clauses.
//!
//! [`MetadataBinder`] is the entry point. It resolves the addressed entity
//! set, establishes the implicit range variable `$it`, and dispatches each
//! token to the sub-binder for its variant. Binding is all-or-nothing: the
//! first rule violation anywhere in the tree fails the whole bind.

mod bound;
mod compute;
mod context;
mod error;
mod function;
mod key;
mod lambda;
mod literal;
mod metadata;
mod operator;
mod orderby;
mod path;
mod scope;
mod search;
pub mod select_expand;

pub use bound::{BoundNode, FilterClause, LambdaKind, OrderByClause};
pub use compute::{bind_compute, ComputeClause, ComputeItem};
pub use context::{BinderConfig, BindingContext};
pub use error::BindError;
pub use key::bind_key_lookup;
pub use lambda::bind_lambda;
pub use literal::bind_literal;
pub use metadata::{
    bind_token, process_skip, process_top, BoundQuery, MetadataBinder, QueryOptions,
};
pub use operator::{bind_binary, bind_unary};
pub use orderby::bind_order_by;
pub use path::{bind_dotted_identifier, bind_end_path, bind_inner_path};
pub use scope::{BindingScope, RangeVariable};
pub use search::{bind_search, SearchClause, SearchNode};
pub use select_expand::{
    add_explicit_nav_links, process_levels, ExpandedNavigationItem, LevelsClause, PathSelectItem,
    SelectExpandBinder, SelectExpandClause, SelectItem, SelectPathSegment,
};
