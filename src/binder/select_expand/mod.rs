//! `$select`/`$expand` binding: normalization of the raw option tokens,
//! binding against the model, and the finishing pass.

mod bind;
mod clause;
mod finish;
mod normalize;
mod segment;

pub use bind::{process_levels, SelectExpandBinder};
pub use clause::{
    ExpandedNavigationItem, LevelsClause, PathSelectItem, SelectExpandClause, SelectItem,
    SelectPathSegment,
};
pub use finish::add_explicit_nav_links;
pub use normalize::{combine_terms, invert_path, normalize_expand, normalize_select};
