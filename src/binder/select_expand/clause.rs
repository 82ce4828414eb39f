//! Bound select/expand clause and item types.

use crate::model::{NavigationProperty, StructuralProperty};

use super::super::bound::{FilterClause, OrderByClause};
use super::super::compute::ComputeClause;
use super::super::search::SearchClause;

/// One segment of a bound select or expand path.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectPathSegment {
    /// A type cast to a qualified type name.
    TypeCast(String),
    /// A declared structural property.
    Property(StructuralProperty),
    /// A declared navigation property.
    Navigation(NavigationProperty),
    /// A bound operation, by qualified name.
    Operation(String),
    /// A dynamic property of an open type.
    Dynamic(String),
}

impl SelectPathSegment {
    /// Returns the identifier this segment was bound from.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SelectPathSegment::TypeCast(name)
            | SelectPathSegment::Operation(name)
            | SelectPathSegment::Dynamic(name) => name,
            SelectPathSegment::Property(property) => &property.name,
            SelectPathSegment::Navigation(navigation) => &navigation.name,
        }
    }
}

/// A selected path with its bound nested options.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSelectItem {
    /// Bound path segments, root-first.
    pub path: Vec<SelectPathSegment>,
    /// Bound nested `$select`/`$expand`.
    pub select_expand: Option<SelectExpandClause>,
    /// Bound nested `$filter`.
    pub filter: Option<FilterClause>,
    /// Bound nested `$orderby`.
    pub order_by: Option<OrderByClause>,
    /// Validated nested `$skip`.
    pub skip: Option<i64>,
    /// Validated nested `$top`.
    pub top: Option<i64>,
    /// Nested `$count`.
    pub count: Option<bool>,
    /// Bound nested `$search`.
    pub search: Option<SearchClause>,
    /// Bound nested `$compute`.
    pub compute: Option<ComputeClause>,
}

impl PathSelectItem {
    /// Creates a path item with no nested options.
    #[must_use]
    pub fn new(path: Vec<SelectPathSegment>) -> Self {
        PathSelectItem {
            path,
            select_expand: None,
            filter: None,
            order_by: None,
            skip: None,
            top: None,
            count: None,
            search: None,
            compute: None,
        }
    }
}

/// Validated `$levels` of an expanded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelsClause {
    /// True for `$levels=max`.
    pub is_max: bool,
    /// The level count; zero when `is_max` is set.
    pub level: i64,
}

/// An expanded navigation property with its bound nested options.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedNavigationItem {
    /// Bound path: leading type casts plus the final navigation segment.
    pub path: Vec<SelectPathSegment>,
    /// The expanded navigation property.
    pub navigation: NavigationProperty,
    /// Bound nested `$select`/`$expand`.
    pub select_expand: SelectExpandClause,
    /// Bound nested `$filter`.
    pub filter: Option<FilterClause>,
    /// Bound nested `$orderby`.
    pub order_by: Option<OrderByClause>,
    /// Validated nested `$skip`.
    pub skip: Option<i64>,
    /// Validated nested `$top`.
    pub top: Option<i64>,
    /// Nested `$count`.
    pub count: Option<bool>,
    /// Bound nested `$search`.
    pub search: Option<SearchClause>,
    /// Validated nested `$levels`.
    pub levels: Option<LevelsClause>,
    /// Bound nested `$compute`.
    pub compute: Option<ComputeClause>,
}

/// One item of a select/expand clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// A selected path.
    Path(PathSelectItem),
    /// An expanded navigation.
    ExpandedNavigation(ExpandedNavigationItem),
    /// The structural wildcard `*`.
    Wildcard,
    /// A namespace wildcard `Namespace.*`, selecting all operations in the
    /// namespace.
    NamespaceWildcard(String),
}

impl SelectItem {
    /// A plain structural path: one whose final segment is a declared
    /// structural property. These are the items the wildcard subsumes.
    #[must_use]
    pub fn is_plain_structural(&self) -> bool {
        matches!(
            self,
            SelectItem::Path(item)
                if matches!(item.path.last(), Some(SelectPathSegment::Property(_)))
        )
    }
}

/// The canonical bound form of `$select` and `$expand` together.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpandClause {
    /// True when no explicit selection was made (everything is selected).
    pub all_selected: bool,
    /// Selection and expansion items.
    pub items: Vec<SelectItem>,
}

impl SelectExpandClause {
    /// Creates an empty clause.
    #[must_use]
    pub fn new(all_selected: bool) -> Self {
        SelectExpandClause {
            all_selected,
            items: Vec::new(),
        }
    }

    /// Returns true when the clause contains the structural wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.items.iter().any(|i| matches!(i, SelectItem::Wildcard))
    }

    /// Adds an item, enforcing the wildcard rules: inserting the wildcard
    /// removes existing plain structural paths, and later plain structural
    /// paths are no-ops while a wildcard is present. Navigation, operation,
    /// dynamic, and expanded items coexist with the wildcard.
    pub fn add_item(&mut self, item: SelectItem) {
        match item {
            SelectItem::Wildcard => {
                if self.has_wildcard() {
                    return;
                }
                self.items.retain(|existing| !existing.is_plain_structural());
                self.items.push(SelectItem::Wildcard);
            }
            SelectItem::NamespaceWildcard(namespace) => {
                let duplicate = self.items.iter().any(|existing| {
                    matches!(existing, SelectItem::NamespaceWildcard(ns) if *ns == namespace)
                });
                if !duplicate {
                    self.items.push(SelectItem::NamespaceWildcard(namespace));
                }
            }
            item => {
                if self.has_wildcard() && item.is_plain_structural() {
                    return;
                }
                self.items.push(item);
            }
        }
    }
}
