//! The select/expand binder: turns normalized option tokens into a
//! [`SelectExpandClause`].

use crate::functions::FunctionRegistry;
use crate::model::Model;
use crate::syntax::{
    ExpandTermToken, ExpandToken, LevelsToken, SelectTermToken, SelectToken,
};
use crate::types::TypeRef;

use super::super::context::{BinderConfig, BindingContext};
use super::super::metadata::{bind_filter, process_skip, process_top};
use super::super::scope::RangeVariable;
use super::super::{compute, orderby, search, BindError};
use super::clause::{
    ExpandedNavigationItem, LevelsClause, PathSelectItem, SelectExpandClause, SelectItem,
    SelectPathSegment,
};
use super::normalize::{normalize_expand, normalize_select, unify};
use super::segment::{classify_segment, follow_type_segments};

/// Validates a `$levels` value.
///
/// # Errors
///
/// Fails when the level count is negative.
pub fn process_levels(
    levels: Option<LevelsToken>,
) -> Result<Option<LevelsClause>, BindError> {
    match levels {
        None => Ok(None),
        Some(LevelsToken::Max) => Ok(Some(LevelsClause {
            is_max: true,
            level: 0,
        })),
        Some(LevelsToken::Count(n)) if n < 0 => Err(BindError::NegativeQueryOption {
            option: "$levels".to_string(),
            text: n.to_string(),
        }),
        Some(LevelsToken::Count(n)) => Ok(Some(LevelsClause {
            is_max: false,
            level: n,
        })),
    }
}

/// Binds `$select` and `$expand` against a structured type.
///
/// Expand terms bind first so the wildcard rules apply to select items in
/// the order the request listed them. Each expanded navigation's nested
/// options bind in a fresh context whose implicit range variable is the
/// navigation target.
#[derive(Debug)]
pub struct SelectExpandBinder<'a> {
    model: &'a Model,
    registry: &'a FunctionRegistry,
    config: &'a BinderConfig,
}

impl<'a> SelectExpandBinder<'a> {
    /// Creates a select/expand binder.
    #[must_use]
    pub fn new(
        model: &'a Model,
        registry: &'a FunctionRegistry,
        config: &'a BinderConfig,
    ) -> Self {
        SelectExpandBinder {
            model,
            registry,
            config,
        }
    }

    /// Normalizes, unifies, and binds the two options against
    /// `element_type`.
    ///
    /// # Errors
    ///
    /// Fails when any path or nested option violates a binding rule.
    pub fn bind(
        &self,
        element_type: &str,
        select: Option<&SelectToken>,
        expand: Option<&ExpandToken>,
    ) -> Result<SelectExpandClause, BindError> {
        let limit = self.config.max_depth;
        let expand = expand.map(|e| normalize_expand(e, limit)).transpose()?;
        let select = select.map(|s| normalize_select(s, limit)).transpose()?;
        let root = unify(select, expand);
        self.bind_options(element_type, root.select.as_ref(), root.expand.as_ref(), 0)
    }

    fn bind_options(
        &self,
        element_type: &str,
        select: Option<&SelectToken>,
        expand: Option<&ExpandToken>,
        depth: usize,
    ) -> Result<SelectExpandClause, BindError> {
        // Bounds nesting recursion alongside the normalizer's own guard.
        if depth >= self.config.max_depth {
            return Err(BindError::RecursionLimitReached {
                limit: self.config.max_depth,
            });
        }
        let all_selected = select.map_or(true, |s| s.terms.is_empty());
        let mut clause = SelectExpandClause::new(all_selected);

        if let Some(expand) = expand {
            for term in &expand.terms {
                let item = self.bind_expand_term(element_type, term, depth)?;
                clause.add_item(SelectItem::ExpandedNavigation(item));
            }
        }
        if let Some(select) = select {
            for term in &select.terms {
                clause.add_item(self.bind_select_term(element_type, term, depth)?);
            }
        }
        Ok(clause)
    }

    fn bind_expand_term(
        &self,
        element_type: &str,
        term: &ExpandTermToken,
        depth: usize,
    ) -> Result<ExpandedNavigationItem, BindError> {
        let identifiers = term.path.identifiers();
        let (last, casts) = identifiers
            .split_last()
            .expect("a path has at least one segment");

        let (mut path, narrowed) =
            follow_type_segments(self.model, self.config, casts, element_type)?;
        let segment = classify_segment(self.model, self.config, &narrowed, last)?;
        let SelectPathSegment::Navigation(navigation) = segment else {
            return Err(BindError::PropertyNotDeclared {
                type_name: narrowed,
                property: (*last).to_string(),
            });
        };
        path.push(SelectPathSegment::Navigation(navigation.clone()));

        // Nested options see the navigation target as their implicit
        // range variable, independent of the outer scope.
        let mut ctx = BindingContext::new(self.model, self.registry, self.config);
        ctx.scope.set_implicit(RangeVariable::new(
            "$it",
            TypeRef::structured(navigation.target_type.clone()),
        ));

        let filter = term
            .filter
            .as_ref()
            .map(|token| bind_filter(&mut ctx, token))
            .transpose()?;
        let order_by = orderby::bind_order_by(&mut ctx, &term.order_by)?;
        let compute = term
            .compute
            .as_ref()
            .map(|token| compute::bind_compute(&mut ctx, token))
            .transpose()?;
        let search = term.search.as_ref().map(search::bind_search);
        let select_expand = self.bind_options(
            &navigation.target_type,
            term.select.as_ref(),
            term.expand.as_ref(),
            depth + 1,
        )?;

        Ok(ExpandedNavigationItem {
            path,
            navigation,
            select_expand,
            filter,
            order_by,
            skip: process_skip(term.skip)?,
            top: process_top(term.top)?,
            count: term.count,
            search,
            levels: process_levels(term.levels)?,
            compute,
        })
    }

    fn bind_select_term(
        &self,
        element_type: &str,
        term: &SelectTermToken,
        depth: usize,
    ) -> Result<SelectItem, BindError> {
        let identifiers = term.path.identifiers();
        let (last, casts) = identifiers
            .split_last()
            .expect("a path has at least one segment");

        if *last == "*" && casts.is_empty() {
            return Ok(SelectItem::Wildcard);
        }
        if let Some(namespace) = last.strip_suffix(".*") {
            return Ok(SelectItem::NamespaceWildcard(namespace.to_string()));
        }

        let (mut path, narrowed) =
            follow_type_segments(self.model, self.config, casts, element_type)?;
        let segment = classify_segment(self.model, self.config, &narrowed, last)?;
        let target = segment_target_type(&segment);
        path.push(segment);

        let mut item = PathSelectItem::new(path);
        item.skip = process_skip(term.skip)?;
        item.top = process_top(term.top)?;
        item.count = term.count;
        item.search = term.search.as_ref().map(search::bind_search);

        let needs_target = term.filter.is_some()
            || !term.order_by.is_empty()
            || term.compute.is_some()
            || term.select.is_some()
            || term.expand.is_some();
        if needs_target {
            let Some(target) = target else {
                return Err(BindError::CannotConvertToType {
                    from: item.path.last().map_or_else(String::new, segment_type_name),
                    to: "a resource".to_string(),
                });
            };

            let mut ctx = BindingContext::new(self.model, self.registry, self.config);
            ctx.scope.set_implicit(RangeVariable::new(
                "$it",
                TypeRef::structured(target.clone()),
            ));
            item.filter = term
                .filter
                .as_ref()
                .map(|token| bind_filter(&mut ctx, token))
                .transpose()?;
            item.order_by = orderby::bind_order_by(&mut ctx, &term.order_by)?;
            item.compute = term
                .compute
                .as_ref()
                .map(|token| compute::bind_compute(&mut ctx, token))
                .transpose()?;
            if term.select.is_some() || term.expand.is_some() {
                item.select_expand = Some(self.bind_options(
                    &target,
                    term.select.as_ref(),
                    term.expand.as_ref(),
                    depth + 1,
                )?);
            }
        }
        Ok(SelectItem::Path(item))
    }
}

/// The structured type nested options of a selected path bind against, if
/// the path ends in something resource-valued.
fn segment_target_type(segment: &SelectPathSegment) -> Option<String> {
    match segment {
        SelectPathSegment::Navigation(navigation) => Some(navigation.target_type.clone()),
        SelectPathSegment::TypeCast(name) => Some(name.clone()),
        SelectPathSegment::Property(property) => {
            let type_ref = &property.type_ref;
            let element = type_ref.element_type().unwrap_or(type_ref);
            element.structured_name().map(ToString::to_string)
        }
        SelectPathSegment::Operation(_) | SelectPathSegment::Dynamic(_) => None,
    }
}

fn segment_type_name(segment: &SelectPathSegment) -> String {
    match segment {
        SelectPathSegment::Property(property) => property.type_ref.name(),
        other => other.name().to_string(),
    }
}
