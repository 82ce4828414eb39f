//! Expand/select normalization: path inversion, term combination, and
//! syntactic unification into a single root term.
//!
//! The lexer produces paths leaf-first, each segment pointing at its
//! parent. Normalization inverts them into root-first order, collapses
//! terms that expand the same path into one, and finally wraps the whole
//! of `$select` and `$expand` into a synthetic root term so the binder
//! sees one uniform tree shape.

use crate::syntax::{ExpandTermToken, ExpandToken, PathSegmentToken, SelectTermToken, SelectToken};

use super::super::BindError;

/// Inverts a parent-linked path into forward (root-first) order.
#[must_use]
pub fn invert_path(path: &PathSegmentToken) -> PathSegmentToken {
    let mut identifiers = path.identifiers();
    identifiers.reverse();

    let mut iter = identifiers.into_iter();
    let mut inverted = PathSegmentToken::new(
        iter.next().expect("a path has at least one segment"),
    );
    let mut tail = &mut inverted;
    for identifier in iter {
        tail.next = Some(Box::new(PathSegmentToken::new(identifier)));
        tail = tail
            .next
            .as_mut()
            .expect("tail segment was just attached");
    }
    inverted
}

/// Normalizes an expand token: inverts every term path, validates that each
/// path traverses exactly one navigation property, recurses into nested
/// expands, and combines terms that expand the same path.
///
/// # Errors
///
/// Fails with [`BindError::MultipleNavigationInPath`] when a term path
/// holds more than one non-qualified segment, and with
/// [`BindError::RecursionLimitReached`] when nesting exceeds `limit`.
pub fn normalize_expand(expand: &ExpandToken, limit: usize) -> Result<ExpandToken, BindError> {
    normalize_expand_at(expand, 0, limit)
}

fn normalize_expand_at(
    expand: &ExpandToken,
    depth: usize,
    limit: usize,
) -> Result<ExpandToken, BindError> {
    if depth >= limit {
        return Err(BindError::RecursionLimitReached { limit });
    }
    let mut terms = Vec::with_capacity(expand.terms.len());
    for term in &expand.terms {
        terms.push(normalize_term(term, depth, limit)?);
    }
    Ok(ExpandToken::new(combine_terms(terms)))
}

fn normalize_term(
    term: &ExpandTermToken,
    depth: usize,
    limit: usize,
) -> Result<ExpandTermToken, BindError> {
    let path = invert_path(&term.path);

    // All segments but the last must be type casts; a second plain segment
    // means the path traverses two navigation properties.
    let identifiers = path.identifiers();
    if identifiers[..identifiers.len() - 1]
        .iter()
        .any(|segment| !segment.contains('.'))
    {
        let last = identifiers
            .last()
            .expect("a path has at least one segment");
        return Err(BindError::MultipleNavigationInPath {
            identifier: (*last).to_string(),
        });
    }

    // The term is rebuilt field by field so the depth guard runs before
    // the nested option trees are touched at all.
    Ok(ExpandTermToken {
        path,
        select: term
            .select
            .as_ref()
            .map(|select| normalize_select_at(select, depth + 1, limit))
            .transpose()?,
        expand: term
            .expand
            .as_ref()
            .map(|expand| normalize_expand_at(expand, depth + 1, limit))
            .transpose()?,
        filter: term.filter.clone(),
        order_by: term.order_by.clone(),
        top: term.top,
        skip: term.skip,
        count: term.count,
        search: term.search.clone(),
        levels: term.levels,
        compute: term.compute.clone(),
    })
}

/// Collapses terms expanding the same path into one. Child expand lists are
/// unioned and recursively combined; for every other nested option the
/// first term that sets it wins, later terms fill in only what is still
/// absent.
#[must_use]
pub fn combine_terms(terms: Vec<ExpandTermToken>) -> Vec<ExpandTermToken> {
    let mut combined: Vec<ExpandTermToken> = Vec::with_capacity(terms.len());
    for term in terms {
        if let Some(existing) = combined.iter_mut().find(|t| t.path == term.path) {
            merge_into(existing, term);
        } else {
            combined.push(term);
        }
    }
    combined
}

fn merge_into(existing: &mut ExpandTermToken, incoming: ExpandTermToken) {
    existing.expand = match (existing.expand.take(), incoming.expand) {
        (Some(a), Some(b)) => {
            let union = a.terms.into_iter().chain(b.terms).collect();
            Some(ExpandToken::new(combine_terms(union)))
        }
        (a, b) => a.or(b),
    };

    if existing.select.is_none() {
        existing.select = incoming.select;
    }
    if existing.filter.is_none() {
        existing.filter = incoming.filter;
    }
    if existing.order_by.is_empty() {
        existing.order_by = incoming.order_by;
    }
    if existing.top.is_none() {
        existing.top = incoming.top;
    }
    if existing.skip.is_none() {
        existing.skip = incoming.skip;
    }
    if existing.count.is_none() {
        existing.count = incoming.count;
    }
    if existing.search.is_none() {
        existing.search = incoming.search;
    }
    if existing.levels.is_none() {
        existing.levels = incoming.levels;
    }
    if existing.compute.is_none() {
        existing.compute = incoming.compute;
    }
}

/// Normalizes a select token: inverts every term path and recurses into
/// nested select/expand options.
///
/// # Errors
///
/// Fails when a nested expand violates the single-navigation rule or when
/// nesting exceeds `limit`.
pub fn normalize_select(select: &SelectToken, limit: usize) -> Result<SelectToken, BindError> {
    normalize_select_at(select, 0, limit)
}

fn normalize_select_at(
    select: &SelectToken,
    depth: usize,
    limit: usize,
) -> Result<SelectToken, BindError> {
    if depth >= limit {
        return Err(BindError::RecursionLimitReached { limit });
    }
    let mut terms = Vec::with_capacity(select.terms.len());
    for term in &select.terms {
        terms.push(SelectTermToken {
            path: invert_path(&term.path),
            select: term
                .select
                .as_ref()
                .map(|select| normalize_select_at(select, depth + 1, limit))
                .transpose()?,
            expand: term
                .expand
                .as_ref()
                .map(|expand| normalize_expand_at(expand, depth + 1, limit))
                .transpose()?,
            filter: term.filter.clone(),
            order_by: term.order_by.clone(),
            top: term.top,
            skip: term.skip,
            count: term.count,
            search: term.search.clone(),
            compute: term.compute.clone(),
        });
    }
    Ok(SelectToken::new(terms))
}

/// Wraps normalized `$select` and `$expand` into one synthetic root term so
/// root and nested levels bind through the same code path.
#[must_use]
pub(crate) fn unify(
    select: Option<SelectToken>,
    expand: Option<ExpandToken>,
) -> ExpandTermToken {
    let mut root = ExpandTermToken::new(PathSegmentToken::new("$it"));
    root.select = select;
    root.expand = expand;
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 32;

    fn leaf_first(identifiers: &[&str]) -> PathSegmentToken {
        let mut iter = identifiers.iter().rev();
        let mut path = PathSegmentToken::new(*iter.next().unwrap());
        for identifier in iter {
            path = PathSegmentToken::with_next(*identifier, path);
        }
        path
    }

    #[test]
    fn test_invert_path_reverses_segments() {
        // Lexer order for "1/2/3": leaf 3 -> 2 -> 1.
        let path = leaf_first(&["3", "2", "1"]);
        assert_eq!(invert_path(&path).identifiers(), vec!["1", "2", "3"]);

        let single = PathSegmentToken::new("only");
        assert_eq!(invert_path(&single).identifiers(), vec!["only"]);
    }

    #[test]
    fn test_two_navigations_in_expand_path_rejected() {
        // "MyPeople/MyDog" arrives as MyDog -> MyPeople.
        let term = ExpandTermToken::new(leaf_first(&["MyDog", "MyPeople"]));
        let result = normalize_expand(&ExpandToken::new(vec![term]), LIMIT);
        assert_eq!(
            result,
            Err(BindError::MultipleNavigationInPath {
                identifier: "MyDog".into(),
            })
        );
    }

    #[test]
    fn test_cast_prefixed_expand_path_allowed() {
        let term = ExpandTermToken::new(leaf_first(&["MyDog", "NS.Employee"]));
        let normalized = normalize_expand(&ExpandToken::new(vec![term]), LIMIT).unwrap();
        assert_eq!(
            normalized.terms[0].path.identifiers(),
            vec!["NS.Employee", "MyDog"]
        );
    }

    #[test]
    fn test_combine_merges_same_path_terms() {
        let first = ExpandTermToken::new(PathSegmentToken::new("MyDog"))
            .with_expand(ExpandToken::new(vec![ExpandTermToken::new(
                PathSegmentToken::new("MyPeople"),
            )]))
            .with_top(3);
        let second = ExpandTermToken::new(PathSegmentToken::new("MyDog"))
            .with_expand(ExpandToken::new(vec![ExpandTermToken::new(
                PathSegmentToken::new("MyFriends"),
            )]))
            .with_top(7);

        let combined = combine_terms(vec![first, second]);
        assert_eq!(combined.len(), 1);
        // Children are unioned; the first term's $top wins.
        let children = combined[0].expand.as_ref().unwrap();
        assert_eq!(children.terms.len(), 2);
        assert_eq!(combined[0].top, Some(3));
    }

    #[test]
    fn test_combine_is_idempotent() {
        let term = ExpandTermToken::new(PathSegmentToken::new("MyDog")).with_expand(
            ExpandToken::new(vec![ExpandTermToken::new(PathSegmentToken::new(
                "MyPeople",
            ))]),
        );
        let once = combine_terms(vec![term.clone(), term.clone()]);
        let twice = combine_terms(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, vec![term]);
    }

    #[test]
    fn test_normalize_select_inverts_terms() {
        let select = SelectToken::new(vec![SelectTermToken::new(leaf_first(&[
            "Name",
            "NS.Employee",
        ]))]);
        let normalized = normalize_select(&select, LIMIT).unwrap();
        assert_eq!(
            normalized.terms[0].path.identifiers(),
            vec!["NS.Employee", "Name"]
        );
    }

    fn nested_expand(levels: usize) -> ExpandToken {
        let mut expand = ExpandToken::new(vec![ExpandTermToken::new(
            PathSegmentToken::new("MyDog"),
        )]);
        for _ in 1..levels {
            expand = ExpandToken::new(vec![
                ExpandTermToken::new(PathSegmentToken::new("MyDog")).with_expand(expand),
            ]);
        }
        expand
    }

    #[test]
    fn test_expand_nesting_past_limit_rejected() {
        assert!(normalize_expand(&nested_expand(4), 4).is_ok());
        assert_eq!(
            normalize_expand(&nested_expand(5), 4),
            Err(BindError::RecursionLimitReached { limit: 4 })
        );
    }

    #[test]
    fn test_select_nesting_past_limit_rejected() {
        let mut term = SelectTermToken::new(PathSegmentToken::new("MyDog"));
        term.expand = Some(nested_expand(6));
        let select = SelectToken::new(vec![term]);
        assert_eq!(
            normalize_select(&select, 4),
            Err(BindError::RecursionLimitReached { limit: 4 })
        );
    }
}
