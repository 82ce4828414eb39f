//! Finishing pass over a bound select/expand clause.

use super::clause::{PathSelectItem, SelectExpandClause, SelectItem, SelectPathSegment};

/// Adds an explicit path item for every expanded navigation of a clause
/// with an explicit selection, so the expansion survives the projection.
/// Clauses selecting everything are left alone. Nested clauses are fixed
/// up recursively. Running the pass twice adds nothing.
pub fn add_explicit_nav_links(clause: &mut SelectExpandClause) {
    for item in &mut clause.items {
        if let SelectItem::ExpandedNavigation(expanded) = item {
            add_explicit_nav_links(&mut expanded.select_expand);
        }
    }
    if clause.all_selected {
        return;
    }

    let mut additions: Vec<PathSelectItem> = Vec::new();
    for item in &clause.items {
        let SelectItem::ExpandedNavigation(expanded) = item else {
            continue;
        };
        let present = clause.items.iter().any(|existing| {
            matches!(existing, SelectItem::Path(p) if paths_equal(&p.path, &expanded.path))
        }) || additions.iter().any(|p| paths_equal(&p.path, &expanded.path));
        if !present {
            additions.push(PathSelectItem::new(expanded.path.clone()));
        }
    }
    for addition in additions {
        clause.items.push(SelectItem::Path(addition));
    }
}

fn paths_equal(a: &[SelectPathSegment], b: &[SelectPathSegment]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name() == y.name())
}
