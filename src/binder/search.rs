//! `$search` binder.
//!
//! Search terms are free text, so there is nothing to resolve against the
//! model; binding is a structural lowering of the token tree.

use crate::syntax::SearchToken;

/// A bound `$search` expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchNode {
    /// A search word or quoted phrase.
    Term(String),
    /// Both operands must match.
    And(Box<SearchNode>, Box<SearchNode>),
    /// Either operand must match.
    Or(Box<SearchNode>, Box<SearchNode>),
    /// The operand must not match.
    Not(Box<SearchNode>),
}

/// A bound `$search` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    /// The search expression.
    pub expression: SearchNode,
}

/// Lowers a search token tree into its bound form.
#[must_use]
pub fn bind_search(token: &SearchToken) -> SearchClause {
    SearchClause {
        expression: lower(token),
    }
}

fn lower(token: &SearchToken) -> SearchNode {
    match token {
        SearchToken::Term(term) => SearchNode::Term(term.clone()),
        SearchToken::And(left, right) => {
            SearchNode::And(Box::new(lower(left)), Box::new(lower(right)))
        }
        SearchToken::Or(left, right) => {
            SearchNode::Or(Box::new(lower(left)), Box::new(lower(right)))
        }
        SearchToken::Not(operand) => SearchNode::Not(Box::new(lower(operand))),
    }
}
