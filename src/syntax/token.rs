//! Token variants for query expressions and the expand/select option trees.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Binary operators in query expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Modulo.
    Mod,
}

impl BinaryOperator {
    /// Returns the query-syntax spelling of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Eq => "eq",
            BinaryOperator::Ne => "ne",
            BinaryOperator::Gt => "gt",
            BinaryOperator::Ge => "ge",
            BinaryOperator::Lt => "lt",
            BinaryOperator::Le => "le",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
        }
    }

    /// Returns true for `and`/`or`.
    #[must_use]
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Returns true for `eq`/`ne`.
    #[must_use]
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Eq | BinaryOperator::Ne)
    }

    /// Returns true for `gt`/`ge`/`lt`/`le`.
    #[must_use]
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Gt | BinaryOperator::Ge | BinaryOperator::Lt | BinaryOperator::Le
        )
    }

    /// Returns true for the arithmetic operators.
    #[must_use]
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }
}

/// Unary operators in query expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Logical negation.
    Not,
    /// Arithmetic negation.
    Negate,
}

impl UnaryOperator {
    /// Returns the query-syntax spelling of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Negate => "-",
        }
    }
}

/// An untyped query expression token.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryToken {
    /// Raw literal with its original lexical text.
    Literal {
        /// Parsed literal value.
        value: Value,
        /// Original text in the query string.
        text: String,
    },
    /// Binary operator application.
    Binary {
        /// Operator kind.
        op: BinaryOperator,
        /// Left operand.
        left: Box<QueryToken>,
        /// Right operand.
        right: Box<QueryToken>,
    },
    /// Unary operator application.
    Unary {
        /// Operator kind.
        op: UnaryOperator,
        /// Operand.
        operand: Box<QueryToken>,
    },
    /// Terminal path segment (`Name` in `MyDog/Name`).
    EndPath {
        /// Segment identifier.
        identifier: String,
        /// Parent token, or the implicit range variable when absent.
        parent: Option<Box<QueryToken>>,
    },
    /// Non-terminal path segment, optionally carrying key values.
    InnerPath {
        /// Segment identifier.
        identifier: String,
        /// Parent token, or the implicit range variable when absent.
        parent: Option<Box<QueryToken>>,
        /// Named key values attached to the segment (`MyDogs(ID=3)`).
        key_values: Vec<(Option<String>, QueryToken)>,
    },
    /// Namespace-qualified segment: a type cast or a qualified function name.
    DottedIdentifier {
        /// Fully qualified identifier.
        identifier: String,
        /// Parent token, or the implicit range variable when absent.
        parent: Option<Box<QueryToken>>,
    },
    /// Function call with ordered arguments.
    FunctionCall {
        /// Function name (simple or qualified).
        name: String,
        /// Argument tokens.
        arguments: Vec<QueryToken>,
        /// Parent token for bound calls.
        parent: Option<Box<QueryToken>>,
    },
    /// `any` lambda over a collection source.
    Any {
        /// Range variable name; `None` for bare `any()`.
        parameter: Option<String>,
        /// Body predicate; `None` for bare `any()`.
        body: Option<Box<QueryToken>>,
        /// Source collection token.
        source: Box<QueryToken>,
    },
    /// `all` lambda over a collection source.
    All {
        /// Range variable name.
        parameter: String,
        /// Body predicate.
        body: Box<QueryToken>,
        /// Source collection token.
        source: Box<QueryToken>,
    },
    /// Reference to a range variable in scope (`$it`, lambda parameters).
    RangeVariable(String),
}

impl QueryToken {
    /// Creates a literal token.
    #[must_use]
    pub fn literal(value: Value, text: impl Into<String>) -> Self {
        QueryToken::Literal {
            value,
            text: text.into(),
        }
    }

    /// Creates a binary operator token.
    #[must_use]
    pub fn binary(op: BinaryOperator, left: QueryToken, right: QueryToken) -> Self {
        QueryToken::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a unary operator token.
    #[must_use]
    pub fn unary(op: UnaryOperator, operand: QueryToken) -> Self {
        QueryToken::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates an end-path token with no explicit parent.
    #[must_use]
    pub fn end_path(identifier: impl Into<String>) -> Self {
        QueryToken::EndPath {
            identifier: identifier.into(),
            parent: None,
        }
    }

    /// Creates an end-path token with a parent.
    #[must_use]
    pub fn end_path_on(identifier: impl Into<String>, parent: QueryToken) -> Self {
        QueryToken::EndPath {
            identifier: identifier.into(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Creates an inner-path token with no key values.
    #[must_use]
    pub fn inner_path(identifier: impl Into<String>, parent: Option<QueryToken>) -> Self {
        QueryToken::InnerPath {
            identifier: identifier.into(),
            parent: parent.map(Box::new),
            key_values: Vec::new(),
        }
    }
}

/// Sort direction for an order-by term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderByDirection {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

/// A single `$orderby` term: expression plus direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByToken {
    /// Expression to order by.
    pub expression: QueryToken,
    /// Sort direction.
    pub direction: OrderByDirection,
}

/// A select/expand path in leaf-first order: each segment points at its
/// parent segment via `next`. The normalizers invert this into root-first
/// order before binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegmentToken {
    /// Segment identifier (property, navigation, qualified type, or `*`).
    pub identifier: String,
    /// The parent segment, toward the path root.
    pub next: Option<Box<PathSegmentToken>>,
}

impl PathSegmentToken {
    /// Creates a root (single-segment) path.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        PathSegmentToken {
            identifier: identifier.into(),
            next: None,
        }
    }

    /// Creates a segment pointing at its parent.
    #[must_use]
    pub fn with_next(identifier: impl Into<String>, next: PathSegmentToken) -> Self {
        PathSegmentToken {
            identifier: identifier.into(),
            next: Some(Box::new(next)),
        }
    }

    /// Returns the number of segments in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 1;
        let mut current = self.next.as_deref();
        while let Some(segment) = current {
            count += 1;
            current = segment.next.as_deref();
        }
        count
    }

    /// Returns true if the path has exactly one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Collects identifiers in chain order (leaf-first before
    /// normalization, root-first after).
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = vec![self.identifier.as_str()];
        let mut current = self.next.as_deref();
        while let Some(segment) = current {
            out.push(segment.identifier.as_str());
            current = segment.next.as_deref();
        }
        out
    }
}

/// The `$select` option: a list of select terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectToken {
    /// Selected paths.
    pub terms: Vec<SelectTermToken>,
}

impl SelectToken {
    /// Creates a select token from paths.
    #[must_use]
    pub fn new(terms: Vec<SelectTermToken>) -> Self {
        SelectToken { terms }
    }
}

/// A single `$select` term: a path plus its nested query options.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectTermToken {
    /// Selected path, leaf-first until normalized.
    pub path: PathSegmentToken,
    /// Nested `$select`.
    pub select: Option<SelectToken>,
    /// Nested `$expand`.
    pub expand: Option<ExpandToken>,
    /// Nested `$filter`.
    pub filter: Option<QueryToken>,
    /// Nested `$orderby` terms.
    pub order_by: Vec<OrderByToken>,
    /// Nested `$top`.
    pub top: Option<i64>,
    /// Nested `$skip`.
    pub skip: Option<i64>,
    /// Nested `$count`.
    pub count: Option<bool>,
    /// Nested `$search`.
    pub search: Option<SearchToken>,
    /// Nested `$compute`.
    pub compute: Option<ComputeToken>,
}

impl SelectTermToken {
    /// Creates a select term with no nested options.
    #[must_use]
    pub fn new(path: PathSegmentToken) -> Self {
        SelectTermToken {
            path,
            select: None,
            expand: None,
            filter: None,
            order_by: Vec::new(),
            top: None,
            skip: None,
            count: None,
            search: None,
            compute: None,
        }
    }

    /// Sets the nested `$select`.
    #[must_use]
    pub fn with_select(mut self, select: SelectToken) -> Self {
        self.select = Some(select);
        self
    }

    /// Sets the nested `$filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: QueryToken) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the nested `$top`.
    #[must_use]
    pub fn with_top(mut self, top: i64) -> Self {
        self.top = Some(top);
        self
    }
}

/// The `$expand` option: a list of expand terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandToken {
    /// Expanded terms.
    pub terms: Vec<ExpandTermToken>,
}

impl ExpandToken {
    /// Creates an expand token from terms.
    #[must_use]
    pub fn new(terms: Vec<ExpandTermToken>) -> Self {
        ExpandToken { terms }
    }
}

/// A single `$expand` term: a path plus its nested query options.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandTermToken {
    /// Expanded path, leaf-first until normalized.
    pub path: PathSegmentToken,
    /// Nested `$select`.
    pub select: Option<SelectToken>,
    /// Nested `$expand`.
    pub expand: Option<ExpandToken>,
    /// Nested `$filter`.
    pub filter: Option<QueryToken>,
    /// Nested `$orderby` terms.
    pub order_by: Vec<OrderByToken>,
    /// Nested `$top`.
    pub top: Option<i64>,
    /// Nested `$skip`.
    pub skip: Option<i64>,
    /// Nested `$count`.
    pub count: Option<bool>,
    /// Nested `$search`.
    pub search: Option<SearchToken>,
    /// Nested `$levels`.
    pub levels: Option<LevelsToken>,
    /// Nested `$compute`.
    pub compute: Option<ComputeToken>,
}

impl ExpandTermToken {
    /// Creates an expand term with no nested options.
    #[must_use]
    pub fn new(path: PathSegmentToken) -> Self {
        ExpandTermToken {
            path,
            select: None,
            expand: None,
            filter: None,
            order_by: Vec::new(),
            top: None,
            skip: None,
            count: None,
            search: None,
            levels: None,
            compute: None,
        }
    }

    /// Sets the nested `$select`.
    #[must_use]
    pub fn with_select(mut self, select: SelectToken) -> Self {
        self.select = Some(select);
        self
    }

    /// Sets the nested `$expand`.
    #[must_use]
    pub fn with_expand(mut self, expand: ExpandToken) -> Self {
        self.expand = Some(expand);
        self
    }

    /// Sets the nested `$filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: QueryToken) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the nested `$top`.
    #[must_use]
    pub fn with_top(mut self, top: i64) -> Self {
        self.top = Some(top);
        self
    }
}

/// A `$search` expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchToken {
    /// A search word or quoted phrase.
    Term(String),
    /// Conjunction.
    And(Box<SearchToken>, Box<SearchToken>),
    /// Disjunction.
    Or(Box<SearchToken>, Box<SearchToken>),
    /// Negation.
    Not(Box<SearchToken>),
}

/// The `$levels` option on an expand term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelsToken {
    /// `$levels=max`.
    Max,
    /// `$levels=<n>`.
    Count(i64),
}

/// The `$compute` option: computed aliases.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeToken {
    /// Computed items.
    pub items: Vec<ComputeItemToken>,
}

/// One `expression as alias` compute item.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeItemToken {
    /// Expression to compute.
    pub expression: QueryToken,
    /// Alias the result is exposed under.
    pub alias: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_len_and_identifiers() {
        // "3/2/1" as the lexer produces it: leaf 3 points at 2 points at 1.
        let path = PathSegmentToken::with_next(
            "3",
            PathSegmentToken::with_next("2", PathSegmentToken::new("1")),
        );
        assert_eq!(path.len(), 3);
        assert_eq!(path.identifiers(), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_operator_classification() {
        assert!(BinaryOperator::And.is_logical());
        assert!(BinaryOperator::Eq.is_equality());
        assert!(BinaryOperator::Le.is_relational());
        assert!(BinaryOperator::Mod.is_arithmetic());
        assert!(!BinaryOperator::Add.is_relational());
    }
}
