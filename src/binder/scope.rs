//! Binding scope: the range-variable stack.

use crate::types::TypeRef;

use super::bound::BoundNode;
use super::BindError;

/// A named, scoped binding to an element of a collection: the implicit
/// current item (`$it`) or a lambda loop variable.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeVariable {
    /// Variable name.
    pub name: String,
    /// Declared element type of the variable.
    pub type_ref: TypeRef,
    /// The collection node the variable ranges over, when known.
    pub source: Option<Box<BoundNode>>,
}

impl RangeVariable {
    /// Creates a range variable without a source node.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        RangeVariable {
            name: name.into(),
            type_ref,
            source: None,
        }
    }

    /// Creates a range variable ranging over `source`.
    #[must_use]
    pub fn with_source(name: impl Into<String>, type_ref: TypeRef, source: BoundNode) -> Self {
        RangeVariable {
            name: name.into(),
            type_ref,
            source: Some(Box::new(source)),
        }
    }
}

/// Variable scope for name resolution during binding.
///
/// The stack grows when a lambda body is entered and shrinks when it is
/// left. There is no implicit cleanup: callers must pop after binding a
/// lambda body even on early failure. Lookup is last-pushed-wins, with the
/// implicit range variable as the outermost fallback.
#[derive(Debug, Clone, Default)]
pub struct BindingScope {
    /// Lambda range variables, innermost last.
    stack: Vec<RangeVariable>,
    /// The implicit range variable of the top-level bind.
    implicit: Option<RangeVariable>,
}

impl BindingScope {
    /// Creates a new empty scope.
    #[must_use]
    pub fn new() -> Self {
        BindingScope {
            stack: Vec::new(),
            implicit: None,
        }
    }

    /// Establishes the implicit range variable. Exactly one exists per
    /// top-level bind.
    pub fn set_implicit(&mut self, variable: RangeVariable) {
        self.implicit = Some(variable);
    }

    /// Returns the implicit range variable, if established.
    #[must_use]
    pub fn implicit(&self) -> Option<&RangeVariable> {
        self.implicit.as_ref()
    }

    /// Pushes a lambda range variable.
    pub fn push_range_variable(&mut self, variable: RangeVariable) {
        self.stack.push(variable);
    }

    /// Pops the innermost lambda range variable.
    pub fn pop_range_variable(&mut self) -> Option<RangeVariable> {
        self.stack.pop()
    }

    /// Looks up a range variable by name, innermost first, falling back to
    /// the implicit variable.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::ParameterNotInScope`] if no variable with the
    /// given name is visible.
    pub fn lookup(&self, name: &str) -> Result<&RangeVariable, BindError> {
        self.stack
            .iter()
            .rev()
            .find(|v| v.name == name)
            .or(match &self.implicit {
                Some(implicit) if implicit.name == name => Some(implicit),
                _ => None,
            })
            .ok_or_else(|| BindError::ParameterNotInScope(name.to_string()))
    }

    /// Returns the number of lambda variables currently pushed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
