//! Binding context: everything a bind call threads through its recursion.

use crate::functions::FunctionRegistry;
use crate::model::Model;

use super::scope::BindingScope;
use super::BindError;

/// Configuration for a binder.
#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Maximum select/expand path depth and defensive recursion bound
    /// (default: 32).
    pub max_depth: usize,
    /// Resolve identifiers ignoring ASCII case (default: false).
    pub case_insensitive: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            case_insensitive: false,
        }
    }
}

/// Per-query binding context: model, function registry, configuration, the
/// range-variable scope, and the recursion depth watermark.
///
/// A context is exclusively owned by the bind call that created it and is
/// discarded when the top-level bind returns.
#[derive(Debug)]
pub struct BindingContext<'a> {
    /// The structural type model.
    pub model: &'a Model,
    /// Function signature registry.
    pub registry: &'a FunctionRegistry,
    /// Binder configuration.
    pub config: &'a BinderConfig,
    /// Range-variable scope.
    pub scope: BindingScope,
    /// Current recursion depth of the dispatcher.
    depth: usize,
}

impl<'a> BindingContext<'a> {
    /// Creates a context with an empty scope.
    #[must_use]
    pub fn new(model: &'a Model, registry: &'a FunctionRegistry, config: &'a BinderConfig) -> Self {
        BindingContext {
            model,
            registry,
            config,
            scope: BindingScope::new(),
            depth: 0,
        }
    }

    /// Records one level of dispatcher recursion.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::RecursionLimitReached`] past the configured
    /// maximum depth.
    pub fn descend(&mut self) -> Result<(), BindError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(BindError::RecursionLimitReached {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// Leaves one level of dispatcher recursion.
    pub fn ascend(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }
}
