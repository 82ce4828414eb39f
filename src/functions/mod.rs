//! Canonical function signatures and the custom-function registry.
//!
//! Built-in signatures are a fixed table. Custom signatures live behind a
//! lock because the registry is process-wide shared state: one query may
//! register or remove signatures while another resolves overloads. Lookups
//! return an owned snapshot of builtin ∪ custom signatures so resolution
//! never observes a half-applied update.

mod builtin;

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::TypeRef;

pub use builtin::builtin_signatures;

/// An immutable function signature: ordered parameter types plus return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// Ordered parameter types.
    pub parameter_types: Vec<TypeRef>,
    /// Return type.
    pub return_type: TypeRef,
}

impl FunctionSignature {
    /// Creates a new signature.
    #[must_use]
    pub fn new(parameter_types: Vec<TypeRef>, return_type: TypeRef) -> Self {
        FunctionSignature {
            parameter_types,
            return_type,
        }
    }
}

impl std::fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name())?;
        }
        write!(f, ") -> {}", self.return_type.name())
    }
}

/// Registry of callable function signatures: the fixed built-in table plus
/// mutable custom registrations.
#[derive(Debug)]
pub struct FunctionRegistry {
    /// Built-in signatures by function name.
    builtin: HashMap<&'static str, Vec<FunctionSignature>>,
    /// Custom signatures by function name.
    custom: RwLock<HashMap<String, Vec<FunctionSignature>>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Creates a registry with the canonical built-in functions.
    #[must_use]
    pub fn new() -> Self {
        FunctionRegistry {
            builtin: builtin_signatures(),
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with no built-in functions. Useful for tests that
    /// need full control over resolution candidates.
    #[must_use]
    pub fn empty() -> Self {
        FunctionRegistry {
            builtin: HashMap::new(),
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a custom signature under `name`.
    pub fn register(&self, name: impl Into<String>, signature: FunctionSignature) {
        self.custom
            .write()
            .entry(name.into())
            .or_default()
            .push(signature);
    }

    /// Removes every custom signature registered under `name`. Returns true
    /// if anything was removed. Built-in signatures are never removed.
    pub fn unregister(&self, name: &str) -> bool {
        self.custom.write().remove(name).is_some()
    }

    /// Returns a point-in-time snapshot of all signatures for `name`,
    /// built-in first, then custom in registration order.
    #[must_use]
    pub fn signatures(&self, name: &str) -> Vec<FunctionSignature> {
        let mut out: Vec<FunctionSignature> = self
            .builtin
            .get(name)
            .cloned()
            .unwrap_or_default();
        if let Some(custom) = self.custom.read().get(name) {
            out.extend(custom.iter().cloned());
        }
        out
    }

    /// Returns true if any signature (built-in or custom) exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.builtin.contains_key(name) || self.custom.read().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn test_builtin_substring_overloads() {
        let registry = FunctionRegistry::new();
        let sigs = registry.signatures("substring");
        assert_eq!(sigs.len(), 2);
    }

    #[test]
    fn test_custom_registration_and_removal() {
        let registry = FunctionRegistry::empty();
        assert!(!registry.contains("shout"));

        registry.register(
            "shout",
            FunctionSignature::new(
                vec![TypeRef::primitive(PrimitiveKind::String)],
                TypeRef::primitive(PrimitiveKind::String),
            ),
        );
        assert!(registry.contains("shout"));
        assert_eq!(registry.signatures("shout").len(), 1);

        assert!(registry.unregister("shout"));
        assert!(!registry.unregister("shout"));
        assert!(registry.signatures("shout").is_empty());
    }

    #[test]
    fn test_custom_extends_builtin() {
        let registry = FunctionRegistry::new();
        let before = registry.signatures("concat").len();
        registry.register(
            "concat",
            FunctionSignature::new(
                vec![
                    TypeRef::primitive(PrimitiveKind::String),
                    TypeRef::primitive(PrimitiveKind::String),
                    TypeRef::primitive(PrimitiveKind::String),
                ],
                TypeRef::primitive(PrimitiveKind::String),
            ),
        );
        assert_eq!(registry.signatures("concat").len(), before + 1);
        // Unregistering custom signatures leaves builtins intact.
        registry.unregister("concat");
        assert_eq!(registry.signatures("concat").len(), before);
    }

    #[test]
    fn test_snapshot_is_owned() {
        let registry = FunctionRegistry::new();
        let snapshot = registry.signatures("length");
        registry.register(
            "length",
            FunctionSignature::new(vec![], TypeRef::primitive(PrimitiveKind::Int32)),
        );
        // The earlier snapshot does not see the later registration.
        assert_eq!(snapshot.len(), 1);
    }
}
