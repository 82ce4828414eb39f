//! Structured types, properties, operations, and the model registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ODataError, Result};
use crate::types::TypeRef;

/// Central registry of all structured types, bound operations, and entity
/// sets known to the binder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Structured types by qualified name.
    types: HashMap<String, StructuredType>,
    /// Bound operations, in declaration order (names may be overloaded).
    operations: Vec<BoundOperation>,
    /// Entity sets by name.
    entity_sets: HashMap<String, EntitySet>,
}

impl Model {
    /// Creates a new empty model.
    #[must_use]
    pub fn new() -> Self {
        Model {
            types: HashMap::new(),
            operations: Vec::new(),
            entity_sets: HashMap::new(),
        }
    }

    /// Registers a structured type.
    ///
    /// # Errors
    ///
    /// Returns an error if a type with the same qualified name already exists.
    pub fn add_type(&mut self, ty: StructuredType) -> Result<()> {
        if self.types.contains_key(&ty.qualified_name) {
            return Err(ODataError::Model(format!(
                "Type '{}' already exists",
                ty.qualified_name
            )));
        }
        self.types.insert(ty.qualified_name.clone(), ty);
        Ok(())
    }

    /// Registers a bound operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding type is not declared in the model.
    pub fn add_operation(&mut self, operation: BoundOperation) -> Result<()> {
        if !self.types.contains_key(&operation.binding_type) {
            return Err(ODataError::Model(format!(
                "Operation '{}' binds to undeclared type '{}'",
                operation.qualified_name, operation.binding_type
            )));
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Registers an entity set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set name is taken or the element type is not
    /// declared in the model.
    pub fn add_entity_set(&mut self, set: EntitySet) -> Result<()> {
        if self.entity_sets.contains_key(&set.name) {
            return Err(ODataError::Model(format!(
                "Entity set '{}' already exists",
                set.name
            )));
        }
        if !self.types.contains_key(&set.element_type) {
            return Err(ODataError::Model(format!(
                "Entity set '{}' has undeclared element type '{}'",
                set.name, set.element_type
            )));
        }
        self.entity_sets.insert(set.name.clone(), set);
        Ok(())
    }

    /// Retrieves a structured type by qualified name.
    #[must_use]
    pub fn get_type(&self, qualified_name: &str) -> Option<&StructuredType> {
        self.types.get(qualified_name)
    }

    /// Retrieves a structured type by qualified name, optionally ignoring
    /// case.
    #[must_use]
    pub fn find_type(&self, qualified_name: &str, case_insensitive: bool) -> Option<&StructuredType> {
        if let Some(ty) = self.types.get(qualified_name) {
            return Some(ty);
        }
        if case_insensitive {
            return self
                .types
                .values()
                .find(|t| t.qualified_name.eq_ignore_ascii_case(qualified_name));
        }
        None
    }

    /// Retrieves an entity set by name.
    #[must_use]
    pub fn get_entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.get(name)
    }

    /// Returns true if `candidate` is the same type as `ancestor` or derives
    /// from it through the base-type chain.
    #[must_use]
    pub fn is_or_derives_from(&self, candidate: &str, ancestor: &str) -> bool {
        let mut current = Some(candidate);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self
                .types
                .get(name)
                .and_then(|t| t.base_type.as_deref());
        }
        false
    }

    /// Returns true if the two types are related in either direction of the
    /// hierarchy (cast target must be an ancestor or a descendant).
    #[must_use]
    pub fn in_same_hierarchy(&self, a: &str, b: &str) -> bool {
        self.is_or_derives_from(a, b) || self.is_or_derives_from(b, a)
    }

    /// Looks up a declared structural property, walking the base-type chain.
    #[must_use]
    pub fn find_property(
        &self,
        type_name: &str,
        property: &str,
        case_insensitive: bool,
    ) -> Option<&StructuralProperty> {
        let mut current = Some(type_name);
        while let Some(name) = current {
            let ty = self.types.get(name)?;
            if let Some(found) = ty.property(property, case_insensitive) {
                return Some(found);
            }
            current = ty.base_type.as_deref();
        }
        None
    }

    /// Looks up a declared navigation property, walking the base-type chain.
    #[must_use]
    pub fn find_navigation(
        &self,
        type_name: &str,
        property: &str,
        case_insensitive: bool,
    ) -> Option<&NavigationProperty> {
        let mut current = Some(type_name);
        while let Some(name) = current {
            let ty = self.types.get(name)?;
            if let Some(found) = ty.navigation(property, case_insensitive) {
                return Some(found);
            }
            current = ty.base_type.as_deref();
        }
        None
    }

    /// Finds bound operations applicable to `binding_type` whose simple or
    /// qualified name matches `name`. The binding type matches when it is the
    /// declared binding type or derives from it.
    #[must_use]
    pub fn find_bound_operations(
        &self,
        binding_type: &str,
        name: &str,
        case_insensitive: bool,
    ) -> Vec<&BoundOperation> {
        self.operations
            .iter()
            .filter(|op| {
                let name_matches = if case_insensitive {
                    op.qualified_name.eq_ignore_ascii_case(name)
                        || op.simple_name().eq_ignore_ascii_case(name)
                } else {
                    op.qualified_name == name || op.simple_name() == name
                };
                name_matches && self.is_or_derives_from(binding_type, &op.binding_type)
            })
            .collect()
    }

    /// Returns the key properties of a structured type, resolving each key
    /// name against the declared properties (base types included).
    #[must_use]
    pub fn key_properties(&self, type_name: &str) -> Vec<&StructuralProperty> {
        let Some(ty) = self.types.get(type_name) else {
            return Vec::new();
        };
        ty.key
            .iter()
            .filter_map(|name| self.find_property(type_name, name, false))
            .collect()
    }
}

/// A structured (entity or complex) type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredType {
    /// Namespace-qualified type name.
    pub qualified_name: String,
    /// Qualified name of the base type, if any.
    pub base_type: Option<String>,
    /// Whether undeclared (dynamic) properties are admissible.
    pub is_open: bool,
    /// Declared structural properties.
    pub properties: Vec<StructuralProperty>,
    /// Declared navigation properties.
    pub navigation_properties: Vec<NavigationProperty>,
    /// Names of the key properties (entity types only).
    pub key: Vec<String>,
}

impl StructuredType {
    /// Creates a closed structured type with no base type.
    #[must_use]
    pub fn new(qualified_name: impl Into<String>) -> Self {
        StructuredType {
            qualified_name: qualified_name.into(),
            base_type: None,
            is_open: false,
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            key: Vec::new(),
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_base_type(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    /// Marks the type open.
    #[must_use]
    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    /// Adds a structural property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.properties.push(StructuralProperty {
            name: name.into(),
            type_ref,
        });
        self
    }

    /// Adds a navigation property.
    #[must_use]
    pub fn with_navigation(
        mut self,
        name: impl Into<String>,
        target_type: impl Into<String>,
        is_collection: bool,
    ) -> Self {
        self.navigation_properties.push(NavigationProperty {
            name: name.into(),
            target_type: target_type.into(),
            is_collection,
            nullable: !is_collection,
        });
        self
    }

    /// Declares the key property names.
    #[must_use]
    pub fn with_key(mut self, key: Vec<String>) -> Self {
        self.key = key;
        self
    }

    /// Entity types declare a key; complex types do not.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        !self.key.is_empty()
    }

    /// Finds a declared structural property on this type only.
    #[must_use]
    pub fn property(&self, name: &str, case_insensitive: bool) -> Option<&StructuralProperty> {
        self.properties.iter().find(|p| {
            if case_insensitive {
                p.name.eq_ignore_ascii_case(name)
            } else {
                p.name == name
            }
        })
    }

    /// Finds a declared navigation property on this type only.
    #[must_use]
    pub fn navigation(&self, name: &str, case_insensitive: bool) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|p| {
            if case_insensitive {
                p.name.eq_ignore_ascii_case(name)
            } else {
                p.name == name
            }
        })
    }
}

/// A declared structural property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralProperty {
    /// Property name.
    pub name: String,
    /// Property type.
    pub type_ref: TypeRef,
}

/// A declared navigation property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationProperty {
    /// Property name.
    pub name: String,
    /// Qualified name of the target entity type.
    pub target_type: String,
    /// Whether the target is a collection.
    pub is_collection: bool,
    /// Whether a single-valued target may be null.
    pub nullable: bool,
}

impl NavigationProperty {
    /// Returns the type reference of the navigation target.
    #[must_use]
    pub fn target_type_ref(&self) -> TypeRef {
        let element = TypeRef::structured(self.target_type.clone());
        if self.is_collection {
            TypeRef::collection(element)
        } else {
            element.with_nullable(self.nullable)
        }
    }
}

/// An operation (action or function) bound to a structured type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundOperation {
    /// Namespace-qualified operation name.
    pub qualified_name: String,
    /// Qualified name of the type the operation binds to.
    pub binding_type: String,
    /// Parameter types after the binding parameter.
    pub parameter_types: Vec<TypeRef>,
    /// Return type, if any.
    pub return_type: Option<TypeRef>,
    /// True for functions, false for actions.
    pub is_function: bool,
}

impl BoundOperation {
    /// Returns the unqualified operation name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// A navigation source holding entities of one declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    /// Set name.
    pub name: String,
    /// Qualified name of the element entity type.
    pub element_type: String,
}

impl EntitySet {
    /// Creates a new entity set.
    #[must_use]
    pub fn new(name: impl Into<String>, element_type: impl Into<String>) -> Self {
        EntitySet {
            name: name.into(),
            element_type: element_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn model_with_hierarchy() -> Model {
        let mut model = Model::new();
        model
            .add_type(
                StructuredType::new("NS.Animal")
                    .with_property("ID", TypeRef::primitive(PrimitiveKind::Int32))
                    .with_key(vec!["ID".into()]),
            )
            .unwrap();
        model
            .add_type(
                StructuredType::new("NS.Dog")
                    .with_base_type("NS.Animal")
                    .with_property("Color", TypeRef::primitive(PrimitiveKind::String)),
            )
            .unwrap();
        model
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut model = model_with_hierarchy();
        let result = model.add_type(StructuredType::new("NS.Dog"));
        assert!(result.is_err());
    }

    #[test]
    fn test_derived_lookup_walks_base_chain() {
        let model = model_with_hierarchy();
        // ID is declared on the base type but visible from the derived one.
        let prop = model.find_property("NS.Dog", "ID", false).unwrap();
        assert_eq!(prop.name, "ID");
        assert!(model.is_or_derives_from("NS.Dog", "NS.Animal"));
        assert!(!model.is_or_derives_from("NS.Animal", "NS.Dog"));
        assert!(model.in_same_hierarchy("NS.Animal", "NS.Dog"));
    }

    #[test]
    fn test_case_insensitive_property_lookup() {
        let model = model_with_hierarchy();
        assert!(model.find_property("NS.Dog", "color", false).is_none());
        assert!(model.find_property("NS.Dog", "color", true).is_some());
    }

    #[test]
    fn test_key_properties_resolved() {
        let model = model_with_hierarchy();
        let keys = model.key_properties("NS.Animal");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "ID");
        assert!(model.get_type("NS.Animal").unwrap().is_entity());
        assert!(!model.get_type("NS.Dog").unwrap().is_entity());
    }

    #[test]
    fn test_bound_operation_matches_ancestor_binding() {
        let mut model = model_with_hierarchy();
        model
            .add_operation(BoundOperation {
                qualified_name: "NS.Describe".into(),
                binding_type: "NS.Animal".into(),
                parameter_types: vec![],
                return_type: Some(TypeRef::primitive(PrimitiveKind::String)),
                is_function: true,
            })
            .unwrap();
        // Bound to the base type, callable on the derived type.
        let found = model.find_bound_operations("NS.Dog", "NS.Describe", false);
        assert_eq!(found.len(), 1);
        let found = model.find_bound_operations("NS.Dog", "Describe", false);
        assert_eq!(found.len(), 1);
    }
}
