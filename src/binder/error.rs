//! Errors that can occur during binding.

use thiserror::Error;

/// Errors that can occur during binding.
///
/// Every variant carries the identifiers, type names, or operator involved,
/// so a failure renders a precise user-facing message. Binding never
/// recovers internally: a failure anywhere in a subtree surfaces to the
/// caller of the top-level bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Referenced a range variable that is not in scope.
    #[error("Parameter '{0}' is not in scope")]
    ParameterNotInScope(String),

    /// A collection-valued expression where a single value is required.
    #[error("The operand of '{operator}' must evaluate to a single value")]
    OperandNotSingleValue {
        /// Operator or function the operand belongs to.
        operator: String,
    },

    /// Operand types that no promotion brings together.
    #[error("Operator '{op}' has incompatible operand types '{left}' and '{right}'")]
    IncompatibleOperands {
        /// Operator spelling.
        op: String,
        /// Left operand type name.
        left: String,
        /// Right operand type name.
        right: String,
    },

    /// A value of one type where an unrelated type is required.
    #[error("Cannot convert from type '{from}' to type '{to}'")]
    CannotConvertToType {
        /// Source type name.
        from: String,
        /// Target type name.
        to: String,
    },

    /// Identifier that resolves to nothing on a closed type.
    #[error("Property '{property}' is not declared on type '{type_name}' and the type is not open")]
    PropertyNotDeclared {
        /// Declaring type name.
        type_name: String,
        /// Unresolved identifier.
        property: String,
    },

    /// A parentless property access with no implicit range variable.
    #[error("A property access requires a parent; no implicit range variable is in scope")]
    PropertyAccessWithoutParent,

    /// A path segment whose source is not a single resource.
    #[error("The source of the path segment '{property}' must be a single resource")]
    PropertyAccessSourceNotSingleValue {
        /// Segment identifier.
        property: String,
    },

    /// A type cast outside the parent's type hierarchy.
    #[error("Type '{type_name}' is not in the hierarchy of type '{parent}'")]
    HierarchyNotFollowed {
        /// Requested cast target.
        type_name: String,
        /// Parent type name.
        parent: String,
    },

    /// A type cast applied to a value whose type is not declared.
    #[error("Cannot cast an open (dynamically typed) value to type '{type_name}'")]
    TypeCastOnOpenProperty {
        /// Requested cast target.
        type_name: String,
    },

    /// A function name with no known signature.
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name.
        name: String,
    },

    /// Overload resolution found zero or more than one applicable signature.
    #[error("No applicable function found for '{name}' with the given arguments; candidate signatures: {candidates}")]
    NoApplicableFunctionFound {
        /// Function name.
        name: String,
        /// Rendered candidate signature list.
        candidates: String,
    },

    /// An unbound (built-in) function called through a parent expression.
    #[error("Function '{name}' is unbound and must be called without a parent expression")]
    FunctionMustBeCalledWithoutParent {
        /// Function name.
        name: String,
    },

    /// `cast`/`isof` called with the wrong number of arguments.
    #[error("'{name}' requires exactly one or two arguments")]
    CastArgumentCount {
        /// `cast` or `isof`.
        name: String,
    },

    /// `cast`/`isof` whose last argument is not a type-name literal.
    #[error("The last argument of 'cast' and 'isof' must be a type name literal")]
    CastMissingTypeArgument,

    /// `cast`/`isof` applied to or targeting a collection.
    #[error("'cast' and 'isof' are not supported for collection types")]
    CastCollectionsNotSupported,

    /// `any`/`all` over a non-collection source.
    #[error("The source of an any/all expression must be a collection")]
    LambdaParentMustBeCollection,

    /// `any`/`all` body that is not a single boolean value.
    #[error("The body of an any/all expression must be a single boolean value")]
    LambdaBodyNotBoolean,

    /// An expand path traversing more than one navigation property.
    #[error("The path segment '{identifier}' traverses more than one navigation property in a single path")]
    MultipleNavigationInPath {
        /// Second navigation identifier in the path.
        identifier: String,
    },

    /// A select/expand path longer than the configured maximum.
    #[error("The path is too deep; the maximum depth is {limit}")]
    PathTooDeep {
        /// Configured maximum depth.
        limit: usize,
    },

    /// A non-type identifier where a type cast segment was expected.
    #[error("Found '{identifier}' where a type segment was expected")]
    FollowNonTypeSegment {
        /// Offending identifier.
        identifier: String,
    },

    /// The defensive recursion bound was hit while binding.
    #[error("Recursion limit of {limit} reached while binding the query")]
    RecursionLimitReached {
        /// Configured maximum depth.
        limit: usize,
    },

    /// An unnamed key value against a type with a compound key.
    #[error("An unnamed key value is only allowed when type '{type_name}' has exactly one key property")]
    UnnamedKeyOnMultiKeyType {
        /// Element type name.
        type_name: String,
    },

    /// A key lookup missing one of the declared key properties.
    #[error("Key property '{property}' of type '{type_name}' was not supplied")]
    MissingKeyProperty {
        /// Element type name.
        type_name: String,
        /// Missing key property name.
        property: String,
    },

    /// A key lookup supplying the same key property more than once.
    #[error("Key property '{property}' of type '{type_name}' was supplied more than once")]
    DuplicateKeyProperty {
        /// Element type name.
        type_name: String,
        /// Repeated key property name.
        property: String,
    },

    /// A negative value for a query option that requires a non-negative
    /// integer.
    #[error("The value '{text}' for query option '{option}' requires a non-negative integer")]
    NegativeQueryOption {
        /// Query option name (`$skip`, `$top`, `$levels`).
        option: String,
        /// Offending literal text.
        text: String,
    },
}
