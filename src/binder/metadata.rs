//! The dispatching binder: routes each token variant to its sub-binder and
//! exposes the top-level query entry point.

use crate::error::{ODataError, Result};
use crate::functions::FunctionRegistry;
use crate::model::Model;
use crate::syntax::{
    ComputeToken, ExpandToken, OrderByToken, QueryToken, SearchToken, SelectToken,
};
use crate::types::{PrimitiveKind, TypeRef};

use super::bound::{BoundNode, FilterClause, LambdaKind, OrderByClause};
use super::compute::{self, ComputeClause};
use super::context::{BinderConfig, BindingContext};
use super::scope::RangeVariable;
use super::search::{self, SearchClause};
use super::select_expand::{add_explicit_nav_links, SelectExpandBinder, SelectExpandClause};
use super::{function, lambda, literal, operator, orderby, path, BindError};

/// Binds one expression token, dispatching on its variant.
///
/// Every recursive bind goes through here, so the depth guard sees the
/// whole tree.
///
/// # Errors
///
/// Fails when the token violates any binding rule, or the recursion limit
/// is reached.
pub fn bind_token(
    ctx: &mut BindingContext<'_>,
    token: &QueryToken,
) -> std::result::Result<BoundNode, BindError> {
    ctx.descend()?;
    let result = dispatch(ctx, token);
    ctx.ascend();
    result
}

fn dispatch(
    ctx: &mut BindingContext<'_>,
    token: &QueryToken,
) -> std::result::Result<BoundNode, BindError> {
    match token {
        QueryToken::Literal { value, .. } => Ok(literal::bind_literal(value)),
        QueryToken::Binary { op, left, right } => operator::bind_binary(ctx, *op, left, right),
        QueryToken::Unary { op, operand } => operator::bind_unary(ctx, *op, operand),
        QueryToken::EndPath { identifier, parent } => {
            path::bind_end_path(ctx, identifier, parent.as_deref())
        }
        QueryToken::InnerPath {
            identifier,
            parent,
            key_values,
        } => path::bind_inner_path(ctx, identifier, parent.as_deref(), key_values),
        QueryToken::DottedIdentifier { identifier, parent } => {
            path::bind_dotted_identifier(ctx, identifier, parent.as_deref())
        }
        QueryToken::FunctionCall {
            name,
            arguments,
            parent,
        } => function::bind_function_call(ctx, name, arguments, parent.as_deref()),
        QueryToken::Any {
            parameter,
            body,
            source,
        } => lambda::bind_lambda(
            ctx,
            LambdaKind::Any,
            parameter.as_deref(),
            body.as_deref(),
            source,
        ),
        QueryToken::All {
            parameter,
            body,
            source,
        } => lambda::bind_lambda(
            ctx,
            LambdaKind::All,
            Some(parameter.as_str()),
            Some(body.as_ref()),
            source,
        ),
        QueryToken::RangeVariable(name) => {
            let variable = ctx.scope.lookup(name)?;
            Ok(BoundNode::RangeVariableReference {
                name: variable.name.clone(),
                type_ref: variable.type_ref.clone(),
            })
        }
    }
}

/// Binds a `$filter` token into a clause. The expression must be a single
/// boolean value; an untyped expression is wrapped in a conversion to
/// nullable boolean.
pub(super) fn bind_filter(
    ctx: &mut BindingContext<'_>,
    token: &QueryToken,
) -> std::result::Result<FilterClause, BindError> {
    let expression = bind_token(ctx, token)?;
    if expression.is_collection() {
        return Err(BindError::OperandNotSingleValue {
            operator: "$filter".to_string(),
        });
    }
    let expression = if expression.is_untyped() {
        BoundNode::convert(
            expression,
            TypeRef::nullable_primitive(PrimitiveKind::Boolean),
        )
    } else if expression.primitive_kind() == Some(PrimitiveKind::Boolean) {
        expression
    } else {
        return Err(BindError::CannotConvertToType {
            from: expression.type_ref().map_or_else(String::new, |t| t.name()),
            to: PrimitiveKind::Boolean.name().to_string(),
        });
    };
    let range_variable = ctx
        .scope
        .implicit()
        .map_or_else(|| "$it".to_string(), |v| v.name.clone());
    Ok(FilterClause {
        expression,
        range_variable,
    })
}

/// Validates a `$skip` value.
///
/// # Errors
///
/// Fails when the value is negative.
pub fn process_skip(skip: Option<i64>) -> std::result::Result<Option<i64>, BindError> {
    validate_non_negative("$skip", skip)
}

/// Validates a `$top` value.
///
/// # Errors
///
/// Fails when the value is negative.
pub fn process_top(top: Option<i64>) -> std::result::Result<Option<i64>, BindError> {
    validate_non_negative("$top", top)
}

fn validate_non_negative(
    option: &str,
    value: Option<i64>,
) -> std::result::Result<Option<i64>, BindError> {
    match value {
        Some(v) if v < 0 => Err(BindError::NegativeQueryOption {
            option: option.to_string(),
            text: v.to_string(),
        }),
        other => Ok(other),
    }
}

/// The raw query options of one request, as the parser produces them.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// `$filter` expression.
    pub filter: Option<QueryToken>,
    /// `$orderby` terms.
    pub order_by: Vec<OrderByToken>,
    /// `$select` paths.
    pub select: Option<SelectToken>,
    /// `$expand` terms.
    pub expand: Option<ExpandToken>,
    /// `$search` expression.
    pub search: Option<SearchToken>,
    /// `$compute` items.
    pub compute: Option<ComputeToken>,
    /// `$skip` value.
    pub skip: Option<i64>,
    /// `$top` value.
    pub top: Option<i64>,
    /// `$count` value.
    pub count: Option<bool>,
}

/// All bound query options of one request.
#[derive(Debug, Clone)]
pub struct BoundQuery {
    /// Bound `$filter`.
    pub filter: Option<FilterClause>,
    /// Bound `$orderby` chain.
    pub order_by: Option<OrderByClause>,
    /// Bound `$select`/`$expand`.
    pub select_expand: Option<SelectExpandClause>,
    /// Bound `$search`.
    pub search: Option<SearchClause>,
    /// Bound `$compute`.
    pub compute: Option<ComputeClause>,
    /// Validated `$skip`.
    pub skip: Option<i64>,
    /// Validated `$top`.
    pub top: Option<i64>,
    /// `$count`.
    pub count: Option<bool>,
}

/// The top-level binder: resolves an entity set, establishes the implicit
/// range variable `$it`, and binds every supplied query option against the
/// set's element type.
#[derive(Debug)]
pub struct MetadataBinder<'a> {
    model: &'a Model,
    registry: &'a FunctionRegistry,
    config: BinderConfig,
}

impl<'a> MetadataBinder<'a> {
    /// Creates a binder with the default configuration.
    #[must_use]
    pub fn new(model: &'a Model, registry: &'a FunctionRegistry) -> Self {
        MetadataBinder {
            model,
            registry,
            config: BinderConfig::default(),
        }
    }

    /// Creates a binder with an explicit configuration.
    #[must_use]
    pub fn with_config(
        model: &'a Model,
        registry: &'a FunctionRegistry,
        config: BinderConfig,
    ) -> Self {
        MetadataBinder {
            model,
            registry,
            config,
        }
    }

    /// Binds every query option against the element type of `entity_set`.
    ///
    /// # Errors
    ///
    /// Returns a model error when the entity set is unknown, or a bind
    /// error when any option violates a binding rule. Binding never
    /// recovers partially: the first failure wins.
    pub fn bind_query(&self, entity_set: &str, options: &QueryOptions) -> Result<BoundQuery> {
        let set = self.model.get_entity_set(entity_set).ok_or_else(|| {
            ODataError::Model(format!("Entity set '{entity_set}' does not exist"))
        })?;
        let element_type = set.element_type.clone();
        let source = BoundNode::EntitySetReference {
            entity_set: set.clone(),
        };

        let mut ctx = BindingContext::new(self.model, self.registry, &self.config);
        ctx.scope.set_implicit(RangeVariable::with_source(
            "$it",
            TypeRef::structured(element_type.clone()),
            source,
        ));

        let filter = options
            .filter
            .as_ref()
            .map(|token| bind_filter(&mut ctx, token))
            .transpose()?;
        let order_by = orderby::bind_order_by(&mut ctx, &options.order_by)?;
        let compute = options
            .compute
            .as_ref()
            .map(|token| compute::bind_compute(&mut ctx, token))
            .transpose()?;
        let search = options.search.as_ref().map(search::bind_search);

        let select_expand = if options.select.is_some() || options.expand.is_some() {
            let binder = SelectExpandBinder::new(self.model, self.registry, &self.config);
            let mut clause = binder.bind(
                &element_type,
                options.select.as_ref(),
                options.expand.as_ref(),
            )?;
            add_explicit_nav_links(&mut clause);
            Some(clause)
        } else {
            None
        };

        Ok(BoundQuery {
            filter,
            order_by,
            select_expand,
            search,
            compute,
            skip: process_skip(options.skip)?,
            top: process_top(options.top)?,
            count: options.count,
        })
    }
}
