use sea_orm::{ConnectionTrait, Value};

use super::coercion::{coerce, coerce_list};
use super::expression::{FilterExpression, FilterOperator, split_filters};
use super::predicate::Predicate;
use super::remote::{remote_target, resolve_filter_ids};
use crate::config::SearchOptions;
use crate::errors::{SearchError, SearchResult};
use crate::metadata::{EntityDescriptor, FieldDef, SearchFrom, find_field, uncapitalize_first};

/// A clause naming `<searchFromField><Target>` rather than a local field.
#[derive(Debug, Clone, Copy)]
pub struct IndirectField {
    /// The local search-from field.
    pub field: FieldDef,
    pub search_from: &'static SearchFrom,
    /// The related entity's field the clause compares against.
    pub target: FieldDef,
}

/// Find the search-from field and target an indirect filter name refers to.
///
/// `roleOidName` resolves to the local field `roleOid` and the related
/// field `name`, provided `name` is a declared, searchable target.
#[must_use]
pub fn resolve_indirect(fields: &[FieldDef], name: &str) -> Option<IndirectField> {
    fields
        .iter()
        .filter(|field| !field.is_transient())
        .find_map(|field| {
            let search_from = field.search_from_relation()?;
            let rest = name.strip_prefix(field.name)?;
            if rest.is_empty() {
                return None;
            }
            let target = remote_target(search_from, &uncapitalize_first(rest))?;
            Some(IndirectField {
                field: *field,
                search_from,
                target,
            })
        })
}

/// AND of every clause in `filter`.
///
/// Empty clauses (from `a=1,,b=2` or a trailing comma) are skipped.
///
/// # Errors
///
/// Invalid literals, ordered comparisons against `null`, and unsupported
/// operators on indirect fields always fail. Unknown fields and clauses
/// without an operator fail only with [`SearchOptions::strict`]. Store errors
/// from indirect lookups are passed through.
pub async fn build_filter_predicate<C: ConnectionTrait>(
    conn: &C,
    entity: &'static EntityDescriptor,
    fields: &[FieldDef],
    filter: &str,
    options: SearchOptions,
) -> SearchResult<Predicate> {
    let mut clauses = Vec::new();

    for expression in split_filters(filter) {
        if expression == FilterExpression::default() {
            continue;
        }
        if let Some(predicate) =
            clause_predicate(conn, entity, fields, &expression, options).await?
        {
            clauses.push(predicate);
        }
    }

    tracing::debug!(
        entity = entity.type_name,
        clauses = clauses.len(),
        "Built filter predicate"
    );
    Ok(Predicate::all(clauses))
}

async fn clause_predicate<C: ConnectionTrait>(
    conn: &C,
    entity: &'static EntityDescriptor,
    fields: &[FieldDef],
    expression: &FilterExpression,
    options: SearchOptions,
) -> SearchResult<Option<Predicate>> {
    let Some(operator) = expression.filter_operator() else {
        let clause = format!(
            "{}{}{}",
            expression.field, expression.operator, expression.value
        );
        return options.reject_or_skip(SearchError::MalformedFilter(clause));
    };

    if let Some(field) = find_field(fields, &expression.field) {
        return direct_predicate(field, operator, &expression.value).map(Some);
    }

    if let Some(indirect) = resolve_indirect(fields, &expression.field) {
        if !matches!(operator, FilterOperator::Eq | FilterOperator::Contains) {
            return Err(SearchError::UnsupportedRemoteOperator {
                field: expression.field.clone(),
                operator: operator.to_string(),
            });
        }
        let ids = resolve_filter_ids(
            conn,
            indirect.search_from,
            &expression.field,
            &indirect.target,
            operator,
            &expression.value,
        )
        .await?;
        let ids = ids.into_iter().map(Value::from).collect();
        return Ok(Some(Predicate::one_of(
            indirect.field.join_column(entity),
            ids,
        )));
    }

    options.reject_or_skip(SearchError::unknown_field(
        entity.type_name,
        &expression.field,
    ))
}

/// Predicate for a clause on a field of the searched entity itself.
///
/// # Errors
///
/// [`SearchError::InvalidValue`] when the literal does not fit the field and
/// [`SearchError::NullComparison`] for `<`, `<=`, `>`, `>=` against `null`.
pub fn direct_predicate(
    field: &FieldDef,
    operator: FilterOperator,
    raw: &str,
) -> SearchResult<Predicate> {
    let column = field.column;

    let predicate = match operator {
        FilterOperator::Eq => match coerce(field, raw)? {
            value if value.is_null() => Predicate::IsNull(column),
            value => Predicate::Equals(column, value.into()),
        },
        FilterOperator::Ne => match coerce(field, raw)? {
            value if value.is_null() => Predicate::IsNotNull(column),
            value => Predicate::NotEquals(column, value.into()),
        },
        FilterOperator::Lt => Predicate::LessThan(column, ordered_value(field, operator, raw)?),
        FilterOperator::Le => Predicate::LessOrEqual(column, ordered_value(field, operator, raw)?),
        FilterOperator::Gt => Predicate::GreaterThan(column, ordered_value(field, operator, raw)?),
        FilterOperator::Ge => {
            Predicate::GreaterOrEqual(column, ordered_value(field, operator, raw)?)
        }
        FilterOperator::Contains => {
            // The literal must still fit the field, but matches as typed
            coerce(field, raw)?;
            Predicate::Contains(column, raw.to_string())
        }
        FilterOperator::In => Predicate::In(
            column,
            coerce_list(field, raw)?
                .into_iter()
                .map(Value::from)
                .collect(),
        ),
    };
    Ok(predicate)
}

fn ordered_value(field: &FieldDef, operator: FilterOperator, raw: &str) -> SearchResult<Value> {
    let value = coerce(field, raw)?;
    if value.is_null() {
        return Err(SearchError::NullComparison {
            field: field.name.to_string(),
            operator: operator.as_str(),
        });
    }
    Ok(value.into())
}
