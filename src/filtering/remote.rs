//! Search-from relations: resolving matching foreign keys in the related
//! entity, and projecting the related display values as extra columns.

use sea_orm::{
    ConnectionTrait, DatabaseBackend,
    sea_query::{Alias, Expr, Func, Query, SimpleExpr},
};

use super::coercion::coerce;
use super::expression::FilterOperator;
use super::predicate::Predicate;
use crate::errors::{SearchError, SearchResult};
use crate::metadata::{EntityDescriptor, FieldDef, SearchFrom};

const ID_ALIAS: &str = "related_id";
const RELATED_TABLE_ALIAS: &str = "search_from";

/// Ids of related rows where any declared target contains `text`, ignoring case.
///
/// Targets missing from the related entity, or marked search-ignore, are not
/// searched. When none is left there is nothing to match and no query runs.
///
/// # Errors
///
/// Returns [`SearchError::Database`] if the lookup fails.
pub async fn resolve_ids<C: ConnectionTrait>(
    conn: &C,
    search_from: &SearchFrom,
    text: &str,
) -> SearchResult<Vec<String>> {
    let related_fields = search_from.entity.all_fields();
    let matches: Vec<Predicate> = related_fields
        .iter()
        .filter(|field| is_searchable_target(search_from, field))
        .map(|field| Predicate::Contains(field.column, text.to_string()))
        .collect();

    if matches.is_empty() {
        tracing::debug!(
            entity = search_from.entity.type_name,
            "No searchable targets on related entity"
        );
        return Ok(Vec::new());
    }

    fetch_ids(conn, search_from, Predicate::any(matches)).await
}

/// Ids of related rows matching one indirect filter clause.
///
/// `=` compares `target` exactly, after coercing `raw` to its type; `~=`
/// is a case-insensitive substring match.
///
/// # Errors
///
/// [`SearchError::UnsupportedRemoteOperator`] for any other operator,
/// [`SearchError::InvalidValue`] if `raw` does not fit the target, and
/// [`SearchError::Database`] if the lookup fails.
pub async fn resolve_filter_ids<C: ConnectionTrait>(
    conn: &C,
    search_from: &SearchFrom,
    filter_field: &str,
    target: &FieldDef,
    operator: FilterOperator,
    raw: &str,
) -> SearchResult<Vec<String>> {
    let predicate = match operator {
        FilterOperator::Eq => {
            let value = coerce(target, raw)?;
            if value.is_null() {
                Predicate::IsNull(target.column)
            } else {
                Predicate::Equals(target.column, value.to_db_value())
            }
        }
        FilterOperator::Contains => Predicate::Contains(target.column, raw.to_string()),
        other => {
            return Err(SearchError::UnsupportedRemoteOperator {
                field: filter_field.to_string(),
                operator: other.to_string(),
            });
        }
    };

    fetch_ids(conn, search_from, predicate).await
}

/// The related field a `<field><Target>` filter name points at, if any.
#[must_use]
pub fn remote_target(search_from: &SearchFrom, target_name: &str) -> Option<FieldDef> {
    if !search_from.targets.iter().any(|target| *target == target_name) {
        return None;
    }
    search_from
        .entity
        .field(target_name)
        .filter(|field| !field.is_search_ignored())
}

fn is_searchable_target(search_from: &SearchFrom, field: &FieldDef) -> bool {
    search_from.targets.contains(&field.name) && !field.is_search_ignored() && !field.is_transient()
}

async fn fetch_ids<C: ConnectionTrait>(
    conn: &C,
    search_from: &SearchFrom,
    predicate: Predicate,
) -> SearchResult<Vec<String>> {
    let related = search_from.entity;
    let id_column = related.column_of(search_from.id).unwrap_or(search_from.id);

    let mut select = Query::select();
    select
        .distinct()
        .expr_as(Expr::col(Alias::new(id_column)), Alias::new(ID_ALIAS))
        .from(Alias::new(related.table))
        .cond_where(predicate.into_condition());

    let backend = conn.get_database_backend();
    let rows = conn.query_all(backend.build(&select)).await?;

    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(id) = row.try_get::<Option<String>>("", ID_ALIAS)? {
            ids.push(id);
        }
    }

    tracing::debug!(
        entity = related.type_name,
        matched = ids.len(),
        "Resolved search-from ids"
    );
    Ok(ids)
}

/// Correlated subselects that expose a search-from field's display values.
///
/// One `(expression, alias)` pair per target, aliased `<field><Target>`.
/// Without `local_id` the subselect returns the single target value whose
/// related id equals this field. With `local_id` several related rows can
/// match, so their values are concatenated (`GROUP_CONCAT`, or
/// `STRING_AGG` on Postgres).
#[must_use]
pub fn search_from_columns(
    owner: &'static EntityDescriptor,
    field: &FieldDef,
    search_from: &SearchFrom,
    backend: DatabaseBackend,
) -> Vec<(SimpleExpr, String)> {
    let related = search_from.entity;
    let id_column = related.column_of(search_from.id).unwrap_or(search_from.id);
    let local_column = field.join_column(owner);

    search_from
        .targets
        .iter()
        .map(|&target| {
            let target_column = related.column_of(target).unwrap_or(target);
            let value = Expr::col((Alias::new(RELATED_TABLE_ALIAS), Alias::new(target_column)));
            let value: SimpleExpr = if search_from.local_id.is_some() {
                aggregate_values(value, backend)
            } else {
                value.into()
            };

            let mut subselect = Query::select();
            subselect
                .expr(value)
                .from_as(Alias::new(related.table), Alias::new(RELATED_TABLE_ALIAS))
                .and_where(
                    Expr::col((Alias::new(RELATED_TABLE_ALIAS), Alias::new(id_column)))
                        .equals((Alias::new(owner.table), Alias::new(local_column))),
                );

            (
                SimpleExpr::SubQuery(None, Box::new(subselect.into_sub_query_statement())),
                SearchFrom::alias(field.name, target),
            )
        })
        .collect()
}

fn aggregate_values(value: Expr, backend: DatabaseBackend) -> SimpleExpr {
    match backend {
        DatabaseBackend::Postgres => Func::cust(Alias::new("STRING_AGG"))
            .arg(value)
            .arg(Expr::val(","))
            .into(),
        _ => Func::cust(Alias::new("GROUP_CONCAT")).arg(value).into(),
    }
}
