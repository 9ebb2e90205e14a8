//! A resolved search, ready to be compiled for a given backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    DatabaseBackend, Order, QueryResult,
    sea_query::{Alias, Asterisk, Expr, Query, SelectStatement, SimpleExpr},
};
use serde_json::{Map, Value as JsonValue};

use crate::errors::SearchResult;
use crate::filtering::predicate::Predicate;
use crate::filtering::remote::search_from_columns;
use crate::metadata::{EntityDescriptor, FieldDef, FieldKind};

pub(crate) const COUNT_ALIAS: &str = "total";

/// What each result row holds.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Every persisted column under its column name, for typed rows.
    Entity,
    /// Only these fields, keyed by field name.
    Fields(Vec<FieldDef>),
    /// Every persisted field keyed by field name, plus the display values of
    /// each search-from relation.
    SearchFrom,
}

/// One selected column of a map-shaped row.
#[derive(Debug, Clone)]
pub struct ProjectedColumn {
    pub key: String,
    pub expr: SimpleExpr,
    /// How to decode the column; aggregated values are always strings.
    pub kind: FieldKind,
}

#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub entity: &'static EntityDescriptor,
    pub predicate: Predicate,
    /// Columns to order by, in priority order.
    pub order: Vec<(&'static str, Order)>,
    pub projection: Projection,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl QueryPlan {
    /// An unfiltered, unordered plan over every entity row.
    #[must_use]
    pub fn new(entity: &'static EntityDescriptor) -> Self {
        Self {
            entity,
            predicate: Predicate::always(),
            order: Vec::new(),
            projection: Projection::Entity,
            offset: None,
            limit: None,
        }
    }

    /// Columns selected for map-shaped rows; empty for [`Projection::Entity`].
    #[must_use]
    pub fn projected_columns(&self, backend: DatabaseBackend) -> Vec<ProjectedColumn> {
        let entity = self.entity;
        match &self.projection {
            Projection::Entity => Vec::new(),
            Projection::Fields(fields) => fields
                .iter()
                .map(|field| field_column(entity, field))
                .collect(),
            Projection::SearchFrom => {
                let mut columns = Vec::new();
                for field in entity.all_fields().iter().filter(|field| !field.is_transient()) {
                    if field.has_column() {
                        columns.push(field_column(entity, field));
                    }
                    let Some(search_from) = field.search_from_relation() else {
                        continue;
                    };
                    for (target, (expr, key)) in search_from
                        .targets
                        .iter()
                        .zip(search_from_columns(entity, field, search_from, backend))
                    {
                        let kind = match search_from.entity.field(target) {
                            Some(target) if search_from.local_id.is_none() => target.kind,
                            _ => FieldKind::String,
                        };
                        columns.push(ProjectedColumn { key, expr, kind });
                    }
                }
                columns
            }
        }
    }

    /// The `SELECT` for this plan's rows, with ordering and pagination.
    #[must_use]
    pub fn select_statement(&self, backend: DatabaseBackend) -> SelectStatement {
        let entity = self.entity;
        let mut select = Query::select();
        select.from(Alias::new(entity.table));

        match self.projection {
            Projection::Entity => {
                for field in persisted_fields(entity) {
                    select.column((Alias::new(entity.table), Alias::new(field.column)));
                }
            }
            Projection::Fields(_) | Projection::SearchFrom => {
                for column in self.projected_columns(backend) {
                    select.expr_as(column.expr, Alias::new(column.key));
                }
            }
        }

        select.cond_where(self.predicate.clone().into_condition());
        for (column, order) in &self.order {
            select.order_by((Alias::new(entity.table), Alias::new(*column)), order.clone());
        }
        if let Some(offset) = self.offset {
            select.offset(offset);
        }
        if let Some(limit) = self.limit {
            select.limit(limit);
        }
        select
    }

    /// `COUNT(*)` of every row the predicate matches, ignoring pagination.
    #[must_use]
    pub fn count_statement(&self) -> SelectStatement {
        let mut select = Query::select();
        select
            .expr_as(Expr::col(Asterisk).count(), Alias::new(COUNT_ALIAS))
            .from(Alias::new(self.entity.table))
            .cond_where(self.predicate.clone().into_condition());
        select
    }
}

/// Every field backed by a column, inherited ones included.
pub(crate) fn persisted_fields(entity: &'static EntityDescriptor) -> Vec<FieldDef> {
    entity
        .all_fields()
        .iter()
        .filter(|field| field.has_column())
        .copied()
        .collect()
}

fn field_column(entity: &'static EntityDescriptor, field: &FieldDef) -> ProjectedColumn {
    ProjectedColumn {
        key: field.name.to_string(),
        expr: Expr::col((Alias::new(entity.table), Alias::new(field.column))).into(),
        kind: field.kind,
    }
}

/// Read a map-shaped row back using each column's declared kind.
///
/// Dates come back as epoch milliseconds, like filter literals, and
/// decimals as strings so no precision is lost.
///
/// # Errors
///
/// Fails if a column is missing or does not decode as its kind.
pub fn decode_row(
    row: &QueryResult,
    columns: &[ProjectedColumn],
) -> SearchResult<Map<String, JsonValue>> {
    let mut map = Map::with_capacity(columns.len());
    for column in columns {
        map.insert(column.key.clone(), decode_column(row, &column.key, column.kind)?);
    }
    Ok(map)
}

fn decode_column(row: &QueryResult, key: &str, kind: FieldKind) -> SearchResult<JsonValue> {
    let value = match kind {
        FieldKind::String | FieldKind::Enum(_) | FieldKind::SearchableEnum(_) => {
            row.try_get::<Option<String>>("", key)?.map(JsonValue::from)
        }
        FieldKind::Boolean => row.try_get::<Option<bool>>("", key)?.map(JsonValue::from),
        FieldKind::Integer => row.try_get::<Option<i32>>("", key)?.map(JsonValue::from),
        FieldKind::Long => row.try_get::<Option<i64>>("", key)?.map(JsonValue::from),
        FieldKind::Double => row.try_get::<Option<f64>>("", key)?.map(JsonValue::from),
        FieldKind::Decimal => decode_decimal(row, key)?.map(JsonValue::from),
        FieldKind::Date => row
            .try_get::<Option<DateTime<Utc>>>("", key)?
            .map(|value| JsonValue::from(value.timestamp_millis())),
    };
    Ok(value.unwrap_or(JsonValue::Null))
}

/// Stores with numeric affinity may hand a whole decimal back as an integer
/// (SQLite keeps `10.00` as `10`), so fall back through the wider types.
fn decode_decimal(row: &QueryResult, key: &str) -> SearchResult<Option<String>> {
    if let Ok(value) = row.try_get::<Option<Decimal>>("", key) {
        return Ok(value.map(|value| value.to_string()));
    }
    if let Ok(value) = row.try_get::<Option<i64>>("", key) {
        return Ok(value.map(|value| value.to_string()));
    }
    if let Ok(value) = row.try_get::<Option<f64>>("", key) {
        return Ok(value.map(|value| value.to_string()));
    }
    Ok(row.try_get::<Option<String>>("", key)?)
}
