//! # Search DAO
//!
//! [`SearchDao`] is the entry point of the query layer. It resolves a
//! [`SearchModel`] against an entity's descriptor into a [`QueryPlan`], runs
//! the plan, and reports how many rows matched in total.
//!
//! ```rust,ignore
//! let dao = SearchDao::new(&db);
//! let mut search = SearchModel::new()
//!     .filter("status=ACTIVE,age>=18")
//!     .sort(["-createdAt"])
//!     .limit(2);
//!
//! let page: SearchPage<user::Model> = dao.find_all(&mut search, &USER).await?;
//! assert_eq!(page.len(), 2);
//! assert_eq!(search.total_count, Some(5));
//! ```

use sea_orm::{ConnectionTrait, FromQueryResult, Order};
use serde_json::{Map, Value as JsonValue};

use crate::config::SearchOptions;
use crate::errors::{SearchError, SearchResult};
use crate::filtering::conditions::build_filter_predicate;
use crate::filtering::predicate::Predicate;
use crate::filtering::search::build_search_predicate;
use crate::filtering::sort::parse_sorting;
use crate::metadata::{EntityDescriptor, FieldDef, FieldKind, find_field};
use crate::models::SearchModel;
use crate::plan::{COUNT_ALIAS, Projection, QueryPlan, decode_row, persisted_fields};

/// A JSON object keyed by field name.
pub type JsonRow = Map<String, JsonValue>;

/// Rows of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPage<T> {
    /// Full entities, when no projection was asked for.
    Entities(Vec<T>),
    /// Maps keyed by field name, when `fields` was set.
    Projections(Vec<JsonRow>),
}

impl<T> SearchPage<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Entities(rows) => rows.len(),
            Self::Projections(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entities, or `None` for a projected page.
    #[must_use]
    pub fn into_entities(self) -> Option<Vec<T>> {
        match self {
            Self::Entities(rows) => Some(rows),
            Self::Projections(_) => None,
        }
    }

    /// The projected rows, or `None` for an entity page.
    #[must_use]
    pub fn into_projections(self) -> Option<Vec<JsonRow>> {
        match self {
            Self::Entities(_) => None,
            Self::Projections(rows) => Some(rows),
        }
    }
}

/// Builds and runs searches over one connection.
#[derive(Debug, Clone)]
pub struct SearchDao<'c, C> {
    conn: &'c C,
    options: SearchOptions,
}

impl<'c, C: ConnectionTrait> SearchDao<'c, C> {
    #[must_use]
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> SearchOptions {
        self.options
    }

    /// Resolve `search` into a plan for `entity`.
    ///
    /// Free text and filters are ANDed. Related-entity lookups for
    /// search-from fields run here, so building needs the connection.
    ///
    /// # Errors
    ///
    /// Any error from free text or filter building, and in strict mode
    /// unknown sort or projection fields.
    pub async fn build(
        &self,
        search: &SearchModel,
        entity: &'static EntityDescriptor,
    ) -> SearchResult<QueryPlan> {
        let fields = entity.all_fields();
        let mut parts = Vec::new();

        if let Some(query) = search.search_text() {
            parts.push(build_search_predicate(self.conn, entity, &fields, query).await?);
        }
        if let Some(filter) = search.filter.as_deref().filter(|filter| !filter.is_empty()) {
            parts.push(
                build_filter_predicate(self.conn, entity, &fields, filter, self.options).await?,
            );
        }

        let plan = QueryPlan {
            entity,
            predicate: Predicate::all(parts),
            order: self.resolve_order(entity, &fields, &search.sort)?,
            projection: self.resolve_projection(entity, &fields, &search.fields)?,
            offset: search.offset,
            limit: search.limit,
        };

        tracing::debug!(
            entity = entity.type_name,
            order = plan.order.len(),
            offset = ?plan.offset,
            limit = ?plan.limit,
            "Built search plan"
        );
        Ok(plan)
    }

    fn resolve_order(
        &self,
        entity: &'static EntityDescriptor,
        fields: &[FieldDef],
        sort: &[String],
    ) -> SearchResult<Vec<(&'static str, Order)>> {
        let mut order = Vec::new();
        for token in parse_sorting(sort) {
            match find_field(fields, &token.field) {
                Some(field) => order.push((field.column, token.order)),
                None => {
                    self.options
                        .reject_or_skip::<()>(SearchError::unknown_field(
                            entity.type_name,
                            &token.field,
                        ))?;
                }
            }
        }
        Ok(order)
    }

    fn resolve_projection(
        &self,
        entity: &'static EntityDescriptor,
        fields: &[FieldDef],
        names: &[String],
    ) -> SearchResult<Projection> {
        if names.is_empty() {
            return Ok(Projection::Entity);
        }

        let mut projected = Vec::with_capacity(names.len());
        for name in names {
            match find_field(fields, name) {
                Some(field) => projected.push(*field),
                None => {
                    self.options
                        .reject_or_skip::<()>(SearchError::unknown_field(entity.type_name, name))?;
                }
            }
        }

        // Nothing left to select: fall back to every persisted field
        if projected.is_empty() {
            projected = persisted_fields(entity);
        }
        Ok(Projection::Fields(projected))
    }

    /// Run `plan` and count every row its predicate matches.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if either query fails.
    pub async fn execute<T: FromQueryResult>(
        &self,
        plan: &QueryPlan,
    ) -> SearchResult<(SearchPage<T>, u64)> {
        let page = match plan.projection {
            Projection::Entity => SearchPage::Entities(self.fetch_entities(plan).await?),
            Projection::Fields(_) | Projection::SearchFrom => {
                SearchPage::Projections(self.fetch_rows(plan).await?)
            }
        };
        let total = self.count(plan).await?;
        Ok((page, total))
    }

    /// Rows matching `plan`, ignoring its offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if the query fails.
    pub async fn count(&self, plan: &QueryPlan) -> SearchResult<u64> {
        let backend = self.conn.get_database_backend();
        let total = match self.conn.query_one(backend.build(&plan.count_statement())).await? {
            Some(row) => row.try_get::<i64>("", COUNT_ALIAS)?,
            None => 0,
        };
        Ok(u64::try_from(total).unwrap_or_default())
    }

    /// Build and run `search`, writing the total into `search.total_count`.
    ///
    /// # Errors
    ///
    /// See [`SearchDao::build`] and [`SearchDao::execute`].
    pub async fn find_all<T: FromQueryResult>(
        &self,
        search: &mut SearchModel,
        entity: &'static EntityDescriptor,
    ) -> SearchResult<SearchPage<T>> {
        let plan = self.build(search, entity).await?;
        let (page, total) = self.execute(&plan).await?;
        search.total_count = Some(total);
        Ok(page)
    }

    /// Like [`SearchDao::find_all`], but every row is a map that also holds
    /// the display values of each search-from relation (`<field><Target>`)
    /// and the display text of each searchable enum (`<field>Text`).
    ///
    /// `search.fields` is ignored.
    ///
    /// # Errors
    ///
    /// See [`SearchDao::build`] and [`SearchDao::execute`].
    pub async fn find_all_with_search_from(
        &self,
        search: &mut SearchModel,
        entity: &'static EntityDescriptor,
    ) -> SearchResult<Vec<JsonRow>> {
        let mut plan = self.build(search, entity).await?;
        plan.projection = Projection::SearchFrom;

        let rows = self.fetch_rows(&plan).await?;
        search.total_count = Some(self.count(&plan).await?);
        Ok(rows)
    }

    /// One entity by id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if the query fails.
    pub async fn find_by_id<T: FromQueryResult>(
        &self,
        entity: &'static EntityDescriptor,
        id: &str,
    ) -> SearchResult<Option<T>> {
        let plan = by_id_plan(entity, id, Projection::Entity);
        Ok(self.fetch_entities(&plan).await?.into_iter().next())
    }

    /// One row by id with its search-from display values, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if the query fails.
    pub async fn find_by_id_with_search_from(
        &self,
        entity: &'static EntityDescriptor,
        id: &str,
    ) -> SearchResult<Option<JsonRow>> {
        let plan = by_id_plan(entity, id, Projection::SearchFrom);
        Ok(self.fetch_rows(&plan).await?.into_iter().next())
    }

    async fn fetch_entities<T: FromQueryResult>(&self, plan: &QueryPlan) -> SearchResult<Vec<T>> {
        let backend = self.conn.get_database_backend();
        let statement = backend.build(&plan.select_statement(backend));
        Ok(T::find_by_statement(statement).all(self.conn).await?)
    }

    async fn fetch_rows(&self, plan: &QueryPlan) -> SearchResult<Vec<JsonRow>> {
        let backend = self.conn.get_database_backend();
        let columns = plan.projected_columns(backend);
        let statement = backend.build(&plan.select_statement(backend));

        let mut rows = Vec::new();
        for row in self.conn.query_all(statement).await? {
            let mut decoded = decode_row(&row, &columns)?;
            if matches!(plan.projection, Projection::SearchFrom) {
                add_enum_text(plan.entity, &mut decoded);
            }
            rows.push(decoded);
        }
        Ok(rows)
    }
}

fn by_id_plan(entity: &'static EntityDescriptor, id: &str, projection: Projection) -> QueryPlan {
    let mut plan = QueryPlan::new(entity);
    plan.predicate = Predicate::Equals(entity.id_column(), id.into());
    plan.projection = projection;
    plan.limit = Some(1);
    plan
}

/// Add `<field>Text` next to each searchable enum value.
fn add_enum_text(entity: &'static EntityDescriptor, row: &mut JsonRow) {
    for field in entity.all_fields().iter() {
        let FieldKind::SearchableEnum(descriptor) = field.kind else {
            continue;
        };
        let text = row
            .get(field.name)
            .and_then(JsonValue::as_str)
            .and_then(|name| descriptor.variant(name))
            .map_or(JsonValue::Null, |variant| JsonValue::from(variant.text));
        row.insert(format!("{}Text", field.name), text);
    }
}
