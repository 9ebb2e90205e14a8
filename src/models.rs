use serde::Deserialize;
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Search request, and the total count once a search has run.
///
/// # Free text
/// `q` matches, case-insensitively, any searchable string field, the display
/// values of search-from relations, and the display text of searchable enums.
///
/// # Filtering
/// `filter` is a comma-separated list of `<field><op><value>` clauses:
/// ```text
/// status=ACTIVE,age>=18,name~=jo,role|=ADMIN|EDITOR,deletedAt=null
/// ```
/// Operators: `=`, `!=`, `<`, `<=`, `>`, `>=`, `~=` (contains), `|=` (one of).
/// A search-from display value is filtered as `<field><Target>`, e.g.
/// `roleOidName=Admin`.
///
/// # Projection
/// `fields` lists the fields to return, e.g. `oid,name`. Rows then come back
/// as maps keyed by field name instead of full entities.
///
/// # Sorting
/// `sort` is a list of `+field` / `-field` tokens. A leading space also means
/// ascending, which is what an unescaped `+` in a query string decodes to.
/// Tokens without a prefix are ignored.
///
/// # Pagination
/// `offset` and `limit`, both optional.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchModel {
    /// Free-text query.
    ///
    /// Example: `john`
    #[param(example = "john")]
    pub q: Option<String>,
    /// Filter expression.
    ///
    /// Example: `status=ACTIVE,age>=18`
    #[param(example = "status=ACTIVE,age>=18")]
    pub filter: Option<String>,
    /// Comma-separated projection.
    ///
    /// Example: `oid,name`
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    #[param(value_type = Option<String>, example = "oid,name")]
    #[schema(value_type = Option<String>)]
    pub fields: Vec<String>,
    /// Comma-separated sort tokens.
    ///
    /// Example: `-createdAt,+name`
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    #[param(value_type = Option<String>, example = "-createdAt,+name")]
    #[schema(value_type = Option<String>)]
    pub sort: Vec<String>,
    /// Rows to skip.
    #[param(example = 0)]
    pub offset: Option<u64>,
    /// Maximum rows to return.
    #[param(example = 25)]
    pub limit: Option<u64>,
    /// Matching rows ignoring offset and limit. Written by the search.
    #[serde(skip)]
    pub total_count: Option<u64>,
}

impl SearchModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Free-text query, if present and not blank.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}
