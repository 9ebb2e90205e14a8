//! # Search Errors
//!
//! Every failure the query layer can surface. The split follows what callers
//! are expected to do with it:
//!
//! - **Caller input errors**: a literal that does not parse as the field's
//!   type, an unsupported operator on an indirect (search-from) filter, or an
//!   ordered comparison against `null`. These always fail the whole request.
//! - **Strict-mode diagnostics**: unknown field names and clauses without an
//!   operator. By default these are dropped with a `tracing` warning so that
//!   existing callers keep working; `SearchOptions::strict` turns them into
//!   errors.
//! - **Store errors**: anything sea-orm reports while executing.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised while building or executing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A filter, sort or projection refers to a name that matches no field
    /// and no search-from target. Only raised in strict mode.
    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: String, field: String },

    /// A filter clause has no recognised operator. Only raised in strict mode.
    #[error("malformed filter clause '{0}'")]
    MalformedFilter(String),

    /// A raw literal could not be converted to the field's declared type.
    #[error("invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Indirect filters over a search-from relation only accept `=` and `~=`.
    #[error("operator '{operator}' is not supported on remote field '{field}'")]
    UnsupportedRemoteOperator { field: String, operator: String },

    /// `<`, `<=`, `>` and `>=` cannot compare against `null`.
    #[error("operator '{operator}' cannot compare field '{field}' against null")]
    NullComparison {
        field: String,
        operator: &'static str,
    },

    /// The data store rejected a query.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl SearchError {
    pub(crate) fn invalid_value(
        field: &str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.into(),
            expected,
        }
    }

    pub(crate) fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether the error was caused by the request rather than the store.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

/// Result alias used across the crate.
pub type SearchResult<T> = Result<T, SearchError>;
