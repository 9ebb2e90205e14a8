use serde::Deserialize;

use crate::errors::{SearchError, SearchResult};

/// Knobs for how forgiving a search is.
///
/// By default a filter clause, sort token or projected field that names an
/// unknown field is dropped with a warning, as is a filter clause without an
/// operator. In strict mode each of those fails the search instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub strict: bool,
}

impl SearchOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// Fail with `error` in strict mode, otherwise log it and carry on.
    pub(crate) fn reject_or_skip<T>(self, error: SearchError) -> SearchResult<Option<T>> {
        if self.strict {
            Err(error)
        } else {
            tracing::warn!(%error, "Ignoring unresolvable search input");
            Ok(None)
        }
    }
}
