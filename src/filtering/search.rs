use sea_orm::{ConnectionTrait, Value};

use super::predicate::Predicate;
use super::remote::resolve_ids;
use crate::errors::SearchResult;
use crate::metadata::{EntityDescriptor, FieldDef, FieldKind};

// Basic safety limits
const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;

/// Cut overly long queries at a character boundary.
fn truncate_query(query: &str) -> &str {
    query
        .char_indices()
        .nth(MAX_SEARCH_QUERY_LENGTH)
        .map_or(query, |(index, _)| &query[..index])
}

/// Free-text search over every searchable field of `entity`.
///
/// The branches are OR-ed together:
/// - string fields (not search-ignored) contain the query, ignoring case;
/// - search-from fields hold one of the related ids whose targets match;
/// - searchable enums hold a variant whose display text contains the query.
///
/// A branch with no candidates adds nothing. When no branch has any the
/// result matches no row.
///
/// # Errors
///
/// Fails if a related-entity lookup fails.
pub async fn build_search_predicate<C: ConnectionTrait>(
    conn: &C,
    entity: &'static EntityDescriptor,
    fields: &[FieldDef],
    query: &str,
) -> SearchResult<Predicate> {
    let query = truncate_query(query);
    let mut branches = Vec::new();

    for field in fields.iter().filter(|field| !field.is_transient()) {
        if let Some(search_from) = field.search_from_relation() {
            let ids = resolve_ids(conn, search_from, query).await?;
            if !ids.is_empty() {
                let ids = ids.into_iter().map(Value::from).collect();
                branches.push(Predicate::In(field.join_column(entity), ids));
            }
            continue;
        }
        if field.is_search_ignored() {
            continue;
        }

        match field.kind {
            FieldKind::String => {
                branches.push(Predicate::Contains(field.column, query.to_string()));
            }
            FieldKind::SearchableEnum(descriptor) => {
                let names: Vec<Value> = descriptor
                    .variants_matching_text(query)
                    .map(|variant| Value::from(variant.name))
                    .collect();
                if !names.is_empty() {
                    branches.push(Predicate::In(field.column, names));
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        entity = entity.type_name,
        branches = branches.len(),
        "Built free-text search"
    );
    Ok(Predicate::any(branches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_queries_are_untouched() {
        assert_eq!(truncate_query("abc"), "abc");
    }

    #[test]
    fn test_long_queries_are_truncated_on_char_boundary() {
        let long = "é".repeat(MAX_SEARCH_QUERY_LENGTH + 5);
        let truncated = truncate_query(&long);
        assert_eq!(truncated.chars().count(), MAX_SEARCH_QUERY_LENGTH);
    }
}
