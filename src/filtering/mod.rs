//! # Filtering, Search & Sorting
//!
//! Turns the string grammar of a [`SearchModel`](crate::models::SearchModel)
//! into a [`Predicate`] tree and an ordering, without touching SQL until the
//! very end.
//!
//! ## Components
//!
//! - **[`expression`]**: the clause scanner (`<field><op><value>`)
//! - **[`coercion`]**: raw literal to typed value, per declared field kind
//! - **[`predicate`]**: the predicate tree and its sea-query compiler
//! - **[`search`]**: free-text search over strings, search-from relations and
//!   searchable enums
//! - **[`conditions`]**: structured filters, direct and indirect
//! - **[`remote`]**: related-entity lookups and search-from projection
//! - **[`sort`]**: `+field` / `-field` tokens
//!
//! ## Filter Examples
//!
//! ```rust,ignore
//! // Equality, null checks and ordered comparisons
//! filter=status=ACTIVE,deletedAt=null,age>=18
//!
//! // Case-insensitive substring and membership
//! filter=name~=jo,status|=ACTIVE|PASSIVE
//!
//! // Indirect filter on a search-from relation's display value
//! filter=roleOidName=Administrator
//! ```

pub mod coercion;
pub mod conditions;
pub mod expression;
pub mod predicate;
pub mod remote;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use coercion::{FieldValue, NULL_LITERAL, coerce, coerce_list};
pub use conditions::{build_filter_predicate, direct_predicate};
pub use expression::{FilterExpression, FilterOperator, parse_filter_exp, split_filters};
pub use predicate::{Predicate, escape_like_wildcards};
pub use remote::{resolve_filter_ids, resolve_ids};
pub use search::build_search_predicate;
pub use sort::{SortToken, parse_sort_token, parse_sorting};
