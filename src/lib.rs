//! # searchcrate
//!
//! A generic entity query layer for sea-orm. Entities are described by static
//! [`EntityDescriptor`] tables; a [`SearchModel`] carrying free text, a compact
//! filter expression, sort tokens, a projection and pagination is turned into
//! a single `SELECT` plus a `COUNT(*)` of the same predicate.
//!
//! ```rust,ignore
//! use searchcrate::{SearchDao, SearchModel};
//!
//! let mut search = SearchModel::new()
//!     .q("admin")
//!     .filter("status=ACTIVE,age>=18")
//!     .sort(["-createdAt"])
//!     .limit(25);
//!
//! let page = SearchDao::new(&db)
//!     .find_all::<user::Model>(&mut search, &USER)
//!     .await?;
//! let headers = searchcrate::pagination::total_count_headers(&search, "users");
//! ```

pub mod config;
pub mod dao;
pub mod errors;
pub mod filtering;
pub mod metadata;
pub mod models;
pub mod pagination;
pub mod plan;
pub mod traits;

pub use config::SearchOptions;
pub use dao::{JsonRow, SearchDao, SearchPage};
pub use errors::{SearchError, SearchResult};
pub use metadata::{
    EntityDescriptor, EnumDescriptor, EnumVariant, FieldDef, FieldKind, FieldMarker, SearchFrom,
};
pub use models::SearchModel;
pub use plan::{Projection, QueryPlan};
pub use traits::SearchResource;
