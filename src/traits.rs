use async_trait::async_trait;
use axum::http::HeaderMap;
use sea_orm::{ConnectionTrait, FromQueryResult};

use crate::config::SearchOptions;
use crate::dao::{JsonRow, SearchDao, SearchPage};
use crate::errors::SearchResult;
use crate::metadata::EntityDescriptor;
use crate::models::SearchModel;
use crate::pagination::total_count_headers;

/// A searchable row type bound to its entity descriptor.
///
/// Implementors only name their descriptor and resource; every operation has
/// a default that goes through [`SearchDao`].
///
/// ```rust,ignore
/// impl SearchResource for user::Model {
///     const DESCRIPTOR: &'static EntityDescriptor = &USER;
///     const RESOURCE_NAME_PLURAL: &'static str = "users";
/// }
///
/// let page = user::Model::search(&db, &mut search).await?;
/// let headers = user::Model::total_count_headers(&search);
/// ```
#[async_trait]
pub trait SearchResource: FromQueryResult + Sized + Send + Sync {
    const DESCRIPTOR: &'static EntityDescriptor;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Options every search of this resource runs with.
    #[must_use]
    fn search_options() -> SearchOptions {
        SearchOptions::default()
    }

    async fn search<C>(db: &C, search: &mut SearchModel) -> SearchResult<SearchPage<Self>>
    where
        C: ConnectionTrait,
    {
        SearchDao::new(db)
            .with_options(Self::search_options())
            .find_all(search, Self::DESCRIPTOR)
            .await
    }

    async fn search_with_search_from<C>(
        db: &C,
        search: &mut SearchModel,
    ) -> SearchResult<Vec<JsonRow>>
    where
        C: ConnectionTrait,
    {
        SearchDao::new(db)
            .with_options(Self::search_options())
            .find_all_with_search_from(search, Self::DESCRIPTOR)
            .await
    }

    async fn get_one<C>(db: &C, id: &str) -> SearchResult<Option<Self>>
    where
        C: ConnectionTrait,
    {
        SearchDao::new(db).find_by_id(Self::DESCRIPTOR, id).await
    }

    async fn get_one_with_search_from<C>(db: &C, id: &str) -> SearchResult<Option<JsonRow>>
    where
        C: ConnectionTrait,
    {
        SearchDao::new(db)
            .find_by_id_with_search_from(Self::DESCRIPTOR, id)
            .await
    }

    #[must_use]
    fn total_count_headers(search: &SearchModel) -> HeaderMap {
        total_count_headers(search, Self::RESOURCE_NAME_PLURAL)
    }
}
