//! Execution seam between the paginator and a data store.

use async_trait::async_trait;

use crate::builder::QueryResult;

/// A queryable entity collection.
///
/// The paginator builds SQL; implementors run it. Errors are returned
/// unchanged to the caller inside [`PaginateError::Execution`].
///
/// [`PaginateError::Execution`]: super::PaginateError::Execution
#[async_trait]
pub trait Collection: Sync {
    /// Row type produced by queries.
    type Row: Send;
    /// Error raised by the data store.
    type Error: Send;

    /// Table queried when the paginator has no entity override.
    fn table_name(&self) -> &str;

    /// Run a row query.
    async fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<Self::Row>, Self::Error>;

    /// Run a `COUNT(*)` query.
    async fn fetch_count(&self, query: &QueryResult) -> Result<u64, Self::Error>;

    /// Run a row query and its count as one unit of work.
    ///
    /// The default runs them one after the other. Stores that can do both in
    /// one round trip or one transaction should override it.
    async fn fetch_page(
        &self,
        rows: &QueryResult,
        count: &QueryResult,
    ) -> Result<(Vec<Self::Row>, u64), Self::Error> {
        let fetched = self.fetch_rows(rows).await?;
        let total = self.fetch_count(count).await?;
        Ok((fetched, total))
    }
}
