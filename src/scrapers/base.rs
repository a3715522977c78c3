use crate::models::listing::ListingTable;
use crate::errors::Result;
use async_trait::async_trait;

/// Base trait for listing data sources
#[async_trait]
pub trait ListingSource {
    /// Human readable name of the source, used in logs
    fn source_name(&self) -> &'static str;

    /// Fetch the full A-share listing as a table
    async fn fetch_listing(&self) -> Result<ListingTable>;
}
