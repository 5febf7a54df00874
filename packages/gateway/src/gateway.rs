use crate::{GatewayResult, ListFilter, Paginated, ProductSummary, StoreSummary};
use async_trait::async_trait;

/// Source of selectable catalog entities
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn list_products(&self, filter: &ListFilter) -> GatewayResult<Paginated<ProductSummary>>;

    async fn list_stores(&self, filter: &ListFilter) -> GatewayResult<Paginated<StoreSummary>>;
}
