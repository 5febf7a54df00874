//! In-memory catalog for tests and offline rendering.
//!
//! Applies the same filters the API applies server-side, and can be told to
//! fail, to delay, or to hold every request until a [`Gate`] opens.

use crate::{
    EntityGateway, EntityKind, EntityStatus, GatewayError, GatewayResult, ListFilter, Paginated,
    ProductSummary, StoreSummary,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Holds requests until opened. Clones share state.
#[derive(Debug, Clone)]
pub struct Gate {
    tx: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub fn closed() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// Fixture file shape: `{ "products": [...], "stores": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub stores: Vec<StoreSummary>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    products: Vec<ProductSummary>,
    stores: Vec<StoreSummary>,
    failures: HashMap<EntityKind, GatewayError>,
    fail_on_call: Option<(usize, GatewayError)>,
    delays: HashMap<EntityKind, Duration>,
    gate: Option<Gate>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(EntityKind, ListFilter)>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog fixture
    pub fn from_json(json: &str) -> GatewayResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| GatewayError::Serde(e.to_string()))?;
        Ok(Self::new()
            .with_products(catalog.products)
            .with_stores(catalog.stores))
    }

    pub fn with_products(mut self, products: Vec<ProductSummary>) -> Self {
        self.products = products;
        self
    }

    pub fn with_stores(mut self, stores: Vec<StoreSummary>) -> Self {
        self.stores = stores;
        self
    }

    /// Every request for `kind` fails with `error`
    pub fn failing(mut self, kind: EntityKind, error: GatewayError) -> Self {
        self.failures.insert(kind, error);
        self
    }

    /// Only the `call`-th request (1-based, across both kinds) fails
    pub fn failing_call(mut self, call: usize, error: GatewayError) -> Self {
        self.fail_on_call = Some((call, error));
        self
    }

    /// Requests for `kind` take `delay` to answer
    pub fn delayed(mut self, kind: EntityKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Requests wait for `gate` to open before answering
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of list requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<(EntityKind, ListFilter)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    async fn respond(&self, kind: EntityKind, filter: &ListFilter) -> GatewayResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((kind, filter.clone()));
        }

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if let Some(delay) = self.delays.get(&kind) {
            tokio::time::sleep(*delay).await;
        }

        if let Some((failing, error)) = &self.fail_on_call {
            if *failing == call {
                return Err(error.clone());
            }
        }
        match self.failures.get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn page<T: Clone>(items: Vec<&T>, filter: &ListFilter) -> Paginated<T> {
    let total = items.len() as u64;
    let limit = filter.limit.filter(|l| *l > 0).map(|l| l as usize);
    let data: Vec<T> = match limit {
        Some(limit) => {
            let page = filter.page.unwrap_or(1).max(1) as usize;
            items
                .into_iter()
                .skip((page - 1) * limit)
                .take(limit)
                .cloned()
                .collect()
        }
        None => items.into_iter().cloned().collect(),
    };
    Paginated { data, total }
}

fn matches_search(name_en: &str, name_ar: &str, filter: &ListFilter) -> bool {
    match filter.search.as_deref().filter(|s| !s.is_empty()) {
        Some(search) => {
            let needle = search.to_lowercase();
            name_en.to_lowercase().contains(&needle) || name_ar.contains(search)
        }
        None => true,
    }
}

#[async_trait]
impl EntityGateway for MemoryGateway {
    async fn list_products(&self, filter: &ListFilter) -> GatewayResult<Paginated<ProductSummary>> {
        self.respond(EntityKind::Product, filter).await?;

        let items: Vec<&ProductSummary> = self
            .products
            .iter()
            .filter(|p| match filter.is_active {
                Some(wanted) => p.is_active.unwrap_or(true) == wanted,
                None => true,
            })
            .filter(|p| match filter.status {
                Some(wanted) => p.status.unwrap_or(EntityStatus::Approved) == wanted,
                None => true,
            })
            .filter(|p| matches_search(&p.name_en, &p.name_ar, filter))
            .collect();
        Ok(page(items, filter))
    }

    async fn list_stores(&self, filter: &ListFilter) -> GatewayResult<Paginated<StoreSummary>> {
        self.respond(EntityKind::Store, filter).await?;

        let items: Vec<&StoreSummary> = self
            .stores
            .iter()
            .filter(|s| match filter.is_active {
                Some(wanted) => s.is_active.unwrap_or(true) == wanted,
                None => true,
            })
            .filter(|s| matches_search(&s.name_en, &s.name_ar, filter))
            .collect();
        Ok(page(items, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, active: bool, status: EntityStatus) -> ProductSummary {
        ProductSummary {
            id: id.to_string(),
            name_en: format!("Product {}", id),
            name_ar: format!("منتج {}", id),
            images: vec![],
            price: 1.0,
            currency_code: "KWD".to_string(),
            qty: 1,
            is_active: Some(active),
            status: Some(status),
        }
    }

    #[tokio::test]
    async fn test_filters_like_the_api() {
        let gateway = MemoryGateway::new().with_products(vec![
            product("a", true, EntityStatus::Approved),
            product("b", false, EntityStatus::Approved),
            product("c", true, EntityStatus::Pending),
        ]);

        let filter = ListFilter::active().with_status(EntityStatus::Approved);
        let page = gateway.list_products(&filter).await.unwrap();

        let ids: Vec<_> = page.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(gateway.calls(), 1);
        assert_eq!(gateway.requests(), vec![(EntityKind::Product, filter)]);
    }

    #[tokio::test]
    async fn test_paging_and_search() {
        let gateway = MemoryGateway::new().with_products(
            (1..=5)
                .map(|i| product(&i.to_string(), true, EntityStatus::Approved))
                .collect(),
        );

        let filter = ListFilter {
            page: Some(2),
            ..ListFilter::default()
        }
        .with_limit(2);
        let page = gateway.list_products(&filter).await.unwrap();
        let ids: Vec<_> = page.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
        assert_eq!(page.total, 5);

        let found = gateway
            .list_products(&ListFilter::default().with_search("product 5"))
            .await
            .unwrap();
        assert_eq!(found.data.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let gateway = MemoryGateway::new()
            .failing(EntityKind::Store, GatewayError::Timeout)
            .failing_call(1, GatewayError::RateLimited);

        assert_eq!(
            gateway.list_products(&ListFilter::active()).await,
            Err(GatewayError::RateLimited)
        );
        assert!(gateway.list_products(&ListFilter::active()).await.is_ok());
        assert_eq!(
            gateway.list_stores(&ListFilter::active()).await,
            Err(GatewayError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_gate_holds_requests() {
        let gate = Gate::closed();
        let gateway = Arc::new(MemoryGateway::new().gated(gate.clone()));

        let pending = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.list_stores(&ListFilter::active()).await }
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert!(!gate.is_open());

        gate.open();
        let page = pending.await.unwrap().unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_catalog_fixture() {
        let gateway = MemoryGateway::from_json(
            r#"{"products": [{"id": "p1", "nameEn": "Mug", "nameAr": "كوب"}]}"#,
        )
        .unwrap();
        assert_eq!(gateway.products.len(), 1);
        assert!(gateway.stores.is_empty());
        assert!(MemoryGateway::from_json("[").is_err());
    }
}
