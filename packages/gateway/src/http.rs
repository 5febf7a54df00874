//! REST client for the console's catalog API.

use crate::{
    EntityGateway, EntityKind, GatewayError, GatewayResult, ListFilter, Paginated, ProductSummary,
    StoreSummary,
};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const PRODUCTS_PATH: &str = "/v1/api/products";
const STORES_PATH: &str = "/v1/api/stores";

/// Connection settings for [`HttpGateway`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// API origin, e.g. `https://api.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `Authorization: Bearer <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Extra attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_base_url() -> String {
    "http://localhost:8008".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> usize {
    2
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Catalog API client
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    access_token: Option<String>,
    max_retries: usize,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("guide-editor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token,
            max_retries: config.max_retries,
        })
    }

    async fn list<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        path: &str,
        filter: &ListFilter,
    ) -> GatewayResult<Paginated<T>> {
        let url = format!("{}{}", self.base_url, path);
        let query = filter.query_pairs();

        let page: Paginated<T> = (|| async { self.send_request(&url, &query).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_delay(Duration::from_secs(5))
                    .with_max_times(self.max_retries)
                    .with_jitter(),
            )
            .when(|e: &GatewayError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    %kind,
                    "catalog list failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await?;

        debug!(%kind, count = page.data.len(), total = page.total, "catalog list fetched");
        Ok(page)
    }

    async fn send_request<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> GatewayResult<Paginated<T>> {
        let mut request = self.http.get(url).query(query);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await.map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<Paginated<T>>()
                .await
                .map_err(|e| GatewayError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GatewayError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(GatewayError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(GatewayError::Http { status, body })
            }
        }
    }
}

#[async_trait]
impl EntityGateway for HttpGateway {
    async fn list_products(&self, filter: &ListFilter) -> GatewayResult<Paginated<ProductSummary>> {
        self.list(EntityKind::Product, PRODUCTS_PATH, filter).await
    }

    async fn list_stores(&self, filter: &ListFilter) -> GatewayResult<Paginated<StoreSummary>> {
        self.list(EntityKind::Store, STORES_PATH, filter).await
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_decode() {
        GatewayError::Serde(e.to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}
