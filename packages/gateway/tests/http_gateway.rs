//! HttpGateway against a local catalog API

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use guide_gateway::{
    EntityGateway, EntityStatus, GatewayConfig, GatewayError, HttpGateway, ListFilter,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Recorded {
    fn record(&self, query: HashMap<String, String>, headers: &HeaderMap) {
        self.queries.lock().unwrap().push(query);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth.lock().unwrap().push(auth);
    }
}

async fn products(
    State(recorded): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    recorded.record(query, &headers);
    Json(json!({
        "data": [{
            "id": "p1", "nameEn": "Mug", "nameAr": "كوب", "price": 5,
            "currencyCode": "KWD", "qty": 10, "images": [{"path": "/m.png"}]
        }],
        "total": 1
    }))
}

async fn stores_down(
    State(recorded): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    recorded.record(query, &headers);
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn gateway(base_url: String, max_retries: usize, token: Option<&str>) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        base_url,
        access_token: token.map(str::to_string),
        request_timeout_ms: 5_000,
        max_retries,
    })
    .unwrap()
}

#[tokio::test]
async fn test_lists_products_with_filter_and_token() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/v1/api/products", get(products))
        .with_state(recorded.clone());
    let base_url = serve(router).await;

    let client = gateway(base_url, 0, Some("secret"));
    let filter = ListFilter::active().with_status(EntityStatus::Approved);
    let page = client.list_products(&filter).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].name_en, "Mug");
    assert_eq!(page.data[0].primary_image(), "/m.png");

    let queries = recorded.queries.lock().unwrap();
    assert_eq!(queries[0].get("isActive").map(String::as_str), Some("true"));
    assert_eq!(queries[0].get("status").map(String::as_str), Some("Approved"));
    assert_eq!(
        recorded.auth.lock().unwrap()[0].as_deref(),
        Some("Bearer secret")
    );
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/v1/api/stores", get(stores_down))
        .with_state(recorded.clone());
    let base_url = serve(router).await;

    let client = gateway(base_url, 1, None);
    let err = client.list_stores(&ListFilter::active()).await.unwrap_err();

    assert_eq!(
        err,
        GatewayError::Http {
            status: 503,
            body: "maintenance".to_string()
        }
    );
    assert_eq!(recorded.queries.lock().unwrap().len(), 2);
    assert_eq!(recorded.auth.lock().unwrap()[0], None);
}

#[tokio::test]
async fn test_missing_route_is_not_retried() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/v1/api/stores", get(stores_down))
        .with_state(recorded.clone());
    let base_url = serve(router).await;

    let client = gateway(base_url, 3, None);
    let err = client
        .list_products(&ListFilter::active())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Http { status: 404, .. }));
    assert!(recorded.queries.lock().unwrap().is_empty());
}
