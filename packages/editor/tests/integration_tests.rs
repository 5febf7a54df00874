//! Integration tests for the editor crate

use guide_common::Language;
use guide_document::Document;
use guide_editor::{
    EditorConfig, EditorError, EditorEvent, EditorHost, FetchError, LifecycleState, SelectOutcome,
};
use guide_gateway::{EntityKind, Gate, GatewayError, MemoryGateway};
use guide_render::visitor::{error_messages, find_by_class, find_by_tag};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

const CATALOG: &str = r#"{
    "products": [
        { "id": "p1", "nameEn": "Mug", "nameAr": "كوب", "price": 5, "currencyCode": "KWD",
          "qty": 10, "images": [{ "path": "/m.png" }], "isActive": true, "status": "Approved" },
        { "id": "p2", "nameEn": "Plate", "nameAr": "صحن", "price": "2.5", "currencyCode": "USD",
          "qty": 3, "images": [], "isActive": true, "status": "Approved" }
    ],
    "stores": [
        { "id": 12, "nameEn": "Corner", "nameAr": "الزاوية", "storeLogo": "/c.png",
          "locationEn": "Salmiya", "locationAr": "السالمية", "countryCode": "+965",
          "mobileNumber": "5550000", "isActive": true }
    ]
}"#;

fn catalog() -> MemoryGateway {
    MemoryGateway::from_json(CATALOG).unwrap()
}

type Changes = Rc<RefCell<Vec<String>>>;

fn mount(value: &str, gateway: MemoryGateway, config: EditorConfig) -> (EditorHost, Changes) {
    let changes: Changes = Rc::default();
    let sink = changes.clone();
    let host = EditorHost::mount(
        value,
        move |json| sink.borrow_mut().push(json),
        Arc::new(gateway),
        config,
    )
    .unwrap();
    (host, changes)
}

fn card_texts(host: &EditorHost, class: &str) -> Vec<String> {
    let view = host.editor().unwrap().view();
    find_by_class(&view.nodes, class)
        .iter()
        .map(|card| card.text_content())
        .collect()
}

#[tokio::test]
async fn test_empty_document() {
    let (mut host, changes) = mount("", MemoryGateway::new(), EditorConfig::default());
    host.settle().await;

    assert_eq!(host.value(), r#"{"blocks":[]}"#);
    assert!(host.editor().unwrap().is_empty());
    assert!(changes.borrow().is_empty());
}

#[tokio::test]
async fn test_malformed_value_mounts_empty() {
    let (host, _) = mount("{blocks:", MemoryGateway::new(), EditorConfig::default());
    assert!(host.editor().unwrap().is_empty());
    assert_eq!(host.value(), r#"{"blocks":[]}"#);
}

#[tokio::test]
async fn test_single_resolved_product() {
    let (mut host, changes) = mount(
        r#"{"blocks":[{"type":"productPlugin","data":{"id":"p1"}}]}"#,
        catalog(),
        EditorConfig::default(),
    );
    let events = host.settle().await;
    assert!(matches!(&events[..], [EditorEvent::Fetched { changed: true, .. }]));

    let cards = card_texts(&host, "product-card");
    assert_eq!(cards.len(), 1);
    assert!(cards[0].contains("Mug"));
    assert!(cards[0].contains("KWD 5"));
    assert!(cards[0].contains("Qty: 10"));

    // Pre-selection copies the entity fields into the block
    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    let saved = Document::load(Some(&changes[0])).unwrap();
    let data = &saved.blocks[0].data;
    assert_eq!(data.get("id"), Some(&json!("p1")));
    assert_eq!(data.get("nameAr"), Some(&json!("كوب")));
    assert_eq!(data.get("currencyCode"), Some(&json!("KWD")));
}

#[tokio::test]
async fn test_round_trip_through_editor() {
    let input = json!({
        "time": 1700000000000_i64,
        "blocks": [
            { "id": "a1", "type": "header", "data": { "text": "Gifts", "level": 2 } },
            { "type": "productPlugin", "data": {} },
            { "type": "productPlugin", "data": { "id": "p2" } },
            { "type": "StorePlugin", "data": { "id": 12, "nameEn": "Corner", "storeLogo": "/c.png" } },
            { "type": "poll", "data": { "question": "?" } }
        ],
        "version": "2.30.7"
    })
    .to_string();

    let (mut host, _) = mount(&input, catalog(), EditorConfig::default());
    host.settle().await;

    let first = host.editor().unwrap().save();
    let second = Document::load(Some(&first.to_json().unwrap())).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.blocks.len(), 5);
    assert_eq!(second.blocks[0].id.as_deref(), Some("a1"));
    assert!(second.blocks[1].data.is_empty());
    assert_eq!(second.version.as_deref(), Some("2.30.7"));
}

#[tokio::test]
async fn test_fetch_failure_is_isolated() {
    let gateway = catalog().failing(EntityKind::Store, GatewayError::Http {
        status: 500,
        body: "boom".to_string(),
    });
    let (mut host, changes) = mount(
        r#"{"blocks":[
            {"type":"productPlugin","data":{}},
            {"type":"StorePlugin","data":{"id":"12","nameEn":"Corner"}},
            {"type":"productPlugin","data":{}}
        ]}"#,
        gateway,
        EditorConfig::default(),
    );
    let events = host.settle().await;
    assert_eq!(events.len(), 3);

    let editor = host.editor().unwrap();
    let ids = editor.instances();
    for id in &ids {
        assert_eq!(editor.state(*id), Some(LifecycleState::Interactive));
    }
    let view = editor.view();
    assert_eq!(error_messages(&view.nodes), vec!["Failed to load stores."]);

    assert_eq!(
        host.select(ids[0], "p1").unwrap(),
        SelectOutcome::Selected { changed: true }
    );
    assert_eq!(
        host.select(ids[2], "p2").unwrap(),
        SelectOutcome::Selected { changed: true }
    );
    assert_eq!(changes.borrow().len(), 2);

    let saved = Document::load(Some(host.value())).unwrap();
    assert_eq!(saved.blocks[0].data.get("id"), Some(&json!("p1")));
    assert_eq!(
        saved.blocks[1].data,
        json!({"id": "12", "nameEn": "Corner"}).as_object().cloned().unwrap()
    );
    assert_eq!(saved.blocks[2].data.get("id"), Some(&json!("p2")));
}

#[tokio::test]
async fn test_clearing_and_reselecting() {
    let (mut host, changes) = mount(
        r#"{"blocks":[{"type":"productPlugin","data":{}}]}"#,
        catalog(),
        EditorConfig::default(),
    );
    host.settle().await;
    let block = host.editor().unwrap().instance_at(0).unwrap();

    host.select(block, "p1").unwrap();
    host.select(block, "p2").unwrap();
    assert_eq!(card_texts(&host, "product-card").len(), 1);

    // Same entity again: no new serialization
    host.select(block, "p2").unwrap();
    assert_eq!(changes.borrow().len(), 2);

    host.select(block, "").unwrap();
    assert!(card_texts(&host, "product-card").is_empty());
    let saved = Document::load(Some(host.value())).unwrap();
    assert!(saved.blocks[0].data.get("id").is_none());
    assert_eq!(changes.borrow().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_completion() {
    let gateway = catalog().delayed(EntityKind::Product, Duration::from_millis(500));
    let (mut host, _) = mount(
        r#"{"blocks":[{"type":"productPlugin","data":{"id":"p1"}},{"type":"StorePlugin","data":{"id":"12"}}]}"#,
        gateway,
        EditorConfig::default(),
    );
    let editor = host.editor().unwrap();
    let (product, store) = (editor.instance_at(0).unwrap(), editor.instance_at(1).unwrap());

    let events = host.settle().await;
    let order: Vec<_> = events.iter().map(EditorEvent::instance).collect();
    assert_eq!(order, vec![store, product]);

    assert_eq!(card_texts(&host, "product-card").len(), 1);
    assert_eq!(card_texts(&host, "store-card").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout_renders_error() {
    let gate = Gate::closed();
    let config = EditorConfig {
        fetch_timeout_ms: 2_000,
        ..EditorConfig::default()
    };
    let (mut host, changes) = mount(
        r#"{"blocks":[{"type":"StorePlugin","data":{}}]}"#,
        catalog().gated(gate),
        config,
    );

    let events = host.settle().await;
    assert!(matches!(
        &events[..],
        [EditorEvent::FetchFailed { error: FetchError::Timeout(_), .. }]
    ));
    let view = host.editor().unwrap().view();
    assert_eq!(error_messages(&view.nodes), vec!["Failed to load stores."]);
    assert!(changes.borrow().is_empty());
}

#[tokio::test]
async fn test_block_removed_before_fetch_resolves() {
    let gate = Gate::closed();
    let gateway = Arc::new(catalog().gated(gate.clone()));
    let config = EditorConfig::default();
    let mut host = EditorHost::mount(
        r#"{"blocks":[{"type":"productPlugin","data":{"id":"p1"}}]}"#,
        |_| {},
        gateway.clone(),
        config,
    )
    .unwrap();

    let block = host.editor().unwrap().instance_at(0).unwrap();
    host.remove_block(block).unwrap();
    gate.open();

    assert!(host.settle().await.is_empty());
    assert_eq!(host.editor().unwrap().pending_fetches(), 0);
    assert!(host.editor().unwrap().is_empty());
}

#[tokio::test]
async fn test_destroy_with_fetch_in_flight() {
    let gate = Gate::closed();
    let (mut host, changes) = mount(
        r#"{"blocks":[{"type":"productPlugin","data":{"id":"p1"}}]}"#,
        catalog().gated(gate.clone()),
        EditorConfig::default(),
    );

    let block = host.editor().unwrap().instance_at(0).unwrap();

    assert!(host.destroy());
    gate.open();
    assert!(!host.process_next().await);
    assert!(!host.destroy());
    assert!(host.is_destroyed());
    assert!(matches!(
        host.select(block, "p1"),
        Err(EditorError::Destroyed)
    ));
    assert!(changes.borrow().is_empty());
}

#[tokio::test]
async fn test_language_toggle_discards_stale_fetch() {
    let gateway = Arc::new(catalog());
    let mut host = EditorHost::mount(
        r#"{"blocks":[{"type":"productPlugin","data":{}}]}"#,
        |_| {},
        gateway.clone(),
        EditorConfig::default(),
    )
    .unwrap();

    // Let the first fetch finish without applying it
    while gateway.calls() < 1 {
        tokio::task::yield_now().await;
    }
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    host.set_language(Language::Ar).unwrap();
    let events = host.settle().await;
    assert_eq!(events.len(), 1);
    assert_eq!(gateway.calls(), 2);

    let view = host.editor().unwrap().view();
    assert_eq!(view.nodes[0].attr("dir"), Some("rtl"));
    let options = find_by_tag(&view.nodes, "option");
    assert_eq!(options.len(), 3);
    assert_eq!(options[1].text_content(), "كوب");
}

#[tokio::test]
async fn test_language_toggle_keeps_selection() {
    let (mut host, changes) = mount(
        r#"{"blocks":[{"type":"productPlugin","data":{}}]}"#,
        catalog(),
        EditorConfig::default(),
    );
    host.settle().await;
    let block = host.editor().unwrap().instance_at(0).unwrap();
    assert!(host.select(block, "p2").unwrap().changed());
    let selected = host.value().to_string();

    host.set_language(Language::Ar).unwrap();
    host.settle().await;

    let editor = host.editor().unwrap();
    assert_eq!(editor.instance_at(0), Some(block));
    assert_eq!(editor.state(block), Some(LifecycleState::Interactive));
    assert_eq!(host.value(), selected);
    assert_eq!(changes.borrow().last(), Some(&selected));

    let cards = card_texts(&host, "product-card");
    assert_eq!(cards.len(), 1);
    assert!(cards[0].contains("صحن"));
}
