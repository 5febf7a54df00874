//! Load/save round-trip over documents saved by the console

use guide_document::{Block, Document, PickerBlockPayload};
use serde_json::json;

fn guide_fixture() -> &'static str {
    r#"{
        "time": 1717171717171,
        "blocks": [
            {"id": "h1", "type": "header", "data": {"text": "Gift ideas", "level": 2}},
            {"id": "p1", "type": "paragraph", "data": {"text": "Our picks for <b>Eid</b>."}},
            {"id": "x1", "type": "productPlugin", "data": {
                "id": "p1", "nameEn": "Mug", "nameAr": "كوب", "images": "/m.png",
                "price": 5, "currencyCode": "KWD", "qty": 10
            }},
            {"id": "x2", "type": "productPlugin", "data": {}},
            {"id": "s1", "type": "StorePlugin", "data": {
                "id": 12, "nameEn": "Corner", "nameAr": "الزاوية", "storeLogo": "/c.png",
                "locationEn": "Salmiya", "locationAr": "السالمية",
                "countryCode": "+965", "mobileNumber": "99998888",
                "images": [{"path": "/c1.png"}]
            }},
            {"id": "l1", "type": "list", "data": {"style": "unordered", "items": ["a", "b"]}}
        ],
        "version": "2.30.7"
    }"#
}

#[test]
fn test_load_save_load_is_identity() {
    let doc = Document::load(Some(guide_fixture())).unwrap();
    assert_eq!(doc.len(), 6);

    let saved = doc.to_json().unwrap();
    let reloaded = Document::load(Some(&saved)).unwrap();

    assert_eq!(reloaded, doc);
    assert_eq!(reloaded.to_json().unwrap(), saved);
}

#[test]
fn test_empty_document_scenario() {
    let doc = Document::load(None).unwrap();
    assert_eq!(doc.len(), 0);

    let saved = doc.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value, json!({"blocks": []}));
}

#[test]
fn test_payloads_survive_typed_round_trip() {
    let doc = Document::load(Some(guide_fixture())).unwrap();

    let rewritten: Vec<Block> = doc
        .blocks
        .iter()
        .map(|block| match block.type_tag.as_str() {
            "productPlugin" | "StorePlugin" => {
                let payload = PickerBlockPayload::from_data(&block.data);
                block.with_data(payload.to_data())
            }
            _ => block.clone(),
        })
        .collect();
    let rewritten = doc.with_blocks(rewritten);

    let reloaded = Document::load(Some(&rewritten.to_json().unwrap())).unwrap();
    for (before, after) in rewritten.blocks.iter().zip(&reloaded.blocks) {
        assert_eq!(before.type_tag, after.type_tag);
        assert_eq!(
            PickerBlockPayload::from_data(&before.data),
            PickerBlockPayload::from_data(&after.data)
        );
    }

    let store = PickerBlockPayload::from_data(&reloaded.blocks[4].data);
    assert_eq!(store.id.as_deref(), Some("12"));
    assert_eq!(store.image_path.as_deref(), Some("/c.png"));
}
