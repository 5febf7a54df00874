//! # Document
//!
//! In-memory form of a persisted guide document.
//!
//! ## Lifecycle
//!
//! ```text
//! JSON string ─load→ Document ─(editor mounts one plugin per block)→ ...
//!                        ↑                                            │
//!                        └──────────── to_json ←── pull save() ───────┘
//! ```

use crate::DocumentFormatError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Block payload. Always a JSON object; its shape belongs to the plugin.
pub type BlockData = Map<String, Value>;

/// Ordered sequence of blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Save timestamp written by older editors. Kept as loaded, never generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Editor format version, kept as loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One unit of document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block id assigned by older editors. Not used for addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(default)]
    pub data: BlockData,
}

impl Block {
    pub fn new(type_tag: impl Into<String>, data: BlockData) -> Self {
        Self {
            id: None,
            type_tag: type_tag.into(),
            data,
        }
    }

    /// Same block with its payload replaced
    pub fn with_data(&self, data: BlockData) -> Self {
        Self {
            id: self.id.clone(),
            type_tag: self.type_tag.clone(),
            data,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted document.
    ///
    /// `None`, an empty string, or whitespace yields a document with zero
    /// blocks. Anything else must be a valid document object.
    pub fn load(json: Option<&str>) -> Result<Self, DocumentFormatError> {
        let source = match json.map(str::trim) {
            None | Some("") => return Ok(Self::new()),
            Some(source) => source,
        };

        let document: Document =
            serde_json::from_str(source).map_err(DocumentFormatError::Parse)?;
        debug!(blocks = document.blocks.len(), "loaded document");
        Ok(document)
    }

    /// Serialize to the persisted JSON shape.
    ///
    /// Output depends only on the in-memory value: payload keys are emitted
    /// in sorted order and nothing is added that was not loaded or edited.
    pub fn to_json(&self) -> Result<String, DocumentFormatError> {
        serde_json::to_string(self).map_err(DocumentFormatError::Serialize)
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Copy of this document's metadata with a new block sequence
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            time: self.time,
            blocks,
            version: self.version.clone(),
        }
    }
}

impl From<Value> for Block {
    /// Convenience for tests and fixtures: `{"type": ..., "data": {...}}`.
    /// Missing or non-object parts become empty.
    fn from(value: Value) -> Self {
        let type_tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let data = match value.get("data") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        Block::new(type_tag, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_absent_or_blank_is_empty() {
        assert!(Document::load(None).unwrap().is_empty());
        assert!(Document::load(Some("")).unwrap().is_empty());
        assert!(Document::load(Some("  \n")).unwrap().is_empty());
    }

    #[test]
    fn test_load_empty_object() {
        // The original host passed `{}` when a guide had no content yet
        let doc = Document::load(Some("{}")).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_json().unwrap(), r#"{"blocks":[]}"#);
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let err = Document::load(Some("{\"blocks\": [")).unwrap_err();
        assert!(matches!(err, DocumentFormatError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_non_object_data() {
        let result = Document::load(Some(r#"{"blocks":[{"type":"paragraph","data":"oops"}]}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_block_order_is_preserved() {
        let doc = Document::new()
            .with_block(Block::from(json!({"type": "header", "data": {"text": "A", "level": 2}})))
            .with_block(Block::from(json!({"type": "paragraph", "data": {"text": "B"}})))
            .with_block(Block::from(json!({"type": "productPlugin", "data": {}})));

        let reloaded = Document::load(Some(&doc.to_json().unwrap())).unwrap();
        let tags: Vec<_> = reloaded.blocks.iter().map(|b| b.type_tag.as_str()).collect();
        assert_eq!(tags, vec!["header", "paragraph", "productPlugin"]);
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_legacy_fields_are_preserved_not_injected() {
        let source = r#"{"time":1712000000000,"blocks":[{"id":"aB3","type":"paragraph","data":{"text":"hi"}}],"version":"2.30.7"}"#;
        let doc = Document::load(Some(source)).unwrap();
        assert_eq!(doc.time, Some(1712000000000));
        assert_eq!(doc.blocks[0].id.as_deref(), Some("aB3"));
        assert_eq!(doc.to_json().unwrap(), source);

        let fresh = Document::new().with_block(Block::new("paragraph", Map::new()));
        assert_eq!(
            fresh.to_json().unwrap(),
            r#"{"blocks":[{"type":"paragraph","data":{}}]}"#
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut data = Map::new();
        data.insert("qty".to_string(), json!(3));
        data.insert("id".to_string(), json!("p1"));
        let doc = Document::new().with_block(Block::new("productPlugin", data));

        let first = doc.to_json().unwrap();
        let second = doc.clone().to_json().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"blocks":[{"type":"productPlugin","data":{"id":"p1","qty":3}}]}"#);
    }
}
