//! # Picker Block Payload
//!
//! Shared payload shape of the product and store picker blocks.
//!
//! ```text
//! { "id": "p1", "nameEn": "Mug", "nameAr": "كوب", "imagePath": "/m.png",
//!   "price": 5, "currencyCode": "KWD", "qty": 10 }          ← extra fields
//! ```
//!
//! A payload with a non-empty `id` is *resolved*; anything else is an
//! unresolved placeholder. Fields the payload does not model are kept in
//! `extra_fields` and written back flat, which is the shape documents saved
//! by earlier versions of the console already use.

use crate::BlockData;
use serde_json::Value;
use std::collections::BTreeMap;

const ID: &str = "id";
const NAME_EN: &str = "nameEn";
const NAME_AR: &str = "nameAr";
const IMAGE_PATH: &str = "imagePath";

/// Older documents stored the image under the entity's own field name
const IMAGE_PATH_ALIASES: [&str; 2] = ["images", "storeLogo"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickerBlockPayload {
    pub id: Option<String>,
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub image_path: Option<String>,
    /// Plugin-specific fields (price/qty/currency, location/contact, ...)
    pub extra_fields: BTreeMap<String, Value>,
}

impl PickerBlockPayload {
    /// An unresolved payload
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a payload from block data. Never fails: unknown or oddly typed
    /// fields are carried in `extra_fields`.
    pub fn from_data(data: &BlockData) -> Self {
        let mut payload = Self::default();
        let mut aliased_image = None;

        for (key, value) in data {
            match key.as_str() {
                ID => match scalar_text(value) {
                    Some(id) => payload.id = Some(id),
                    None if value.is_null() => {}
                    None => {
                        payload.extra_fields.insert(key.clone(), value.clone());
                    }
                },
                NAME_EN => payload.name_en = string_field(&mut payload.extra_fields, key, value),
                NAME_AR => payload.name_ar = string_field(&mut payload.extra_fields, key, value),
                IMAGE_PATH => {
                    payload.image_path = string_field(&mut payload.extra_fields, key, value)
                }
                alias if IMAGE_PATH_ALIASES.contains(&alias) && value.is_string() => {
                    aliased_image = value.as_str().map(str::to_string);
                }
                _ => {
                    payload.extra_fields.insert(key.clone(), value.clone());
                }
            }
        }

        if payload.image_path.is_none() {
            payload.image_path = aliased_image;
        }
        payload
    }

    /// Write the payload back as flat block data
    pub fn to_data(&self) -> BlockData {
        let mut data: BlockData = self
            .extra_fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let known = [
            (ID, &self.id),
            (NAME_EN, &self.name_en),
            (NAME_AR, &self.name_ar),
            (IMAGE_PATH, &self.image_path),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                data.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        data
    }

    pub fn is_resolved(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra_fields.get(key)
    }

    /// Extra field rendered as display text (strings verbatim, numbers and
    /// booleans via their JSON form)
    pub fn extra_text(&self, key: &str) -> Option<String> {
        self.extra(key).and_then(scalar_text)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_fields.insert(key.into(), value.into());
        self
    }
}

/// Ids arrive as strings from the product API and as numbers from older
/// store payloads; both are kept as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(
    extra: &mut BTreeMap<String, Value>,
    key: &str,
    value: &Value,
) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => {
            extra.insert(key.to_string(), other.clone());
            None
        }
    }
}
