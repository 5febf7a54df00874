//! Wire types of the catalog list endpoints.

use guide_common::Bilingual;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Which entity list a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Store,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Product => f.write_str("product"),
            EntityKind::Store => f.write_str("store"),
        }
    }
}

/// Review status of a catalog entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStatus {
    Approved,
    Pending,
    Rejected,
    /// Any status this client does not know about
    #[serde(other)]
    Other,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Approved => "Approved",
            EntityStatus::Pending => "Pending",
            EntityStatus::Rejected => "Rejected",
            EntityStatus::Other => "Other",
        }
    }
}

/// Pagination and filter query of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Matched against the English name by the API
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub status: Option<EntityStatus>,
}

impl ListFilter {
    /// Active entities only
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query-string pairs in the API's parameter names
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("nameEn", search.clone()));
        }
        if let Some(is_active) = self.is_active {
            pairs.push(("isActive", is_active.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// `{ data, total }` list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self { data, total }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "null_default")]
    pub path: String,
}

/// Product as listed by `GET /v1/api/products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name_en: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name_ar: String,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<ImageRef>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub currency_code: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub qty: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl ProductSummary {
    /// Path of the first image, empty when there is none
    pub fn primary_image(&self) -> &str {
        self.images.first().map(|i| i.path.as_str()).unwrap_or("")
    }
}

impl Bilingual for ProductSummary {
    fn name_en(&self) -> &str {
        &self.name_en
    }

    fn name_ar(&self) -> &str {
        &self.name_ar
    }
}

/// Store as listed by `GET /v1/api/stores`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name_en: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name_ar: String,
    #[serde(default, deserialize_with = "null_default")]
    pub store_logo: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location_en: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location_ar: String,
    #[serde(default, deserialize_with = "null_default")]
    pub country_code: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mobile_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Bilingual for StoreSummary {
    fn name_en(&self) -> &str {
        &self.name_en
    }

    fn name_ar(&self) -> &str {
        &self.name_ar
    }
}

/// Store ids are numeric in some API versions
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Prices arrive as numbers or as decimal strings ("12.500")
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("price out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {}", s))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("invalid price: {}", other))),
    }
}

/// `null` reads as the field's default, like a missing key
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Phone numbers are sometimes sent as numbers
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected text, got {}", other))),
    }
}

/// Stock counts arrive as integers, floats ("10.0") or strings
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| serde::de::Error::custom("qty out of range")),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i64))
                .map_err(|_| serde::de::Error::custom(format!("invalid qty: {}", s)))
        }
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("invalid qty: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_filter_query() {
        let filter = ListFilter::active().with_status(EntityStatus::Approved);
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("isActive", "true".to_string()),
                ("status", "Approved".to_string())
            ]
        );
    }

    #[test]
    fn test_paging_and_search_query() {
        let filter = ListFilter {
            page: Some(2),
            ..ListFilter::active()
        }
        .with_limit(20)
        .with_search("mug");
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
                ("nameEn", "mug".to_string()),
                ("isActive", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_product_list() {
        let body = json!({
            "data": [{
                "id": "p1", "nameEn": "Mug", "nameAr": "كوب",
                "price": "5.250", "currencyCode": "KWD", "qty": 10,
                "images": [{"path": "/m.png"}, {"path": "/m2.png"}],
                "status": "Approved", "isActive": true, "description": "ignored"
            }],
            "total": 1
        });

        let page: Paginated<ProductSummary> = serde_json::from_value(body).unwrap();
        let mug = &page.data[0];
        assert_eq!(page.total, 1);
        assert_eq!(mug.price, 5.25);
        assert_eq!(mug.primary_image(), "/m.png");
        assert_eq!(mug.status, Some(EntityStatus::Approved));
    }

    #[test]
    fn test_parse_store_with_numeric_id() {
        let store: StoreSummary = serde_json::from_value(json!({
            "id": 12, "nameEn": "Corner", "nameAr": "الزاوية", "storeLogo": "/c.png"
        }))
        .unwrap();
        assert_eq!(store.id, "12");
        assert_eq!(store.country_code, "");
        assert_eq!(store.is_active, None);
    }

    #[test]
    fn test_null_fields_do_not_fail_the_page() {
        let body = json!({
            "data": [
                {"id": "p1", "nameEn": "Mug", "nameAr": "كوب", "price": 5, "qty": "3"},
                {
                    "id": "p2", "nameEn": "Pen", "nameAr": null, "qty": null,
                    "currencyCode": null, "images": null, "price": null
                },
                {"id": "p3", "nameEn": "Cup", "qty": 2.0, "images": [{"path": null}]}
            ],
            "total": 3
        });

        let page: Paginated<ProductSummary> = serde_json::from_value(body).unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].qty, 3);
        let pen = &page.data[1];
        assert_eq!(pen.name_ar, "");
        assert_eq!(pen.qty, 0);
        assert_eq!(pen.currency_code, "");
        assert_eq!(pen.primary_image(), "");
        assert_eq!(page.data[2].qty, 2);
        assert_eq!(page.data[2].primary_image(), "");
    }

    #[test]
    fn test_store_with_null_logo() {
        let page: Paginated<StoreSummary> = serde_json::from_value(json!({
            "data": [{
                "id": "s1", "nameEn": "Corner", "nameAr": "الزاوية", "storeLogo": null,
                "locationEn": null, "mobileNumber": 96550000000u64, "isActive": null
            }]
        }))
        .unwrap();
        let store = &page.data[0];
        assert_eq!(store.store_logo, "");
        assert_eq!(store.location_en, "");
        assert_eq!(store.mobile_number, "96550000000");
        assert_eq!(store.is_active, None);
    }
}
