//! Product picker: active, approved products with a price/quantity card

use crate::picker::{PickerBlock, PickerEntity};
use crate::{BlockKind, FetchedEntities, PluginConfig};
use guide_common::Language;
use guide_document::PickerBlockPayload;
use guide_gateway::{EntityKind, EntityStatus, ListFilter, ProductSummary};
use guide_render::VNode;
use serde_json::Value;

pub type ProductPickerBlock = PickerBlock<ProductSummary>;

const PRICE: &str = "price";
const CURRENCY_CODE: &str = "currencyCode";
const QTY: &str = "qty";

/// Minor-unit digits of an ISO 4217 currency
pub fn currency_decimals(code: &str) -> usize {
    match code.trim().to_ascii_uppercase().as_str() {
        "KWD" | "BHD" | "OMR" | "JOD" | "IQD" | "LYD" | "TND" => 3,
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" => 0,
        _ => 2,
    }
}

/// `"KWD 12.500"`. Code first, no symbol substitution.
pub fn format_price(amount: f64, currency_code: &str) -> String {
    let digits = currency_decimals(currency_code);
    let code = currency_code.trim();
    if code.is_empty() {
        format!("{:.*}", digits, amount)
    } else {
        format!("{} {:.*}", code, digits, amount)
    }
}

/// Saved prices are numbers, or decimal strings in older guides
fn payload_amount(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn payload_label(payload: &PickerBlockPayload, language: Language) -> String {
    language
        .pick(
            payload.name_en.as_deref().unwrap_or_default(),
            payload.name_ar.as_deref().unwrap_or_default(),
        )
        .to_string()
}

impl PickerEntity for ProductSummary {
    const ENTITY: EntityKind = EntityKind::Product;
    const BLOCK: BlockKind = BlockKind::ProductPicker;
    const ROOT_CLASS: &'static str = "product-picker";
    const PLACEHOLDER: &'static str = "Select a product";
    const LOAD_ERROR: &'static str = "Failed to load products.";

    fn id(&self) -> &str {
        &self.id
    }

    fn list_filter() -> ListFilter {
        ListFilter::active().with_status(EntityStatus::Approved)
    }

    fn is_selectable(&self) -> bool {
        self.is_active != Some(false)
            && matches!(self.status, None | Some(EntityStatus::Approved))
    }

    fn take_list(entities: FetchedEntities) -> Option<Vec<Self>> {
        match entities {
            FetchedEntities::Products(products) => Some(products),
            FetchedEntities::Stores(_) => None,
        }
    }

    fn to_payload(&self) -> PickerBlockPayload {
        let image = self.primary_image();
        PickerBlockPayload {
            id: Some(self.id.clone()),
            name_en: Some(self.name_en.clone()),
            name_ar: Some(self.name_ar.clone()),
            image_path: Some(image.to_string()).filter(|path| !path.is_empty()),
            ..PickerBlockPayload::empty()
        }
        .with_extra(PRICE, self.price)
        .with_extra(CURRENCY_CODE, self.currency_code.clone())
        .with_extra(QTY, self.qty)
    }

    fn card(payload: &PickerBlockPayload, config: &PluginConfig) -> VNode {
        let name = payload_label(payload, config.language);
        let currency = payload.extra_text(CURRENCY_CODE).unwrap_or_default();
        let price = payload_amount(payload.extra(PRICE))
            .map(|amount| format_price(amount, &currency))
            .unwrap_or_default();
        let qty = payload.extra_text(QTY).unwrap_or_else(|| "0".to_string());
        let image = config.asset_url(payload.image_path.as_deref().unwrap_or_default());

        VNode::element("div")
            .with_class("product-card flex items-center gap-4 p-4 border rounded-lg bg-white shadow mt-4")
            .with_child(
                VNode::element("img")
                    .with_attr("src", image)
                    .with_attr("alt", name.clone())
                    .with_class("w-24 h-24 rounded-md object-cover"),
            )
            .with_child(
                VNode::element("div")
                    .with_child(
                        VNode::element("h3")
                            .with_class("text-lg font-semibold")
                            .with_child(VNode::text(name)),
                    )
                    .with_child(
                        VNode::element("p")
                            .with_class("price text-gray-500")
                            .with_child(VNode::text(price)),
                    )
                    .with_child(
                        VNode::element("p")
                            .with_class("qty text-gray-500")
                            .with_child(VNode::text(format!("Qty: {}", qty))),
                    ),
            )
    }
}
