//! Store picker: active stores with a logo/location/contact card

use crate::picker::{PickerBlock, PickerEntity};
use crate::{BlockKind, FetchedEntities, PluginConfig};
use guide_document::PickerBlockPayload;
use guide_gateway::{EntityKind, ListFilter, StoreSummary};
use guide_render::VNode;

pub type StorePickerBlock = PickerBlock<StoreSummary>;

const LOCATION_EN: &str = "locationEn";
const LOCATION_AR: &str = "locationAr";
const COUNTRY_CODE: &str = "countryCode";
const MOBILE_NUMBER: &str = "mobileNumber";

impl PickerEntity for StoreSummary {
    const ENTITY: EntityKind = EntityKind::Store;
    const BLOCK: BlockKind = BlockKind::StorePicker;
    const ROOT_CLASS: &'static str = "store-picker";
    const PLACEHOLDER: &'static str = "Select a store";
    const LOAD_ERROR: &'static str = "Failed to load stores.";

    fn id(&self) -> &str {
        &self.id
    }

    fn list_filter() -> ListFilter {
        ListFilter::active()
    }

    fn is_selectable(&self) -> bool {
        self.is_active != Some(false)
    }

    fn take_list(entities: FetchedEntities) -> Option<Vec<Self>> {
        match entities {
            FetchedEntities::Stores(stores) => Some(stores),
            FetchedEntities::Products(_) => None,
        }
    }

    fn to_payload(&self) -> PickerBlockPayload {
        PickerBlockPayload {
            id: Some(self.id.clone()),
            name_en: Some(self.name_en.clone()),
            name_ar: Some(self.name_ar.clone()),
            image_path: Some(self.store_logo.clone()).filter(|path| !path.is_empty()),
            ..PickerBlockPayload::empty()
        }
        .with_extra(LOCATION_EN, self.location_en.clone())
        .with_extra(LOCATION_AR, self.location_ar.clone())
        .with_extra(COUNTRY_CODE, self.country_code.clone())
        .with_extra(MOBILE_NUMBER, self.mobile_number.clone())
    }

    fn card(payload: &PickerBlockPayload, config: &PluginConfig) -> VNode {
        let text = |key: &str| payload.extra_text(key).unwrap_or_default();
        let language = config.language;

        let name = language
            .pick(
                payload.name_en.as_deref().unwrap_or_default(),
                payload.name_ar.as_deref().unwrap_or_default(),
            )
            .to_string();
        let location = language
            .pick(&text(LOCATION_EN), &text(LOCATION_AR))
            .to_string();
        let contact = format!("{} {}", text(COUNTRY_CODE), text(MOBILE_NUMBER))
            .trim()
            .to_string();
        let logo = config.asset_url(payload.image_path.as_deref().unwrap_or_default());

        VNode::element("div")
            .with_class("store-card flex items-center gap-4 p-4 border rounded-lg bg-white shadow mt-4")
            .with_child(
                VNode::element("img")
                    .with_attr("src", logo)
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
                            .with_class("location text-sm text-gray-500")
                            .with_child(VNode::text(location)),
                    )
                    .with_child(
                        VNode::element("p")
                            .with_class("contact text-sm text-gray-500")
                            .with_child(VNode::text(contact)),
                    ),
            )
    }
}
