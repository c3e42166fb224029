//! # Catalog
//!
//! Provider catalog records (ITEM and IMAGE objects) and the flattened item
//! list the storefront renders.
//!
//! Items reference images by object id, so the join builds an id → url map
//! from the IMAGE objects first and then resolves each item's `image_ids`.

use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ITEM_TYPE: &str = "ITEM";
pub const IMAGE_TYPE: &str = "IMAGE";

/// A raw catalog object as returned by the listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: String,
    #[serde(default)]
    pub item_data: Option<ItemData>,
    #[serde(default)]
    pub image_data: Option<ImageData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variations: Vec<VariationObject>,
    #[serde(default)]
    pub image_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariationObject {
    pub id: String,
    #[serde(default)]
    pub item_variation_data: Option<VariationData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariationData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_money: Option<PriceMoney>,
}

/// Price as the provider sends it; both fields may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceMoney {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

/// An item as served to the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub variations: Vec<Variation>,
    /// Resolved image URLs, in the item's declared order
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variation {
    pub id: String,
    pub name: String,
    /// Cents
    pub price: i64,
    pub currency: String,
}

impl From<&VariationObject> for Variation {
    fn from(object: &VariationObject) -> Self {
        let data = object.item_variation_data.as_ref();
        let price = data.and_then(|d| d.price_money.as_ref());

        Self {
            id: object.id.clone(),
            name: data.and_then(|d| d.name.clone()).unwrap_or_default(),
            price: price.and_then(|p| p.amount).unwrap_or(0),
            currency: price
                .and_then(|p| p.currency.clone())
                .unwrap_or_else(|| Currency::USD.as_str().to_string()),
        }
    }
}

/// Map of IMAGE object id → image URL. Images without a URL are left out.
pub fn image_urls(objects: &[CatalogObject]) -> HashMap<&str, &str> {
    objects
        .iter()
        .filter(|o| o.object_type == IMAGE_TYPE)
        .filter_map(|o| {
            let url = o.image_data.as_ref()?.url.as_deref()?;
            Some((o.id.as_str(), url))
        })
        .collect()
}

/// Join ITEM objects with their IMAGE objects into storefront items.
///
/// Image ids that resolve to nothing are dropped; item order follows the
/// provider's order.
pub fn build_catalog(objects: &[CatalogObject]) -> Vec<CatalogItem> {
    let images = image_urls(objects);

    objects
        .iter()
        .filter(|o| o.object_type == ITEM_TYPE)
        .filter_map(|o| {
            let data = o.item_data.as_ref()?;
            Some(CatalogItem {
                id: o.id.clone(),
                name: data.name.clone().unwrap_or_default(),
                description: data.description.clone().unwrap_or_default(),
                variations: data.variations.iter().map(Variation::from).collect(),
                images: data
                    .image_ids
                    .iter()
                    .filter_map(|id| images.get(id.as_str()).map(|url| url.to_string()))
                    .collect(),
            })
        })
        .collect()
}
