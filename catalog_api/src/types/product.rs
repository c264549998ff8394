use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub type ProductID = i64;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductID,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub price: f64,

    #[serde(default)]
    pub discount_percentage: f64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub stock: u32,

    // Some categories (groceries, for one) come back without a brand.
    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub thumbnail: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProductMeta>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl Product {
    /// `meta.createdAt`, falling back to `meta.updatedAt`, as raw text.
    pub fn timestamp_text(&self) -> Option<&str> {
        let meta = self.meta.as_ref()?;
        meta.created_at
            .as_deref()
            .or(meta.updated_at.as_deref())
    }

    /// Parsed creation timestamp, if present and valid RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.meta
            .as_ref()?
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}
