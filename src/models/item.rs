use serde::{Deserialize, Deserializer, Serialize};

/// A product item as served by the item routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    /// Decimal rendered by the server, e.g. "50.00"
    pub price: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub image_ids: Vec<i64>,
}

/// Banner attached to an item at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub image_id: i64,
    pub order: i64,
}

/// Request body for creating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub category: i64,
    pub price: i64,
    pub description: String,
    pub banners: Vec<Banner>,
}

/// Response for creating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemResponse {
    pub item_id: i64,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
