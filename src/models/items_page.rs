use serde::{Deserialize, Deserializer, Serialize};

use super::Item;

/// Paginated listing returned by `GET /product/items`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllItemsResponse {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: ItemsResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResults {
    #[serde(default)]
    pub items: Vec<Item>,
    /// Null on an empty catalogue
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub max_price: Option<f64>,
}

impl GetAllItemsResponse {
    /// True when the server returned every matching item in this response
    pub fn is_single_page(&self) -> bool {
        self.next.is_none() && self.previous.is_none()
    }

    /// `count` agrees with the number of listed items
    pub fn count_is_consistent(&self) -> bool {
        let listed = self.results.items.len() as u64;
        if self.is_single_page() {
            listed == self.count
        } else {
            listed <= self.count
        }
    }
}

/// Filters accepted by the listing route. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(rename = "price__gte", skip_serializing_if = "Option::is_none")]
    pub price_gte: Option<f64>,
    #[serde(rename = "price__lte", skip_serializing_if = "Option::is_none")]
    pub price_lte: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

// The listing aggregates max_price from a decimal column, which may render as a number or a string.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
