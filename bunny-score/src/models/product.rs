//! Product facts extracted from a product page

use serde::{Deserialize, Serialize};

/// Product identity and ingredient list
///
/// Field names match the JSON keys the page-extraction model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(rename = "Product Name", default)]
    pub product_name: String,
    #[serde(rename = "Company name")]
    pub company_name: String,
    #[serde(rename = "Photo", default)]
    pub photo: String,
    #[serde(rename = "Ingredients", default)]
    pub ingredients: Vec<String>,
}
