//! Defensive parsing of language-model output
//!
//! The extraction model is asked for JSON but routinely wraps it in a
//! markdown fence, prefixes it with a word like `JSON`, or adds prose around
//! it. These parsers recover the payload or fail with `Malformed`.

use crate::models::ProductInfo;
use crate::services::provider_error::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*```[a-z]*[ \t]*\r?\n?").expect("valid regex"));

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```\s*$").expect("valid regex"));

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
pub fn strip_code_fence(raw: &str) -> &str {
    let start = OPENING_FENCE.find(raw).map_or(0, |m| m.end());
    let body = &raw[start..];
    let end = CLOSING_FENCE.find(body).map_or(body.len(), |m| m.start());
    body[..end].trim()
}

/// Slice from the first `open` to the last `close`, inclusive
fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the product-extraction answer into `ProductInfo`
///
/// `Ingredients` may arrive as an array or as one comma-separated string.
///
/// # Errors
/// `ProviderError::Malformed` when no JSON object can be recovered or the
/// company name is missing.
pub fn parse_product_info(raw: &str) -> Result<ProductInfo, ProviderError> {
    let text = strip_code_fence(raw);
    let object = outermost(text, '{', '}')
        .ok_or_else(|| ProviderError::Malformed("no JSON object in product text".to_string()))?;

    let mut value: Value =
        serde_json::from_str(object).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if let Some(Value::String(list)) = value.get("Ingredients") {
        let split: Vec<Value> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        value["Ingredients"] = Value::Array(split);
    }

    let mut product: ProductInfo =
        serde_json::from_value(value).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    product.company_name = product.company_name.trim().to_string();
    if product.company_name.is_empty() {
        return Err(ProviderError::Malformed("company name is empty".to_string()));
    }
    product.ingredients.retain(|i| !i.trim().is_empty());

    Ok(product)
}

fn country_names(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("countries")?.as_array()?,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Parse the manufacturing-country answer
///
/// Accepts a JSON array of names or `{"countries": [...]}`, optionally
/// surrounded by prose.
pub fn parse_country_list(raw: &str) -> Result<Vec<String>, ProviderError> {
    let text = strip_code_fence(raw);

    if let Some(countries) = serde_json::from_str::<Value>(text)
        .ok()
        .as_ref()
        .and_then(country_names)
    {
        return Ok(countries);
    }

    outermost(text, '[', ']')
        .and_then(|array| serde_json::from_str::<Value>(array).ok())
        .as_ref()
        .and_then(country_names)
        .ok_or_else(|| ProviderError::Malformed("no country list in text".to_string()))
}
