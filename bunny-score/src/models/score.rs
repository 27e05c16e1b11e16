//! Sub-scores and the aggregated product score
//!
//! "unknown" is a first-class value, distinct from zero. It serializes as the
//! string `"unknown"` in sub-scores and as `"N/A"` in the score breakdown.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A 0-100 score or the "unknown" sentinel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreValue {
    Known(f64),
    Unknown,
}

impl ScoreValue {
    pub fn known(&self) -> Option<f64> {
        match self {
            ScoreValue::Known(v) => Some(*v),
            ScoreValue::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ScoreValue::Unknown)
    }
}

impl Serialize for ScoreValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScoreValue::Known(v) => serializer.serialize_f64(*v),
            ScoreValue::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for ScoreValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(ScoreValue::Known(v)),
            Raw::Text(s) if s == "unknown" => Ok(ScoreValue::Unknown),
            Raw::Text(s) => Err(de::Error::custom(format!(
                "expected a number or \"unknown\", got \"{}\"",
                s
            ))),
        }
    }
}

/// One provider's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: ScoreValue,
    pub reason: String,
}

impl SubScore {
    pub fn known(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score: ScoreValue::Known(score),
            reason: reason.into(),
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            score: ScoreValue::Unknown,
            reason: reason.into(),
        }
    }
}

/// Breakdown categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Animal Testing")]
    AnimalTesting,
    #[serde(rename = "Ingredient Safety")]
    IngredientSafety,
    #[serde(rename = "Labor Rights")]
    LaborRights,
}

/// Score shown in the breakdown: a number, or "N/A" when the provider had no data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakdownScore {
    Value(f64),
    NotAvailable,
}

impl From<ScoreValue> for BreakdownScore {
    fn from(value: ScoreValue) -> Self {
        match value {
            ScoreValue::Known(v) => BreakdownScore::Value(v),
            ScoreValue::Unknown => BreakdownScore::NotAvailable,
        }
    }
}

impl Serialize for BreakdownScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BreakdownScore::Value(v) => serializer.serialize_f64(*v),
            BreakdownScore::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub category: Category,
    pub score: BreakdownScore,
    pub reason: String,
}

/// Final product score with its per-category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub product_name: String,
    pub company_name: String,
    pub photo: String,
    pub total_score: f64,
    pub breakdown: Vec<BreakdownEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_value_serialization() {
        assert_eq!(serde_json::to_value(ScoreValue::Known(42.0)).unwrap(), json!(42.0));
        assert_eq!(serde_json::to_value(ScoreValue::Unknown).unwrap(), json!("unknown"));
    }

    #[test]
    fn test_score_value_deserialization() {
        let known: ScoreValue = serde_json::from_value(json!(75)).unwrap();
        assert_eq!(known, ScoreValue::Known(75.0));

        let unknown: ScoreValue = serde_json::from_value(json!("unknown")).unwrap();
        assert!(unknown.is_unknown());

        assert!(serde_json::from_value::<ScoreValue>(json!("0")).is_err());
    }

    #[test]
    fn test_unknown_becomes_not_available_in_breakdown() {
        let entry = BreakdownEntry {
            category: Category::LaborRights,
            score: ScoreValue::Unknown.into(),
            reason: "no data".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"category": "Labor Rights", "score": "N/A", "reason": "no data"})
        );
    }
}
