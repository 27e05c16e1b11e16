//! Score aggregation
//!
//! Combines the mandatory animal-welfare score with the optional ingredient
//! and labor scores. The weighting is a fixed table keyed on which optional
//! scores are present; there is no generic re-normalization.
//!
//! | ingredient | labor   | total                                   |
//! |------------|---------|-----------------------------------------|
//! | known      | known   | round(0.4·animal + 0.4·ingr + 0.2·labor) |
//! | known      | unknown | round(0.5·animal + 0.5·ingr)             |
//! | unknown    | known   | round(0.5·animal + 0.5·labor)            |
//! | unknown    | unknown | animal                                  |
//!
//! An unknown sub-score is left out of the total and shown as "N/A" in the
//! breakdown, never as zero.

use crate::models::{
    AggregateResult, BreakdownEntry, BreakdownScore, Category, ProductInfo, ScoreValue, SubScore,
};
use thiserror::Error;

/// Score computation errors
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Ingredient rating outside 1-10 or not a number
    #[error("Invalid ingredient rating: {0}")]
    InvalidRating(String),

    /// Animal-welfare lookup needs a company name
    #[error("Company name is required")]
    MissingCompany,
}

/// Weighted total per the fixed fallback table
pub fn aggregate_scores(animal: f64, ingredient: ScoreValue, labor: ScoreValue) -> f64 {
    match (ingredient, labor) {
        (ScoreValue::Known(ingredient), ScoreValue::Known(labor)) => {
            (0.4 * animal + 0.4 * ingredient + 0.2 * labor).round()
        }
        (ScoreValue::Known(ingredient), ScoreValue::Unknown) => {
            (0.5 * animal + 0.5 * ingredient).round()
        }
        (ScoreValue::Unknown, ScoreValue::Known(labor)) => (0.5 * animal + 0.5 * labor).round(),
        (ScoreValue::Unknown, ScoreValue::Unknown) => animal,
    }
}

/// Assemble the final result for a product
///
/// The animal-welfare score is mandatory, so it is taken as a plain number.
/// The breakdown always lists Animal Testing, Ingredient Safety and Labor
/// Rights in that order.
pub fn assemble(
    product: &ProductInfo,
    animal_score: f64,
    animal_reason: &str,
    ingredient: &SubScore,
    labor: &SubScore,
) -> AggregateResult {
    let total_score = aggregate_scores(animal_score, ingredient.score, labor.score);

    let animal = BreakdownEntry {
        category: Category::AnimalTesting,
        score: BreakdownScore::Value(animal_score),
        reason: animal_reason.to_string(),
    };
    let optional = [
        (Category::IngredientSafety, ingredient),
        (Category::LaborRights, labor),
    ]
    .into_iter()
    .map(|(category, sub)| BreakdownEntry {
        category,
        score: sub.score.into(),
        reason: sub.reason.clone(),
    });
    let breakdown = std::iter::once(animal).chain(optional).collect();

    AggregateResult {
        product_name: product.product_name.clone(),
        company_name: product.company_name.clone(),
        photo: product.photo.clone(),
        total_score,
        breakdown,
    }
}

/// Map an ingredient hazard rating (1 = lowest hazard, 10 = highest) onto 1-100
///
/// 1 maps to 100 and 10 maps to 1. Ratings outside 1-10 are rejected, not clamped.
pub fn rescale_ingredient_rating(rating: f64) -> Result<f64, ScoreError> {
    if !rating.is_finite() || !(1.0..=10.0).contains(&rating) {
        return Err(ScoreError::InvalidRating(rating.to_string()));
    }
    Ok(((10.0 - rating) / 9.0 * 99.0 + 1.0).round())
}

/// Child-labor percentage at or above which the labor score is zero
pub const CHILD_LABOR_CUTOFF: f64 = 50.0;

/// Map an average child-labor percentage onto 0-100
///
/// Each percentage point costs two points; 50% or more scores 0.
pub fn rescale_child_labor(average_percent: f64) -> f64 {
    if average_percent >= CHILD_LABOR_CUTOFF {
        return 0.0;
    }
    (100.0 - 2.0 * average_percent).round()
}
