//! Product scoring pipeline
//!
//! Animal welfare is mandatory; ingredient safety and labor practices may come
//! back "unknown" and are then left out of the weighted total.

use crate::models::{AggregateResult, ProductInfo};
use crate::services::animal_welfare::AnimalWelfareChecker;
use crate::services::ingredient_safety::IngredientSafetyProvider;
use crate::services::labor_practice::LaborPracticeProvider;
use crate::services::score_aggregator::{assemble, ScoreError};
use tracing::info;

pub struct ScoringEngine {
    animal_welfare: AnimalWelfareChecker,
    ingredient_safety: IngredientSafetyProvider,
    labor_practice: LaborPracticeProvider,
}

impl ScoringEngine {
    pub fn new(
        animal_welfare: AnimalWelfareChecker,
        ingredient_safety: IngredientSafetyProvider,
        labor_practice: LaborPracticeProvider,
    ) -> Self {
        Self {
            animal_welfare,
            ingredient_safety,
            labor_practice,
        }
    }

    /// Score a product made in `countries`
    ///
    /// # Errors
    /// `ScoreError::MissingCompany` when the product has no company name.
    pub async fn score_product(
        &self,
        product: &ProductInfo,
        countries: &[String],
    ) -> Result<AggregateResult, ScoreError> {
        let animal = self.animal_welfare.check(&product.company_name).await?;
        let ingredient = self.ingredient_safety.score(&product.ingredients).await;
        let labor = self.labor_practice.score(countries).await;

        let result = assemble(product, animal.score, &animal.reason, &ingredient, &labor);

        info!(
            company = %result.company_name,
            product = %result.product_name,
            total_score = result.total_score,
            animal = animal.score,
            ingredient = ?ingredient.score.known(),
            labor = ?labor.score.known(),
            "Product scored"
        );

        Ok(result)
    }
}
