use crate::config::scoring::ScoringConfig;
use crate::core::normalizer::category_values;
use crate::domain::model::{Category, CategoryScores, IndicatorValues};
use crate::utils::error::{Result, ScoreError};

/// Weighted mean of one category's normalized values, scaled to [0, 100].
pub fn category_score(
    category: Category,
    normalized: &IndicatorValues,
    config: &ScoringConfig,
) -> Result<f64> {
    let values = category_values(normalized, category)?;

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (indicator, value) in values {
        let weight = config.indicator(indicator)?.weight;
        weighted += weight * value;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return Err(ScoreError::RangeConfiguration {
            indicator: category.key().to_string(),
            reason: "indicator weights of the category sum to zero".to_string(),
        });
    }

    Ok((weighted / total_weight * 100.0).clamp(0.0, 100.0))
}

pub fn aggregate(normalized: &IndicatorValues, config: &ScoringConfig) -> Result<CategoryScores> {
    Ok(CategoryScores {
        environmental: category_score(Category::Environmental, normalized, config)?,
        social: category_score(Category::Social, normalized, config)?,
        economic: category_score(Category::Economic, normalized, config)?,
    })
}
