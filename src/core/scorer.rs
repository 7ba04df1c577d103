use crate::config::scoring::ScoringConfig;
use crate::domain::model::{Category, CategoryScores, Grade, IndicatorValues, SustainabilityResult};

/// Lower bound of each grade band, inclusive.
const GRADE_BANDS: [(f64, Grade); 4] = [
    (80.0, Grade::A),
    (70.0, Grade::B),
    (60.0, Grade::C),
    (50.0, Grade::D),
];

impl Grade {
    pub fn from_index(index: f64) -> Grade {
        GRADE_BANDS
            .iter()
            .find(|(lower, _)| index >= *lower)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Grade::A => "Excellent sustainability - this neighborhood demonstrates outstanding environmental, social, and economic performance.",
            Grade::B => "Good sustainability - this neighborhood shows strong performance with room for targeted improvements.",
            Grade::C => "Fair sustainability - this neighborhood has moderate performance with several areas needing attention.",
            Grade::D => "Poor sustainability - this neighborhood faces significant challenges across multiple indicators.",
            Grade::F => "Very poor sustainability - this neighborhood requires comprehensive improvements across all categories.",
        }
    }
}

pub fn composite_index(scores: &CategoryScores, config: &ScoringConfig) -> f64 {
    Category::ALL
        .iter()
        .map(|category| scores.get(*category) * config.category_weight(*category))
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

/// Builds the final record. `indicators` and `normalized` are kept for transparency.
pub fn score(
    scores: CategoryScores,
    indicators: &IndicatorValues,
    normalized: &IndicatorValues,
    config: &ScoringConfig,
) -> SustainabilityResult {
    let index = composite_index(&scores, config);
    let grade = Grade::from_index(index);

    SustainabilityResult {
        sustainability_index: index,
        grade,
        interpretation: grade.interpretation().to_string(),
        environmental_score: scores.environmental,
        social_score: scores.social,
        economic_score: scores.economic,
        indicators: indicators
            .iter()
            .map(|(indicator, value)| (indicator.key().to_string(), *value))
            .collect(),
        normalized: normalized
            .iter()
            .map(|(indicator, value)| (indicator.normalized_key().to_string(), *value))
            .collect(),
    }
}
