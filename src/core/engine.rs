use crate::config::scoring::ScoringConfig;
use crate::core::{aggregator, normalizer, scorer};
use crate::domain::model::{
    Category, EnvironmentalInputs, Indicator, IndicatorDefinition, RawIndicatorSet,
    SustainabilityResult, WeightsTable,
};
use crate::domain::ports::ScoringBackend;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs normalize → aggregate → score over a validated, shared configuration.
///
/// Cloning is cheap and every call is independent, so one engine can serve
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct SustainabilityEngine {
    config: Arc<ScoringConfig>,
}

impl SustainabilityEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn calculate(&self, input: &RawIndicatorSet) -> Result<SustainabilityResult> {
        input.validate()?;
        let config = self.config.as_ref();

        let indicators = normalizer::derive_indicators(input, config)?;
        tracing::debug!("Derived {} indicators", indicators.len());

        let normalized = normalizer::normalize(&indicators, config)?;

        let scores = aggregator::aggregate(&normalized, config)?;
        tracing::debug!(
            "Category scores: environmental={:.2} social={:.2} economic={:.2}",
            scores.environmental,
            scores.social,
            scores.economic
        );

        let result = scorer::score(scores, &indicators, &normalized, config);
        tracing::debug!(
            "Sustainability index {:.2} (grade {})",
            result.sustainability_index,
            result.grade
        );

        Ok(result)
    }

    /// Validates a raw JSON body field by field, then calculates.
    pub fn calculate_json(&self, body: &serde_json::Value) -> Result<SustainabilityResult> {
        let input = RawIndicatorSet::from_json(body)?;
        self.calculate(&input)
    }

    /// Environmental category score alone, used for yearly trend series.
    pub fn environmental_score(&self, env: &EnvironmentalInputs) -> Result<f64> {
        env.validate()?;
        let config = self.config.as_ref();
        let indicators = normalizer::derive_environmental(env, config)?;
        let normalized = normalizer::normalize(&indicators, config)?;
        aggregator::category_score(Category::Environmental, &normalized, config)
    }

    pub fn indicator_definitions(&self) -> Result<Vec<IndicatorDefinition>> {
        Indicator::ALL
            .into_iter()
            .map(|indicator| {
                let spec = self.config.indicator(indicator)?;
                let (name, description, calculation) = describe(indicator);
                Ok(IndicatorDefinition {
                    key: indicator.key().to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    calculation: calculation.to_string(),
                    category: indicator.category(),
                    weight: self.config.index_share(indicator)? * 100.0,
                    threshold: Some(spec.max),
                    higher_is_better: Some(!spec.inverse),
                })
            })
            .collect()
    }

    pub fn weights(&self) -> Result<WeightsTable> {
        let mut category_weights = BTreeMap::new();
        let mut indicator_weights = BTreeMap::new();

        for category in Category::ALL {
            category_weights.insert(category, self.config.category_weight(category) * 100.0);

            let mut shares = BTreeMap::new();
            for indicator in category.indicators() {
                shares.insert(
                    indicator.key().to_string(),
                    self.config.index_share(indicator)? * 100.0,
                );
            }
            indicator_weights.insert(category, shares);
        }

        Ok(WeightsTable {
            category_weights,
            indicator_weights,
        })
    }
}

fn describe(indicator: Indicator) -> (&'static str, &'static str, &'static str) {
    use Indicator::*;
    match indicator {
        GreenPercentageArea => (
            "Green Space Percentage",
            "Proportion of vegetated area (NDVI > 0.2) indicating environmental health",
            "(Green area / Total area) × 100",
        ),
        WaterPercentageArea => (
            "Water Area Percentage",
            "Proportion of surface water (MNDWI > 0) in the neighborhood",
            "(Water area / Total area) × 100",
        ),
        AirQuality => (
            "Air Quality",
            "Annual average Aerosol Optical Depth indicating air pollution",
            "Annual average AOD from Sentinel-5P TROPOMI data",
        ),
        LandSurfaceTemperature => (
            "Land Surface Temperature",
            "Annual average land surface temperature in °C",
            "Annual average LST from MODIS",
        ),
        EcologicalQualityIndex => (
            "Ecological Quality Index",
            "Composite of vegetation, wetness, heat, bareness and PM2.5",
            "PC1 = 0.4·NDVI + 0.3·Wetness + 0.2·Heat + 0.1·NDBSI + 0.1·PM2.5, rescaled to 0–100",
        ),
        CrimeRate => (
            "Crime Rate",
            "Number of crimes per 1,000 residents",
            "(Total crimes / Population) × 1000",
        ),
        EducationLevel => (
            "Education Level",
            "Percentage of adults with a bachelor's degree or higher",
            "(Adults with degree / Total adults) × 100",
        ),
        AccessToTransit => (
            "Access to Transit",
            "Average travel time to the closest transit stop",
            "Average minutes to transit",
        ),
        AccessToSchools => (
            "Access to Schools",
            "Average travel time to the closest school",
            "Average minutes to schools",
        ),
        AccessToHospitals => (
            "Access to Hospitals",
            "Average travel time to the closest hospital",
            "Average minutes to hospitals",
        ),
        AccessToFireStations => (
            "Access to Fire Stations",
            "Average travel time to the closest fire station",
            "Average minutes to fire stations",
        ),
        AccessToPolice => (
            "Access to Police",
            "Average travel time to the closest police station",
            "Average minutes to police stations",
        ),
        Walkability => (
            "Walkability",
            "Street intersections per square mile",
            "Street intersections / Total area (sq miles)",
        ),
        MedianHouseholdIncome => (
            "Median Household Income",
            "Median annual household income",
            "Direct value from census data",
        ),
        UnemploymentRate => (
            "Unemployment Rate",
            "Percentage of labor force unemployed",
            "(Unemployed / Labor force) × 100",
        ),
        HousingAffordability => (
            "Housing Affordability",
            "Percentage of housing units costing at most 30% of median income",
            "(Affordable units / Total units) × 100",
        ),
    }
}

#[async_trait]
impl ScoringBackend for SustainabilityEngine {
    async fn calculate(&self, input: &RawIndicatorSet) -> Result<SustainabilityResult> {
        SustainabilityEngine::calculate(self, input)
    }

    async fn indicator_definitions(&self) -> Result<Vec<IndicatorDefinition>> {
        SustainabilityEngine::indicator_definitions(self)
    }

    async fn weights(&self) -> Result<WeightsTable> {
        SustainabilityEngine::weights(self)
    }

    async fn example(&self) -> Result<RawIndicatorSet> {
        Ok(RawIndicatorSet::example())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Grade;
    use crate::utils::error::ScoreError;

    fn engine() -> SustainabilityEngine {
        SustainabilityEngine::new(ScoringConfig::default()).unwrap()
    }

    #[test]
    fn test_example_end_to_end() {
        let result = engine().calculate(&RawIndicatorSet::example()).unwrap();

        assert!((result.environmental_score - 52.45).abs() < 1e-6);
        assert!((result.social_score - 74.479_166_666_7).abs() < 1e-6);
        assert!((result.economic_score - 70.555_555_555_6).abs() < 1e-6);
        assert!((result.sustainability_index - 64.490_416_666_7).abs() < 1e-6);
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.indicators.len(), 16);
        assert_eq!(result.normalized.len(), 16);
        assert!(result.normalized.contains_key("gpa_normalized"));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = ScoringConfig::default();
        config.category_weights.environmental = 0.9;
        assert!(SustainabilityEngine::new(config).is_err());
    }

    #[test]
    fn test_calculate_json_reports_fields() {
        let err = engine()
            .calculate_json(&serde_json::json!({"environmental": {}, "social": {}, "economic": {}}))
            .unwrap_err();
        match err {
            ScoreError::Validation { issues } => assert_eq!(issues.len(), 25),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_environmental_score_matches_full_calculation() {
        let engine = engine();
        let input = RawIndicatorSet::example();
        let full = engine.calculate(&input).unwrap();
        let env_only = engine.environmental_score(&input.environmental).unwrap();
        assert_eq!(full.environmental_score, env_only);
    }

    #[test]
    fn test_definitions_and_weights() {
        let engine = engine();
        let definitions = engine.indicator_definitions().unwrap();
        assert_eq!(definitions.len(), 16);
        let crime = definitions.iter().find(|d| d.key == "crime_rate").unwrap();
        assert_eq!(crime.threshold, Some(100.0));
        assert_eq!(crime.higher_is_better, Some(false));

        let weights = engine.weights().unwrap();
        assert!((weights.category_weights[&Category::Environmental] - 40.0).abs() < 1e-9);
        assert!((weights.indicator_weights[&Category::Social]["walkability"] - 3.75).abs() < 1e-9);
        assert!(
            (weights.indicator_weights[&Category::Economic]["housing_affordability"] - 10.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_environmental_score_rejects_nan() {
        let mut env = RawIndicatorSet::example().environmental;
        env.mean_ndvi = f64::NAN;
        match engine().environmental_score(&env).unwrap_err() {
            ScoreError::Validation { issues } => assert_eq!(issues[0].field, "mean_ndvi"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_engine_as_backend() {
        let backend: Box<dyn ScoringBackend> = Box::new(engine());
        let example = backend.example().await.unwrap();
        let result = backend.calculate(&example).await.unwrap();
        assert_eq!(result.grade, Grade::C);
    }
}
