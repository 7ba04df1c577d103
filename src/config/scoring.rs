//! Normalization ranges and weights used by the engine.
//!
//! The built-in tables hold the published thresholds and weights.
//! A TOML file may override any part; whatever it leaves out falls back to
//! the built-in values (see [`ScoringConfig::from_toml_str`]).

use crate::domain::model::{Category, Indicator};
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::{validate_bounds, validate_non_negative, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Square miles per square meter, for walkability.
pub const SQ_MILES_PER_SQ_METER: f64 = 3.861e-7;

pub const EQI_COMPONENTS: [&str; 5] = ["ndvi", "wetness", "heat", "ndbsi", "pm25"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub inverse: bool,
    /// Relative weight inside the owning category.
    pub weight: f64,
}

impl IndicatorSpec {
    const fn new(min: f64, max: f64, inverse: bool, weight: f64) -> Self {
        Self {
            min,
            max,
            inverse,
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqiComponent {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub inverse: bool,
    pub loading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqiConfig {
    pub components: BTreeMap<String, EqiComponent>,
    pub pc1_min: f64,
    pub pc1_max: f64,
}

impl Default for EqiConfig {
    fn default() -> Self {
        let component = |min, max, inverse, loading| EqiComponent {
            min,
            max,
            inverse,
            loading,
        };
        let components = BTreeMap::from([
            ("ndvi".to_string(), component(0.0, 1.0, false, 0.4)),
            ("wetness".to_string(), component(-0.5, 0.5, false, 0.3)),
            ("heat".to_string(), component(15.0, 35.0, true, 0.2)),
            ("ndbsi".to_string(), component(0.0, 1.0, true, 0.1)),
            ("pm25".to_string(), component(0.0, 100.0, true, 0.1)),
        ]);
        Self {
            components,
            pc1_min: -1.0,
            pc1_max: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub environmental: f64,
    pub social: f64,
    pub economic: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            environmental: 0.40,
            social: 0.30,
            economic: 0.30,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Environmental => self.environmental,
            Category::Social => self.social,
            Category::Economic => self.economic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub category_weights: CategoryWeights,
    pub indicators: BTreeMap<String, IndicatorSpec>,
    pub eqi: EqiConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weights: CategoryWeights::default(),
            indicators: default_indicators(),
            eqi: EqiConfig::default(),
        }
    }
}

fn default_spec(indicator: Indicator) -> IndicatorSpec {
    use Indicator::*;
    match indicator {
        GreenPercentageArea => IndicatorSpec::new(0.0, 100.0, false, 0.08),
        WaterPercentageArea => IndicatorSpec::new(0.0, 100.0, false, 0.06),
        AirQuality => IndicatorSpec::new(0.0, 1.0, true, 0.08),
        LandSurfaceTemperature => IndicatorSpec::new(15.0, 35.0, true, 0.06),
        EcologicalQualityIndex => IndicatorSpec::new(0.0, 100.0, false, 0.12),
        CrimeRate => IndicatorSpec::new(0.0, 100.0, true, 1.0),
        EducationLevel => IndicatorSpec::new(0.0, 100.0, false, 1.0),
        AccessToTransit | AccessToSchools | AccessToHospitals | AccessToFireStations
        | AccessToPolice => IndicatorSpec::new(0.0, 30.0, true, 1.0),
        Walkability => IndicatorSpec::new(0.0, 140.0, false, 1.0),
        MedianHouseholdIncome => IndicatorSpec::new(0.0, 100_000.0, false, 1.0),
        UnemploymentRate => IndicatorSpec::new(0.0, 100.0, true, 1.0),
        HousingAffordability => IndicatorSpec::new(0.0, 100.0, false, 1.0),
    }
}

fn default_indicators() -> BTreeMap<String, IndicatorSpec> {
    Indicator::ALL
        .into_iter()
        .map(|indicator| (indicator.key().to_string(), default_spec(indicator)))
        .collect()
}

impl ScoringConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML, substituting `${VAR}` references from the environment.
    ///
    /// Indicators or EQI components the file does not mention keep their
    /// built-in values. The result is not validated; call [`Validate::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        let mut config: ScoringConfig =
            toml::from_str(&processed_content).map_err(|e| ScoreError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        for (key, spec) in default_indicators() {
            config.indicators.entry(key).or_insert(spec);
        }
        for (key, component) in EqiConfig::default().components {
            config.eqi.components.entry(key).or_insert(component);
        }

        Ok(config)
    }

    pub fn indicator(&self, indicator: Indicator) -> Result<&IndicatorSpec> {
        self.indicators
            .get(indicator.key())
            .ok_or_else(|| ScoreError::RangeConfiguration {
                indicator: indicator.key().to_string(),
                reason: "no normalization range configured".to_string(),
            })
    }

    pub fn eqi_component(&self, name: &str) -> Result<&EqiComponent> {
        self.eqi
            .components
            .get(name)
            .ok_or_else(|| ScoreError::RangeConfiguration {
                indicator: format!("ecological_quality_index.{}", name),
                reason: "no component range configured".to_string(),
            })
    }

    pub fn category_weight(&self, category: Category) -> f64 {
        self.category_weights.get(category)
    }

    /// Sum of in-category weights.
    pub fn category_weight_total(&self, category: Category) -> Result<f64> {
        category
            .indicators()
            .map(|indicator| self.indicator(indicator).map(|spec| spec.weight))
            .sum()
    }

    /// Share of the final index carried by one indicator, in [0, 1].
    pub fn index_share(&self, indicator: Indicator) -> Result<f64> {
        let category = indicator.category();
        let total = self.category_weight_total(category)?;
        let spec = self.indicator(indicator)?;
        Ok(self.category_weight(category) * spec.weight / total)
    }
}

/// 替換環境變數 (例如 ${SCORING_PM25_MAX})
fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScoreError::ConfigValidationError {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl Validate for ScoringConfig {
    fn validate(&self) -> Result<()> {
        for key in self.indicators.keys() {
            if Indicator::from_key(key).is_none() {
                return Err(ScoreError::InvalidConfigValueError {
                    field: "indicators".to_string(),
                    value: key.clone(),
                    reason: "Unknown indicator".to_string(),
                });
            }
        }

        for indicator in Indicator::ALL {
            let spec = self.indicators.get(indicator.key()).ok_or_else(|| {
                ScoreError::MissingConfigError {
                    field: format!("indicators.{}", indicator.key()),
                }
            })?;
            validate_bounds(indicator.key(), spec.min, spec.max)?;
            validate_non_negative(&format!("indicators.{}.weight", indicator.key()), spec.weight)?;
        }

        for category in Category::ALL {
            let weight = self.category_weight(category);
            validate_non_negative(&format!("category_weights.{}", category), weight)?;

            if self.category_weight_total(category)? <= 0.0 {
                return Err(ScoreError::RangeConfiguration {
                    indicator: category.key().to_string(),
                    reason: "indicator weights of the category sum to zero".to_string(),
                });
            }
        }

        let total: f64 = Category::ALL.iter().map(|c| self.category_weight(*c)).sum();
        validate_range("category_weights", total, 1.0 - 1e-6, 1.0 + 1e-6)?;

        for name in self.eqi.components.keys() {
            if !EQI_COMPONENTS.contains(&name.as_str()) {
                return Err(ScoreError::InvalidConfigValueError {
                    field: "eqi.components".to_string(),
                    value: name.clone(),
                    reason: format!("Unknown component. Valid: {}", EQI_COMPONENTS.join(", ")),
                });
            }
        }
        for name in EQI_COMPONENTS {
            let component = self.eqi_component(name)?;
            let label = format!("ecological_quality_index.{}", name);
            validate_bounds(&label, component.min, component.max)?;
            if !component.loading.is_finite() {
                return Err(ScoreError::RangeConfiguration {
                    indicator: label,
                    reason: "loading must be finite".to_string(),
                });
            }
        }
        validate_bounds("ecological_quality_index.pc1", self.eqi.pc1_min, self.eqi.pc1_max)?;

        Ok(())
    }
}
