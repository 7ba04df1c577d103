//! Indicator derivation and min-max normalization.
//!
//! Ratio indicators are derived first (crime rate, green share, ...), then
//! every indicator is scaled to [0, 1] against its configured range. Values
//! outside the range clamp to the nearest bound; inverse indicators are
//! flipped so that 1 is always the favorable end.

use crate::config::scoring::{ScoringConfig, EQI_COMPONENTS, SQ_MILES_PER_SQ_METER};
use crate::domain::model::{
    Category, EconomicInputs, EnvironmentalInputs, Indicator, IndicatorValues, RawIndicatorSet,
    SocialInputs,
};
use crate::utils::error::{Result, ScoreError};

/// Min-max scaling clamped to [0, 1]; `inverse` returns `1 - scaled`.
pub fn scale(value: f64, min: f64, max: f64, inverse: bool) -> f64 {
    let scaled = ((value - min) / (max - min)).clamp(0.0, 1.0);
    if inverse {
        1.0 - scaled
    } else {
        scaled
    }
}

fn ratio(
    indicator: Indicator,
    numerator: f64,
    denominator: f64,
    denominator_name: &str,
) -> Result<f64> {
    if denominator <= 0.0 {
        return Err(ScoreError::DivisionByZero {
            category: indicator.category().key().to_string(),
            indicator: indicator.key().to_string(),
            denominator: denominator_name.to_string(),
        });
    }
    Ok(numerator / denominator)
}

fn eqi_input(env: &EnvironmentalInputs, component: &str) -> Result<f64> {
    match component {
        "ndvi" => Ok(env.mean_ndvi),
        "wetness" => Ok(env.tasseled_cap_wetness),
        "heat" => Ok(env.mean_lst_for_eqi),
        "ndbsi" => Ok(env.ndbsi),
        "pm25" => Ok(env.pm25),
        other => Err(ScoreError::RangeConfiguration {
            indicator: format!("ecological_quality_index.{}", other),
            reason: "no input field for this component".to_string(),
        }),
    }
}

/// Blends the five ecological components into a 0–100 quality index.
pub fn ecological_quality_index(env: &EnvironmentalInputs, config: &ScoringConfig) -> Result<f64> {
    let mut pc1 = 0.0;
    for name in EQI_COMPONENTS {
        let component = config.eqi_component(name)?;
        let value = eqi_input(env, name)?;
        pc1 += component.loading * scale(value, component.min, component.max, component.inverse);
    }
    Ok(scale(pc1, config.eqi.pc1_min, config.eqi.pc1_max, false) * 100.0)
}

pub fn derive_environmental(
    env: &EnvironmentalInputs,
    config: &ScoringConfig,
) -> Result<IndicatorValues> {
    let mut values = IndicatorValues::new();
    values.insert(
        Indicator::GreenPercentageArea,
        ratio(Indicator::GreenPercentageArea, env.green_area, env.total_area, "total_area")? * 100.0,
    );
    values.insert(
        Indicator::WaterPercentageArea,
        ratio(Indicator::WaterPercentageArea, env.water_area, env.total_area, "total_area")? * 100.0,
    );
    values.insert(Indicator::AirQuality, env.air_quality_aod);
    values.insert(Indicator::LandSurfaceTemperature, env.land_surface_temperature);
    values.insert(
        Indicator::EcologicalQualityIndex,
        ecological_quality_index(env, config)?,
    );
    Ok(values)
}

/// Walkability needs the neighborhood area, which lives in the environmental block.
pub fn derive_social(social: &SocialInputs, total_area: f64) -> Result<IndicatorValues> {
    let mut values = IndicatorValues::new();
    values.insert(
        Indicator::CrimeRate,
        ratio(
            Indicator::CrimeRate,
            social.total_crimes,
            social.total_population,
            "total_population",
        )? * 1000.0,
    );
    values.insert(
        Indicator::EducationLevel,
        ratio(
            Indicator::EducationLevel,
            social.adults_with_degree,
            social.total_adult_population,
            "total_adult_population",
        )? * 100.0,
    );
    values.insert(Indicator::AccessToTransit, social.avg_time_to_transit);
    values.insert(Indicator::AccessToSchools, social.avg_time_to_schools);
    values.insert(Indicator::AccessToHospitals, social.avg_time_to_hospitals);
    values.insert(Indicator::AccessToFireStations, social.avg_time_to_fire_stations);
    values.insert(Indicator::AccessToPolice, social.avg_time_to_police);
    values.insert(
        Indicator::Walkability,
        ratio(
            Indicator::Walkability,
            social.street_intersections,
            total_area * SQ_MILES_PER_SQ_METER,
            "total_area",
        )?,
    );
    Ok(values)
}

pub fn derive_economic(eco: &EconomicInputs) -> Result<IndicatorValues> {
    let mut values = IndicatorValues::new();
    values.insert(Indicator::MedianHouseholdIncome, eco.median_household_income);
    values.insert(
        Indicator::UnemploymentRate,
        ratio(
            Indicator::UnemploymentRate,
            eco.unemployed_count,
            eco.labor_force,
            "labor_force",
        )? * 100.0,
    );
    values.insert(
        Indicator::HousingAffordability,
        ratio(
            Indicator::HousingAffordability,
            eco.affordable_housing_units,
            eco.total_housing_units,
            "total_housing_units",
        )? * 100.0,
    );
    Ok(values)
}

pub fn derive_indicators(input: &RawIndicatorSet, config: &ScoringConfig) -> Result<IndicatorValues> {
    let mut values = derive_environmental(&input.environmental, config)?;
    values.extend(derive_social(&input.social, input.environmental.total_area)?);
    values.extend(derive_economic(&input.economic)?);
    Ok(values)
}

/// Normalizes every derived value present in `values`.
pub fn normalize(values: &IndicatorValues, config: &ScoringConfig) -> Result<IndicatorValues> {
    values
        .iter()
        .map(|(indicator, value)| {
            let spec = config.indicator(*indicator)?;
            Ok((*indicator, scale(*value, spec.min, spec.max, spec.inverse)))
        })
        .collect()
}

/// Normalized values of one category, failing if any indicator is absent.
pub fn category_values(
    normalized: &IndicatorValues,
    category: Category,
) -> Result<Vec<(Indicator, f64)>> {
    category
        .indicators()
        .map(|indicator| {
            normalized
                .get(&indicator)
                .map(|value| (indicator, *value))
                .ok_or_else(|| ScoreError::RangeConfiguration {
                    indicator: indicator.key().to_string(),
                    reason: "indicator was not normalized".to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scale_clamps_and_inverts() {
        assert_eq!(scale(50.0, 0.0, 100.0, false), 0.5);
        assert_eq!(scale(-5.0, 0.0, 100.0, false), 0.0);
        assert_eq!(scale(250.0, 0.0, 100.0, false), 1.0);
        assert_eq!(scale(25.0, 15.0, 35.0, true), 0.5);
        assert_eq!(scale(40.0, 15.0, 35.0, true), 0.0);
        assert_eq!(scale(10.0, 15.0, 35.0, true), 1.0);
    }

    #[test]
    fn test_derived_ratios_for_example() {
        let config = ScoringConfig::default();
        let values = derive_indicators(&RawIndicatorSet::example(), &config).unwrap();

        assert!(approx(values[&Indicator::GreenPercentageArea], 25.0));
        assert!(approx(values[&Indicator::WaterPercentageArea], 5.0));
        assert!(approx(values[&Indicator::CrimeRate], 5.0));
        assert!(approx(values[&Indicator::EducationLevel], 37.5));
        assert!(approx(values[&Indicator::UnemploymentRate], 500.0 / 6000.0 * 100.0));
        assert!(approx(values[&Indicator::HousingAffordability], 70.0));
        assert!(approx(values[&Indicator::Walkability], 120.0 / 0.3861));
        assert_eq!(values.len(), 16);
    }

    #[test]
    fn test_eqi_for_example() {
        // pc1 = 0.4*0.5 + 0.3*0.8 + 0.2*0.5 + 0.1*0.6 + 0.1*0.8 = 0.68
        let eqi = ecological_quality_index(
            &RawIndicatorSet::example().environmental,
            &ScoringConfig::default(),
        )
        .unwrap();
        assert!(approx(eqi, 84.0));
    }

    #[test]
    fn test_eqi_inputs_are_named() {
        let env = RawIndicatorSet::example().environmental;
        for name in EQI_COMPONENTS {
            assert!(eqi_input(&env, name).is_ok());
        }
        assert_eq!(eqi_input(&env, "pm25").unwrap(), 20.0);
        assert!(matches!(
            eqi_input(&env, "albedo"),
            Err(ScoreError::RangeConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_population_is_division_by_zero() {
        let mut input = RawIndicatorSet::example();
        input.social.total_population = 0.0;

        match derive_indicators(&input, &ScoringConfig::default()) {
            Err(ScoreError::DivisionByZero {
                indicator,
                denominator,
                ..
            }) => {
                assert_eq!(indicator, "crime_rate");
                assert_eq!(denominator, "total_population");
            }
            other => panic!("expected division by zero, got {:?}", other),
        }
    }

    #[test]
    fn test_every_denominator_is_guarded() {
        let cases: [(&str, fn(&mut RawIndicatorSet)); 5] = [
            ("total_area", |i| i.environmental.total_area = 0.0),
            ("total_adult_population", |i| i.social.total_adult_population = 0.0),
            ("labor_force", |i| i.economic.labor_force = 0.0),
            ("total_housing_units", |i| i.economic.total_housing_units = 0.0),
            ("total_population", |i| i.social.total_population = 0.0),
        ];
        for (name, mutate) in cases {
            let mut input = RawIndicatorSet::example();
            mutate(&mut input);
            let err = derive_indicators(&input, &ScoringConfig::default()).unwrap_err();
            assert!(err.to_string().contains(name), "{} not reported: {}", name, err);
        }
    }

    #[test]
    fn test_normalize_example() {
        let config = ScoringConfig::default();
        let values = derive_indicators(&RawIndicatorSet::example(), &config).unwrap();
        let normalized = normalize(&values, &config).unwrap();

        assert!(approx(normalized[&Indicator::GreenPercentageArea], 0.25));
        assert!(approx(normalized[&Indicator::AirQuality], 0.7));
        assert!(approx(normalized[&Indicator::CrimeRate], 0.95));
        assert!(approx(normalized[&Indicator::AccessToTransit], 1.0 - 5.0 / 30.0));
        assert_eq!(normalized[&Indicator::Walkability], 1.0);
        assert!(approx(normalized[&Indicator::MedianHouseholdIncome], 0.5));
        assert!(normalized.values().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_category_values_requires_every_indicator() {
        let mut normalized = IndicatorValues::new();
        normalized.insert(Indicator::MedianHouseholdIncome, 0.5);
        assert!(category_values(&normalized, Category::Economic).is_err());
    }
}
