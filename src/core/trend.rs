//! Environmental change across several years of observations for one area.

use crate::core::engine::SustainabilityEngine;
use crate::domain::input::environmental_from_json;
use crate::domain::model::EnvironmentalInputs;
use crate::utils::error::{FieldIssue, FieldProblem, Result, ScoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relative change, in percent, beyond which a series counts as moving.
const STABLE_BAND_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyEnvironmental {
    pub year: i32,
    #[serde(flatten)]
    pub environmental: EnvironmentalInputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyScore {
    pub year: i32,
    pub environmental_score: f64,
    pub green_percentage_area: f64,
    pub water_percentage_area: f64,
    pub mean_ndvi: f64,
    pub land_surface_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub yearly: Vec<YearlyScore>,
    pub green_area_trend: TrendDirection,
    pub water_area_trend: TrendDirection,
    pub vegetation_health_trend: TrendDirection,
    pub temperature_trend: TrendDirection,
    pub overall_environmental_trend: TrendDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_period: Option<String>,
    pub total_years_analyzed: usize,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compares the mean of the later half of the series against the earlier half.
pub fn trend_direction(values: &[f64]) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::InsufficientData;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let (before, after) = (mean(first), mean(second));

    if before == 0.0 {
        return match after.partial_cmp(&0.0) {
            Some(std::cmp::Ordering::Greater) => TrendDirection::Increasing,
            Some(std::cmp::Ordering::Less) => TrendDirection::Decreasing,
            _ => TrendDirection::Stable,
        };
    }

    let change = (after - before) / before.abs() * 100.0;
    if change > STABLE_BAND_PERCENT {
        TrendDirection::Increasing
    } else if change < -STABLE_BAND_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Reads `{"years": [{"year": 2020, <environmental fields>}, ...]}`.
pub fn years_from_json(body: &Value) -> Result<Vec<YearlyEnvironmental>> {
    let Some(entries) = body.get("years").and_then(Value::as_array) else {
        return Err(ScoreError::validation(vec![FieldIssue {
            category: "years".to_string(),
            field: String::new(),
            problem: FieldProblem::CategoryMissing,
        }]));
    };

    let mut years = Vec::with_capacity(entries.len());
    let mut issues = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        let year = match entry.get("year") {
            None | Some(Value::Null) => Err(FieldProblem::Missing),
            Some(value) => value
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
                .ok_or(FieldProblem::NotNumeric),
        };
        let environmental = environmental_from_json(entry);

        match (year, environmental) {
            (Ok(year), Ok(environmental)) => years.push(YearlyEnvironmental {
                year,
                environmental,
            }),
            (year, environmental) => {
                let label = format!("years[{}]", position);
                if let Err(problem) = year {
                    issues.push(FieldIssue {
                        category: label.clone(),
                        field: "year".to_string(),
                        problem,
                    });
                }
                if let Err(ScoreError::Validation { issues: nested }) = environmental {
                    issues.extend(nested.into_iter().map(|issue| FieldIssue {
                        category: label.clone(),
                        ..issue
                    }));
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(years)
    } else {
        Err(ScoreError::validation(issues))
    }
}

pub fn analyze(
    engine: &SustainabilityEngine,
    observations: &[YearlyEnvironmental],
) -> Result<TrendAnalysis> {
    let mut ordered: Vec<&YearlyEnvironmental> = observations.iter().collect();
    ordered.sort_by_key(|observation| observation.year);

    let mut yearly = Vec::with_capacity(ordered.len());
    for observation in ordered {
        let env = &observation.environmental;
        let environmental_score = engine.environmental_score(env)?;
        // total_area > 0 was checked by environmental_score
        yearly.push(YearlyScore {
            year: observation.year,
            environmental_score,
            green_percentage_area: env.green_area / env.total_area * 100.0,
            water_percentage_area: env.water_area / env.total_area * 100.0,
            mean_ndvi: env.mean_ndvi,
            land_surface_temperature: env.land_surface_temperature,
        });
        tracing::debug!(
            "Year {} environmental score {:.2}",
            observation.year,
            environmental_score
        );
    }

    let series = |pick: fn(&YearlyScore) -> f64| yearly.iter().map(pick).collect::<Vec<_>>();
    let analysis_period = match (yearly.first(), yearly.last()) {
        (Some(first), Some(last)) => Some(format!("{}-{}", first.year, last.year)),
        _ => None,
    };

    Ok(TrendAnalysis {
        green_area_trend: trend_direction(&series(|y| y.green_percentage_area)),
        water_area_trend: trend_direction(&series(|y| y.water_percentage_area)),
        vegetation_health_trend: trend_direction(&series(|y| y.mean_ndvi)),
        temperature_trend: trend_direction(&series(|y| y.land_surface_temperature)),
        overall_environmental_trend: trend_direction(&series(|y| y.environmental_score)),
        analysis_period,
        total_years_analyzed: yearly.len(),
        yearly,
    })
}
