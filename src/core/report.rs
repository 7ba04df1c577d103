//! Narrative data-analysis report built from a finished calculation.

use crate::domain::model::{Category, Grade, Indicator, SustainabilityResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category scores below this get a recommendation.
const ATTENTION_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl PerformanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            PerformanceLevel::Excellent
        } else if score >= 70.0 {
            PerformanceLevel::Good
        } else if score >= 60.0 {
            PerformanceLevel::Fair
        } else if score >= 50.0 {
            PerformanceLevel::Poor
        } else {
            PerformanceLevel::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Fair => "Fair",
            PerformanceLevel::Poor => "Poor",
            PerformanceLevel::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub action: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category: Category,
    pub score: f64,
    pub level: PerformanceLevel,
    pub insight: String,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub sustainability_index: f64,
    pub grade: Grade,
    pub performance: PerformanceLevel,
    pub interpretation: String,
    pub categories: Vec<CategoryInsight>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strongest_indicator: Option<Indicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weakest_indicator: Option<Indicator>,
}

fn insight(category: Category, strong: bool) -> &'static str {
    match (category, strong) {
        (Category::Environmental, true) => {
            "Strong environmental foundation with good green coverage."
        }
        (Category::Environmental, false) => {
            "Environmental improvements needed, focus on green spaces."
        }
        (Category::Social, true) => "Good social infrastructure and community services.",
        (Category::Social, false) => "Social services and safety measures need enhancement.",
        (Category::Economic, true) => "Stable economic conditions with good employment.",
        (Category::Economic, false) => "Economic development needed, focus on job creation.",
    }
}

fn recommendation(category: Category) -> Recommendation {
    let (priority, action, impact) = match category {
        Category::Environmental => (
            Priority::High,
            "Increase green spaces and improve air quality monitoring",
            "Boost environmental score by 15-20 points",
        ),
        Category::Social => (
            Priority::Medium,
            "Enhance public transportation and reduce crime rates",
            "Improve community wellbeing and accessibility",
        ),
        Category::Economic => (
            Priority::High,
            "Develop affordable housing and job opportunities",
            "Strengthen economic foundation",
        ),
    };
    Recommendation {
        category,
        priority,
        action: action.to_string(),
        impact: impact.to_string(),
    }
}

fn highlighted(category: Category) -> [(Indicator, &'static str, &'static str); 3] {
    match category {
        Category::Environmental => [
            (Indicator::GreenPercentageArea, "Green Coverage", "%"),
            (Indicator::AirQuality, "Air Quality (AOD)", ""),
            (Indicator::LandSurfaceTemperature, "Temperature", "°C"),
        ],
        Category::Social => [
            (Indicator::EducationLevel, "Education Level", "%"),
            (Indicator::CrimeRate, "Crime Rate", "per 1k"),
            (Indicator::AccessToTransit, "Transit Access", "min"),
        ],
        Category::Economic => [
            (Indicator::MedianHouseholdIncome, "Median Income", "USD"),
            (Indicator::UnemploymentRate, "Unemployment", "%"),
            (Indicator::HousingAffordability, "Housing Affordability", "%"),
        ],
    }
}

impl AnalysisReport {
    pub fn from_result(result: &SustainabilityResult) -> Self {
        Self::generated_at(result, Utc::now())
    }

    pub fn generated_at(result: &SustainabilityResult, generated_at: DateTime<Utc>) -> Self {
        let categories = Category::ALL
            .into_iter()
            .map(|category| {
                let score = result.category_score(category);
                let highlights = highlighted(category)
                    .into_iter()
                    .filter_map(|(indicator, label, unit)| {
                        result.indicator(indicator).map(|value| Highlight {
                            label: label.to_string(),
                            value,
                            unit: unit.to_string(),
                        })
                    })
                    .collect();
                CategoryInsight {
                    category,
                    score,
                    level: PerformanceLevel::from_score(score),
                    insight: insight(category, score >= ATTENTION_THRESHOLD).to_string(),
                    highlights,
                }
            })
            .collect();

        let recommendations = Category::ALL
            .into_iter()
            .filter(|category| result.category_score(*category) < ATTENTION_THRESHOLD)
            .map(recommendation)
            .collect();

        let ranked: Vec<(Indicator, f64)> = Indicator::ALL
            .into_iter()
            .filter_map(|indicator| result.normalized_value(indicator).map(|v| (indicator, v)))
            .collect();
        // 同分時取列表中較早的指標
        let strongest_indicator = ranked
            .iter()
            .fold(None, |best: Option<(Indicator, f64)>, &(indicator, value)| match best {
                Some((_, top)) if top >= value => best,
                _ => Some((indicator, value)),
            })
            .map(|(indicator, _)| indicator);
        let weakest_indicator = ranked
            .iter()
            .fold(None, |worst: Option<(Indicator, f64)>, &(indicator, value)| match worst {
                Some((_, bottom)) if bottom <= value => worst,
                _ => Some((indicator, value)),
            })
            .map(|(indicator, _)| indicator);

        Self {
            generated_at,
            sustainability_index: result.sustainability_index,
            grade: result.grade,
            performance: PerformanceLevel::from_score(result.sustainability_index),
            interpretation: result.interpretation.clone(),
            categories,
            recommendations,
            strongest_indicator,
            weakest_indicator,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Sustainability Data Analysis Report\n");
        out.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        out.push_str("## Executive Summary\n\n");
        out.push_str(&format!(
            "- Overall score: **{:.1}** ({} performance)\n- Grade: **{}**\n- Key recommendations: {}\n\n{}\n\n",
            self.sustainability_index,
            self.performance.as_str(),
            self.grade,
            self.recommendations.len(),
            self.interpretation
        ));

        out.push_str("## Category Performance\n\n");
        for category in &self.categories {
            out.push_str(&format!(
                "### {} ({:.1}/100, {})\n\n",
                category.category.label(),
                category.score,
                category.level.as_str()
            ));
            for highlight in &category.highlights {
                out.push_str(&format!(
                    "- {}: {:.2} {}\n",
                    highlight.label, highlight.value, highlight.unit
                ));
            }
            out.push_str(&format!("\n**Key insight:** {}\n\n", category.insight));
        }

        if let (Some(strongest), Some(weakest)) = (self.strongest_indicator, self.weakest_indicator)
        {
            out.push_str(&format!(
                "## Indicator Extremes\n\n- Strongest: {}\n- Weakest: {}\n\n",
                strongest, weakest
            ));
        }

        if !self.recommendations.is_empty() {
            out.push_str("## Strategic Recommendations\n\n");
            for rec in &self.recommendations {
                out.push_str(&format!(
                    "- **{}** ({:?} priority): {}. Expected impact: {}.\n",
                    rec.category.label(),
                    rec.priority,
                    rec.action,
                    rec.impact
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::scoring::ScoringConfig;
    use crate::core::engine::SustainabilityEngine;
    use crate::domain::model::RawIndicatorSet;
    use chrono::TimeZone;

    fn example_result() -> SustainabilityResult {
        SustainabilityEngine::new(ScoringConfig::default())
            .unwrap()
            .calculate(&RawIndicatorSet::example())
            .unwrap()
    }

    #[test]
    fn test_performance_levels() {
        assert_eq!(PerformanceLevel::from_score(80.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(64.5), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_score(49.0), PerformanceLevel::Critical);
    }

    #[test]
    fn test_example_report() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = AnalysisReport::generated_at(&example_result(), when);

        assert_eq!(report.grade, Grade::C);
        assert_eq!(report.performance, PerformanceLevel::Fair);
        // Environmental 52.45 is the only category below 70.
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].category, Category::Environmental);
        assert_eq!(report.recommendations[0].priority, Priority::High);
        assert_eq!(report.categories.len(), 3);
        assert_eq!(report.categories[0].highlights.len(), 3);
        assert_eq!(report.strongest_indicator, Some(Indicator::Walkability));
        assert_eq!(report.weakest_indicator, Some(Indicator::WaterPercentageArea));
    }

    #[test]
    fn test_markdown_sections() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let markdown = AnalysisReport::generated_at(&example_result(), when).to_markdown();

        assert!(markdown.starts_with("# Sustainability Data Analysis Report"));
        assert!(markdown.contains("_Generated 2024-05-01 12:00 UTC_"));
        assert!(markdown.contains("- Grade: **C**"));
        assert!(markdown.contains("### Environmental ("));
        assert!(markdown.contains("/100, Poor)"));
        assert!(markdown.contains("## Strategic Recommendations"));
        assert!(markdown.contains("Increase green spaces"));
    }
}
