use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "Environmental")]
    Environmental,
    #[serde(alias = "Social")]
    Social,
    #[serde(alias = "Economic")]
    Economic,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Environmental, Category::Social, Category::Economic];

    pub fn key(self) -> &'static str {
        match self {
            Category::Environmental => "environmental",
            Category::Social => "social",
            Category::Economic => "economic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Environmental => "Environmental",
            Category::Social => "Social",
            Category::Economic => "Economic",
        }
    }

    pub fn indicators(self) -> impl Iterator<Item = Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(move |indicator| indicator.category() == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every derived indicator the engine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    GreenPercentageArea,
    WaterPercentageArea,
    AirQuality,
    LandSurfaceTemperature,
    EcologicalQualityIndex,
    CrimeRate,
    EducationLevel,
    AccessToTransit,
    AccessToSchools,
    AccessToHospitals,
    AccessToFireStations,
    AccessToPolice,
    Walkability,
    MedianHouseholdIncome,
    UnemploymentRate,
    HousingAffordability,
}

impl Indicator {
    pub const ALL: [Indicator; 16] = [
        Indicator::GreenPercentageArea,
        Indicator::WaterPercentageArea,
        Indicator::AirQuality,
        Indicator::LandSurfaceTemperature,
        Indicator::EcologicalQualityIndex,
        Indicator::CrimeRate,
        Indicator::EducationLevel,
        Indicator::AccessToTransit,
        Indicator::AccessToSchools,
        Indicator::AccessToHospitals,
        Indicator::AccessToFireStations,
        Indicator::AccessToPolice,
        Indicator::Walkability,
        Indicator::MedianHouseholdIncome,
        Indicator::UnemploymentRate,
        Indicator::HousingAffordability,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Indicator::GreenPercentageArea => "green_percentage_area",
            Indicator::WaterPercentageArea => "water_percentage_area",
            Indicator::AirQuality => "air_quality",
            Indicator::LandSurfaceTemperature => "land_surface_temperature",
            Indicator::EcologicalQualityIndex => "ecological_quality_index",
            Indicator::CrimeRate => "crime_rate",
            Indicator::EducationLevel => "education_level",
            Indicator::AccessToTransit => "access_to_transit",
            Indicator::AccessToSchools => "access_to_schools",
            Indicator::AccessToHospitals => "access_to_hospitals",
            Indicator::AccessToFireStations => "access_to_fire_stations",
            Indicator::AccessToPolice => "access_to_police",
            Indicator::Walkability => "walkability",
            Indicator::MedianHouseholdIncome => "median_household_income",
            Indicator::UnemploymentRate => "unemployment_rate",
            Indicator::HousingAffordability => "housing_affordability",
        }
    }

    /// Key used in the `normalized` map of a result.
    pub fn normalized_key(self) -> &'static str {
        match self {
            Indicator::GreenPercentageArea => "gpa_normalized",
            Indicator::WaterPercentageArea => "wpa_normalized",
            Indicator::AirQuality => "aq_normalized",
            Indicator::LandSurfaceTemperature => "lst_normalized",
            Indicator::EcologicalQualityIndex => "eqi_normalized",
            Indicator::CrimeRate => "cr_normalized",
            Indicator::EducationLevel => "el_normalized",
            Indicator::AccessToTransit => "apt_normalized",
            Indicator::AccessToSchools => "as_normalized",
            Indicator::AccessToHospitals => "ah_normalized",
            Indicator::AccessToFireStations => "af_normalized",
            Indicator::AccessToPolice => "ap_normalized",
            Indicator::Walkability => "w_normalized",
            Indicator::MedianHouseholdIncome => "mhi_normalized",
            Indicator::UnemploymentRate => "ur_normalized",
            Indicator::HousingAffordability => "ha_normalized",
        }
    }

    pub fn from_key(key: &str) -> Option<Indicator> {
        Indicator::ALL.into_iter().find(|indicator| indicator.key() == key)
    }

    pub fn category(self) -> Category {
        match self {
            Indicator::GreenPercentageArea
            | Indicator::WaterPercentageArea
            | Indicator::AirQuality
            | Indicator::LandSurfaceTemperature
            | Indicator::EcologicalQualityIndex => Category::Environmental,
            Indicator::CrimeRate
            | Indicator::EducationLevel
            | Indicator::AccessToTransit
            | Indicator::AccessToSchools
            | Indicator::AccessToHospitals
            | Indicator::AccessToFireStations
            | Indicator::AccessToPolice
            | Indicator::Walkability => Category::Social,
            Indicator::MedianHouseholdIncome
            | Indicator::UnemploymentRate
            | Indicator::HousingAffordability => Category::Economic,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Derived or normalized values keyed by indicator.
pub type IndicatorValues = BTreeMap<Indicator, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalInputs {
    #[serde(alias = "green_space_area")]
    pub green_area: f64,
    pub total_area: f64,
    pub water_area: f64,
    pub air_quality_aod: f64,
    pub land_surface_temperature: f64,
    pub mean_ndvi: f64,
    pub tasseled_cap_wetness: f64,
    pub mean_lst_for_eqi: f64,
    pub ndbsi: f64,
    pub pm25: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialInputs {
    pub total_population: f64,
    pub total_crimes: f64,
    pub adults_with_degree: f64,
    pub total_adult_population: f64,
    pub avg_time_to_transit: f64,
    pub avg_time_to_schools: f64,
    pub avg_time_to_hospitals: f64,
    pub avg_time_to_fire_stations: f64,
    pub avg_time_to_police: f64,
    pub street_intersections: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicInputs {
    pub median_household_income: f64,
    pub unemployed_count: f64,
    pub labor_force: f64,
    pub affordable_housing_units: f64,
    pub total_housing_units: f64,
}

/// Raw measurements for one neighborhood, as posted to `calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIndicatorSet {
    pub environmental: EnvironmentalInputs,
    pub social: SocialInputs,
    pub economic: EconomicInputs,
}

impl RawIndicatorSet {
    /// Sample neighborhood served by the `example` route: 1 km², 10,000 residents.
    pub fn example() -> Self {
        Self {
            environmental: EnvironmentalInputs {
                green_area: 250_000.0,
                total_area: 1_000_000.0,
                water_area: 50_000.0,
                air_quality_aod: 0.3,
                land_surface_temperature: 25.0,
                mean_ndvi: 0.5,
                tasseled_cap_wetness: 0.3,
                mean_lst_for_eqi: 25.0,
                ndbsi: 0.4,
                pm25: 20.0,
            },
            social: SocialInputs {
                total_population: 10_000.0,
                total_crimes: 50.0,
                adults_with_degree: 3_000.0,
                total_adult_population: 8_000.0,
                avg_time_to_transit: 5.0,
                avg_time_to_schools: 8.0,
                avg_time_to_hospitals: 12.0,
                avg_time_to_fire_stations: 6.0,
                avg_time_to_police: 10.0,
                street_intersections: 120.0,
            },
            economic: EconomicInputs {
                median_household_income: 50_000.0,
                unemployed_count: 500.0,
                labor_force: 6_000.0,
                affordable_housing_units: 700.0,
                total_housing_units: 1_000.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScores {
    pub environmental: f64,
    pub social: f64,
    pub economic: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Environmental => self.environmental,
            Category::Social => self.social,
            Category::Economic => self.economic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityResult {
    pub sustainability_index: f64,
    pub grade: Grade,
    pub interpretation: String,
    pub environmental_score: f64,
    pub social_score: f64,
    pub economic_score: f64,
    /// Derived indicator values keyed by indicator name.
    pub indicators: BTreeMap<String, f64>,
    /// Normalized values in [0, 1], keyed `<abbr>_normalized`.
    pub normalized: BTreeMap<String, f64>,
}

impl SustainabilityResult {
    pub fn category_score(&self, category: Category) -> f64 {
        match category {
            Category::Environmental => self.environmental_score,
            Category::Social => self.social_score,
            Category::Economic => self.economic_score,
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> Option<f64> {
        self.indicators.get(indicator.key()).copied()
    }

    pub fn normalized_value(&self, indicator: Indicator) -> Option<f64> {
        self.normalized.get(indicator.normalized_key()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    /// Empty when the serving side does not publish indicator keys.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    pub name: String,
    pub description: String,
    pub calculation: String,
    pub category: Category,
    /// Share of the final index, in percent.
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,
}

/// Weighting scheme served by the `weights` route, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsTable {
    pub category_weights: BTreeMap<Category, f64>,
    pub indicator_weights: BTreeMap<Category, BTreeMap<String, f64>>,
}
