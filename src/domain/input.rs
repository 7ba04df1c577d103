//! Field-by-field reading of a `calculate` request body.
//!
//! Deserializing straight into [`RawIndicatorSet`] stops at the first bad
//! field. The readers here walk every field instead and report all missing,
//! non-numeric and negative values in one [`ScoreError::Validation`].

use crate::domain::model::{
    Category, EconomicInputs, EnvironmentalInputs, RawIndicatorSet, SocialInputs,
};
use crate::utils::error::{FieldIssue, FieldProblem, Result, ScoreError};
use crate::utils::validation::Validate;
use serde_json::{Map, Value};

struct FieldReader<'a> {
    category: Category,
    fields: Option<&'a Map<String, Value>>,
    issues: &'a mut Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value, category: Category, issues: &'a mut Vec<FieldIssue>) -> Self {
        let fields = body.get(category.key()).and_then(Value::as_object);
        if fields.is_none() {
            issues.push(FieldIssue {
                category: category.key().to_string(),
                field: String::new(),
                problem: FieldProblem::CategoryMissing,
            });
        }
        Self {
            category,
            fields,
            issues,
        }
    }

    fn report(&mut self, field: &str, problem: FieldProblem) -> f64 {
        self.issues.push(FieldIssue {
            category: self.category.key().to_string(),
            field: field.to_string(),
            problem,
        });
        0.0
    }

    fn lookup(&self, field: &str, aliases: &[&str]) -> Option<&'a Value> {
        let fields = self.fields?;
        std::iter::once(field)
            .chain(aliases.iter().copied())
            .find_map(|name| fields.get(name))
    }

    fn read(&mut self, field: &str, aliases: &[&str], allow_negative: bool) -> f64 {
        // 整個類別缺失時只回報一次
        if self.fields.is_none() {
            return 0.0;
        }
        let value = match self.lookup(field, aliases) {
            None | Some(Value::Null) => return self.report(field, FieldProblem::Missing),
            Some(value) => value,
        };
        let Some(number) = value.as_f64() else {
            return self.report(field, FieldProblem::NotNumeric);
        };
        match number_problem(number, allow_negative) {
            Some(problem) => self.report(field, problem),
            None => number,
        }
    }

    fn non_negative(&mut self, field: &str) -> f64 {
        self.read(field, &[], false)
    }
}

fn number_problem(number: f64, allow_negative: bool) -> Option<FieldProblem> {
    if !number.is_finite() {
        Some(FieldProblem::NotFinite)
    } else if number < 0.0 && !allow_negative {
        Some(FieldProblem::Negative)
    } else {
        None
    }
}

/// Applies the reader's numeric checks to already-built values.
fn check_fields(category: Category, fields: &[(&str, f64, bool)], issues: &mut Vec<FieldIssue>) {
    for &(field, value, allow_negative) in fields {
        if let Some(problem) = number_problem(value, allow_negative) {
            issues.push(FieldIssue {
                category: category.key().to_string(),
                field: field.to_string(),
                problem,
            });
        }
    }
}

fn environmental_issues(env: &EnvironmentalInputs, issues: &mut Vec<FieldIssue>) {
    check_fields(
        Category::Environmental,
        &[
            ("green_area", env.green_area, false),
            ("total_area", env.total_area, false),
            ("water_area", env.water_area, false),
            ("air_quality_aod", env.air_quality_aod, false),
            ("land_surface_temperature", env.land_surface_temperature, true),
            ("mean_ndvi", env.mean_ndvi, false),
            ("tasseled_cap_wetness", env.tasseled_cap_wetness, true),
            ("mean_lst_for_eqi", env.mean_lst_for_eqi, true),
            ("ndbsi", env.ndbsi, false),
            ("pm25", env.pm25, false),
        ],
        issues,
    );
}

fn social_issues(social: &SocialInputs, issues: &mut Vec<FieldIssue>) {
    check_fields(
        Category::Social,
        &[
            ("total_population", social.total_population, false),
            ("total_crimes", social.total_crimes, false),
            ("adults_with_degree", social.adults_with_degree, false),
            ("total_adult_population", social.total_adult_population, false),
            ("avg_time_to_transit", social.avg_time_to_transit, false),
            ("avg_time_to_schools", social.avg_time_to_schools, false),
            ("avg_time_to_hospitals", social.avg_time_to_hospitals, false),
            ("avg_time_to_fire_stations", social.avg_time_to_fire_stations, false),
            ("avg_time_to_police", social.avg_time_to_police, false),
            ("street_intersections", social.street_intersections, false),
        ],
        issues,
    );
}

fn economic_issues(eco: &EconomicInputs, issues: &mut Vec<FieldIssue>) {
    check_fields(
        Category::Economic,
        &[
            ("median_household_income", eco.median_household_income, false),
            ("unemployed_count", eco.unemployed_count, false),
            ("labor_force", eco.labor_force, false),
            ("affordable_housing_units", eco.affordable_housing_units, false),
            ("total_housing_units", eco.total_housing_units, false),
        ],
        issues,
    );
}

fn into_result(issues: Vec<FieldIssue>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        tracing::warn!("Rejected indicator values with {} problem(s)", issues.len());
        Err(ScoreError::validation(issues))
    }
}

impl Validate for EnvironmentalInputs {
    fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        environmental_issues(self, &mut issues);
        into_result(issues)
    }
}

impl Validate for RawIndicatorSet {
    /// Same numeric rules as [`RawIndicatorSet::from_json`], for values built in code.
    fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        environmental_issues(&self.environmental, &mut issues);
        social_issues(&self.social, &mut issues);
        economic_issues(&self.economic, &mut issues);
        into_result(issues)
    }
}

impl RawIndicatorSet {
    /// Reads a JSON body of the shape `{environmental: {...}, social: {...}, economic: {...}}`.
    ///
    /// Unknown fields are ignored. All problems are collected before failing.
    pub fn from_json(body: &Value) -> Result<Self> {
        let mut issues = Vec::new();

        if !body.is_object() {
            return Err(ScoreError::validation(vec![FieldIssue {
                category: "request".to_string(),
                field: String::new(),
                problem: FieldProblem::CategoryMissing,
            }]));
        }

        let environmental = read_environmental(&mut FieldReader::new(
            body,
            Category::Environmental,
            &mut issues,
        ));
        let social = read_social(&mut FieldReader::new(body, Category::Social, &mut issues));
        let economic = read_economic(&mut FieldReader::new(body, Category::Economic, &mut issues));

        if !issues.is_empty() {
            tracing::warn!("Rejected indicator payload with {} problem(s)", issues.len());
            return Err(ScoreError::validation(issues));
        }

        Ok(Self {
            environmental,
            social,
            economic,
        })
    }
}

fn read_environmental(reader: &mut FieldReader<'_>) -> EnvironmentalInputs {
    EnvironmentalInputs {
        green_area: reader.read("green_area", &["green_space_area"], false),
        total_area: reader.non_negative("total_area"),
        water_area: reader.non_negative("water_area"),
        air_quality_aod: reader.non_negative("air_quality_aod"),
        land_surface_temperature: reader.read("land_surface_temperature", &[], true),
        mean_ndvi: reader.non_negative("mean_ndvi"),
        tasseled_cap_wetness: reader.read("tasseled_cap_wetness", &[], true),
        mean_lst_for_eqi: reader.read("mean_lst_for_eqi", &[], true),
        ndbsi: reader.non_negative("ndbsi"),
        pm25: reader.non_negative("pm25"),
    }
}

fn read_social(reader: &mut FieldReader<'_>) -> SocialInputs {
    SocialInputs {
        total_population: reader.non_negative("total_population"),
        total_crimes: reader.non_negative("total_crimes"),
        adults_with_degree: reader.non_negative("adults_with_degree"),
        total_adult_population: reader.non_negative("total_adult_population"),
        avg_time_to_transit: reader.non_negative("avg_time_to_transit"),
        avg_time_to_schools: reader.non_negative("avg_time_to_schools"),
        avg_time_to_hospitals: reader.non_negative("avg_time_to_hospitals"),
        avg_time_to_fire_stations: reader.non_negative("avg_time_to_fire_stations"),
        avg_time_to_police: reader.non_negative("avg_time_to_police"),
        street_intersections: reader.non_negative("street_intersections"),
    }
}

fn read_economic(reader: &mut FieldReader<'_>) -> EconomicInputs {
    EconomicInputs {
        median_household_income: reader.non_negative("median_household_income"),
        unemployed_count: reader.non_negative("unemployed_count"),
        labor_force: reader.non_negative("labor_force"),
        affordable_housing_units: reader.non_negative("affordable_housing_units"),
        total_housing_units: reader.non_negative("total_housing_units"),
    }
}

/// Reads only the environmental block, for yearly trend input.
pub fn environmental_from_json(fields: &Value) -> Result<EnvironmentalInputs> {
    let mut issues = Vec::new();
    let wrapped = serde_json::json!({ "environmental": fields });
    let environmental = read_environmental(&mut FieldReader::new(
        &wrapped,
        Category::Environmental,
        &mut issues,
    ));
    if issues.is_empty() {
        Ok(environmental)
    } else {
        Err(ScoreError::validation(issues))
    }
}
