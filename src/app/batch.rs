//! CSV batch scoring: one neighborhood per row.
//!
//! The header names the raw fields (`green_area`, `total_population`, ...)
//! plus an optional `name` column. A row that fails is written out with its
//! error message and the batch carries on.

use crate::core::engine::SustainabilityEngine;
use crate::domain::model::Category;
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::io::{Read, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub name: String,
    pub sustainability_index: Option<f64>,
    pub grade: Option<String>,
    pub environmental_score: Option<f64>,
    pub social_score: Option<f64>,
    pub economic_score: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scored: usize,
    pub failed: usize,
}

fn cell_value(cell: &str) -> Option<Value> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Some(match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(cell.to_string()),
    })
}

/// Every category sees every column; unknown fields are ignored by the reader.
fn row_body(fields: &Map<String, Value>) -> Value {
    let mut body = Map::new();
    for category in Category::ALL {
        body.insert(category.key().to_string(), Value::Object(fields.clone()));
    }
    Value::Object(body)
}

pub fn score_csv<R: Read, W: Write>(
    engine: &SustainabilityEngine,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let headers = reader.headers()?.clone();
    let mut summary = BatchSummary::default();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let mut name = format!("row {}", index + 1);
        let mut fields = Map::new();

        for (header, cell) in headers.iter().zip(record.iter()) {
            if header == "name" {
                if !cell.trim().is_empty() {
                    name = cell.trim().to_string();
                }
            } else if let Some(value) = cell_value(cell) {
                fields.insert(header.to_string(), value);
            }
        }

        let row = match engine.calculate_json(&row_body(&fields)) {
            Ok(result) => {
                summary.scored += 1;
                BatchRow {
                    name,
                    sustainability_index: Some(result.sustainability_index),
                    grade: Some(result.grade.to_string()),
                    environmental_score: Some(result.environmental_score),
                    social_score: Some(result.social_score),
                    economic_score: Some(result.economic_score),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Batch row '{}' failed: {}", name, e);
                summary.failed += 1;
                BatchRow {
                    name,
                    sustainability_index: None,
                    grade: None,
                    environmental_score: None,
                    social_score: None,
                    economic_score: None,
                    error: Some(e.to_string()),
                }
            }
        };
        writer.serialize(row)?;
    }

    writer.flush()?;
    tracing::info!(
        "Batch finished: {} scored, {} failed",
        summary.scored,
        summary.failed
    );
    Ok(summary)
}
