use crate::core::engine::SustainabilityEngine;
use crate::core::report::AnalysisReport;
use crate::core::trend;
use crate::domain::model::RawIndicatorSet;
use crate::utils::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Health,
    Example,
    Indicators,
    Weights,
    Calculate,
    Report,
    Trend,
}

impl Route {
    /// Prefix of the `detail` message when the route fails.
    fn error_context(self) -> &'static str {
        match self {
            Route::Health => "Health check error",
            Route::Example => "Error generating example",
            Route::Indicators => "Error retrieving indicators",
            Route::Weights => "Error retrieving weights",
            Route::Calculate => "Calculation error",
            Route::Report => "Report error",
            Route::Trend => "Time series analysis error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub route: Route,
    #[serde(default)]
    pub body: Value,
}

impl ApiRequest {
    pub fn new(route: Route, body: Value) -> Self {
        Self { route, body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Route dispatch over one shared engine.
#[derive(Debug, Clone)]
pub struct ScoringService {
    engine: SustainabilityEngine,
}

impl ScoringService {
    pub fn new(engine: SustainabilityEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SustainabilityEngine {
        &self.engine
    }

    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        tracing::info!("Handling {:?} request", request.route);

        match self.dispatch(request) {
            Ok(body) => ApiResponse { status: 200, body },
            Err(e) => {
                let status = if e.is_user_error() { 400 } else { 500 };
                tracing::warn!("{:?} request failed ({}): {}", request.route, status, e);
                ApiResponse {
                    status,
                    body: error_body(request.route.error_context(), &e),
                }
            }
        }
    }

    fn dispatch(&self, request: &ApiRequest) -> Result<Value> {
        match request.route {
            Route::Health => Ok(health()),
            Route::Example => Ok(serde_json::to_value(RawIndicatorSet::example())?),
            Route::Indicators => Ok(serde_json::to_value(self.engine.indicator_definitions()?)?),
            Route::Weights => Ok(serde_json::to_value(self.engine.weights()?)?),
            Route::Calculate => Ok(serde_json::to_value(
                self.engine.calculate_json(&request.body)?,
            )?),
            Route::Report => {
                let result = self.engine.calculate_json(&request.body)?;
                let report = AnalysisReport::from_result(&result);
                Ok(json!({
                    "result": result,
                    "report": report,
                    "markdown": report.to_markdown(),
                }))
            }
            Route::Trend => {
                let years = trend::years_from_json(&request.body)?;
                Ok(serde_json::to_value(trend::analyze(&self.engine, &years)?)?)
            }
        }
    }
}

fn health() -> Value {
    json!({
        "status": "healthy",
        "message": "API is running properly",
        "services": {
            "sustainability_calculator": "available",
            "report": "available",
            "trend_analysis": "available",
        },
        "version": env!("CARGO_PKG_VERSION"),
    })
}

/// `{"detail": "<context>: <message>"}`, with the offending fields for validation errors.
pub fn error_body(context: &str, error: &ScoreError) -> Value {
    let mut body = json!({ "detail": format!("{}: {}", context, error) });
    if let ScoreError::Validation { issues } = error {
        body["issues"] = json!(issues);
    }
    body
}
