use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub category: String,
    pub field: String,
    pub problem: FieldProblem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    NotNumeric,
    NotFinite,
    Negative,
    CategoryMissing,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.problem {
            FieldProblem::Missing => "is required",
            FieldProblem::NotNumeric => "must be a number",
            FieldProblem::NotFinite => "must be a finite number",
            FieldProblem::Negative => "must not be negative",
            FieldProblem::CategoryMissing => "must be an object of indicator values",
        };
        if self.field.is_empty() {
            write!(f, "{} {}", self.category, what)
        } else {
            write!(f, "{}.{} {}", self.category, self.field, what)
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Invalid input: {}", join_issues(.issues))]
    Validation { issues: Vec<FieldIssue> },

    #[error("Cannot compute {category}.{indicator}: {denominator} must be greater than zero")]
    DivisionByZero {
        category: String,
        indicator: String,
        denominator: String,
    },

    #[error("Malformed normalization range for {indicator}: {reason}")]
    RangeConfiguration { indicator: String, reason: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Remote scoring service returned {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Arithmetic,
    Configuration,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoreError {
    pub fn validation(issues: Vec<FieldIssue>) -> Self {
        ScoreError::Validation { issues }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoreError::Validation { .. } | ScoreError::SerializationError(_) => {
                ErrorCategory::Validation
            }
            ScoreError::DivisionByZero { .. } => ErrorCategory::Arithmetic,
            ScoreError::RangeConfiguration { .. }
            | ScoreError::ConfigValidationError { .. }
            | ScoreError::InvalidConfigValueError { .. }
            | ScoreError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScoreError::Remote { .. } | ScoreError::ApiError(_) => ErrorCategory::Network,
            ScoreError::CsvError(_) | ScoreError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Arithmetic => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller sent something wrong, as opposed to a fault on our side.
    pub fn is_user_error(&self) -> bool {
        match self {
            ScoreError::Remote { status, .. } => (400..500).contains(status),
            _ => matches!(
                self.category(),
                ErrorCategory::Validation | ErrorCategory::Arithmetic
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoreError::Validation { issues } if issues.len() == 1 => {
                format!("Input rejected: {}", issues[0])
            }
            ScoreError::Validation { issues } => {
                format!("Input rejected ({} problems): {}", issues.len(), join_issues(issues))
            }
            ScoreError::DivisionByZero { .. } => format!("Calculation failed: {}", self),
            ScoreError::Remote { detail, .. } => format!("Scoring service error: {}", detail),
            ScoreError::ApiError(_) => "Could not reach the scoring service".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoreError::Validation { .. } => {
                "Provide every indicator field as a non-negative number (see the `example` command)"
            }
            ScoreError::DivisionByZero { .. } => {
                "Population, adult population, total area, labor force and housing units must all be positive"
            }
            ScoreError::RangeConfiguration { .. }
            | ScoreError::ConfigValidationError { .. }
            | ScoreError::InvalidConfigValueError { .. }
            | ScoreError::MissingConfigError { .. } => {
                "Fix the scoring configuration file or remove it to use the built-in tables"
            }
            ScoreError::Remote { .. } | ScoreError::ApiError(_) => {
                "Check the remote endpoint URL and that the service is running"
            }
            ScoreError::SerializationError(_) => "Make sure the input is valid JSON",
            ScoreError::CsvError(_) => "Check the CSV header and that each row has every column",
            ScoreError::IoError(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(field: &str, problem: FieldProblem) -> FieldIssue {
        FieldIssue {
            category: "social".to_string(),
            field: field.to_string(),
            problem,
        }
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = ScoreError::validation(vec![
            issue("total_crimes", FieldProblem::Missing),
            issue("labor_force", FieldProblem::NotNumeric),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("social.total_crimes is required"));
        assert!(msg.contains("social.labor_force must be a number"));
        assert!(err.is_user_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_division_by_zero_is_arithmetic() {
        let err = ScoreError::DivisionByZero {
            category: "social".to_string(),
            indicator: "crime_rate".to_string(),
            denominator: "total_population".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Arithmetic);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("total_population must be greater than zero"));
    }

    #[test]
    fn test_range_configuration_is_not_user_error() {
        let err = ScoreError::RangeConfiguration {
            indicator: "walkability".to_string(),
            reason: "min must be below max".to_string(),
        };
        assert!(!err.is_user_error());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_remote_status_decides_user_error() {
        let client_side = ScoreError::Remote {
            status: 400,
            detail: "bad".to_string(),
        };
        let server_side = ScoreError::Remote {
            status: 503,
            detail: "down".to_string(),
        };
        assert!(client_side.is_user_error());
        assert!(!server_side.is_user_error());
    }
}
