use crate::utils::error::{ScoreError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ScoreError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value < 0.0 {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must not be negative".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ScoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// `min < max`, both finite. Used for every normalization range.
pub fn validate_bounds(indicator: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ScoreError::RangeConfiguration {
            indicator: indicator.to_string(),
            reason: format!("bounds must be finite (min={}, max={})", min, max),
        });
    }
    if min >= max {
        return Err(ScoreError::RangeConfiguration {
            indicator: indicator.to_string(),
            reason: format!("min ({}) must be below max ({})", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("remote", "https://example.com").is_ok());
        assert!(validate_url("remote", "http://localhost:8000").is_ok());
        assert!(validate_url("remote", "").is_err());
        assert!(validate_url("remote", "invalid-url").is_err());
        assert!(validate_url("remote", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds("crime_rate", 0.0, 100.0).is_ok());
        assert!(validate_bounds("crime_rate", 100.0, 100.0).is_err());
        assert!(validate_bounds("crime_rate", 10.0, 1.0).is_err());
        assert!(validate_bounds("crime_rate", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("weight", 0.0).is_ok());
        assert!(validate_non_negative("weight", -0.1).is_err());
        assert!(validate_non_negative("weight", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("category_weights", 1.0, 0.999, 1.001).is_ok());
        assert!(validate_range("category_weights", 0.9, 0.999, 1.001).is_err());
    }
}
