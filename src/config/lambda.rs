use crate::config::scoring::ScoringConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use std::env;

pub const CONFIG_PATH_VAR: &str = "SCORING_CONFIG_PATH";

/// Lambda settings, read from the function's environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LambdaConfig {
    pub scoring_config_path: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            scoring_config_path: env::var(CONFIG_PATH_VAR)
                .ok()
                .filter(|path| !path.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        super::load_scoring_config(self.scoring_config_path.as_deref())
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.scoring_config_path {
            validate_path(CONFIG_PATH_VAR, path)?;
        }
        Ok(())
    }
}
