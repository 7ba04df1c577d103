#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod scoring;

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use scoring::ScoringConfig;

/// Built-in tables, or the TOML file at `path` when given. Always validated.
pub fn load_scoring_config(path: Option<&str>) -> Result<ScoringConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading scoring configuration from {}", path);
            ScoringConfig::from_file(path)?
        }
        None => ScoringConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::cli::Command;
    use crate::utils::error::{Result, ScoreError};
    use crate::utils::validation::{validate_path, validate_url, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "sustainability-index")]
    #[command(about = "Neighborhood sustainability index calculator")]
    pub struct CliConfig {
        #[command(subcommand)]
        pub command: Command,

        /// Scoring configuration TOML (built-in tables when omitted)
        #[arg(long, global = true)]
        pub config: Option<String>,

        /// Base URL of a remote scoring service to use instead of the local engine
        #[arg(long, global = true)]
        pub remote: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Pretty-print JSON output")]
        pub pretty: bool,
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(path) = &self.config {
                validate_path("config", path)?;
            }

            if let Some(remote) = &self.remote {
                validate_url("remote", remote)?;

                if self.config.is_some() {
                    return Err(ScoreError::ConfigValidationError {
                        field: "config".to_string(),
                        message: "--config only applies to the local engine, not with --remote"
                            .to_string(),
                    });
                }
                if !self.command.supports_remote() {
                    return Err(ScoreError::InvalidConfigValueError {
                        field: "remote".to_string(),
                        value: remote.clone(),
                        reason: format!("`{}` only runs locally", self.command.name()),
                    });
                }
            }

            Ok(())
        }
    }

}
