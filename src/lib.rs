pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalFiles, CliConfig};

pub use adapters::RemoteScoringClient;
pub use app::{ApiRequest, ApiResponse, Route, ScoringService};
pub use config::{lambda::LambdaConfig, load_scoring_config, scoring::ScoringConfig};
pub use core::SustainabilityEngine;
pub use domain::model::{Grade, RawIndicatorSet, SustainabilityResult};
pub use domain::ports::ScoringBackend;
pub use utils::error::{Result, ScoreError};
