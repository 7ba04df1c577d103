pub mod aggregator;
pub mod engine;
pub mod normalizer;
pub mod report;
pub mod scorer;
pub mod trend;

pub use crate::domain::model::{CategoryScores, RawIndicatorSet, SustainabilityResult};
pub use crate::domain::ports::ScoringBackend;
pub use crate::utils::error::Result;
pub use engine::SustainabilityEngine;
