use crate::domain::model::{
    IndicatorDefinition, RawIndicatorSet, SustainabilityResult, WeightsTable,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Something that can score a neighborhood: the in-process engine or a remote service.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    async fn calculate(&self, input: &RawIndicatorSet) -> Result<SustainabilityResult>;
    async fn indicator_definitions(&self) -> Result<Vec<IndicatorDefinition>>;
    async fn weights(&self) -> Result<WeightsTable>;
    async fn example(&self) -> Result<RawIndicatorSet>;
}
