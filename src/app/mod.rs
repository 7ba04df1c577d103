// Application layer: request routing and batch workflows on top of the engine.

pub mod batch;
pub mod service;

pub use service::{ApiRequest, ApiResponse, Route, ScoringService};
