use econ_swarm_models::{AgentRole, ContextField, PipelineState, SharedContext, StateConflict};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("State conflict: {0}")]
    StateConflict(#[from] StateConflict),

    #[error("Model unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Shared context is missing {0}")]
    IncompleteContext(ContextField),

    #[error("No data for {0}")]
    UnknownSymbol(String),

    #[error("Unknown indicator {0}")]
    UnknownIndicator(String),

    #[error("Unknown stress scenario {0}")]
    UnknownScenario(String),

    #[error("Portfolio has no value")]
    EmptyPortfolio,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<econ_swarm_data::DataError> for AgentError {
    fn from(err: econ_swarm_data::DataError) -> Self {
        AgentError::ToolUnavailable(err.to_string())
    }
}

/// A run that ended in the failed state.
///
/// Carries the partial context so callers can inspect what earlier stages
/// produced.
#[derive(Error, Debug)]
#[error("pipeline failed while {failed_stage} ({role}): {error}")]
pub struct PipelineFailure {
    pub run_id: Uuid,
    pub failed_stage: PipelineState,
    pub role: AgentRole,
    #[source]
    pub error: AgentError,
    pub context: SharedContext,
}

impl PipelineFailure {
    /// The state the pipeline is left in.
    pub fn state(&self) -> PipelineState {
        PipelineState::Failed
    }
}
