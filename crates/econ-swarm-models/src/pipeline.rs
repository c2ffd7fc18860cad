use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::{ContextSummary, SharedContext};
use crate::role::AgentRole;

/// States of the handoff pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    Collecting,
    Analyzing,
    Assessing,
    Complete,
    Failed,
}

impl PipelineState {
    /// The specialist that runs while the pipeline is in this state.
    pub fn stage_role(&self) -> Option<AgentRole> {
        match self {
            PipelineState::Collecting => Some(AgentRole::DataCollector),
            PipelineState::Analyzing => Some(AgentRole::Analyst),
            PipelineState::Assessing => Some(AgentRole::RiskAssessor),
            _ => None,
        }
    }

    /// Successor on success. Terminal states have none.
    pub fn next(&self) -> Option<PipelineState> {
        match self {
            PipelineState::Init => Some(PipelineState::Collecting),
            PipelineState::Collecting => Some(PipelineState::Analyzing),
            PipelineState::Analyzing => Some(PipelineState::Assessing),
            PipelineState::Assessing => Some(PipelineState::Complete),
            PipelineState::Complete | PipelineState::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Init => "init",
            PipelineState::Collecting => "collecting",
            PipelineState::Analyzing => "analyzing",
            PipelineState::Assessing => "assessing",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress notifications for console or dashboard renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    StageEntered {
        run_id: Uuid,
        state: PipelineState,
        role: AgentRole,
    },
    StageCompleted {
        run_id: Uuid,
        state: PipelineState,
        role: AgentRole,
        summary: String,
        elapsed_ms: u64,
    },
    PipelineFailed {
        run_id: Uuid,
        state: PipelineState,
        role: AgentRole,
        error: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        elapsed_ms: u64,
    },
}

impl PipelineEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            PipelineEvent::StageEntered { run_id, .. }
            | PipelineEvent::StageCompleted { run_id, .. }
            | PipelineEvent::PipelineFailed { run_id, .. }
            | PipelineEvent::PipelineCompleted { run_id, .. } => *run_id,
        }
    }
}

/// How the run moved between agents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionDetails {
    pub agents_involved: Vec<AgentRole>,
    pub handoff_count: u32,
    pub elapsed_ms: u64,
}

/// Final output of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub query: String,
    /// The coordinator's composed recommendation.
    pub response: String,
    pub status: PipelineState,
    pub context: SharedContext,
    pub summary: ContextSummary,
    pub execution: ExecutionDetails,
    pub using_live_data: bool,
    pub completed_at: DateTime<Utc>,
}
