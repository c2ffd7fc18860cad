use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use econ_swarm_models::{
    AgentRole, AnalysisReport, ContextField, ContextStore, DataSourceStatus, ExecutionDetails,
    Indicator, PipelineEvent, PipelineState, SharedContext,
};
use tokio::sync::broadcast;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{AgentError, PipelineFailure};
use crate::factory::AgentFactory;
use crate::specialist::SpecialistAgent;

/// Events buffered per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 64;

/// Drives one query through collect, analyze and assess, then has the
/// coordinator compose the answer.
///
/// Stages run strictly one after another; each is awaited to completion
/// before the next begins.
pub struct Orchestrator {
    coordinator: Arc<dyn SpecialistAgent>,
    data_collector: Arc<dyn SpecialistAgent>,
    analyst: Arc<dyn SpecialistAgent>,
    risk_assessor: Arc<dyn SpecialistAgent>,
    events: broadcast::Sender<PipelineEvent>,
}

impl Orchestrator {
    /// Build the four specialists once from the factory.
    pub fn new(factory: &AgentFactory) -> Result<Self, AgentError> {
        Self::from_specialists(
            Arc::new(factory.create(AgentRole::Coordinator)?),
            Arc::new(factory.create(AgentRole::DataCollector)?),
            Arc::new(factory.create(AgentRole::Analyst)?),
            Arc::new(factory.create(AgentRole::RiskAssessor)?),
        )
    }

    /// Assemble from pre-built specialists. Each must serve its slot's role.
    pub fn from_specialists(
        coordinator: Arc<dyn SpecialistAgent>,
        data_collector: Arc<dyn SpecialistAgent>,
        analyst: Arc<dyn SpecialistAgent>,
        risk_assessor: Arc<dyn SpecialistAgent>,
    ) -> Result<Self, AgentError> {
        let slots = [
            (AgentRole::Coordinator, &coordinator),
            (AgentRole::DataCollector, &data_collector),
            (AgentRole::Analyst, &analyst),
            (AgentRole::RiskAssessor, &risk_assessor),
        ];
        for (expected, agent) in slots {
            if agent.role() != expected {
                return Err(AgentError::Configuration(format!(
                    "{} cannot fill the {expected} slot",
                    agent.role()
                )));
            }
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            coordinator,
            data_collector,
            analyst,
            risk_assessor,
            events,
        })
    }

    /// Progress events for every subsequent run.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    fn specialist(&self, role: AgentRole) -> &Arc<dyn SpecialistAgent> {
        match role {
            AgentRole::Coordinator => &self.coordinator,
            AgentRole::DataCollector => &self.data_collector,
            AgentRole::Analyst => &self.analyst,
            AgentRole::RiskAssessor => &self.risk_assessor,
        }
    }

    fn emit(&self, event: PipelineEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Run the full pipeline for one query against a fresh context.
    pub async fn run(&self, query: &str) -> Result<AnalysisReport, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        let mut store = ContextStore::new();
        let mut agents_involved = vec![AgentRole::Coordinator];
        let mut state = PipelineState::Init;
        // Last non-terminal stage entered; composition failures are reported against it.
        let mut last_stage = state;

        info!(%run_id, query_len = query.len(), "Starting analysis");

        while let Some(next) = state.next() {
            state = next;
            let Some(role) = state.stage_role() else {
                break;
            };
            last_stage = state;

            self.emit(PipelineEvent::StageEntered { run_id, state, role });
            info!(%run_id, stage = %state, role = %role, "Stage entered");

            let stage_start = Instant::now();
            let outcome = self.specialist(role).act(query, &mut store).await;
            match outcome {
                Ok(partial) => {
                    let elapsed_ms = stage_start.elapsed().as_millis() as u64;
                    info!(
                        %run_id,
                        stage = %state,
                        role = %role,
                        fields = partial.fields_written.len(),
                        elapsed_ms,
                        "Stage completed"
                    );
                    agents_involved.push(role);
                    self.emit(PipelineEvent::StageCompleted {
                        run_id,
                        state,
                        role,
                        summary: partial.summary,
                        elapsed_ms,
                    });
                }
                Err(err) => return Err(self.fail(run_id, state, role, err, store)),
            }
        }

        let composed = self.coordinator.act(query, &mut store).await;
        let response = match composed {
            Ok(partial) => partial.summary,
            Err(err) => {
                return Err(self.fail(run_id, last_stage, AgentRole::Coordinator, err, store))
            }
        };
        agents_involved.push(AgentRole::Coordinator);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let context = store.into_snapshot();
        let using_live_data = context.data_source_status == Some(DataSourceStatus::Live);

        info!(%run_id, elapsed_ms, using_live_data, "Analysis complete");
        self.emit(PipelineEvent::PipelineCompleted { run_id, elapsed_ms });

        Ok(AnalysisReport {
            run_id,
            query: query.to_string(),
            response,
            status: PipelineState::Complete,
            summary: context.summary(),
            context,
            execution: ExecutionDetails {
                handoff_count: agents_involved.len().saturating_sub(1) as u32,
                agents_involved,
                elapsed_ms,
            },
            using_live_data,
            completed_at: Utc::now(),
        })
    }

    fn fail(
        &self,
        run_id: Uuid,
        state: PipelineState,
        role: AgentRole,
        error: AgentError,
        store: ContextStore,
    ) -> PipelineFailure {
        error!(%run_id, stage = %state, role = %role, error = %error, "Stage failed");
        self.emit(PipelineEvent::PipelineFailed {
            run_id,
            state,
            role,
            error: error.to_string(),
        });
        PipelineFailure {
            run_id,
            failed_stage: state,
            role,
            error,
            context: store.into_snapshot(),
        }
    }
}

/// The coordinator's final answer, assembled from the shared context.
///
/// Fails rather than guessing when the analyst or risk assessor has not
/// written its findings.
pub fn compose_recommendation(context: &SharedContext) -> Result<String, AgentError> {
    let impacts = context
        .company_impacts
        .as_ref()
        .ok_or(AgentError::IncompleteContext(ContextField::CompanyImpacts))?;
    let notes = context
        .risk_notes
        .as_ref()
        .ok_or(AgentError::IncompleteContext(ContextField::RiskNotes))?;

    let mut out = String::new();

    let readings: Vec<String> = Indicator::ALL
        .iter()
        .filter_map(|&i| context.indicator(i).map(|v| format!("{} {v}%", i.label())))
        .collect();
    if !readings.is_empty() {
        let source = match context.data_source_status {
            Some(DataSourceStatus::Live) => "live data",
            _ => "placeholder data",
        };
        let _ = writeln!(out, "Economic conditions ({source}): {}.", readings.join(", "));
        out.push('\n');
    }

    out.push_str("Company impacts:\n");
    if impacts.is_empty() {
        out.push_str("- No specific companies were named.\n");
    }
    for (ticker, impact) in impacts {
        let _ = writeln!(out, "- {ticker}: {impact}");
    }
    out.push('\n');

    match &context.risk_assessment {
        Some(assessment) => {
            let _ = writeln!(
                out,
                "Risk assessment ({}, score {}):",
                assessment.risk_level, assessment.risk_score
            );
        }
        None => out.push_str("Risk assessment:\n"),
    }
    let _ = writeln!(out, "{notes}");

    if let Some(assessment) = &context.risk_assessment {
        out.push_str("\nRecommended actions:\n");
        for action in assessment
            .recommendations
            .iter()
            .chain(&assessment.systemic.recommended_actions)
        {
            let _ = writeln!(out, "- {action}");
        }
    }

    Ok(out.trim_end().to_string())
}
